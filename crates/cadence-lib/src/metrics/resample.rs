use crate::error::{HrvError, HrvResult};
use crate::signal::{IntervalSeries, UniformSignal};

/// Resample an interval series onto a uniform time grid.
///
/// Grid points run from 0 up to (excluding) the last beat time in steps of
/// `1000 / fs` ms, stopping after `max_samples` points. Values are linearly
/// interpolated between beats and held at the first/last interval outside the
/// beat range. A NaN or infinite beat timeline is rejected.
pub fn resample(
    series: &IntervalSeries,
    fs: f64,
    max_samples: usize,
) -> HrvResult<UniformSignal> {
    let times = series.beat_times_ms();
    let values = &series.intervals_ms;
    let Some(&t_end) = times.last() else {
        return Ok(UniformSignal::empty(fs));
    };
    if !t_end.is_finite() {
        return Err(HrvError::NonFinite {
            stage: "beat timeline",
        });
    }
    let step = 1000.0 / fs;
    if !(step.is_finite() && step > 0.0) {
        return Ok(UniformSignal::empty(fs));
    }

    // float-to-int casts saturate, so a huge span stays bounded by max_samples
    let count = ((t_end / step).ceil().max(0.0) as usize).min(max_samples);
    let mut timestamps = Vec::with_capacity(count);
    let mut samples = Vec::with_capacity(count);
    let mut cursor = 0;
    for k in 0..max_samples {
        let t = k as f64 * step;
        if t >= t_end {
            break;
        }
        while cursor + 1 < times.len() && times[cursor + 1] <= t {
            cursor += 1;
        }
        timestamps.push(t);
        samples.push(interpolate_from(&times, values, t, cursor));
    }

    Ok(UniformSignal {
        fs,
        timestamps_ms: timestamps,
        values: samples,
    })
}

/// Linearly interpolate `values` (sampled at ascending `times`) at `t`.
///
/// Outside `[times[0], times[last]]` the nearest end value is returned. At an
/// existing timestamp the stored value is returned unchanged.
pub fn interpolate_at(times: &[f64], values: &[f64], t: f64) -> f64 {
    let n = times.len().min(values.len());
    if n == 0 {
        return 0.0;
    }
    let (times, values) = (&times[..n], &values[..n]);
    let mut cursor = 0;
    while cursor + 1 < times.len() && times[cursor + 1] <= t {
        cursor += 1;
    }
    interpolate_from(times, values, t, cursor)
}

// `cursor` is the last index with times[cursor] <= t (or 0 when t precedes it).
fn interpolate_from(times: &[f64], values: &[f64], t: f64, cursor: usize) -> f64 {
    let last = times.len() - 1;
    if t <= times[0] {
        return values[0];
    }
    if t >= times[last] {
        return values[last];
    }
    let (x0, x1) = (times[cursor], times[cursor + 1]);
    let (y0, y1) = (values[cursor], values[cursor + 1]);
    if x1 == x0 {
        return y0;
    }
    let frac = (t - x0) / (x1 - x0);
    y0 + frac * (y1 - y0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_excludes_last_beat_time() {
        let series = IntervalSeries::new(vec![500.0, 500.0, 500.0]);
        let signal = resample(&series, 4.0, 4096).unwrap();
        // beats at 0, 500, 1000 → grid 0, 250, 500, 750
        assert_eq!(signal.timestamps_ms, vec![0.0, 250.0, 500.0, 750.0]);
        assert_eq!(signal.values, vec![500.0; 4]);
        assert_eq!(signal.step_ms(), 250.0);
    }

    #[test]
    fn interpolates_between_beats() {
        // beats at 0, 800, 1800 with values 1000, 800, 1000
        let series = IntervalSeries::new(vec![1000.0, 800.0, 1000.0]);
        let signal = resample(&series, 4.0, 4096).unwrap();
        assert_eq!(signal.len(), 8);
        assert_eq!(signal.values[0], 1000.0);
        assert!((signal.values[1] - 937.5).abs() < 1e-12);
        assert!((signal.values[2] - 875.0).abs() < 1e-12);
        // 1000 ms sits between 800 (value 800) and 1800 (value 1000)
        assert!((signal.values[4] - 840.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_series_is_reproduced_exactly() {
        let intervals = vec![250.0, 250.0, 250.0, 250.0, 250.0, 250.0];
        let series = IntervalSeries::new(intervals.clone());
        let signal = resample(&series, 4.0, 4096).unwrap();
        let times = series.beat_times_ms();
        assert_eq!(&signal.timestamps_ms[..], &times[..times.len() - 1]);
        assert_eq!(&signal.values[..], &intervals[..intervals.len() - 1]);
    }

    #[test]
    fn interpolation_at_existing_timestamps_is_exact() {
        let times = [0.0, 812.5, 1601.25, 2409.0, 3197.75];
        let values = [0.1, 812.3, 788.7, 807.9, 0.3];
        for (t, v) in times.iter().zip(values.iter()) {
            assert_eq!(interpolate_at(&times, &values, *t), *v);
        }
    }

    #[test]
    fn clamps_outside_range() {
        let times = [0.0, 100.0];
        let values = [5.0, 7.0];
        assert_eq!(interpolate_at(&times, &values, -10.0), 5.0);
        assert_eq!(interpolate_at(&times, &values, 250.0), 7.0);
    }

    #[test]
    fn zero_interval_does_not_divide_by_zero() {
        let times = [0.0, 100.0, 100.0, 200.0];
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(interpolate_at(&times, &values, 50.0), 1.5);
        assert_eq!(interpolate_at(&times, &values, 100.0), 3.0);
        assert_eq!(interpolate_at(&times, &values, 150.0), 3.5);
    }

    #[test]
    fn short_series_give_empty_signal() {
        assert!(resample(&IntervalSeries::new(Vec::new()), 4.0, 4096)
            .unwrap()
            .is_empty());
        assert!(resample(&IntervalSeries::new(vec![800.0]), 4.0, 4096)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn huge_interval_stops_at_sample_limit() {
        let series = IntervalSeries::new(vec![800.0, 1e300, 800.0]);
        let signal = resample(&series, 4.0, 64).unwrap();
        assert_eq!(signal.len(), 64);
        assert_eq!(signal.timestamps_ms[63], 63.0 * 250.0);
        assert!(signal.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn sample_limit_truncates_ordinary_series() {
        let series = IntervalSeries::new(vec![500.0; 10]);
        let full = resample(&series, 4.0, 4096).unwrap();
        let capped = resample(&series, 4.0, 5).unwrap();
        assert_eq!(full.len(), 18);
        assert_eq!(capped.values, full.values[..5]);
    }

    #[test]
    fn non_finite_timeline_is_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let series = IntervalSeries::new(vec![800.0, bad, 800.0]);
            assert_eq!(
                resample(&series, 4.0, usize::MAX).unwrap_err(),
                HrvError::NonFinite {
                    stage: "beat timeline"
                }
            );
        }
        let overflow = IntervalSeries::new(vec![f64::MAX, f64::MAX, f64::MAX]);
        assert!(resample(&overflow, 4.0, usize::MAX).is_err());
    }
}
