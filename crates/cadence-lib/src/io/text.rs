use crate::signal::IntervalSeries;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse one interval (ms) per line, skipping blank and `#` lines.
pub fn parse_intervals(text: &str) -> Result<IntervalSeries> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not a number: {}", idx + 1, trimmed))?;
        if !val.is_finite() {
            anyhow::bail!("line {} is not finite: {}", idx + 1, trimmed);
        }
        out.push(val);
    }
    Ok(IntervalSeries::new(out))
}

/// Read an interval file from disk.
pub fn read_intervals(path: &Path) -> Result<IntervalSeries> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_intervals(&text).with_context(|| format!("parsing {}", path.display()))
}
