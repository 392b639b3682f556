use crate::analysis::Gender;
use crate::config::RosterConfig;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::io::Read;
use std::path::Path;

pub const FILE_COLUMN: &str = "File";
pub const AGE_COLUMN: &str = "Age (years)";
pub const GENDER_COLUMN: &str = "Gender";

/// A roster row that passed the age filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub subject_id: String,
    pub age: f64,
    pub gender: Gender,
}

impl RosterEntry {
    /// Interval file for this subject inside `data_dir`.
    pub fn interval_path(&self, data_dir: &Path) -> std::path::PathBuf {
        data_dir.join(format!("{}.txt", self.subject_id))
    }
}

pub fn read_roster(path: &Path, cfg: &RosterConfig) -> Result<Vec<RosterEntry>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_roster(file, cfg).with_context(|| format!("reading roster {}", path.display()))
}

/// Parse roster CSV rows. Rows with an unparsable or too-low age are skipped.
pub fn parse_roster<R: Read>(reader: R, cfg: &RosterConfig) -> Result<Vec<RosterEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().context("reading header")?.clone();
    let file_idx = locate_column(&headers, FILE_COLUMN)?;
    let age_idx = locate_column(&headers, AGE_COLUMN)?;
    let gender_idx = locate_column(&headers, GENDER_COLUMN).ok();

    let mut entries = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {}", row + 1))?;
        let Some(subject_id) = record.get(file_idx).filter(|id| !id.is_empty()) else {
            debug!("skipping row {}: no file id", row + 1);
            continue;
        };
        let age_text = record.get(age_idx).unwrap_or("");
        let age = match age_text.parse::<f64>() {
            Ok(age) if age.is_finite() => age,
            _ => {
                debug!("skipping {}: invalid age {:?}", subject_id, age_text);
                continue;
            }
        };
        if age < cfg.min_age_years {
            debug!(
                "skipping {}: age {} below {}",
                subject_id, age, cfg.min_age_years
            );
            continue;
        }
        let gender = gender_idx
            .and_then(|idx| record.get(idx))
            .map(Gender::from_code)
            .unwrap_or_default();
        entries.push(RosterEntry {
            subject_id: subject_id.to_string(),
            age,
            gender,
        });
    }
    Ok(entries)
}

fn locate_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow::anyhow!("missing {:?} column in roster header", name))
}
