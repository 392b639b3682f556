use crate::analysis::AnalysisResult;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

/// Write result rows with a header. Non-finite ratios are written as `inf`/`NaN`.
pub fn write_results<W: Write>(writer: W, results: &[AnalysisResult]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for result in results {
        writer
            .serialize(result)
            .with_context(|| format!("writing row for {}", result.subject_id))?;
    }
    writer.flush().context("flushing results")?;
    Ok(())
}

pub fn write_results_file(path: &Path, results: &[AnalysisResult]) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_results(file, results)
}
