//! Report writing functionality

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::report::Report;

/// Write reports as a pretty-printed JSON array
pub fn write_json<W: Write>(mut writer: W, reports: &[Report]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, reports).context("Failed to serialize reports")?;
    writeln!(writer)?;
    Ok(())
}

/// Write reports as human-readable tables
///
/// # Arguments
/// * `writer` - Destination for the rendered text
/// * `reports` - One report per validated folder, in order
pub fn write_table<W: Write>(mut writer: W, reports: &[Report]) -> Result<()> {
    for report in reports {
        writeln!(writer)?;
        writeln!(writer, "-------------------")?;
        writeln!(writer, "Folder Path: {}", report.folder_path.display())?;
        writeln!(writer)?;

        let mut summary = new_table(&["Result", "Value"]);
        summary
            .add_row(vec!["Total Files".to_string(), report.total_files.to_string()])
            .add_row(vec!["Intact Files".to_string(), report.intact_files.to_string()])
            .add_row(vec!["Corrupted Files".to_string(), report.corrupted_files.to_string()])
            .add_row(vec!["Invalid Files".to_string(), report.invalid_files.to_string()])
            .add_row(vec!["Unreadable Files".to_string(), report.errored_files.to_string()]);
        writeln!(writer, "{summary}")?;

        writeln!(writer)?;
        writeln!(writer, "Corrupted Files:")?;
        let mut corrupted = new_table(&["File Path", "Actual Hash"]);
        for file in &report.corrupted_file_list {
            corrupted.add_row(vec![file.file_path.display().to_string(), file.actual_hash.clone()]);
        }
        write_section(&mut writer, &corrupted)?;

        writeln!(writer)?;
        writeln!(writer, "Invalid File Names:")?;
        let mut invalid = new_table(&["File Path"]);
        for path in &report.invalid_file_list {
            invalid.add_row(vec![path.display().to_string()]);
        }
        write_section(&mut writer, &invalid)?;

        writeln!(writer)?;
        writeln!(writer, "Unreadable Files:")?;
        let mut errored = new_table(&["File Path", "Error"]);
        for file in &report.errored_file_list {
            errored.add_row(vec![file.file_path.display().to_string(), file.error.clone()]);
        }
        write_section(&mut writer, &errored)?;

        writeln!(writer)?;
        writeln!(writer, "-------------------")?;
    }
    Ok(())
}

/// Render reports into a newly created file
pub fn write_report(output_path: &Path, reports: &[Report], json: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report file {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if json {
        write_json(&mut writer, reports)?;
    } else {
        write_table(&mut writer, reports)?;
    }
    writer.flush()?;
    Ok(())
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(headers.to_vec());
    table
}

/// Print `table`, or `None` when it has no rows.
fn write_section<W: Write>(writer: &mut W, table: &Table) -> Result<()> {
    if table.row_iter().next().is_none() {
        writeln!(writer, "None")?;
    } else {
        writeln!(writer, "{table}")?;
    }
    Ok(())
}
