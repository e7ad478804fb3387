//! Report writing: CSV by default, an Excel workbook for `.xlsx` paths.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use imgscout_core::ReportTable;
use rust_xlsxwriter::Workbook;

/// Column of the report holding the image count, written as a number in
/// workbooks.
const IMAGE_COUNT_COLUMN: usize = 1;

pub(crate) fn write_report(path: &Path, table: &ReportTable) -> anyhow::Result<()> {
    if is_workbook_path(path) {
        return write_workbook(path, table);
    }
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("failed to create report '{}': {e}", path.display()))?;
    write_report_to(file, table)
}

fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

pub(crate) fn write_report_to<W: Write>(sink: W, table: &ReportTable) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(table.headers())?;
    for record in table.records() {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `table` to the first sheet of a new workbook. Padding cells are
/// left empty instead of holding empty strings.
fn write_workbook(path: &Path, table: &ReportTable) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        sheet.write_string(0, u16::try_from(col)?, header)?;
    }
    for (i, record) in table.records().iter().enumerate() {
        let row = u32::try_from(i + 1)?;
        for (col, value) in record.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col_num = u16::try_from(col)?;
            match value.parse::<u32>() {
                Ok(count) if col == IMAGE_COUNT_COLUMN => {
                    sheet.write_number(row, col_num, f64::from(count))?;
                }
                _ => {
                    sheet.write_string(row, col_num, value)?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| anyhow::anyhow!("failed to write report '{}': {e}", path.display()))?;
    Ok(())
}
