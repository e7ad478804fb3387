//! Reading the reference column out of the input table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

/// How an input file is parsed, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    /// Excel or OpenDocument workbook; the first sheet is read.
    Spreadsheet,
    Delimited(u8),
}

impl InputFormat {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::Spreadsheet,
            "tsv" => Self::Delimited(b'\t'),
            _ => Self::Delimited(b','),
        }
    }
}

/// Reads every value of `column` from the table at `path`, in row order.
///
/// Workbooks (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`) are read from their
/// first sheet, `.tsv` files are tab-delimited, and anything else is read as
/// CSV. Blank cells are kept so the report stays aligned with the input rows.
pub(crate) fn read_references(path: &Path, column: &str) -> anyhow::Result<Vec<String>> {
    match InputFormat::from_path(path) {
        InputFormat::Spreadsheet => read_workbook_references(path, column),
        InputFormat::Delimited(delimiter) => {
            let file = File::open(path)
                .map_err(|e| anyhow::anyhow!("failed to open input '{}': {e}", path.display()))?;
            read_references_from(file, delimiter, column)
        }
    }
}

pub(crate) fn read_references_from<R: Read>(
    source: R,
    delimiter: u8,
    column: &str,
) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| clean_header(h).to_string())
        .collect();
    let index = column_index(&headers, column)?;

    let mut references = Vec::new();
    for record in reader.records() {
        let record = record?;
        references.push(record.get(index).unwrap_or_default().trim().to_string());
    }
    Ok(references)
}

fn read_workbook_references(path: &Path, column: &str) -> anyhow::Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| anyhow::anyhow!("failed to open workbook '{}': {e}", path.display()))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        anyhow::bail!("workbook '{}' has no sheets", path.display());
    };
    let range = workbook.worksheet_range(&sheet).map_err(|e| {
        anyhow::anyhow!(
            "failed to read sheet '{sheet}' of '{}': {e}",
            path.display()
        )
    })?;
    tracing::debug!(path = %path.display(), sheet = %sheet, rows = range.height(), "read workbook");
    references_from_rows(range.rows(), column)
}

/// First row is the header; numeric cells keep their plain display form, so
/// a SKU typed as `123456` reads back as `"123456"`.
fn references_from_rows<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
    column: &str,
) -> anyhow::Result<Vec<String>> {
    let headers: Vec<String> = rows
        .next()
        .map(|row| {
            row.iter()
                .map(|cell| clean_header(&cell_text(cell)).to_string())
                .collect()
        })
        .unwrap_or_default();
    let index = column_index(&headers, column)?;
    Ok(rows
        .map(|row| row.get(index).map(cell_text).unwrap_or_default())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    cell.to_string().trim().to_string()
}

fn column_index(headers: &[String], column: &str) -> anyhow::Result<usize> {
    let wanted = column.trim();
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "column '{wanted}' not found in input; detected columns: [{}]",
                headers.join(", ")
            )
        })
}

fn clean_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_column_case_insensitively() {
        let data = "Name,Link,Price\nEarbuds, https://www.jumia.com.ng/earbuds-1.html ,100\nPhone,GE779EA0ABCD,200\n";
        let refs = read_references_from(data.as_bytes(), b',', "link").unwrap();
        assert_eq!(
            refs,
            ["https://www.jumia.com.ng/earbuds-1.html", "GE779EA0ABCD"]
        );
    }

    #[test]
    fn keeps_blank_cells_and_short_rows() {
        let data = "id,link\n1,\n2\n3,wireless earbuds\n";
        let refs = read_references_from(data.as_bytes(), b',', "link").unwrap();
        assert_eq!(refs, ["", "", "wireless earbuds"]);
    }

    #[test]
    fn reads_tab_separated_input() {
        let data = "sku\tname\nGE779EA0ABCD\tEarbuds\n";
        let refs = read_references_from(data.as_bytes(), b'\t', "SKU").unwrap();
        assert_eq!(refs, ["GE779EA0ABCD"]);
    }

    #[test]
    fn missing_column_lists_detected_columns() {
        let data = "name,url\nA,https://x.test/a-1.html\n";
        let err = read_references_from(data.as_bytes(), b',', "link").unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("'link'") && message.contains("[name, url]"),
            "expected detected column list, got: {message}"
        );
    }

    #[test]
    fn quoted_fields_with_delimiters_survive() {
        let data = "link\n\"phone case, black\"\n";
        let refs = read_references_from(data.as_bytes(), b',', "link").unwrap();
        assert_eq!(refs, ["phone case, black"]);
    }

    #[test]
    fn extension_selects_input_format() {
        let format = |p: &str| InputFormat::from_path(Path::new(p));
        assert_eq!(format("in/products.TSV"), InputFormat::Delimited(b'\t'));
        assert_eq!(format("products.csv"), InputFormat::Delimited(b','));
        assert_eq!(format("products"), InputFormat::Delimited(b','));
        assert_eq!(format("products.XLSX"), InputFormat::Spreadsheet);
        assert_eq!(format("legacy.xls"), InputFormat::Spreadsheet);
        assert_eq!(format("sheet.ods"), InputFormat::Spreadsheet);
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("imgscout-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reads_first_sheet_of_generated_workbook() {
        let path = scratch_dir("input-xlsx").join("products.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(0, 1, " LINK ").unwrap();
        sheet.write_string(1, 0, "Earbuds").unwrap();
        sheet.write_string(1, 1, " https://www.jumia.com.ng/earbuds-1.html ").unwrap();
        sheet.write_string(2, 0, "Numeric SKU").unwrap();
        sheet.write_number(2, 1, 123_456.0).unwrap();
        sheet.write_string(3, 0, "Blank").unwrap();
        sheet.write_string(4, 0, "Search").unwrap();
        sheet.write_string(4, 1, "wireless earbuds").unwrap();
        workbook.save(&path).unwrap();

        let refs = read_references(&path, "link").unwrap();
        assert_eq!(
            refs,
            [
                "https://www.jumia.com.ng/earbuds-1.html",
                "123456",
                "",
                "wireless earbuds"
            ]
        );
    }

    #[test]
    fn workbook_missing_column_lists_detected_columns() {
        let path = scratch_dir("input-xlsx-missing").join("products.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "url").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        workbook.save(&path).unwrap();

        let err = read_references(&path, "link").unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("[name, url]"),
            "expected detected column list, got: {message}"
        );
    }

    #[test]
    fn unreadable_workbook_is_an_error() {
        let path = scratch_dir("input-xlsx-corrupt").join("broken.xlsx");
        std::fs::write(&path, "not a zip archive").unwrap();
        let result = read_references(&path, "link");
        assert!(result.is_err(), "expected workbook error, got: {result:?}");
    }
}
