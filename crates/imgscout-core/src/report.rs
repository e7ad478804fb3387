//! Flat result rows and the padded report table built from them.

use serde::Serialize;

use crate::products::ImageSet;

/// Harvest outcome for a single input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    /// The reference text exactly as it appeared in the input column (trimmed).
    pub reference: String,
    pub images: ImageSet,
}

impl ResultRow {
    #[must_use]
    pub fn new(reference: impl Into<String>, images: ImageSet) -> Self {
        Self {
            reference: reference.into(),
            images,
        }
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// `reference, image_count, image_1..image_N` table where `N` is the largest
/// image count in the batch and shorter rows are padded with blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl ReportTable {
    #[must_use]
    pub fn from_rows(rows: &[ResultRow]) -> Self {
        let width = rows.iter().map(ResultRow::image_count).max().unwrap_or(0);

        let mut headers = Vec::with_capacity(width + 2);
        headers.push("reference".to_string());
        headers.push("image_count".to_string());
        headers.extend((1..=width).map(|i| format!("image_{i}")));

        let records = rows
            .iter()
            .map(|row| {
                let mut record = Vec::with_capacity(width + 2);
                record.push(row.reference.clone());
                record.push(row.image_count().to_string());
                record.extend(row.images.urls().iter().cloned());
                record.resize(width + 2, String::new());
                record
            })
            .collect();

        Self { headers, records }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of `image_*` columns.
    #[must_use]
    pub fn image_columns(&self) -> usize {
        self.headers.len().saturating_sub(2)
    }
}
