use crate::error::DataTaleError;
use crate::models::{Column, DataTable};
use std::path::Path;

pub struct DatasetLoader;

impl DatasetLoader {
    /// Checks that the path exists and carries the `.csv` extension. Invalid
    /// paths are a per-file error: logged and skipped by the batch driver,
    /// never fatal.
    pub fn validate_path(path: &Path) -> Result<(), DataTaleError> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if !path.is_file() || !is_csv {
            return Err(DataTaleError::InvalidInputPath(
                path.display().to_string(),
            ));
        }
        Ok(())
    }

    /// Dataset name used to prefix output artifacts: the file stem.
    pub fn dataset_name(path: &Path) -> String {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("dataset")
            .to_string()
    }

    pub fn load(path: &Path) -> Result<DataTable, DataTaleError> {
        Self::validate_path(path)?;

        // Lossy decoding: source files are often latin-1 and must not abort
        // the load on invalid UTF-8 sequences.
        let raw = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&raw);

        Self::parse(&Self::dataset_name(path), &text)
    }

    pub fn parse(name: &str, text: &str) -> Result<DataTable, DataTaleError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(DataTaleError::LoadError(format!(
                "{name}: no columns found"
            )));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (index, column) in cells.iter_mut().enumerate() {
                // Short records leave trailing cells missing.
                let value = record.get(index).unwrap_or("");
                column.push(if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                });
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(header, column_cells)| Column::classify(header, column_cells))
            .collect();

        Ok(DataTable::new(name, columns))
    }
}
