/// Export sinks: browser downloads of CSV, ZIP, HTML and JSON payloads
use crate::artifacts::table::model::{csv_file_name, to_csv};
use contracts::chat::TableArtifact;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CSV_MIME: &str = "text/csv;charset=utf-8;";
pub const ZIP_FILE_NAME: &str = "all_tables.zip";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,

    #[error("Failed to build archive: {0}")]
    Archive(String),

    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Browser download failed: {0}")]
    Dom(String),
}

impl From<zip::result::ZipError> for ExportError {
    fn from(e: zip::result::ZipError) -> Self {
        ExportError::Archive(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Archive(e.to_string())
    }
}

/// Download one table as `<fact>.csv`
pub fn export_table_csv(table: &TableArtifact) -> Result<(), ExportError> {
    let csv = to_csv(table);
    if csv.is_empty() {
        return Err(ExportError::Empty);
    }
    download_text(&csv, &csv_file_name(table), CSV_MIME)
}

/// Download every stored table as CSV files bundled in one archive
pub fn export_tables_zip(tables: &[TableArtifact]) -> Result<(), ExportError> {
    let bytes = build_tables_zip(tables)?;
    download_bytes(&bytes, ZIP_FILE_NAME, "application/zip")
}

pub fn export_filing_html(html: &str) -> Result<(), ExportError> {
    download_text(html, "filing.html", "text/html")
}

pub fn export_filing_json(data: &serde_json::Value) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(data)?;
    download_text(&json, "filing_data.json", "application/json")
}

/// Build the archive in memory: one CSV per table, duplicate names suffixed
pub fn build_tables_zip(tables: &[TableArtifact]) -> Result<Vec<u8>, ExportError> {
    if tables.is_empty() {
        return Err(ExportError::Empty);
    }

    let names = unique_file_names(tables.iter().map(csv_file_name));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (table, name) in tables.iter().zip(names) {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(to_csv(table).as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// "a.csv", "a.csv" -> "a.csv", "a (2).csv"
fn unique_file_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name;
            }
            match name.rsplit_once('.') {
                Some((stem, ext)) => format!("{} ({}).{}", stem, count, ext),
                None => format!("{} ({})", name, count),
            }
        })
        .collect()
}

fn download_text(content: &str, filename: &str, mime: &str) -> Result<(), ExportError> {
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    let blob = Blob::new_with_str_sequence_and_options(&parts, &properties)
        .map_err(|e| ExportError::Dom(format!("Failed to create blob: {:?}", e)))?;
    download_blob(&blob, filename)
}

fn download_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), ExportError> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties)
        .map_err(|e| ExportError::Dom(format!("Failed to create blob: {:?}", e)))?;
    download_blob(&blob, filename)
}

/// Start a browser download of the blob under `filename`
fn download_blob(blob: &Blob, filename: &str) -> Result<(), ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::Dom("No window object".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::Dom("No document object".into()))?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| ExportError::Dom(format!("Failed to create object URL: {:?}", e)))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| ExportError::Dom(format!("Failed to create anchor: {:?}", e)))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| ExportError::Dom(format!("Failed to cast to anchor: {:?}", e)))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)
        .map_err(|e| ExportError::Dom(format!("Failed to revoke URL: {:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;

    fn table(fact: &str, rows: serde_json::Value) -> TableArtifact {
        serde_json::from_value(json!({"fact": fact, "table": rows})).unwrap()
    }

    #[test]
    fn test_unique_file_names() {
        let names = unique_file_names(
            ["a.csv", "b.csv", "a.csv", "a.csv", "noext", "noext"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(
            names,
            vec!["a.csv", "b.csv", "a (2).csv", "a (3).csv", "noext", "noext (2)"]
        );
    }

    #[test]
    fn test_zip_contains_one_csv_per_table() {
        let tables = vec![
            table("Revenues", json!([{"x": 1, "y": 2}, {"x": 3, "y": 4}])),
            table("Revenues", json!([{"x": 5}])),
        ];
        let bytes = build_tables_zip(&tables).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut first = String::new();
        archive
            .by_name("Revenues.csv")
            .unwrap()
            .read_to_string(&mut first)
            .unwrap();
        assert_eq!(first, "x,y\n1,2\n3,4\n");

        let mut second = String::new();
        archive
            .by_name("Revenues (2).csv")
            .unwrap()
            .read_to_string(&mut second)
            .unwrap();
        assert_eq!(second, "x\n5\n");
    }

    #[test]
    fn test_zip_of_nothing_is_rejected() {
        assert!(matches!(build_tables_zip(&[]), Err(ExportError::Empty)));
    }
}
