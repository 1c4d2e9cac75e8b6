use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use csv::WriterBuilder;

use crate::data::{CsvRecord, Payload, Response};

/// Directory a response is stored in:
/// `{root}/{function}/{YYYY-MM-DD}`.
pub fn output_dir(root: &str, function: &str) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    Path::new(root).join(function).join(today)
}

/// Saves the raw body as `raw.csv` or `raw.json` and returns the file path.
pub fn save_api_result(response: &Response, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let (file_name, contents) = match &response.payload {
        Payload::Csv(text) => ("raw.csv", text.clone()),
        Payload::Json(value) => ("raw.json", value.to_string()),
    };
    let file_path = dir.join(file_name);
    fs::write(&file_path, contents)?;
    Ok(file_path)
}

/// Writes decoded rows back out as CSV, using the first row's columns as the
/// header. Cells missing from a row are left blank.
pub fn write_records_csv(records: &[CsvRecord], output_path: &Path) -> Result<(), csv::Error> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_path(output_path)?;

    let Some(first) = records.first() else {
        wtr.flush()?;
        return Ok(());
    };
    let header: Vec<&str> = first.columns().collect();
    wtr.write_record(&header)?;

    for record in records {
        let row: Vec<&str> = header
            .iter()
            .map(|column| record.get(column).unwrap_or(""))
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decode_csv;
    use serde_json::json;

    #[test]
    fn test_output_dir_layout() {
        let dir = output_dir("data/raw", "TIME_SERIES_DAILY");
        let parts: Vec<_> = dir.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(&parts[..3], &["data", "raw", "TIME_SERIES_DAILY"]);
        assert_eq!(parts[3].len(), "2024-01-01".len());
    }

    #[test]
    fn test_save_api_result_picks_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = Response {
            function: "TIME_SERIES_DAILY",
            payload: Payload::Csv("a,b\n1,2\n".to_string()),
            truncation: None,
        };
        let path = save_api_result(&csv, tmp.path()).unwrap();
        assert!(path.ends_with("raw.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a,b\n1,2\n");

        let json = Response {
            function: "OVERVIEW",
            payload: Payload::Json(json!({"Symbol": "IBM"})),
            truncation: None,
        };
        let path = save_api_result(&json, &tmp.path().join("nested")).unwrap();
        assert!(path.ends_with("raw.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"Symbol":"IBM"}"#);
    }

    #[test]
    fn test_write_records_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("records.csv");
        let records = decode_csv("timestamp,close\n2024-01-02,10\n2024-01-03,11\n").unwrap();
        write_records_csv(&records, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "timestamp,close\n2024-01-02,10\n2024-01-03,11\n"
        );
    }
}
