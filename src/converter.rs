// File: ./src/converter.rs
// Conversion between CSV exports and JSON arrays of row objects.
use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Header-driven parse into a pretty-printed JSON array; every value is a string.
pub fn csv_to_json(text: &str) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("Failed to read CSV header")?
        .clone();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping CSV row {}: {}", index + 1, e);
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }
        let object: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(Value::Object(object));
    }

    Ok(serde_json::to_string_pretty(&Value::Array(rows))?)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// JSON array of objects to CSV. The header is the union of keys in first-seen order.
pub fn json_to_csv(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text).context("Failed to parse JSON")?;
    let Value::Array(items) = value else {
        bail!("JSON content is not an array of objects");
    };
    // No objects means no columns either.
    if items.is_empty() {
        return Ok(String::new());
    }

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(object) = item else {
            bail!("JSON content is not an array of objects");
        };
        for key in object.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(object);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for object in &objects {
        writer.write_record(
            headers
                .iter()
                .map(|h| object.get(h).map(cell_text).unwrap_or_default()),
        )?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes `<name>.json` next to the CSV file and returns its path.
pub fn convert_csv_file_to_json(csv_path: &Path) -> Result<PathBuf> {
    if !csv_path.exists() {
        bail!("CSV file not found: {}", csv_path.display());
    }
    let content = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read CSV file '{}'", csv_path.display()))?;
    let json = csv_to_json(&content)?;

    let json_path = csv_path.with_extension("json");
    fs::write(&json_path, json)
        .with_context(|| format!("Failed to write JSON file '{}'", json_path.display()))?;
    log::info!("JSON file created: {}", json_path.display());
    Ok(json_path)
}

/// Writes `<name>.csv` next to the JSON file and returns its path.
pub fn convert_json_file_to_csv(json_path: &Path) -> Result<PathBuf> {
    if !json_path.exists() {
        bail!("JSON file not found: {}", json_path.display());
    }
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file '{}'", json_path.display()))?;
    let csv = json_to_csv(&content)?;

    let csv_path = json_path.with_extension("csv");
    fs::write(&csv_path, csv)
        .with_context(|| format!("Failed to write CSV file '{}'", csv_path.display()))?;
    log::info!("CSV file created: {}", csv_path.display());
    Ok(csv_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_array_json() {
        assert!(json_to_csv(r#"{"name":"Ana"}"#).is_err());
        assert!(json_to_csv(r#"[1, 2]"#).is_err());
        assert!(json_to_csv("not json").is_err());
    }

    #[test]
    fn header_is_union_of_keys() {
        let csv = json_to_csv(r#"[{"a":"1"},{"b":2,"a":null}]"#).unwrap();
        assert_eq!(csv, "a,b\n1,\n,2\n");
    }

    #[test]
    fn empty_array_writes_empty_csv() {
        assert_eq!(json_to_csv("[]").unwrap(), "");
        let json = csv_to_json("name,status\n").unwrap();
        assert_eq!(json_to_csv(&json).unwrap(), "");
    }

    #[test]
    fn csv_to_json_emits_string_values() {
        let json = csv_to_json("name,score\nAna,42\n").unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["score"], Value::String("42".into()));
    }
}
