// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! JSON index load/save helpers

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::path::Path;

use crate::db::FileRecord;
use crate::Result;

/// Read a JSON document
pub fn load_index(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a JSON document with two-space indentation
pub fn save_index(path: &Path, index: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(index)?;
    content.push('\n');
    std::fs::write(path, content)?;
    Ok(())
}

/// Current UTC time as ISO-8601 with a `Z` suffix
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Export document for a set of records
pub fn export_document(records: &[FileRecord]) -> Result<Value> {
    Ok(serde_json::json!({
        "generated_at": timestamp(),
        "count": records.len(),
        "files": serde_json::to_value(records)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Sensitivity, Status};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/index.json");
        let doc = json!({ "files": [{ "path": "/a.txt", "tags": ["x", "y"] }], "version": 2 });

        save_index(&path, &doc).unwrap();
        assert_eq!(load_index(&path).unwrap(), doc);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"files\": ["));
    }

    #[test]
    fn test_load_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(load_index(&path), Err(crate::VaultError::Json(_))));
        assert!(matches!(
            load_index(&tmp.path().join("missing.json")),
            Err(crate::VaultError::FileSystem(_))
        ));
    }

    #[test]
    fn test_timestamp_is_utc() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_export_document_shape() {
        let records = vec![FileRecord {
            id: 1,
            description: "Plan".to_string(),
            tags: "💼 Business".to_string(),
            status: Status::InProgress,
            content_type: "business_document".to_string(),
            sensitivity: Sensitivity::Public,
            custom_fields: String::new(),
            date_created: "2026-10-17T10:00:00".to_string(),
            filename: "plan.md".to_string(),
            path: "/v/plan.md".to_string(),
        }];

        let doc = export_document(&records).unwrap();
        assert_eq!(doc["count"], 1);
        assert_eq!(doc["files"][0]["status"], "in_progress");
        assert_eq!(doc["files"][0]["sensitivity"], "public");
        assert!(doc["generated_at"].as_str().unwrap().ends_with('Z'));
    }
}
