// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Linear catalog search

use tracing::debug;

use crate::db::{Database, FileRecord, Lookup};

/// Case-insensitive substring match against each field of a record
pub fn matches(record: &FileRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let id = record.id.to_string();
    [
        id.as_str(),
        record.description.as_str(),
        record.tags.as_str(),
        record.status.as_str(),
        record.content_type.as_str(),
        record.sensitivity.as_str(),
        record.custom_fields.as_str(),
        record.date_created.as_str(),
        record.filename.as_str(),
        record.path.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// All records matching `term`, in catalog order
pub fn search(db: &Database, term: &str) -> Vec<FileRecord> {
    let matched: Vec<FileRecord> = db.find(Lookup::All)
        .into_iter()
        .filter(|record| matches(record, term))
        .collect();
    debug!("Search for {:?} matched {} records", term, matched.len());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewFileRecord, Sensitivity, Status};
    use tempfile::TempDir;

    fn record() -> FileRecord {
        FileRecord {
            id: 42,
            description: "Lease Agreement".to_string(),
            tags: "⚖️ Legal, 📋 Official".to_string(),
            status: Status::Review,
            content_type: "legal_document".to_string(),
            sensitivity: Sensitivity::Confidential,
            custom_fields: "renewal due in March".to_string(),
            date_created: "2026-10-17T09:30:00".to_string(),
            filename: "lease.pdf".to_string(),
            path: "/vault/Legal/lease.pdf".to_string(),
        }
    }

    #[test]
    fn test_matches_each_field_case_insensitively() {
        let r = record();
        for term in ["lease agreement", "LEGAL", "review", "confidential", "MARCH", "2026-10", "/vault/legal", "42"] {
            assert!(matches(&r, term), "expected {:?} to match", term);
        }
        assert!(!matches(&r, "invoice"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(matches(&record(), ""));
    }

    #[test]
    fn test_search_over_store() {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path().join("vault.db")).unwrap();
        for (path, desc) in [("/v/a.md", "Travel notes"), ("/v/b.pdf", "Tax return"), ("/v/c.txt", "travel budget")] {
            db.insert(&NewFileRecord {
                description: desc.to_string(),
                path: path.to_string(),
                filename: path.rsplit('/').next().unwrap().to_string(),
                ..Default::default()
            });
        }

        let found: Vec<_> = search(&db, "Travel").into_iter().map(|r| r.path).collect();
        assert_eq!(found, vec!["/v/a.md", "/v/c.txt"]);
        assert!(search(&db, "nothing here").is_empty());
        assert_eq!(search(&db, "").len(), 3);
    }
}
