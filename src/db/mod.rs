// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Database module for the file catalog
//!
//! Every public operation opens its own connection, runs one statement and
//! closes it again. Storage errors never reach the caller: they are logged
//! and turned into a sentinel (`false`, an empty list, or an
//! [`InsertOutcome`] variant).

mod record;

pub use record::{FileField, FileRecord, NewFileRecord, Sensitivity, Status};

use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, warn};

use crate::{Result, VaultError};

const COLUMNS: &str = "id, description, tags, status, content_type, sensitivity, \
                       custom_fields, date_created, filename, path";

/// Handle to the catalog database file
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

/// Result of an insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row written with this id
    Inserted(i64),
    /// A record for the same path already exists; nothing was written
    DuplicatePath,
    /// Storage failure (already logged)
    Failed,
}

impl InsertOutcome {
    pub fn id(&self) -> Option<i64> {
        match self {
            InsertOutcome::Inserted(id) => Some(*id),
            _ => None,
        }
    }
}

/// Lookup filter for [`Database::find`]
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    All,
    Filename(&'a str),
    Path(&'a Path),
}

impl Database {
    /// Open (or create) the catalog at `path`, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Self { path };
        if !db.ensure_schema() {
            return Err(VaultError::Config(format!(
                "Could not initialise catalog at {}",
                db.path.display()
            )));
        }
        Ok(db)
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create the `files` table if it does not exist. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> bool {
        match self.try_ensure_schema() {
            Ok(()) => true,
            Err(e) => {
                error!("Database setup error: {}", e);
                false
            }
        }
    }

    fn try_ensure_schema(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = self.connect()?;
        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT,
                tags TEXT,
                status TEXT,
                content_type TEXT,
                sensitivity TEXT,
                custom_fields TEXT,
                date_created TEXT,
                filename TEXT,
                path TEXT UNIQUE
            );

            CREATE INDEX IF NOT EXISTS idx_files_filename ON files(filename);
        "#)?;
        Ok(())
    }

    /// Insert a new record. A second record for the same path is rejected.
    pub fn insert(&self, record: &NewFileRecord) -> InsertOutcome {
        match self.try_insert(record) {
            Ok(id) => {
                debug!("Inserted record {} for {}", id, record.path);
                InsertOutcome::Inserted(id)
            }
            Err(VaultError::DuplicatePath(path)) => {
                warn!("A record for this file path already exists: {}", path);
                InsertOutcome::DuplicatePath
            }
            Err(e) => {
                error!("Error adding file metadata: {}", e);
                InsertOutcome::Failed
            }
        }
    }

    fn try_insert(&self, record: &NewFileRecord) -> Result<i64> {
        let conn = self.connect()?;
        let inserted = conn.execute(
            r#"INSERT INTO files (description, tags, status, content_type, sensitivity,
                                  custom_fields, date_created, filename, path)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                record.description,
                record.tags,
                record.status,
                record.content_type,
                record.sensitivity,
                record.custom_fields,
                record.date_created,
                record.filename,
                record.path,
            ],
        );
        match inserted {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(VaultError::DuplicatePath(record.path.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Exact-match lookup by path or filename, or every record, in id order
    pub fn find(&self, lookup: Lookup<'_>) -> Vec<FileRecord> {
        self.try_find(lookup).unwrap_or_else(|e| {
            error!("Error retrieving metadata: {}", e);
            Vec::new()
        })
    }

    fn try_find(&self, lookup: Lookup<'_>) -> Result<Vec<FileRecord>> {
        let conn = self.connect()?;
        let (filter, value) = match lookup {
            Lookup::All => ("", None),
            Lookup::Filename(name) => (" WHERE filename = ?1", Some(name.to_string())),
            Lookup::Path(path) => (" WHERE path = ?1", Some(path.to_string_lossy().into_owned())),
        };
        let mut stmt = conn.prepare(&format!("SELECT {} FROM files{} ORDER BY id", COLUMNS, filter))?;
        let records = match value {
            Some(value) => stmt.query_map(params![value], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt.query_map([], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(records)
    }

    /// Fetch one record by id
    pub fn get(&self, id: i64) -> Option<FileRecord> {
        match self.try_get(id) {
            Ok(record) => record,
            Err(e) => {
                error!("Error retrieving record {}: {}", id, e);
                None
            }
        }
    }

    fn try_get(&self, id: i64) -> Result<Option<FileRecord>> {
        let conn = self.connect()?;
        let result = conn.query_row(
            &format!("SELECT {} FROM files WHERE id = ?1", COLUMNS),
            params![id],
            row_to_record,
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a single field on one record.
    ///
    /// Returns `false` for an unknown id, a value the field rejects, a path
    /// already cataloged elsewhere, or a storage failure.
    pub fn update_field(&self, id: i64, field: FileField, value: &str) -> bool {
        match self.try_update_field(id, field, value) {
            Ok(()) => {
                debug!("Updated {} on record {}", field, id);
                true
            }
            Err(e @ (VaultError::UnknownRecord(_)
                | VaultError::InvalidValue { .. }
                | VaultError::DuplicatePath(_))) => {
                warn!("Update rejected: {}", e);
                false
            }
            Err(e) => {
                error!("Error updating metadata: {}", e);
                false
            }
        }
    }

    /// Like [`Database::update_field`], reporting why an update was refused:
    /// `InvalidValue`, `UnknownRecord`, `DuplicatePath` or a storage error.
    pub fn try_update_field(&self, id: i64, field: FileField, value: &str) -> Result<()> {
        let value = field.normalize(value)?;
        let conn = self.connect()?;
        // Column name comes from the FileField allow-list, never from input
        let sql = format!("UPDATE files SET {} = ?1 WHERE id = ?2", field.column());
        let changed = match conn.execute(&sql, params![value, id]) {
            Ok(n) => n,
            Err(e) if is_unique_violation(&e) => return Err(VaultError::DuplicatePath(value)),
            Err(e) => return Err(e.into()),
        };
        if changed == 0 {
            return Err(VaultError::UnknownRecord(id));
        }
        Ok(())
    }

    /// Number of cataloged files
    pub fn count(&self) -> usize {
        let counted = self.connect().and_then(|conn| {
            conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get::<_, i64>(0))
                .map_err(Into::into)
        });
        match counted {
            Ok(n) => n.max(0) as usize,
            Err(e) => {
                error!("Error counting records: {}", e);
                0
            }
        }
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

/// Enum column that falls back to the default for unrecognized text
fn enum_column<T>(row: &Row<'_>, idx: usize, id: i64) -> rusqlite::Result<T>
where
    T: FromStr + Default,
{
    let raw = text(row, idx)?;
    if raw.is_empty() {
        return Ok(T::default());
    }
    Ok(raw.parse().unwrap_or_else(|_| {
        warn!("Record {} has unrecognized value {:?} in column {}", id, raw, idx);
        T::default()
    }))
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    let id: i64 = row.get(0)?;
    Ok(FileRecord {
        id,
        description: text(row, 1)?,
        tags: text(row, 2)?,
        status: enum_column::<Status>(row, 3, id)?,
        content_type: text(row, 4)?,
        sensitivity: enum_column::<Sensitivity>(row, 5, id)?,
        custom_fields: text(row, 6)?,
        date_created: text(row, 7)?,
        filename: text(row, 8)?,
        path: text(row, 9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, Database) {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path().join("_System/data/vault.db")).unwrap();
        (tmp, db)
    }

    fn sample(path: &str) -> NewFileRecord {
        NewFileRecord {
            description: "Quarterly report".to_string(),
            tags: "📄 Document, 💼 Business".to_string(),
            status: Status::New,
            content_type: "business_document".to_string(),
            sensitivity: Sensitivity::Internal,
            custom_fields: "check figures".to_string(),
            date_created: "2026-10-17T09:30:00.123456".to_string(),
            filename: Path::new(path).file_name().unwrap().to_string_lossy().into_owned(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let (tmp, db) = open_temp();
        assert!(tmp.path().join("_System/data").is_dir());
        assert!(db.path().exists());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let (_tmp, db) = open_temp();
        let id = db.insert(&sample("/docs/report.pdf")).id().unwrap();
        assert!(db.ensure_schema());
        assert!(db.ensure_schema());
        assert_eq!(db.get(id).unwrap().description, "Quarterly report");
    }

    #[test]
    fn test_insert_returns_positive_id() {
        let (_tmp, db) = open_temp();
        let first = db.insert(&sample("/docs/a.txt"));
        let second = db.insert(&sample("/docs/b.txt"));
        assert!(first.id().unwrap() > 0);
        assert!(second.id().unwrap() > first.id().unwrap());
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let (_tmp, db) = open_temp();
        let original = sample("/docs/report.pdf");
        let id = db.insert(&original).id().unwrap();

        let mut again = sample("/docs/report.pdf");
        again.description = "Overwritten?".to_string();
        assert_eq!(db.insert(&again), InsertOutcome::DuplicatePath);

        let found = db.find(Lookup::Path(Path::new("/docs/report.pdf")));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].description, "Quarterly report");
    }

    #[test]
    fn test_find_by_path_returns_inserted_fields() {
        let (_tmp, db) = open_temp();
        let record = sample("/docs/report.pdf");
        let id = db.insert(&record).id().unwrap();

        let found = db.find(Lookup::Path(Path::new("/docs/report.pdf")));
        assert_eq!(found.len(), 1);
        let got = &found[0];
        assert_eq!(got.id, id);
        assert_eq!(got.description, record.description);
        assert_eq!(got.tags, record.tags);
        assert_eq!(got.status, record.status);
        assert_eq!(got.content_type, record.content_type);
        assert_eq!(got.sensitivity, record.sensitivity);
        assert_eq!(got.custom_fields, record.custom_fields);
        assert_eq!(got.date_created, record.date_created);
        assert_eq!(got.filename, "report.pdf");
        assert_eq!(got.path, record.path);
    }

    #[test]
    fn test_find_by_filename_and_all() {
        let (_tmp, db) = open_temp();
        db.insert(&sample("/a/notes.md"));
        db.insert(&sample("/b/notes.md"));
        db.insert(&sample("/c/plan.docx"));

        assert_eq!(db.find(Lookup::Filename("notes.md")).len(), 2);
        assert_eq!(db.find(Lookup::Filename("missing.md")).len(), 0);

        let all = db.find(Lookup::All);
        let paths: Vec<_> = all.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/a/notes.md", "/b/notes.md", "/c/plan.docx"]);
        assert_eq!(db.count(), 3);
    }

    #[test]
    fn test_update_field_changes_only_that_field() {
        let (_tmp, db) = open_temp();
        let id = db.insert(&sample("/docs/report.pdf")).id().unwrap();
        let before = db.get(id).unwrap();

        assert!(db.update_field(id, FileField::Status, "archived"));

        let after = db.get(id).unwrap();
        assert_eq!(after.status, Status::Archived);
        assert_eq!(FileRecord { status: Status::New, ..after }, before);
    }

    #[test]
    fn test_update_unknown_id_fails_without_creating() {
        let (_tmp, db) = open_temp();
        db.insert(&sample("/docs/report.pdf"));

        assert!(!db.update_field(999, FileField::Description, "ghost"));
        assert_eq!(db.count(), 1);
        assert!(db.get(999).is_none());
    }

    #[test]
    fn test_update_rejects_invalid_enum_value() {
        let (_tmp, db) = open_temp();
        let id = db.insert(&sample("/docs/report.pdf")).id().unwrap();

        assert!(!db.update_field(id, FileField::Status, "bogus"));
        assert!(!db.update_field(id, FileField::Sensitivity, "top secret"));
        let record = db.get(id).unwrap();
        assert_eq!(record.status, Status::New);
        assert_eq!(record.sensitivity, Sensitivity::Internal);

        assert!(db.update_field(id, FileField::Sensitivity, "Confidential"));
        assert_eq!(db.get(id).unwrap().sensitivity, Sensitivity::Confidential);
    }

    #[test]
    fn test_update_path_to_existing_path_fails() {
        let (_tmp, db) = open_temp();
        db.insert(&sample("/docs/a.txt"));
        let id = db.insert(&sample("/docs/b.txt")).id().unwrap();

        assert!(!db.update_field(id, FileField::Path, "/docs/a.txt"));
        assert_eq!(db.get(id).unwrap().path, "/docs/b.txt");

        assert!(db.update_field(id, FileField::Path, "/docs/c.txt"));
        assert_eq!(db.get(id).unwrap().path, "/docs/c.txt");
    }

    #[test]
    fn test_try_update_field_reports_reason() {
        let (_tmp, db) = open_temp();
        db.insert(&sample("/docs/a.txt"));
        let id = db.insert(&sample("/docs/b.txt")).id().unwrap();

        assert!(matches!(
            db.try_update_field(999, FileField::Tags, "x"),
            Err(VaultError::UnknownRecord(999))
        ));
        assert!(matches!(
            db.try_update_field(id, FileField::Status, "bogus"),
            Err(VaultError::InvalidValue { .. })
        ));
        assert!(matches!(
            db.try_update_field(id, FileField::Path, "/docs/a.txt"),
            Err(VaultError::DuplicatePath(_))
        ));
        assert!(db.try_update_field(id, FileField::Status, "in progress").is_ok());
        assert_eq!(db.get(id).unwrap().status, Status::InProgress);
    }

    #[test]
    fn test_unrecognized_enum_text_does_not_hide_records() {
        let (_tmp, db) = open_temp();
        db.insert(&sample("/docs/a.txt"));
        let id = db.insert(&sample("/docs/b.txt")).id().unwrap();

        let conn = Connection::open(db.path()).unwrap();
        conn.execute(
            "UPDATE files SET status = 'done', sensitivity = 'secret' WHERE id = ?1",
            params![id],
        )
        .unwrap();

        let all = db.find(Lookup::All);
        assert_eq!(all.len(), 2);
        let odd = db.get(id).unwrap();
        assert_eq!(odd.status, Status::New);
        assert_eq!(odd.sensitivity, Sensitivity::Internal);
        assert_eq!(db.find(Lookup::Filename("b.txt")).len(), 1);
    }

    #[test]
    fn test_storage_failure_is_sentinel() {
        let tmp = TempDir::new().unwrap();
        // A directory where the database file should be cannot be opened
        let db_path = tmp.path().join("catalog.db");
        std::fs::create_dir_all(&db_path).unwrap();
        let db = Database { path: db_path };

        assert!(!db.ensure_schema());
        assert_eq!(db.insert(&sample("/docs/a.txt")), InsertOutcome::Failed);
        assert!(db.find(Lookup::All).is_empty());
        assert!(!db.update_field(1, FileField::Tags, "x"));
        assert_eq!(db.count(), 0);
    }
}
