// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Catalog row types and the updatable field allow-list

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::VaultError;

/// Workflow stage of a cataloged file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    New,
    InProgress,
    Review,
    Completed,
    Archived,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::InProgress,
        Status::Review,
        Status::Completed,
        Status::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::InProgress => "in_progress",
            Status::Review => "review",
            Status::Completed => "completed",
            Status::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::InProgress => "In Progress",
            Status::Review => "Review",
            Status::Completed => "Completed",
            Status::Archived => "Archived",
        }
    }

    /// Map a numbered menu answer (1-5) to a status, defaulting to `New`
    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => Status::InProgress,
            "3" => Status::Review,
            "4" => Status::Completed,
            "5" => Status::Archived,
            _ => Status::New,
        }
    }
}

/// Confidentiality classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Public,
    #[default]
    Internal,
    Confidential,
}

impl Sensitivity {
    pub const ALL: [Sensitivity; 3] = [
        Sensitivity::Public,
        Sensitivity::Internal,
        Sensitivity::Confidential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Public => "public",
            Sensitivity::Internal => "internal",
            Sensitivity::Confidential => "confidential",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sensitivity::Public => "Public",
            Sensitivity::Internal => "Internal",
            Sensitivity::Confidential => "Confidential",
        }
    }

    /// Map a numbered menu answer (1-3) to a sensitivity, defaulting to `Internal`
    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => Sensitivity::Public,
            "3" => Sensitivity::Confidential,
            _ => Sensitivity::Internal,
        }
    }
}

fn normalize_token(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

impl FromStr for Status {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == token)
            .ok_or_else(|| VaultError::InvalidValue {
                field: "status".to_string(),
                value: s.to_string(),
            })
    }
}

impl FromStr for Sensitivity {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        Sensitivity::ALL
            .into_iter()
            .find(|level| level.as_str() == token)
            .ok_or_else(|| VaultError::InvalidValue {
                field: "sensitivity".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl ToSql for Sensitivity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// A cataloged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub description: String,
    /// Comma-separated labels
    pub tags: String,
    pub status: Status,
    /// Category
    pub content_type: String,
    pub sensitivity: Sensitivity,
    /// Free-text notes
    pub custom_fields: String,
    /// ISO-8601, set once at insert
    pub date_created: String,
    pub filename: String,
    /// Absolute path, unique across the catalog
    pub path: String,
}

/// Insert payload: every column except the auto-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewFileRecord {
    pub description: String,
    pub tags: String,
    pub status: Status,
    pub content_type: String,
    pub sensitivity: Sensitivity,
    pub custom_fields: String,
    pub date_created: String,
    pub filename: String,
    pub path: String,
}

/// Columns that may be changed after insert.
///
/// `id` and `date_created` are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileField {
    Description,
    Tags,
    Status,
    ContentType,
    Sensitivity,
    CustomFields,
    Filename,
    Path,
}

impl FileField {
    pub const ALL: [FileField; 8] = [
        FileField::Description,
        FileField::Tags,
        FileField::Status,
        FileField::ContentType,
        FileField::Sensitivity,
        FileField::CustomFields,
        FileField::Filename,
        FileField::Path,
    ];

    /// SQL column name
    pub fn column(&self) -> &'static str {
        match self {
            FileField::Description => "description",
            FileField::Tags => "tags",
            FileField::Status => "status",
            FileField::ContentType => "content_type",
            FileField::Sensitivity => "sensitivity",
            FileField::CustomFields => "custom_fields",
            FileField::Filename => "filename",
            FileField::Path => "path",
        }
    }

    /// Reject values the column cannot hold
    pub fn validate(&self, value: &str) -> crate::Result<()> {
        match self {
            FileField::Status => value.parse::<Status>().map(|_| ()),
            FileField::Sensitivity => value.parse::<Sensitivity>().map(|_| ()),
            FileField::Path | FileField::Filename if value.trim().is_empty() => {
                Err(VaultError::InvalidValue {
                    field: self.column().to_string(),
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Canonical form of a value before it is written
    pub(crate) fn normalize(&self, value: &str) -> crate::Result<String> {
        self.validate(value)?;
        Ok(match self {
            FileField::Status => value.parse::<Status>()?.as_str().to_string(),
            FileField::Sensitivity => value.parse::<Sensitivity>()?.as_str().to_string(),
            _ => value.to_string(),
        })
    }
}

impl FromStr for FileField {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "description" => Ok(FileField::Description),
            "tags" => Ok(FileField::Tags),
            "status" => Ok(FileField::Status),
            "content_type" | "category" => Ok(FileField::ContentType),
            "sensitivity" => Ok(FileField::Sensitivity),
            "custom_fields" | "notes" => Ok(FileField::CustomFields),
            "filename" => Ok(FileField::Filename),
            "path" => Ok(FileField::Path),
            _ => Err(VaultError::InvalidValue {
                field: "field".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
