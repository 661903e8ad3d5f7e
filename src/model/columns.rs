// File: ./src/model/columns.rs
// Column names the engine interprets. Everything else passes through untouched.
use serde::{Deserialize, Serialize};

fn default_created_at() -> String {
    "created_at".to_string()
}
fn default_legacy_date() -> String {
    "data".to_string()
}
fn default_tags() -> String {
    "tags".to_string()
}
fn default_name() -> String {
    "name".to_string()
}
fn default_email() -> String {
    "email".to_string()
}
fn default_phone() -> String {
    "phone".to_string()
}
fn default_status() -> String {
    "status".to_string()
}
fn default_user() -> String {
    "user_name".to_string()
}
fn default_origin() -> String {
    "nome_origem".to_string()
}
fn default_group() -> String {
    "grupo_origem".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "default_created_at")]
    pub created_at: String,
    /// Older exports carry a `dd/mm/yyyy` date in this column instead of `created_at`.
    #[serde(default = "default_legacy_date")]
    pub legacy_date: String,
    #[serde(default = "default_tags")]
    pub tags: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_group")]
    pub group: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            created_at: default_created_at(),
            legacy_date: default_legacy_date(),
            tags: default_tags(),
            name: default_name(),
            email: default_email(),
            phone: default_phone(),
            status: default_status(),
            user: default_user(),
            origin: default_origin(),
            group: default_group(),
        }
    }
}

impl ColumnMap {
    /// Columns scanned by free-text search, in match order.
    pub fn search_columns(&self) -> [&str; 6] {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.origin,
            &self.group,
            &self.status,
        ]
    }
}
