//! Runtime configuration from environment variables

use std::path::PathBuf;

pub const DATABASE_PATH_VAR: &str = "NUTRILOG_DATABASE_PATH";
pub const USER_VAR: &str = "NUTRILOG_USER";
pub const DEFAULT_USER: &str = "default";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// User every tool acts for
    pub user_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());
        let user_id = std::env::var(USER_VAR)
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Self {
            database_path,
            user_id,
        }
    }
}

/// `<project>/data/nutrilog.db`, where the project root is found by walking
/// up from target/release or target/debug
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("nutrilog.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_in_data_dir() {
        let path = default_database_path();
        assert!(path.ends_with("data/nutrilog.db"));
    }
}
