//! Nutrilog tools module
//!
//! Diary operations exposed over MCP. Each tool takes the database and the
//! acting user and returns a serializable response or an error message.

pub mod diary;
pub mod foods;
pub mod profile;
pub mod status;

use chrono::NaiveDate;

/// Validate an ISO date ("2024-05-01") and return it normalized
pub fn parse_date(date: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-05-01 ").unwrap(), "2024-05-01");
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("May 1").is_err());
    }
}
