//! Privileged actor configuration loaded from environment variables.
//!
//! `ATTENDANCE_ADMIN_IDS` holds a comma-separated list of identifiers that may
//! grant and revoke pardons, edit schedules and trigger recomputation.

use std::collections::HashSet;

const ADMIN_IDS_VAR: &str = "ATTENDANCE_ADMIN_IDS";

/// Parses a comma-separated identifier list, ignoring blanks and whitespace.
#[must_use]
pub fn parse_admin_ids(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads the privileged identifiers from `ATTENDANCE_ADMIN_IDS`.
///
/// Returns an empty set when the variable is not configured.
#[must_use]
pub fn get_admin_ids() -> HashSet<String> {
    std::env::var(ADMIN_IDS_VAR)
        .map(|raw| parse_admin_ids(&raw))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        let ids = parse_admin_ids(" 111, 222 ,,333 ");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("111"));
        assert!(ids.contains("222"));
        assert!(ids.contains("333"));
    }

    #[test]
    fn test_parse_admin_ids_empty() {
        assert!(parse_admin_ids("").is_empty());
        assert!(parse_admin_ids(" , ").is_empty());
    }
}
