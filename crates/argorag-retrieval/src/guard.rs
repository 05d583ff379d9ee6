//! Structural read-only gate between query translation and execution.
//!
//! The translation prompt asks for SELECT-only output, but generated
//! text is never trusted at the store boundary: every statement passes
//! this allow-list check before it reaches a connection.

use argorag_core::error::{ArgoragError, Result};

/// Keywords that must not appear anywhere in an executable statement.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "truncate", "create", "grant", "revoke",
    "copy", "vacuum",
];

/// Reject anything that is not a single read-only statement.
pub fn check_read_only(sql: &str) -> Result<()> {
    let statement = sql.trim().trim_end_matches(';').trim();

    if statement.is_empty() {
        return Err(execution("empty statement"));
    }

    if statement.contains(';') {
        return Err(execution("multiple statements are not allowed"));
    }

    let mut words = statement
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase);

    match words.next().as_deref() {
        Some("select") | Some("with") => {}
        Some(other) => {
            return Err(execution(&format!("only SELECT statements are allowed, got '{}'", other)));
        }
        None => return Err(execution("empty statement")),
    }

    for word in words {
        if FORBIDDEN_KEYWORDS.contains(&word.as_str()) {
            return Err(execution(&format!("forbidden keyword '{}'", word)));
        }
    }

    Ok(())
}

fn execution(reason: &str) -> ArgoragError {
    ArgoragError::Execution {
        reason: format!("rejected by query gate: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_passes() {
        assert!(check_read_only("SELECT * FROM profiles LIMIT 100").is_ok());
        assert!(check_read_only("  select profile_id from profiles;  ").is_ok());
    }

    #[test]
    fn test_cte_passes() {
        assert!(check_read_only(
            "WITH recent AS (SELECT * FROM profiles) SELECT profile_id FROM recent"
        )
        .is_ok());
    }

    #[test]
    fn test_mutating_statements_rejected() {
        assert!(check_read_only("INSERT INTO profiles VALUES (1)").is_err());
        assert!(check_read_only("DROP TABLE profiles").is_err());
        assert!(check_read_only("UPDATE profiles SET ocean = 'x'").is_err());
    }

    #[test]
    fn test_stacked_statements_rejected() {
        assert!(check_read_only("SELECT 1; DELETE FROM profiles").is_err());
    }

    #[test]
    fn test_forbidden_keyword_inside_select_rejected() {
        assert!(check_read_only("SELECT * FROM profiles WHERE 1=1 UNION SELECT * FROM pg_user; DROP TABLE profiles").is_err());
        assert!(check_read_only("WITH x AS (DELETE FROM profiles RETURNING *) SELECT * FROM x").is_err());
    }

    #[test]
    fn test_identifier_containing_keyword_is_not_false_positive() {
        assert!(check_read_only("SELECT selected_ocean, date_update FROM profiles").is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(check_read_only("").is_err());
        assert!(check_read_only("   ;  ").is_err());
    }
}
