//! Grants file loading and parsing
//!
//! Format (one entry per line):
//! ```text
//! player <id> <display-name> [+capability ...]
//! default [+capability ...]
//! ```
//!
//! Example:
//! ```text
//! # moderators
//! player 76561197960287930 Admin +add +approve +get +remove +clear +unlimited
//! player 76561198000000001 DJ_Bob +add-pending +get-owner +remove-owner
//! default +add-pending +get-owner
//! ```
//!
//! Capabilities may be written as short names (`add-pending`) or as full
//! identifiers (`boomboxstations.addpending`). Display names containing
//! spaces can be double-quoted.

use super::capability::{Capability, CapabilitySet};
use super::grants::{GrantTable, PlayerGrant};
use std::path::Path;

/// Errors that can occur when loading grants files
#[derive(Debug, thiserror::Error)]
pub enum GrantFileError {
    /// IO error reading the file
    #[error("Failed to read grants file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Parse error on a specific line
    #[error("Parse error in grants file '{path}' line {line_number}: {reason} (line: '{line}')")]
    Parse {
        path: String,
        line_number: usize,
        line: String,
        reason: String,
    },
}

/// Load a grant table from a file
pub fn load_grants_file(path: impl AsRef<Path>) -> Result<GrantTable, GrantFileError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let contents = std::fs::read_to_string(path).map_err(|e| GrantFileError::Io {
        path: path_str.clone(),
        source: e,
    })?;

    parse_grants(&contents, &path_str)
}

/// Parse grants from text. `origin` is used in error messages.
pub fn parse_grants(contents: &str, origin: &str) -> Result<GrantTable, GrantFileError> {
    let mut table = GrantTable::new();

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;

        // Skip empty lines and comments
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts = split_quoted(trimmed);
        let parse_error = |reason: &str| GrantFileError::Parse {
            path: origin.to_string(),
            line_number,
            line: trimmed.to_string(),
            reason: reason.to_string(),
        };

        match parts[0].to_lowercase().as_str() {
            "player" => {
                if parts.len() < 3 {
                    return Err(parse_error("Expected 'player <id> <display-name>'"));
                }
                let mut grant = PlayerGrant::new(parts[1].clone(), parts[2].clone());
                grant.capabilities = parse_capabilities(&parts[3..]).map_err(|r| parse_error(&r))?;
                table.set_player(grant);
            }
            "default" => {
                let caps = parse_capabilities(&parts[1..]).map_err(|r| parse_error(&r))?;
                table.set_default_grants(caps);
            }
            _ => return Err(parse_error("Line must start with 'player' or 'default'")),
        }
    }

    Ok(table)
}

fn parse_capabilities(tokens: &[String]) -> Result<CapabilitySet, String> {
    let mut set = CapabilitySet::new();
    for token in tokens {
        if let Some(name) = token.strip_prefix('+') {
            let cap = Capability::parse(name).ok_or_else(|| format!("Unknown capability '{}'", name))?;
            set.grant(cap);
        } else if let Some(name) = token.strip_prefix('-') {
            let cap = Capability::parse(name).ok_or_else(|| format!("Unknown capability '{}'", name))?;
            set.revoke(cap);
        } else if token == "allcapabilities" {
            set = CapabilitySet::all();
        } else {
            return Err(format!("Capability '{}' must be prefixed with '+' or '-'", token));
        }
    }
    Ok(set)
}

/// Whitespace split that keeps double-quoted runs together
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    parts.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::grants::PermissionProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_player_line() {
        let table = parse_grants("player 100 Alice +add +get", "test").unwrap();
        let alice = table.get_player("100").unwrap();
        assert_eq!(alice.display_name, "Alice");
        assert!(alice.capabilities.has(Capability::Add));
        assert!(alice.capabilities.has(Capability::Get));
        assert!(!alice.capabilities.has(Capability::Approve));
    }

    #[test]
    fn test_quoted_display_name() {
        let table = parse_grants("player 5 \"DJ Bob\" +add-pending", "test").unwrap();
        assert_eq!(table.display_name("5"), "DJ Bob");
    }

    #[test]
    fn test_default_line() {
        let table = parse_grants("default +add-pending +get-owner", "test").unwrap();
        assert!(table.has("anyone", Capability::AddPending));
        assert!(table.has("anyone", Capability::GetOwner));
    }

    #[test]
    fn test_all_then_revoke() {
        let table = parse_grants("player 1 Root allcapabilities -clear", "test").unwrap();
        assert!(table.has("1", Capability::Approve));
        assert!(!table.has("1", Capability::Clear));
    }

    #[test]
    fn test_full_identifier() {
        let table = parse_grants("player 1 A +boomboxstations.addunlimited", "test").unwrap();
        assert!(table.has("1", Capability::AddUnlimited));
    }

    #[test]
    fn test_unknown_capability() {
        let err = parse_grants("player 1 A +teleport", "test").unwrap_err();
        assert!(matches!(err, GrantFileError::Parse { line_number: 1, .. }));
    }

    #[test]
    fn test_invalid_line() {
        assert!(parse_grants("user alice on", "test").is_err());
        assert!(parse_grants("player 1", "test").is_err());
        assert!(parse_grants("player 1 A add", "test").is_err());
    }

    #[test]
    fn test_split_quoted() {
        assert_eq!(
            split_quoted(r#"/addstream "Late Night" example.com"#),
            vec!["/addstream", "Late Night", "example.com"]
        );
        assert_eq!(split_quoted(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(split_quoted("   ").is_empty());
    }

    #[test]
    fn test_load_grants_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# Comment line").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "player 100 Admin +add +approve").unwrap();
        writeln!(file, "player 200 Bob +add-pending").unwrap();
        writeln!(file, "default +get").unwrap();
        file.flush().unwrap();

        let table = load_grants_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has("100", Capability::Approve));
        assert!(table.has("300", Capability::Get));
    }

    #[test]
    fn test_missing_file() {
        let err = load_grants_file("/nonexistent/grants.txt").unwrap_err();
        assert!(matches!(err, GrantFileError::Io { .. }));
    }
}
