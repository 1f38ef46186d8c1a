//! Access-level classification.
//!
//! A file starts at a default level chosen by its first folder under the
//! source root: the public folder gives level 0, anything else gives the
//! configured default secret level. Inline markers (see [`crate::segment`])
//! then move the level for the text that follows them. Markers carry a
//! `levelN` token, parsed here.

use crate::config::BuildConfig;
use crate::types::AccessLevel;

/// Default level for a file, from its path segments relative to the source root.
///
/// Only the first segment matters, and only if it is a folder: a file sitting
/// directly in the root has no folder and is secret.
///
/// - `["public", "a.md"]` → 0
/// - `["public", "deep", "b.md"]` → 0
/// - `["gm", "b.md"]` → `default_secret_level`
/// - `["loose.md"]` → `default_secret_level`
pub fn default_level(segments: &[String], config: &BuildConfig) -> AccessLevel {
    match segments {
        [folder, _, ..] if *folder == config.public_folder => 0,
        _ => config.default_secret_level,
    }
}

/// Parse a marker token of the form `level<digits>`.
///
/// Returns `None` for anything else, including digits that overflow
/// [`AccessLevel`]. Such tokens are not markers at all.
pub fn parse_level_token(token: &str) -> Option<AccessLevel> {
    let digits = token.strip_prefix("level")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &str) -> Vec<String> {
        path.split('/').map(String::from).collect()
    }

    #[test]
    fn public_folder_is_level_zero() {
        let config = BuildConfig::default();
        assert_eq!(default_level(&segs("public/a.md"), &config), 0);
        assert_eq!(default_level(&segs("public/x/y/a.md"), &config), 0);
    }

    #[test]
    fn other_folders_use_default_secret_level() {
        let config = BuildConfig::default();
        assert_eq!(default_level(&segs("secret/b.md"), &config), 1);
        assert_eq!(default_level(&segs("gm/3star/b.md"), &config), 1);
    }

    #[test]
    fn root_file_is_secret() {
        let config = BuildConfig::default();
        assert_eq!(default_level(&segs("public"), &config), 1);
        assert_eq!(default_level(&segs("loose.md"), &config), 1);
    }

    #[test]
    fn public_match_is_exact() {
        let config = BuildConfig::default();
        assert_eq!(default_level(&segs("Public/a.md"), &config), 1);
        assert_eq!(default_level(&segs("public-draft/a.md"), &config), 1);
        assert_eq!(default_level(&segs("secret/public/a.md"), &config), 1);
    }

    #[test]
    fn configured_names_and_levels() {
        let config = BuildConfig {
            public_folder: "players".into(),
            default_secret_level: 4,
            ..BuildConfig::default()
        };
        assert_eq!(default_level(&segs("players/a.md"), &config), 0);
        assert_eq!(default_level(&segs("public/a.md"), &config), 4);
    }

    #[test]
    fn parse_valid_tokens() {
        assert_eq!(parse_level_token("level0"), Some(0));
        assert_eq!(parse_level_token("level2"), Some(2));
        assert_eq!(parse_level_token("level042"), Some(42));
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert_eq!(parse_level_token("level"), None);
        assert_eq!(parse_level_token("Level2"), None);
        assert_eq!(parse_level_token("lvl2"), None);
        assert_eq!(parse_level_token("level2a"), None);
        assert_eq!(parse_level_token("level-2"), None);
        assert_eq!(parse_level_token("3star"), None);
    }

    #[test]
    fn parse_rejects_overflow() {
        assert_eq!(parse_level_token("level99999999999"), None);
    }
}
