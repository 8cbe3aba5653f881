use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Deserialize)]
struct KeymapConfig {
    mappings: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeymapConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[mappings] table is empty")]
    Empty,
    #[error("key must be a single character: {0:?}")]
    KeyNotSingleChar(String),
    #[error("value for key {0:?} must be a single character")]
    ValueNotSingleChar(String),
    #[error("character outside the Basic Multilingual Plane in mapping for key {0:?}")]
    AstralChar(String),
    #[error("keymap already initialized")]
    AlreadyInitialized,
}

/// Returns the only character of `s`, or `None` if `s` is empty or longer.
fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Caret offsets are reused verbatim after a rewrite, so every key and value
/// must occupy one UTF-16 unit as well as one `char`.
fn is_bmp(c: char) -> bool {
    (c as u32) <= 0xFFFF
}

/// Parse TOML text into `(key, value)` pairs sorted by key.
pub fn parse_keymap_toml(toml_str: &str) -> Result<Vec<(char, char)>, KeymapConfigError> {
    let config: KeymapConfig =
        toml::from_str(toml_str).map_err(|e| KeymapConfigError::Parse(e.to_string()))?;

    if config.mappings.is_empty() {
        return Err(KeymapConfigError::Empty);
    }

    let mut pairs = Vec::with_capacity(config.mappings.len());
    for (key, value) in &config.mappings {
        let k = single_char(key).ok_or_else(|| KeymapConfigError::KeyNotSingleChar(key.clone()))?;
        let v =
            single_char(value).ok_or_else(|| KeymapConfigError::ValueNotSingleChar(key.clone()))?;
        if !is_bmp(k) || !is_bmp(v) {
            return Err(KeymapConfigError::AstralChar(key.clone()));
        }
        pairs.push((k, v));
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_toml() {
        let toml = r#"
[mappings]
a = "ा"
k = "\u0915"
"#;
        let pairs = parse_keymap_toml(toml).unwrap();
        assert_eq!(pairs, vec![('a', '\u{093E}'), ('k', '\u{0915}')]);
    }

    #[test]
    fn parse_default_toml() {
        let pairs = parse_keymap_toml(super::super::table::DEFAULT_TOML).unwrap();
        assert_eq!(pairs.len(), 78);
    }

    #[test]
    fn backslash_key_is_unescaped() {
        let toml = "[mappings]\n\"\\\\\" = \"\\u0950\"\n";
        let pairs = parse_keymap_toml(toml).unwrap();
        assert_eq!(pairs, vec![('\\', '\u{0950}')]);
    }

    #[test]
    fn error_empty_mappings() {
        let err = parse_keymap_toml("[mappings]\n").unwrap_err();
        assert!(matches!(err, KeymapConfigError::Empty));
    }

    #[test]
    fn error_multi_char_key() {
        let toml = r#"
[mappings]
ka = "क"
"#;
        let err = parse_keymap_toml(toml).unwrap_err();
        assert!(matches!(err, KeymapConfigError::KeyNotSingleChar(ref k) if k == "ka"));
    }

    #[test]
    fn error_multi_char_value() {
        let toml = r#"
[mappings]
k = "क्ष"
"#;
        let err = parse_keymap_toml(toml).unwrap_err();
        assert!(matches!(err, KeymapConfigError::ValueNotSingleChar(ref k) if k == "k"));
    }

    #[test]
    fn error_empty_value() {
        let toml = r#"
[mappings]
a = ""
"#;
        let err = parse_keymap_toml(toml).unwrap_err();
        assert!(matches!(err, KeymapConfigError::ValueNotSingleChar(_)));
    }

    #[test]
    fn error_astral_value() {
        let toml = r#"
[mappings]
x = "😀"
"#;
        let err = parse_keymap_toml(toml).unwrap_err();
        assert!(matches!(err, KeymapConfigError::AstralChar(_)));
    }

    #[test]
    fn error_duplicate_key() {
        let toml = r#"
[mappings]
a = "ा"
a = "आ"
"#;
        let err = parse_keymap_toml(toml).unwrap_err();
        assert!(matches!(err, KeymapConfigError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_keymap_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, KeymapConfigError::Parse(_)));
    }
}
