//! Global settings loaded from TOML, following the same OnceLock pattern as the keymap.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();
static INSTANCE: OnceLock<Settings> = OnceLock::new();

/// Set custom TOML before first `settings()` call. Fails with
/// `AlreadyInitialized` once settings have been read.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    if INSTANCE.get().is_some() {
        return Err(SettingsError::AlreadyInitialized);
    }
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub binder: BinderSettings,
    pub panel: PanelSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinderSettings {
    pub selector: String,
    pub event: String,
    pub observe_subtree: bool,
    #[serde(default)]
    pub document: DocumentTarget,
}

/// Which document the browser binder attaches to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentTarget {
    #[default]
    #[serde(rename = "self")]
    Current,
    Parent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelSettings {
    pub visible_on_start: bool,
    pub columns: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_blank {
        ($section:ident . $field:ident) => {
            if s.$section.$field.trim().is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_non_blank!(binder.selector);
    check_non_blank!(binder.event);
    check_positive_usize!(panel.columns);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.binder.selector, "textarea");
        assert_eq!(s.binder.event, "input");
        assert!(s.binder.observe_subtree);
        assert_eq!(s.binder.document, DocumentTarget::Parent);
        assert!(!s.panel.visible_on_start);
        assert_eq!(s.panel.columns, 8);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[binder]
selector = "textarea, input[type=text]"
event = "input"
observe_subtree = false
document = "self"

[panel]
visible_on_start = true
columns = 4
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.binder.selector, "textarea, input[type=text]");
        assert!(!s.binder.observe_subtree);
        assert_eq!(s.binder.document, DocumentTarget::Current);
        assert!(s.panel.visible_on_start);
        assert_eq!(s.panel.columns, 4);
    }

    #[test]
    fn document_defaults_to_self() {
        let toml = r#"
[binder]
selector = "textarea"
event = "input"
observe_subtree = true

[panel]
visible_on_start = false
columns = 8
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.binder.document, DocumentTarget::Current);
    }

    #[test]
    fn error_blank_selector() {
        let toml = r#"
[binder]
selector = "  "
event = "input"
observe_subtree = true

[panel]
visible_on_start = false
columns = 8
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("binder.selector"));
    }

    #[test]
    fn error_zero_columns() {
        let toml = r#"
[binder]
selector = "textarea"
event = "input"
observe_subtree = true

[panel]
visible_on_start = false
columns = 0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("panel.columns"));
    }

    #[test]
    fn error_unknown_document_target() {
        let toml = r#"
[binder]
selector = "textarea"
event = "input"
observe_subtree = true
document = "top"

[panel]
visible_on_start = false
columns = 8
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn init_custom_after_read_is_rejected() {
        let columns = settings().panel.columns;
        let err = init_custom(DEFAULT_SETTINGS_TOML.replace("columns = 8", "columns = 3"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::AlreadyInitialized));
        assert_eq!(settings().panel.columns, columns);
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[binder]
selector = "textarea"
event = "input"
observe_subtree = true
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
