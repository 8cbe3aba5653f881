/// Default romanized Nepali layout, embedded at compile time.
pub(super) const DEFAULT_TOML: &str = include_str!("default_keymap.toml");

/// Returns the embedded default keymap TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}
