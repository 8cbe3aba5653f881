use std::fs;

use nep_engine::nep_core::{keymap, settings};

pub fn keymap_export() {
    print!("{}", keymap::default_toml());
}

pub fn keymap_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let pairs = die!(keymap::parse_keymap_toml(&content), "Error: {}");
    let identity = pairs.iter().filter(|(k, v)| k == v).count();
    println!("OK: {} mappings ({identity} identity)", pairs.len());
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: binder.selector={:?}, binder.event={:?}, panel.columns={}",
        s.binder.selector, s.binder.event, s.panel.columns
    );
}
