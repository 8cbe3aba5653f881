pub mod keymap;
pub mod settings;
pub mod unicode;

pub use keymap::{transliterate, Keymap};
