use std::fs;
use std::io;
use std::path::Path;

use nep_engine::nep_core::settings::settings;
use nep_engine::Keymap;

use crate::panel::render_chart;

/// Size of the layout image, if it can be read.
pub fn check_layout_asset(path: &Path) -> io::Result<u64> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a file"));
    }
    Ok(meta.len())
}

/// Print the keyboard chart. A missing image is a warning, not a failure.
pub fn layout(image: Option<&Path>, columns: Option<usize>) {
    if let Some(path) = image {
        match check_layout_asset(path) {
            Ok(bytes) => println!("Keyboard layout image: {} ({bytes} bytes)", path.display()),
            Err(e) => eprintln!(
                "warning: keyboard layout image not found at '{}' ({e}); showing text chart",
                path.display()
            ),
        }
    }
    let columns = columns.unwrap_or(settings().panel.columns);
    print!("{}", render_chart(Keymap::global(), columns));
}
