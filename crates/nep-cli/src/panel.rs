//! Keyboard-layout panel: a text chart of the active keymap and its
//! show/hide state.

use unicode_width::UnicodeWidthStr;

use nep_engine::nep_core::unicode::display_glyph;
use nep_engine::Keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Toggle,
    Show,
    Hide,
}

/// Visibility of the layout chart, owned by whoever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutPanel {
    visible: bool,
}

impl LayoutPanel {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Apply `action`; returns the new visibility.
    pub fn apply(&mut self, action: PanelAction) -> bool {
        self.visible = match action {
            PanelAction::Toggle => !self.visible,
            PanelAction::Show => true,
            PanelAction::Hide => false,
        };
        self.visible
    }
}

fn pad_to(cell: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(cell);
    format!("{cell}{}", " ".repeat(width.saturating_sub(w)))
}

/// Render the keymap as a grid, `columns` cells per line.
pub fn render_chart(keymap: &Keymap, columns: usize) -> String {
    let columns = columns.max(1);
    let cells: Vec<String> = keymap
        .entries()
        .iter()
        .map(|&(k, v)| format!("{k} {}", display_glyph(v)))
        .collect();
    let width = cells
        .iter()
        .map(|c| UnicodeWidthStr::width(c.as_str()))
        .max()
        .unwrap_or(0)
        + 2;

    let mut out = String::new();
    for row in cells.chunks(columns) {
        let line: String = row.iter().map(|c| pad_to(c, width)).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
