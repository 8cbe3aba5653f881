//! Interactive typing over a headless document.
//!
//! One text area is bound by the live binder, and every input line is
//! typed into it at the caret as a native edit, so the terminal shows the
//! same rewrite, caret and notification behavior a browser page would.

use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use nep_engine::nep_core::settings::settings;
use nep_engine::nep_session::headless::{MemoryDocument, SurfaceKind};
use nep_engine::nep_session::{Binder, ChangeOutcome, SurfaceId};
use nep_engine::HostDocument;

use crate::panel::{render_chart, LayoutPanel, PanelAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit,
}

pub struct TypeSession {
    doc: MemoryDocument,
    binder: Rc<Binder>,
    field: SurfaceId,
    panel: LayoutPanel,
    columns: usize,
    /// Notifications seen at the document root, like a framework observer.
    observed: Rc<Cell<u64>>,
}

impl TypeSession {
    pub fn new(panel: LayoutPanel, columns: usize) -> Self {
        let doc = MemoryDocument::new();
        let field = doc.insert_surface(SurfaceKind::TextArea);
        let binder = Binder::with_global_keymap();
        binder.activate(&doc);

        let observed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&observed);
        doc.add_document_listener(Rc::new(move |_: &dyn HostDocument, _: SurfaceId| {
            counter.set(counter.get() + 1);
        }));

        Self {
            doc,
            binder,
            field,
            panel,
            columns,
            observed,
        }
    }

    pub fn from_settings() -> Self {
        let panel = &settings().panel;
        Self::new(LayoutPanel::new(panel.visible_on_start), panel.columns)
    }

    pub fn value(&self) -> String {
        self.doc.value(self.field).unwrap_or_default()
    }

    pub fn caret(&self) -> usize {
        self.doc.selection_start(self.field).unwrap_or(0)
    }

    pub fn panel(&self) -> LayoutPanel {
        self.panel
    }

    pub fn observed(&self) -> u64 {
        self.observed.get()
    }

    fn status(&self) -> String {
        let outcome = match self.binder.binding(self.field).and_then(|b| b.last_outcome()) {
            Some(ChangeOutcome::Rewritten { .. }) => "rewritten",
            Some(ChangeOutcome::Unchanged) => "unchanged",
            Some(ChangeOutcome::Suppressed) => "suppressed",
            Some(ChangeOutcome::Missing) => "missing",
            None => "idle",
        };
        format!(
            "{}\n[caret {} | {} | notifications {}]\n",
            self.value(),
            self.caret(),
            outcome,
            self.observed()
        )
    }

    fn with_chart(&self, mut out: String) -> String {
        if self.panel.is_visible() {
            out.push_str(&render_chart(self.binder.keymap(), self.columns));
        }
        out
    }

    /// Handle one input line: a `:command` or text to type.
    pub fn handle_line(&mut self, line: &str) -> Step {
        match line.trim_end() {
            ":quit" | ":q" => Step::Quit,
            ":layout" => {
                let shown = self.panel.apply(PanelAction::Toggle);
                let note = if shown { "layout shown\n" } else { "layout hidden\n" };
                Step::Continue(self.with_chart(note.to_string()))
            }
            ":clear" => {
                self.doc.replace_value(self.field, "", 0);
                Step::Continue(self.status())
            }
            ":back" => {
                self.doc.delete_backward(self.field);
                Step::Continue(self.status())
            }
            text => {
                self.doc.type_text(self.field, text);
                Step::Continue(self.with_chart(self.status()))
            }
        }
    }
}

/// Read lines from stdin until EOF or `:quit`.
pub fn run() -> io::Result<()> {
    let mut session = TypeSession::from_settings();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Type romanized Nepali. Commands: :layout :clear :back :quit"
    )?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        match session.handle_line(&line?) {
            Step::Continue(text) => {
                write!(out, "{text}")?;
                out.flush()?;
            }
            Step::Quit => break,
        }
    }
    Ok(())
}
