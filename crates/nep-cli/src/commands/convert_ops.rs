use std::io::{self, BufRead, BufWriter, Write};

use serde::Serialize;

use nep_engine::nep_core::unicode::{codepoint, display_glyph};
use nep_engine::Keymap;

#[derive(Debug, Serialize)]
struct ConvertEntry<'a> {
    input: &'a str,
    output: String,
}

#[derive(Debug, Serialize)]
struct TableEntry {
    key: String,
    output: String,
    codepoint: String,
    identity: bool,
}

fn write_converted(
    out: &mut impl Write,
    keymap: &Keymap,
    line: &str,
    json: bool,
) -> io::Result<()> {
    let output = keymap.transliterate(line);
    if json {
        let entry = ConvertEntry {
            input: line,
            output,
        };
        let encoded = serde_json::to_string(&entry).map_err(io::Error::other)?;
        writeln!(out, "{encoded}")
    } else {
        writeln!(out, "{output}")
    }
}

/// Transliterate each argument, or each stdin line when there are none.
pub fn convert(texts: &[String], json: bool) {
    let keymap = Keymap::global();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if texts.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = die!(line, "Error reading stdin: {}");
            die!(write_converted(&mut out, keymap, &line, json), "Error: {}");
        }
    } else {
        for text in texts {
            die!(write_converted(&mut out, keymap, text, json), "Error: {}");
        }
    }
    die!(out.flush(), "Error: {}");
}

fn table_entries(keymap: &Keymap) -> Vec<TableEntry> {
    keymap
        .entries()
        .iter()
        .map(|&(k, v)| TableEntry {
            key: k.to_string(),
            output: v.to_string(),
            codepoint: codepoint(v),
            identity: k == v,
        })
        .collect()
}

/// List the active mapping.
pub fn table(json: bool) {
    let keymap = Keymap::global();
    let entries = table_entries(keymap);
    if json {
        let encoded = die!(serde_json::to_string_pretty(&entries), "Error: {}");
        println!("{encoded}");
        return;
    }
    for e in &entries {
        let glyph = e.output.chars().next().map(display_glyph).unwrap_or_default();
        let note = if e.identity { "  (identity)" } else { "" };
        println!("{:>3}  {}  {}{note}", e.key, e.codepoint, glyph);
    }
    println!("{} mappings", entries.len());
}
