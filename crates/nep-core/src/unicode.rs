//! Character-level Unicode classification for Devanagari text.

pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';

const DOTTED_CIRCLE: char = '\u{25CC}';

pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

pub fn is_zero_width(c: char) -> bool {
    c == ZWNJ || c == ZWJ
}

/// Signs that attach to the preceding letter (vowel signs, nukta, virama,
/// candrabindu, anusvara, visarga, stress marks).
pub fn is_combining_sign(c: char) -> bool {
    matches!(
        c,
        '\u{0900}'..='\u{0903}'
            | '\u{093A}'..='\u{093C}'
            | '\u{093E}'..='\u{094F}'
            | '\u{0951}'..='\u{0957}'
            | '\u{0962}'..='\u{0963}'
    )
}

/// `U+0928` style label.
pub fn codepoint(c: char) -> String {
    format!("U+{:04X}", c as u32)
}

/// Printable form of a glyph for charts and listings.
///
/// Combining signs are shown on a dotted circle, joiners by name.
pub fn display_glyph(c: char) -> String {
    match c {
        ZWNJ => "ZWNJ".to_string(),
        ZWJ => "ZWJ".to_string(),
        c if is_combining_sign(c) => format!("{DOTTED_CIRCLE}{c}"),
        c => c.to_string(),
    }
}
