//! ANSI color helpers for the prompt, the highlighter and error reports.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Aqua,
    Blue,
    Crimson,
    Gray,
    Green,
    Orange,
    SlateBlue,
    SpringGreen,
    YellowGreen,
}

impl Color {
    /// 256-color palette index.
    fn code(self) -> u8 {
        match self {
            Color::Aqua => 51,
            Color::Blue => 33,
            Color::Crimson => 161,
            Color::Gray => 245,
            Color::Green => 40,
            Color::Orange => 208,
            Color::SlateBlue => 99,
            Color::SpringGreen => 48,
            Color::YellowGreen => 148,
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Bold colored text.
pub fn paint(text: &str, color: Color) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let _ = write!(out, "\x1b[1;38;5;{}m{}{}", color.code(), text, RESET);
    out
}

/// Regular weight colored text, used for inline hints.
pub fn tint(text: &str, color: Color) -> String {
    format!("\x1b[38;5;{}m{}{}", color.code(), text, RESET)
}

/// Removes every `ESC [ … m` sequence.
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}
