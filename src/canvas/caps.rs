//! Terminal capability detection for previews
//!
//! Auto-detects:
//! - Kitty graphics protocol support
//! - UTF-8 locale (half blocks need it)
//! - True-color output
//! - Terminal size

use std::env;

/// Graphics protocol supported by terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsProtocol {
    /// Kitty Graphics Protocol - PNG payloads, pixel exact
    Kitty,
    /// No graphics support - use Unicode fallback
    #[default]
    None,
}

/// Terminal capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalCaps {
    /// Terminal columns
    pub cols: u16,
    /// Terminal rows
    pub rows: u16,
    /// Graphics protocol support
    pub graphics: GraphicsProtocol,
    /// Locale can render ▀▄█
    pub unicode: bool,
    /// 24-bit color escapes are honoured
    pub true_color: bool,
}

impl Default for TerminalCaps {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            graphics: GraphicsProtocol::None,
            unicode: true,
            true_color: true,
        }
    }
}

impl TerminalCaps {
    /// Detect terminal capabilities from the process environment
    pub fn detect() -> Self {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        Self::from_env(|key| env::var(key).ok(), cols, rows)
    }

    /// Detect from an arbitrary variable lookup
    pub fn from_env(var: impl Fn(&str) -> Option<String>, cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            graphics: detect_graphics_protocol(&var),
            unicode: detect_unicode(&var),
            true_color: detect_true_color(&var),
        }
    }
}

/// Detect graphics protocol support
fn detect_graphics_protocol(var: &impl Fn(&str) -> Option<String>) -> GraphicsProtocol {
    // Kitty itself, and WezTerm which speaks the same protocol
    if var("KITTY_WINDOW_ID").is_some() || var("WEZTERM_PANE").is_some() {
        return GraphicsProtocol::Kitty;
    }

    if var("TERM").is_some_and(|term| term.contains("kitty")) {
        return GraphicsProtocol::Kitty;
    }

    match var("TERM_PROGRAM").as_deref() {
        Some("WezTerm" | "ghostty" | "Ghostty") => GraphicsProtocol::Kitty,
        _ => GraphicsProtocol::None,
    }
}

fn detect_unicode(var: &impl Fn(&str) -> Option<String>) -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|&key| var(key))
        .any(|value| value.to_uppercase().contains("UTF"))
}

fn detect_true_color(var: &impl Fn(&str) -> Option<String>) -> bool {
    if let Some(ct) = var("COLORTERM") {
        if ct == "truecolor" || ct == "24bit" {
            return true;
        }
    }

    // Most modern terminals support truecolor; only bare VT-style TERMs do not
    !var("TERM").is_some_and(|term| term == "dumb" || term == "linux" || term == "vt100")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn caps_with(vars: &[(&str, &str)]) -> TerminalCaps {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TerminalCaps::from_env(|key| map.get(key).cloned(), 100, 40)
    }

    #[test]
    fn test_default_caps() {
        let caps = TerminalCaps::default();
        assert_eq!(caps.cols, 80);
        assert_eq!(caps.rows, 24);
    }

    #[test]
    fn test_kitty_detection() {
        assert_eq!(caps_with(&[("KITTY_WINDOW_ID", "1")]).graphics, GraphicsProtocol::Kitty);
        assert_eq!(caps_with(&[("TERM_PROGRAM", "WezTerm")]).graphics, GraphicsProtocol::Kitty);
        assert_eq!(caps_with(&[("TERM", "xterm-256color")]).graphics, GraphicsProtocol::None);
    }

    #[test]
    fn test_unicode_and_color() {
        let caps = caps_with(&[("LANG", "en_US.UTF-8"), ("TERM", "xterm-256color")]);
        assert!(caps.unicode);
        assert!(caps.true_color);
        assert_eq!((caps.cols, caps.rows), (100, 40));

        let caps = caps_with(&[("LANG", "C"), ("TERM", "dumb")]);
        assert!(!caps.unicode);
        assert!(!caps.true_color);
    }
}
