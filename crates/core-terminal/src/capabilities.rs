//! Terminal capability probing.
//!
//! Detection runs once at startup, before raw mode is entered. The only
//! capability the editor consults is whether the terminal speaks the
//! keyboard enhancement protocol: with it the terminal reports key releases,
//! so held-key repeat can be synthesized instead of trusting the terminal's
//! own repeat rate.

use crossterm::terminal::supports_keyboard_enhancement;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub keyboard_enhancement: bool,
}

impl TerminalCapabilities {
    /// A failed query counts as "unsupported".
    pub fn detect() -> Self {
        let keyboard_enhancement = match supports_keyboard_enhancement() {
            Ok(v) => v,
            Err(e) => {
                debug!(target: "terminal", error = %e, "keyboard_enhancement_query_failed");
                false
            }
        };
        Self { keyboard_enhancement }
    }

    /// Capabilities of a terminal that supports nothing optional.
    pub fn basic() -> Self {
        Self::default()
    }
}
