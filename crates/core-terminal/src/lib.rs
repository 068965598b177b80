//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering the terminal switches to raw mode and the alternate screen,
//! enables bracketed paste and, when the terminal supports it, pushes the
//! keyboard enhancement flags that make key releases visible. Leaving undoes
//! all of it in reverse order.

use anyhow::Result;
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::info;

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
    capabilities: TerminalCapabilities,
}

/// RAII guard restoring the terminal even if the caller returns early or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new(TerminalCapabilities::basic())
    }
}

impl CrosstermBackend {
    pub fn new(capabilities: TerminalCapabilities) -> Self {
        Self {
            entered: false,
            capabilities,
        }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
            if self.capabilities.keyboard_enhancement {
                execute!(
                    stdout(),
                    PushKeyboardEnhancementFlags(
                        KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                            | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    )
                )?;
            }
            self.entered = true;
            info!(
                target: "terminal",
                keyboard_enhancement = self.capabilities.keyboard_enhancement,
                "terminal_entered"
            );
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            if self.capabilities.keyboard_enhancement {
                execute!(stdout(), PopKeyboardEnhancementFlags)?;
            }
            execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
            disable_raw_mode()?;
            self.entered = false;
            info!(target: "terminal", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
