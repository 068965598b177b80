//! Core event types and async event producers.
//!
//! The editor has a single consumer (the runtime loop) draining one bounded
//! channel. Producers, the terminal input task and the held-key
//! [`KeyRepeater`], only ever send [`Event`]s; none of them touch editor state.

use std::fmt;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

pub mod repeat;

pub use repeat::{KeyRepeater, RepeatConfig, is_repeatable};

/// Bounded capacity of the runtime event channel. Producers await capacity
/// (backpressure) rather than dropping input.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable character. Inserted literally in Edit mode; in Navigation
    /// mode it feeds the pending command.
    Keystroke(char),
    /// A key with modifiers or a named key (save, escape, arrows, ...).
    Shortcut(Shortcut),
    /// Pasted text, possibly spanning several rows.
    Text(String),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
        const CAPS = 0b0000_1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

/// A shortcut: modifier flags, a key code and the literal character the key
/// produced, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub mods: KeyModifiers,
    pub code: KeyCode,
    pub ch: Option<char>,
}

impl Shortcut {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        let ch = match code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        };
        Self { mods, code, ch }
    }

    /// A named key without modifiers.
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// `Ctrl+<c>`
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn has_ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, label) in [
            (KeyModifiers::CTRL, "C-"),
            (KeyModifiers::ALT, "A-"),
            (KeyModifiers::SHIFT, "S-"),
        ] {
            if self.mods.contains(flag) {
                f.write_str(label)?;
            }
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Trait implemented by any async event producer. Implementors hold their
/// configuration and spawn one background task that pushes `Event`s into the
/// shared channel, stopping once `send` fails (consumer dropped).
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used for logging.
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Sources registered at startup and spawned together once the runtime
/// channel exists.
#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources; each gets its own `Sender` clone. The
    /// registry is drained so a second call spawns nothing.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        self.sources
            .drain(..)
            .map(|src| {
                tracing::info!(target: "runtime", source = src.name(), "spawning event source");
                src.spawn(tx.clone())
            })
            .collect()
    }
}
