//! Held-key auto-repeat producer.
//!
//! When a repeatable shortcut is pressed, a background task waits
//! `delay`, then re-sends the same shortcut every `interval` until the key is
//! released. The task only sends events; the consumer applies them one at a
//! time like any other input.
//!
//! Release cancels the task through a oneshot. A repeat that was already
//! pushed into the channel before the cancel is observed is still delivered:
//! at most one such event can be in flight.

use crate::{Event, InputEvent, KeyCode, KeyModifiers, Shortcut};
use std::time::Duration;
use tokio::sync::{mpsc::Sender, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatConfig {
    pub delay: Duration,
    pub interval: Duration,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            interval: Duration::from_millis(50),
        }
    }
}

/// Backspace, Enter and the arrows repeat; Shift/Caps are allowed, any other
/// modifier disables repeat.
pub fn is_repeatable(shortcut: &Shortcut) -> bool {
    let keys = matches!(
        shortcut.code,
        KeyCode::Backspace
            | KeyCode::Enter
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
    );
    keys && (shortcut.mods - (KeyModifiers::SHIFT | KeyModifiers::CAPS)).is_empty()
}

struct ActiveRepeat {
    shortcut: Shortcut,
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct KeyRepeater {
    config: RepeatConfig,
    tx: Sender<Event>,
    active: Option<ActiveRepeat>,
}

impl KeyRepeater {
    pub fn new(config: RepeatConfig, tx: Sender<Event>) -> Self {
        Self {
            config,
            tx,
            active: None,
        }
    }

    /// The shortcut currently being repeated.
    pub fn active(&self) -> Option<Shortcut> {
        self.active.as_ref().map(|a| a.shortcut)
    }

    /// Start repeating `shortcut` if it is repeatable. Any other key press
    /// stops the running repeat first. Must be called inside a Tokio runtime.
    pub fn press(&mut self, shortcut: Shortcut) -> bool {
        self.cancel();
        if !is_repeatable(&shortcut) {
            return false;
        }
        let (cancel, cancelled) = oneshot::channel();
        let handle = tokio::spawn(repeat_task(shortcut, self.config, self.tx.clone(), cancelled));
        debug!(target: "input.repeat", %shortcut, "repeat_armed");
        self.active = Some(ActiveRepeat {
            shortcut,
            cancel,
            handle,
        });
        true
    }

    /// Stop repeating when `shortcut`'s key is the held one. Modifiers are
    /// ignored so releasing Shift first does not strand a repeat.
    pub fn release(&mut self, shortcut: &Shortcut) -> bool {
        match &self.active {
            Some(a) if a.shortcut.code == shortcut.code => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    /// Stop any running repeat.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.cancel.send(());
            drop(active.handle);
            debug!(target: "input.repeat", shortcut = %active.shortcut, "repeat_cancelled");
        }
    }
}

impl Drop for KeyRepeater {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn repeat_task(
    shortcut: Shortcut,
    config: RepeatConfig,
    tx: Sender<Event>,
    mut cancelled: oneshot::Receiver<()>,
) {
    tokio::select! {
        biased;
        _ = &mut cancelled => return,
        _ = sleep(config.delay) => {}
    }
    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = &mut cancelled => break,
            _ = ticker.tick() => {}
        }
        trace!(target: "input.repeat", %shortcut, "repeat");
        if tx
            .send(Event::Input(InputEvent::Shortcut(shortcut)))
            .await
            .is_err()
        {
            break;
        }
    }
}
