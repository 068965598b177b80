use crate::map_key_event;
use core_events::{AsyncEventSource, Event, InputEvent, KeyRepeater, RepeatConfig, is_repeatable};
use crossterm::event::{Event as CEvent, EventStream, KeyEvent as CKeyEvent, KeyEventKind as CKind};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{Instrument, debug, info, trace, warn};

/// Where held-key repeats come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    /// The terminal sends its own repeats as further presses.
    Terminal,
    /// The terminal reports key releases (keyboard enhancement is on):
    /// terminal repeats are dropped and a [`KeyRepeater`] synthesizes them.
    Synthesized(RepeatConfig),
}

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Terminal input as a registrable event source.
pub struct TerminalInputSource {
    repeat: RepeatMode,
    shutdown: AsyncInputShutdown,
    listener: ShutdownListener,
}

impl TerminalInputSource {
    pub fn new(repeat: RepeatMode) -> Self {
        let (shutdown, listener) = ShutdownListener::new_pair();
        Self {
            repeat,
            shutdown,
            listener,
        }
    }

    /// Handle for stopping the task once spawned.
    pub fn shutdown_handle(&self) -> AsyncInputShutdown {
        self.shutdown.clone()
    }
}

impl AsyncEventSource for TerminalInputSource {
    fn name(&self) -> &'static str {
        "terminal_input"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> task::JoinHandle<()> {
        let TerminalInputSource { repeat, listener, .. } = *self;
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        task::spawn(
            AsyncEventStreamTask::new(tx, EventStream::new(), listener, repeat)
                .run()
                .instrument(span),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    repeat: RepeatMode,
    repeater: Option<KeyRepeater>,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(
        sender: Sender<Event>,
        stream: S,
        shutdown: ShutdownListener,
        repeat: RepeatMode,
    ) -> Self {
        let repeater = match repeat {
            RepeatMode::Synthesized(config) => Some(KeyRepeater::new(config, sender.clone())),
            RepeatMode::Terminal => None,
        };
        Self {
            sender,
            stream,
            shutdown,
            repeat,
            repeater,
            exit_reason: ExitReason::StreamEnded,
            stream_error: None,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", repeat = ?self.repeat, "async_input_task_started");
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let keep_going = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    self.send_event(Event::Resize(w, h)).await
                }
                Ok(CEvent::Paste(data)) => {
                    trace!(target: "input.paste", len = data.len(), "paste_event");
                    self.send_event(Event::Input(InputEvent::Text(data))).await
                }
                Ok(_) => true,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    false
                }
            };
            if !keep_going {
                break;
            }
        }

        if let Some(mut repeater) = self.repeater.take() {
            repeater.cancel();
        }
        if self.exit_reason == ExitReason::StreamError {
            warn!(
                target: "input.thread",
                error_kind = ?self.stream_error,
                "async_input_task_stream_error"
            );
        }
        info!(
            target: "input.thread",
            reason = self.exit_reason.as_str(),
            "async_input_task_stopped"
        );
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        let mapped = map_key_event(&key);
        if key.kind == CKind::Release {
            if let (Some(repeater), Some(InputEvent::Shortcut(s))) =
                (self.repeater.as_mut(), mapped.as_ref())
            {
                repeater.release(s);
            }
            return true;
        }

        let Some(event) = mapped else {
            debug!(target: "input.event", code = ?key.code, "unmapped_key");
            return true;
        };
        // The repeater owns held repeatable keys; every other key keeps the
        // terminal's own repeats.
        if key.kind == CKind::Repeat
            && self.repeater.is_some()
            && matches!(&event, InputEvent::Shortcut(s) if is_repeatable(s))
        {
            return true;
        }
        trace!(
            target: "input.event",
            kind = "keypress",
            repeat = key.kind == CKind::Repeat,
            event = ?event
        );
        let held = match &event {
            InputEvent::Shortcut(s) => Some(*s),
            _ => None,
        };
        if !self.send_event(Event::Input(event)).await {
            return false;
        }
        if let Some(repeater) = self.repeater.as_mut() {
            match held {
                Some(s) => {
                    repeater.press(s);
                }
                None => repeater.cancel(),
            }
        }
        true
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(()) => true,
            Err(_) => {
                self.exit_reason = ExitReason::ChannelClosed;
                false
            }
        }
    }
}
