//! Input pump: one Tokio task draining a terminal event stream into the
//! bounded event channel.
//!
//! The pump stops on the first of: an explicit stop request, the receiver
//! going away, the stream ending, or a stream error. Sends are awaited, so a
//! slow event loop applies backpressure instead of losing key presses.

use crate::key_token::map_key_event;
use core_events::{
    CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL, KEYRELEASE_TOTAL, KeyEventKind,
};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyEventKind as CKind, KeyModifiers as CMods,
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, info, trace, warn};

/// Handle asking the input pump to stop. Cloning shares the same signal.
#[derive(Clone, Debug, Default)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    /// Request a stop. A request made before the pump starts waiting is
    /// remembered, so the pump never misses it.
    pub fn signal(&self) {
        self.notify.notify_one();
    }

    async fn requested(&self) {
        self.notify.notified().await;
    }
}

/// Spawn the pump over crossterm's `EventStream`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let shutdown = AsyncInputShutdown::default();
    let pump = InputPump::new(sender, EventStream::new(), shutdown.clone());
    let span = tracing::debug_span!(target: "input.thread", "input_pump");
    let handle = task::spawn(
        async move {
            pump.run().await;
        }
        .instrument(span),
    );
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    StopRequested,
    ReceiverDropped,
    StreamEnded,
    StreamError(io::ErrorKind),
}

/// Outcome of forwarding one terminal event.
enum Step {
    Forwarded,
    Skipped,
    Stop(ExitReason),
}

struct InputPump<S> {
    sender: Sender<Event>,
    stream: S,
    shutdown: AsyncInputShutdown,
}

impl<S> InputPump<S>
where
    S: Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: AsyncInputShutdown) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) -> ExitReason {
        info!(target: "input.thread", "input_pump_started");
        let reason = loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.requested() => break ExitReason::StopRequested,
                next = self.stream.next() => next,
            };
            let step = match next {
                None => Step::Stop(ExitReason::StreamEnded),
                Some(Err(err)) => Step::Stop(ExitReason::StreamError(err.kind())),
                Some(Ok(event)) => self.forward(event).await,
            };
            match step {
                Step::Forwarded | Step::Skipped => {}
                Step::Stop(reason) => break reason,
            }
        };
        if let ExitReason::StreamError(kind) = reason {
            warn!(target: "input.thread", error_kind = ?kind, "input_stream_error");
        }
        info!(target: "input.thread", reason = ?reason, "input_pump_stopped");
        reason
    }

    async fn forward(&mut self, event: CEvent) -> Step {
        match event {
            CEvent::Key(key) if is_ctrl_c(&key) => self.send(InputEvent::CtrlC).await,
            CEvent::Key(key) => {
                let Some(mapped) = map_key_event(&key) else {
                    return Step::Skipped;
                };
                trace!(target: "input.event", kind = ?mapped.kind, code = ?mapped.code, mods = ?mapped.mods, "key");
                let step = self.send(InputEvent::Key(mapped)).await;
                if matches!(step, Step::Forwarded) {
                    let counter = match mapped.kind {
                        KeyEventKind::Release => &KEYRELEASE_TOTAL,
                        KeyEventKind::Press | KeyEventKind::Repeat => &KEYPRESS_TOTAL,
                    };
                    counter.fetch_add(1, Ordering::Relaxed);
                }
                step
            }
            CEvent::Resize(w, h) => {
                trace!(target: "input.event", w, h, "resize");
                self.send(InputEvent::Resize(w, h)).await
            }
            _ => Step::Skipped,
        }
    }

    async fn send(&mut self, input: InputEvent) -> Step {
        if self.sender.send(Event::Input(input)).await.is_ok() {
            Step::Forwarded
        } else {
            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            Step::Stop(ExitReason::ReceiverDropped)
        }
    }
}

fn is_ctrl_c(key: &CKeyEvent) -> bool {
    key.code == CKeyCode::Char('c')
        && key.modifiers.contains(CMods::CONTROL)
        && key.kind != CKind::Release
}
