//! Hand-off of toggle requests from foreign threads to the GUI thread.
//!
//! The global hotkey callback runs on the listener thread, which must never
//! touch the stopwatch or any widget. It only sends a [`StopwatchCommand`]
//! through a [`Dispatcher`]; the GUI thread drains the matching
//! [`CommandQueue`] once per frame and applies the commands in order.
//!
//! The focus check and the eventual dequeue are not atomic. If focus changes
//! between the two, a queued toggle is still applied.

use eframe::egui;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel as mpsc_channel, Receiver, Sender};
use std::sync::Arc;

/// Requests the GUI thread can receive from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchCommand {
    Toggle,
}

/// Whether the main window currently has keyboard focus. Written by the GUI
/// thread every frame, read by the listener thread.
pub type FocusFlag = Arc<AtomicBool>;

#[derive(Clone)]
pub struct Dispatcher {
    tx: Sender<StopwatchCommand>,
    focused: FocusFlag,
    waker: Option<egui::Context>,
}

pub struct CommandQueue {
    rx: Receiver<StopwatchCommand>,
}

/// Create a connected producer/consumer pair sharing `focused`.
pub fn channel(focused: FocusFlag) -> (Dispatcher, CommandQueue) {
    let (tx, rx) = mpsc_channel();
    (
        Dispatcher {
            tx,
            focused,
            waker: None,
        },
        CommandQueue { rx },
    )
}

impl Dispatcher {
    /// Repaint `ctx` after every enqueue so an idle event loop wakes up.
    pub fn with_waker(mut self, ctx: egui::Context) -> Self {
        self.waker = Some(ctx);
        self
    }

    pub fn window_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    /// Ask the GUI thread to toggle the stopwatch.
    ///
    /// Does nothing while the window is focused, since the in-window shortcut
    /// already handles that case. Never blocks. Returns whether a command was
    /// queued.
    pub fn toggle_from_foreign_thread(&self) -> bool {
        if self.window_focused() {
            tracing::debug!("global toggle ignored: window focused");
            return false;
        }
        self.send(StopwatchCommand::Toggle)
    }

    fn send(&self, cmd: StopwatchCommand) -> bool {
        if let Err(e) = self.tx.send(cmd) {
            tracing::warn!("dropping {:?}: command queue closed", e.0);
            return false;
        }
        if let Some(ctx) = &self.waker {
            ctx.request_repaint();
        }
        true
    }
}

impl CommandQueue {
    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<StopwatchCommand> {
        self.rx.try_iter().collect()
    }
}
