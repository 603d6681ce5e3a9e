//! Progress reporting.
//!
//! Long-running operations report a phase title and a current message (usually a
//! relative path). The `Progress` trait decouples the walker and converter from
//! whoever observes them; `ChannelProgress` forwards events over a crossbeam channel
//! from the worker thread to a single observer.

use crossbeam_channel::Sender;

/// Receiver of progress updates. Called synchronously on the working thread.
pub trait Progress: Send + Sync {
    fn set_title(&self, title: &str);
    fn set_message(&self, message: &str);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_title(&self, _title: &str) {}
    fn set_message(&self, _message: &str) {}
}

/// One progress update as seen by an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Title(String),
    Message(String),
}

/// Forwards updates into a channel. A disconnected observer is ignored.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: Sender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl Progress for ChannelProgress {
    fn set_title(&self, title: &str) {
        let _ = self.tx.send(ProgressEvent::Title(title.to_string()));
    }

    fn set_message(&self, message: &str) {
        let _ = self.tx.send(ProgressEvent::Message(message.to_string()));
    }
}
