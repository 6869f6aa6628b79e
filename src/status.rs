//! User-facing status stream.
//!
//! Controllers hold a cloneable [`StatusSender`]; the surrounding UI drains
//! the single [`StatusReceiver`] once per frame.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::SceneError;

/// Category of a status message. Everything except `Info` is a
/// recoverable failure from the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    SurfaceNotFound,
    InvalidSaveFile,
    StorageFailure,
    UnknownCatalogReference,
    InvalidCatalog,
    InvalidSettings,
}

impl StatusKind {
    pub fn is_error(self) -> bool {
        self != StatusKind::Info
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }
}

impl From<&SceneError> for StatusMessage {
    fn from(err: &SceneError) -> Self {
        Self { kind: err.kind(), text: err.to_string() }
    }
}

#[derive(Clone)]
pub struct StatusSender {
    tx: Sender<StatusMessage>,
}

impl StatusSender {
    pub fn send(&self, message: StatusMessage) {
        if message.kind.is_error() {
            log::warn!("{}", message.text);
        } else {
            log::info!("{}", message.text);
        }
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(message);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.send(StatusMessage::info(text));
    }

    pub fn error(&self, err: &SceneError) {
        self.send(StatusMessage::from(err));
    }
}

pub struct StatusReceiver {
    rx: Receiver<StatusMessage>,
    /// Messages pulled off the channel by `latest` but not yet drained.
    backlog: Vec<StatusMessage>,
    latest: Option<StatusMessage>,
}

impl StatusReceiver {
    fn pump(&mut self) {
        self.backlog.extend(self.rx.try_iter());
        if let Some(last) = self.backlog.last() {
            self.latest = Some(last.clone());
        }
    }

    /// Take every message sent since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<StatusMessage> {
        self.pump();
        std::mem::take(&mut self.backlog)
    }

    /// The most recent message, i.e. what a status bar would be showing.
    /// Peeking does not consume anything from the next `drain`.
    pub fn latest(&mut self) -> Option<&StatusMessage> {
        self.pump();
        self.latest.as_ref()
    }
}

pub fn channel() -> (StatusSender, StatusReceiver) {
    let (tx, rx) = mpsc::channel();
    (StatusSender { tx }, StatusReceiver { rx, backlog: Vec::new(), latest: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_order() {
        let (tx, mut rx) = channel();
        tx.info("one");
        tx.error(&SceneError::SurfaceNotFound);
        let drained = rx.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].text, "one");
        assert_eq!(drained[1].kind, StatusKind::SurfaceNotFound);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_latest_survives_drain() {
        let (tx, mut rx) = channel();
        tx.info("first");
        tx.info("second");
        assert_eq!(rx.latest().map(|m| m.text.as_str()), Some("second"));
        assert_eq!(rx.drain().len(), 2);
        assert!(rx.drain().is_empty());
        assert_eq!(rx.latest().map(|m| m.text.as_str()), Some("second"));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        tx.info("nobody listening");
    }
}
