//! Single-slot UI state.
//!
//! A [`UiStore`] is created once at the root of a front end and passed down
//! by reference. It holds at most one dialog and at most one alert; setting
//! either replaces what was there.

use serde::Serialize;
use tokio::sync::watch;

/// One value or nothing, observable by a presentation layer.
#[derive(Debug)]
pub struct Slot<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }
}

impl<T: Clone> Slot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's content, returning what was displaced.
    pub fn set(&self, value: T) -> Option<T> {
        self.tx.send_replace(Some(value))
    }

    /// Empty the slot, returning what it held.
    pub fn clear(&self) -> Option<T> {
        self.tx.send_replace(None)
    }

    pub fn current(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dialog {
    /// Asks before a change is sent.
    Confirm { title: String, message: String },
    /// Informational, dismissed without a choice.
    Notice { title: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct UiStore {
    pub dialog: Slot<Dialog>,
    pub alert: Slot<Alert>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }
}
