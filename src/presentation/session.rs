//! Caller-owned presentation session handles.
//!
//! `open_presentation` returns an explicit `PresentationSession` that the
//! caller threads into every send, instead of a shared window variable.
//! Both the native-session path and the window fallback carry a live
//! message channel, so `send` behaves identically on either.

// Allow dead code: handle accessors for library-style callers
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::message::{MessageEvent, PresentationMessage};
use super::receiver::Document;

/// Handle to a fallback presentation window.
///
/// The window itself is a receiver task; this handle holds the sending
/// side of its message channel plus the shared document, the way a
/// same-origin `window.open` result exposes the opened document.
#[derive(Clone)]
pub struct WindowHandle {
    url: String,
    tx: mpsc::UnboundedSender<MessageEvent>,
    closed: Arc<AtomicBool>,
    document: Arc<Mutex<Document>>,
}

impl WindowHandle {
    pub(crate) fn new(
        url: impl Into<String>,
        tx: mpsc::UnboundedSender<MessageEvent>,
        closed: Arc<AtomicBool>,
        document: Arc<Mutex<Document>>,
    ) -> Self {
        Self {
            url: url.into(),
            tx,
            closed,
            document,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.document)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.tx.is_closed()
    }

    /// Close the window. Later sends report failure.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn post_message(&self, event: MessageEvent) -> bool {
        if self.is_closed() {
            debug!(url = %self.url, "window is closed, dropping message");
            return false;
        }
        self.tx.send(event).is_ok()
    }
}

/// Handle to a native display session.
pub struct NativeSession {
    url: String,
    tx: mpsc::UnboundedSender<MessageEvent>,
}

impl NativeSession {
    pub fn new(url: impl Into<String>, tx: mpsc::UnboundedSender<MessageEvent>) -> Self {
        Self {
            url: url.into(),
            tx,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn post_message(&self, event: MessageEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Native multi-display negotiation seam. Absent on most hosts, in which
/// case the bridge goes straight to the window fallback.
#[async_trait]
pub trait DisplayService: Send + Sync {
    async fn request_session(&self, url: &str) -> anyhow::Result<NativeSession>;
}

/// Which path `open_presentation` took.
pub enum PresentationTarget {
    Native(NativeSession),
    Window(WindowHandle),
}

/// An open presentation context.
///
/// Owned by the caller; there is no shared current-window state, so two
/// sessions opened back to back do not clobber each other.
pub struct PresentationSession {
    url: String,
    target_origin: String,
    target: PresentationTarget,
}

impl PresentationSession {
    pub(crate) fn new(
        url: impl Into<String>,
        target_origin: impl Into<String>,
        target: PresentationTarget,
    ) -> Self {
        Self {
            url: url.into(),
            target_origin: target_origin.into(),
            target,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_native(&self) -> bool {
        matches!(self.target, PresentationTarget::Native(_))
    }

    /// The fallback window handle, when that path was taken.
    pub fn window(&self) -> Option<&WindowHandle> {
        match &self.target {
            PresentationTarget::Window(window) => Some(window),
            PresentationTarget::Native(_) => None,
        }
    }

    /// Send a structured message to the presentation context. Failures are
    /// reported as `false` and never propagated.
    pub fn send(&self, message: &PresentationMessage) -> bool {
        match serde_json::to_value(message) {
            Ok(data) => self.post_raw(data),
            Err(e) => {
                warn!(error = %e, "failed to encode presentation message");
                false
            }
        }
    }

    /// Send an arbitrary payload, postMessage-style.
    pub fn post_raw(&self, data: Value) -> bool {
        let event = MessageEvent {
            target_origin: self.target_origin.clone(),
            data,
        };
        let delivered = match &self.target {
            PresentationTarget::Window(window) => window.post_message(event),
            PresentationTarget::Native(session) => session.post_message(event),
        };
        if !delivered {
            debug!(url = %self.url, "presentation message not delivered");
        }
        delivered
    }
}
