//! Presentation-context side of the bridge.
//!
//! A "window" here is a spawned task draining its message channel. When
//! the window URL carries the presentation marker, render messages
//! replace the document body and title; everything else is dropped.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::message::{parse_message, MessageEvent, PresentationMessage};
use super::session::WindowHandle;
use super::url::{has_presentation_marker, origin_of};

/// The visible state of a presentation context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body_html: String,
    pub title: String,
}

/// Opens presentation windows. Seam so tests can observe or replace the
/// window mechanism.
pub trait WindowOpener: Send + Sync {
    fn open(&self, url: &str) -> WindowHandle;
}

/// Default opener: spawns an in-process receiver task per window.
pub struct TaskWindowOpener;

impl WindowOpener for TaskWindowOpener {
    fn open(&self, url: &str) -> WindowHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<MessageEvent>();
        let closed = Arc::new(AtomicBool::new(false));
        let document = Arc::new(Mutex::new(Document::default()));

        // Only a page opened with the marker registers the render listener.
        let listening = has_presentation_marker(url);
        let own_origin = origin_of(url);
        let doc = Arc::clone(&document);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if listening {
                    handle_message_event(&doc, own_origin.as_deref(), event);
                } else {
                    debug!("window has no presentation listener, dropping message");
                }
            }
        });

        WindowHandle::new(url, tx, closed, document)
    }
}

/// Apply one inbound message to the document.
///
/// Non-render messages are silently ignored; processing errors are logged
/// and never propagated.
pub fn handle_message_event(document: &Mutex<Document>, own_origin: Option<&str>, event: MessageEvent) {
    if event.target_origin != "*" && own_origin != Some(event.target_origin.as_str()) {
        debug!(target_origin = %event.target_origin, "dropping message for mismatched origin");
        return;
    }

    let Some(message) = parse_message(&event.data) else {
        debug!("ignoring message that does not match the render contract");
        return;
    };

    match message {
        PresentationMessage::Render { html, title } => match document.lock() {
            Ok(mut doc) => {
                doc.body_html = html;
                if let Some(title) = title {
                    doc.title = title;
                }
                debug!("rendered presentation content");
            }
            Err(e) => {
                warn!(error = %e, "error processing presentation message");
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(data: serde_json::Value) -> MessageEvent {
        MessageEvent {
            target_origin: "*".to_string(),
            data,
        }
    }

    #[test]
    fn test_render_replaces_body_and_title() {
        let document = Mutex::new(Document::default());

        handle_message_event(
            &document,
            None,
            event(json!({
                "type": "render",
                "payload": { "html": "<b>hi</b>", "title": "T" }
            })),
        );

        let doc = document.lock().unwrap();
        assert_eq!(doc.body_html, "<b>hi</b>");
        assert_eq!(doc.title, "T");
    }

    #[test]
    fn test_render_without_title_keeps_existing_title() {
        let document = Mutex::new(Document {
            body_html: String::new(),
            title: "Invoices".to_string(),
        });

        handle_message_event(
            &document,
            None,
            event(json!({ "type": "render", "payload": { "html": "<p>x</p>" } })),
        );

        let doc = document.lock().unwrap();
        assert_eq!(doc.body_html, "<p>x</p>");
        assert_eq!(doc.title, "Invoices");
    }

    #[test]
    fn test_non_render_message_leaves_document_unchanged() {
        let document = Mutex::new(Document::default());

        handle_message_event(&document, None, event(json!({ "type": "other" })));
        handle_message_event(&document, None, event(json!(42)));

        assert_eq!(*document.lock().unwrap(), Document::default());
    }

    #[test]
    fn test_mismatched_target_origin_is_dropped() {
        let document = Mutex::new(Document::default());

        let mismatched = MessageEvent {
            target_origin: "https://other.example".to_string(),
            data: json!({ "type": "render", "payload": { "html": "<b>no</b>" } }),
        };
        handle_message_event(&document, Some("http://localhost:5000"), mismatched);
        assert_eq!(*document.lock().unwrap(), Document::default());

        let matched = MessageEvent {
            target_origin: "http://localhost:5000".to_string(),
            data: json!({ "type": "render", "payload": { "html": "<b>yes</b>" } }),
        };
        handle_message_event(&document, Some("http://localhost:5000"), matched);
        assert_eq!(document.lock().unwrap().body_html, "<b>yes</b>");
    }
}
