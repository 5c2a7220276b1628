//! Opens presentation contexts and wires up the inbound listener.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::receiver::{TaskWindowOpener, WindowOpener};
use super::session::{DisplayService, PresentationSession, PresentationTarget};
use super::url::{invoice_presentation_url, presentation_url};

/// Permanent listener for messages coming back from presentation
/// contexts. Received data is logged, nothing is filtered.
pub struct InboundListener {
    tx: mpsc::UnboundedSender<Value>,
}

impl InboundListener {
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        tokio::spawn(async move {
            while let Some(data) = rx.recv().await {
                debug!(?data, "received message from presentation window");
            }
        });
        Self { tx }
    }

    /// Address presentation contexts can message back on.
    pub fn sender(&self) -> mpsc::UnboundedSender<Value> {
        self.tx.clone()
    }
}

/// Opens or reuses a secondary display surface for the current page.
///
/// Prefers a native display service when one is configured; otherwise
/// falls back to opening a plain window. Every open returns a session
/// owned by the caller.
pub struct PresentationBridge {
    page_url: String,
    target_origin: String,
    display: Option<Arc<dyn DisplayService>>,
    opener: Arc<dyn WindowOpener>,
    inbound: InboundListener,
}

impl PresentationBridge {
    /// `target_origin` restricts message delivery; `"*"` (the default
    /// configuration) matches the original unrestricted behavior.
    pub fn new(page_url: impl Into<String>, target_origin: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            target_origin: target_origin.into(),
            display: None,
            opener: Arc::new(TaskWindowOpener),
            inbound: InboundListener::spawn(),
        }
    }

    pub fn with_display_service(mut self, display: Arc<dyn DisplayService>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn inbound_sender(&self) -> mpsc::UnboundedSender<Value> {
        self.inbound.sender()
    }

    /// Open a presentation context for `url`, or for the current page with
    /// the presentation marker appended when no URL is given.
    pub async fn open_presentation(&self, url: Option<&str>) -> PresentationSession {
        let target_url = match url {
            Some(url) => url.to_string(),
            None => presentation_url(&self.page_url),
        };

        if let Some(display) = &self.display {
            match display.request_session(&target_url).await {
                Ok(session) => {
                    info!(url = %target_url, "presentation session started");
                    return PresentationSession::new(
                        target_url,
                        self.target_origin.clone(),
                        PresentationTarget::Native(session),
                    );
                }
                Err(e) => {
                    warn!(error = %e, "display service failed, falling back to window open");
                }
            }
        }

        let window = self.opener.open(&target_url);
        PresentationSession::new(
            target_url,
            self.target_origin.clone(),
            PresentationTarget::Window(window),
        )
    }

    /// Open a presentation for a specific invoice.
    pub async fn present_invoice(&self, id: i64) -> PresentationSession {
        let url = invoice_presentation_url(id);
        self.open_presentation(Some(&url)).await
    }
}

// ============================================================================
// Tests
// ============================================================================
