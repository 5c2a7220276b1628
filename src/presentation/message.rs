//! Cross-context message contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured payload sent from the primary context to a presentation
/// context. On the wire:
/// `{ "type": "render", "payload": { "html": "...", "title": "..." } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum PresentationMessage {
    Render {
        html: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl PresentationMessage {
    pub fn render(html: impl Into<String>, title: Option<String>) -> Self {
        Self::Render {
            html: html.into(),
            title,
        }
    }
}

/// A delivered message together with the sender's target-origin policy.
/// `"*"` means unrestricted, matching the browser postMessage convention.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub target_origin: String,
    pub data: Value,
}

/// Parse inbound data against the message contract. Anything that does
/// not match is dropped by the caller, so a parse failure is just None.
pub fn parse_message(data: &Value) -> Option<PresentationMessage> {
    serde_json::from_value(data.clone()).ok()
}
