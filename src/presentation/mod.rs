//! Presentation bridge for mirroring content onto a secondary display.
//!
//! This module provides:
//! - `PresentationBridge`: opens a presentation context, preferring a
//!   native display service and falling back to a plain window
//! - `PresentationSession`: caller-owned handle used for every send
//! - `PresentationMessage`: the cross-context render contract
//!
//! Windows are modeled as receiver tasks connected by a message channel;
//! a render message replaces the receiving document's body and title.

pub mod bridge;
pub mod message;
pub mod receiver;
pub mod session;
pub mod url;

pub use bridge::{InboundListener, PresentationBridge};
pub use message::{MessageEvent, PresentationMessage};
pub use receiver::{Document, TaskWindowOpener, WindowOpener};
pub use session::{DisplayService, NativeSession, PresentationSession, WindowHandle};
