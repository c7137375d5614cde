//! MapTrace session layer.
//!
//! Composes the core feature store, drawing tools, viewport, persistence,
//! and geocoding search into the command surface a UI shell drives. There is
//! no process-level interface; a shell embeds [`MapSession`] and forwards
//! button presses and map clicks to it.

pub mod confirm;
pub mod search;
pub mod session;

pub use confirm::{AlwaysConfirm, ConfirmPrompt, NeverConfirm};
pub use search::{SearchMarker, SearchPanel};
pub use session::MapSession;
