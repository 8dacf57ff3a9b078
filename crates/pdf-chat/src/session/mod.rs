//! Per-session state: conversation memory, current index and the registry

mod context;
mod memory;
mod store;

pub use context::SessionContext;
pub use memory::ConversationMemory;
pub use store::{SessionGuard, SessionHandle, SessionStore};
