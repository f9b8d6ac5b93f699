// Common types shared across domains

pub mod entity_ids;
pub mod id;
pub mod session;

pub use entity_ids::*;
pub use id::Id;
pub use session::{SessionToken, SessionTokenError};
