//! Token record model, derived authorization state, and the secret wrapper.

pub mod record;
pub mod secret;

pub use record::*;
pub use secret::*;
