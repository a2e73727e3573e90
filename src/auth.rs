//! Identity newtypes and the redacting access-token wrapper.

pub mod id;
pub mod secret;

pub use id::*;
pub use secret::*;
