//! Session state ownership.
mod patch;
mod store;

pub use patch::UxStatePatch;
pub use store::StateStore;
