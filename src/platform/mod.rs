//! Platform abstraction layer
//!
//! Collaborators the session loop talks to but does not own:
//! - Input: key-state map keyed by logical action
//! - Assets: named image resources resolved before the loop starts

pub mod assets;
pub mod input;

pub use assets::{AssetHandle, AssetLoader, Assets, DirAssets, MemoryAssets, REQUIRED_ASSETS};
pub use input::{Action, KeyBindings, KeyState};
