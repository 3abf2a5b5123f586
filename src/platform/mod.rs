//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keys and swipes normalized to commands)
//! - Storage (LocalStorage on web, files natively, memory in tests)
//! - The browser-facing handle (wasm32 only)

pub mod input;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Command, command_for_key, swipe_direction};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
