//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (requestAnimationFrame on web, a manual clock natively)
//! - Key-value storage (LocalStorage on web, in-memory natively)
//! - Keyboard mapping to game intents

pub mod input;
pub mod storage;
pub mod time;

pub use input::{KeyAction, action_for_key};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use time::{FrameHandle, ManualClock, TimingSource};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use time::AnimationFrameTimer;
