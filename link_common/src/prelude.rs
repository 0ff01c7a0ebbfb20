//! Prelude module for common re-exports.
//!
//! ```rust
//! use link_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, RelayConfig, RelaySection, SharedConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{LINKED_MEM_SIZE, PAYLOAD_SIZE, RELAY_DESTINATION, RELAY_PORT};

// ─── Layout & Wire ──────────────────────────────────────────────────
pub use crate::context::{Gw2Context, UiState};
pub use crate::layout::{LinkedMem, LinkedMemTruncated, decode_utf16_field};
pub use crate::wire::{WireError, decode_payload};
