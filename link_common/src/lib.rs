//! Link Common Library
//!
//! Shared definitions for the link workspace: the Mumble Link shared memory
//! layout, the truncated UDP payload derived from it, game context decoding
//! and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`consts`] - Segment naming, sizes and the fixed relay destination
//! - [`layout`] - `LinkedMem` and `LinkedMemTruncated` record layouts
//! - [`wire`] - Datagram payload validation
//! - [`context`] - Guild Wars 2 context blob decoding
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! link = { package = "link_common", path = "../link_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use link_common::layout::{LinkedMem, LinkedMemTruncated};
//! use link_common::wire::decode_payload;
//! ```

pub mod config;
pub mod consts;
pub mod context;
pub mod layout;
pub mod prelude;
pub mod wire;
