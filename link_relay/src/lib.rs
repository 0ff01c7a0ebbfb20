//! # Link Relay
//!
//! Bridges a Mumble Link shared memory segment to a local UDP listener.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Publisher     │    │  /MumbleLink.N  │    │   link_relay    │
//! │ (game / app)    ├───►│  LinkedMem      ├───►│   RelayLoop     │
//! │                 │    │  5460 bytes     │    │                 │
//! └─────────────────┘    └─────────────────┘    └────────┬────────┘
//!                                                        │ 1364-byte datagram
//!                                                        ▼ per tick change
//!                                               ┌─────────────────┐
//!                                               │ 127.0.0.1:7070  │
//!                                               │ overlay / tool  │
//!                                               └─────────────────┘
//! ```
//!
//! ## Components
//!
//! - [`segment::SharedSegment`]: attach to or create-and-zero the segment
//! - [`udp::UdpChannel`]: fire-and-forget datagram socket to the fixed destination
//! - [`relay::RelayLoop`]: tick change detection and snapshot forwarding
//!
//! ## Usage
//!
//! ```rust,no_run
//! use link_relay::{RelayLoop, SharedSegment, UdpChannel, bootstrap};
//! use std::sync::atomic::AtomicBool;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (segment, channel) = bootstrap(
//!     || SharedSegment::open_or_create("/MumbleLink.1000"),
//!     UdpChannel::init,
//! )?;
//! let running = AtomicBool::new(true);
//! RelayLoop::new(segment, channel, Duration::from_millis(16)).run(&running);
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform Support
//!
//! Linux (POSIX `shm_open`). The segment name follows the Mumble convention
//! `/MumbleLink.<uid>`.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod platform;
pub mod relay;
pub mod segment;
pub mod udp;

pub use error::{MappingError, RelayError, RelayResult, SocketError};
pub use relay::{DatagramSink, LinkSource, RelayLoop, RelayStats, Step, bootstrap};
pub use segment::{SegmentOrigin, SharedSegment};
pub use udp::UdpChannel;
