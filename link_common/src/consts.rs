//! Workspace-wide constants.
//!
//! Single source of truth for segment naming, record sizes and the relay
//! destination. Imported by all crates.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// Prefix of the POSIX shared memory object published by Mumble Link
/// applications. The full name is `/MumbleLink.<uid>`.
pub const SEGMENT_NAME_PREFIX: &str = "/MumbleLink.";

/// Total size of the published `LinkedMem` record in bytes.
pub const LINKED_MEM_SIZE: usize = 5460;

/// Capacity of the trailing `description` field in UTF-16 code units.
pub const DESCRIPTION_LEN: usize = 2048;

/// Size of one relayed datagram: `LinkedMem` without `description`.
pub const PAYLOAD_SIZE: usize = LINKED_MEM_SIZE - DESCRIPTION_LEN * 2;

/// Capacity of the `name` and `identity` fields in UTF-16 code units.
pub const TEXT_FIELD_LEN: usize = 256;

/// Capacity of the opaque `context` blob in bytes.
pub const CONTEXT_LEN: usize = 256;

/// UDP port the relay sends to.
pub const RELAY_PORT: u16 = 7070;

/// Fixed relay destination (loopback, [`RELAY_PORT`]).
pub const RELAY_DESTINATION: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, RELAY_PORT));

/// Default poll interval in milliseconds (~60 Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

/// Upper bound accepted for the poll interval.
pub const MAX_POLL_INTERVAL_MS: u64 = 1000;

/// Default poll interval as Duration.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

/// Default service name used in logs.
pub const RELAY_SERVICE_NAME: &str = "link_relay";

/// Segment name following the Mumble POSIX convention for the given user.
pub fn default_segment_name(uid: u32) -> String {
    format!("{SEGMENT_NAME_PREFIX}{uid}")
}
