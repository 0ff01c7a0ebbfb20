//! Minimal consumer for the relay.
//!
//! Binds the relay destination and logs every snapshot it receives.
//!
//! ```bash
//! cargo run -p link_relay --example udp_listener
//! ```

use link::prelude::*;
use std::net::UdpSocket;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let socket = UdpSocket::bind(RELAY_DESTINATION)?;
    info!("Listening on {}", RELAY_DESTINATION);

    // Larger than a payload so oversized datagrams are reported, not truncated.
    let mut buf = [0u8; LINKED_MEM_SIZE];
    loop {
        let (len, from) = socket.recv_from(&mut buf)?;
        match decode_payload(&buf[..len]) {
            Ok(payload) => {
                // Widen to the full record for the accessors; description stays empty.
                let record = LinkedMem::from(payload);
                let pos = record.avatar_position();
                let cam = record.camera_position();
                let front = record.camera_front();
                info!(
                    "tick={} v{} from={} identity={} avatar=({:.2}, {:.2}, {:.2})",
                    record.tick(),
                    record.version(),
                    from,
                    record.identity(),
                    pos[0],
                    pos[1],
                    pos[2]
                );
                info!(
                    "  camera=({:.2}, {:.2}, {:.2}) front=({:.2}, {:.2}, {:.2})",
                    cam[0], cam[1], cam[2], front[0], front[1], front[2]
                );
                if let Some(ctx) = Gw2Context::from_context(record.context_bytes()) {
                    let center = ctx.map_center();
                    info!(
                        "  map_id={} center=({:.1}, {:.1}) scale={:.2} ui_state={:?}",
                        ctx.map_id(),
                        center[0],
                        center[1],
                        ctx.map_scale(),
                        ctx.ui_state()
                    );
                }
            }
            Err(e) => warn!("{e}"),
        }
    }
}
