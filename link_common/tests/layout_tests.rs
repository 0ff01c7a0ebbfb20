//! Layout invariants seen from outside the crate: sizes, the wire prefix,
//! and decoding a payload that carries a Guild Wars 2 context.

use link_common::consts::{DESCRIPTION_LEN, LINKED_MEM_SIZE, PAYLOAD_SIZE};
use link_common::context::{Gw2Context, UiState};
use link_common::layout::{LinkedMem, LinkedMemTruncated, encode_utf16_field};
use link_common::wire::decode_payload;

#[test]
fn truncated_size_relationship() {
    assert_eq!(
        std::mem::size_of::<LinkedMemTruncated>(),
        std::mem::size_of::<LinkedMem>() - DESCRIPTION_LEN * 2
    );
    assert_eq!(std::mem::size_of::<LinkedMem>(), LINKED_MEM_SIZE);
}

#[test]
fn payload_round_trip_keeps_context() {
    let mut mem = LinkedMem::zeroed();
    mem.ui_version = 2;
    mem.ui_tick = 1234;
    mem.avatar_position = [10.0, -5.5, 3.25];
    mem.identity = encode_utf16_field(r#"{"name":"Joko","profession":4}"#);
    mem.context_len = 88;
    mem.context[28..32].copy_from_slice(&50u32.to_ne_bytes());
    mem.context[48..52]
        .copy_from_slice(&(UiState::GAME_FOCUS | UiState::IN_COMBAT).bits().to_ne_bytes());

    let payload = mem.truncated();
    assert_eq!(payload.as_bytes().len(), PAYLOAD_SIZE);

    let decoded = decode_payload(payload.as_bytes()).unwrap();
    assert_eq!(decoded.tick(), 1234);
    assert_eq!(decoded.avatar_position(), [10.0, -5.5, 3.25]);
    assert_eq!(decoded.identity(), r#"{"name":"Joko","profession":4}"#);

    let ctx = Gw2Context::from_context(decoded.context_bytes()).unwrap();
    assert_eq!(ctx.map_id(), 50);
    assert!(ctx.ui_state().contains(UiState::IN_COMBAT));
    assert!(!ctx.ui_state().contains(UiState::MAP_OPEN));
}

#[test]
fn context_shorter_than_gw2_layout_is_not_decoded() {
    let mut mem = LinkedMem::zeroed();
    mem.context_len = 48;
    assert!(Gw2Context::from_context(mem.context_bytes()).is_none());
}

#[test]
fn widened_payload_keeps_pose_and_map() {
    use link_common::prelude::*;

    let mut mem = LinkedMem::zeroed();
    mem.ui_version = 2;
    mem.ui_tick = 7;
    mem.camera_position = [1.0, 2.0, 3.0];
    mem.camera_front = [0.0, 0.0, 1.0];
    mem.description = encode_utf16_field("dropped on the wire");
    mem.context_len = 85;
    mem.context[68..72].copy_from_slice(&120.5f32.to_ne_bytes());
    mem.context[72..76].copy_from_slice(&(-42.0f32).to_ne_bytes());

    let payload = decode_payload(mem.truncated().as_bytes()).unwrap();
    let record = LinkedMem::from(payload);
    assert_eq!(record.version(), 2);
    assert_eq!(record.tick(), 7);
    assert_eq!(record.camera_position(), [1.0, 2.0, 3.0]);
    assert_eq!(record.camera_front(), [0.0, 0.0, 1.0]);
    assert_eq!(record.description(), "");

    let ctx = Gw2Context::from_context(record.context_bytes()).unwrap();
    assert_eq!(ctx.map_center(), [120.5, -42.0]);
}
