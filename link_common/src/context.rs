//! Guild Wars 2 context blob.
//!
//! Guild Wars 2 fills the first 85 bytes of the Mumble Link `context` field
//! with the structure below. The first 48 bytes are what Mumble itself uses
//! for identification; the rest is game-specific UI and map state.

use bitflags::bitflags;
use core::mem::size_of;
use static_assertions::const_assert_eq;

bitflags! {
    /// UI state bitmask published in [`Gw2Context::ui_state`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UiState: u32 {
        /// World map is open.
        const MAP_OPEN          = 1 << 0;
        /// Compass is anchored top right.
        const COMPASS_TOP_RIGHT = 1 << 1;
        /// Compass rotation is enabled.
        const COMPASS_ROTATION  = 1 << 2;
        /// Game window has focus.
        const GAME_FOCUS        = 1 << 3;
        /// Player is in a competitive game mode.
        const COMPETITIVE_MODE  = 1 << 4;
        /// A text box has focus.
        const TEXTBOX_FOCUS     = 1 << 5;
        /// Player is in combat.
        const IN_COMBAT         = 1 << 6;
    }
}

/// Decoded Guild Wars 2 context.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Gw2Context {
    /// `sockaddr_in` or `sockaddr_in6` of the map server.
    pub server_address: [u8; 28],
    /// Map id.
    pub map_id: u32,
    /// Map type.
    pub map_type: u32,
    /// Shard id.
    pub shard_id: u32,
    /// Map instance.
    pub instance: u32,
    /// Game build id.
    pub build_id: u32,
    /// Raw UI state bitmask, see [`UiState`].
    pub ui_state: u32,
    /// Compass width in pixels.
    pub compass_width: u16,
    /// Compass height in pixels.
    pub compass_height: u16,
    /// Compass rotation in radians.
    pub compass_rotation: f32,
    /// Player x in continent coordinates.
    pub player_x: f32,
    /// Player y in continent coordinates.
    pub player_y: f32,
    /// Map center x in continent coordinates.
    pub map_center_x: f32,
    /// Map center y in continent coordinates.
    pub map_center_y: f32,
    /// Map scale.
    pub map_scale: f32,
    /// Game process id.
    pub process_id: u32,
    /// Mount index, 0 when dismounted.
    pub mount_index: u8,
}

/// Bytes of `context` covered by [`Gw2Context`].
pub const GW2_CONTEXT_SIZE: usize = 85;

const_assert_eq!(size_of::<Gw2Context>(), GW2_CONTEXT_SIZE);

impl Gw2Context {
    /// Decode from the meaningful part of a `context` blob.
    ///
    /// Returns `None` when fewer than [`GW2_CONTEXT_SIZE`] bytes are present.
    pub fn from_context(context: &[u8]) -> Option<Self> {
        if context.len() < GW2_CONTEXT_SIZE {
            return None;
        }
        // SAFETY: length checked, align 1, every bit pattern is valid.
        Some(unsafe { core::ptr::read_unaligned(context.as_ptr() as *const Self) })
    }

    /// UI state flags. Unknown bits are dropped.
    pub fn ui_state(&self) -> UiState {
        UiState::from_bits_truncate(self.ui_state)
    }

    /// Map id.
    pub fn map_id(&self) -> u32 {
        self.map_id
    }

    /// Map center in continent coordinates.
    pub fn map_center(&self) -> [f32; 2] {
        [self.map_center_x, self.map_center_y]
    }

    /// Map scale.
    pub fn map_scale(&self) -> f32 {
        self.map_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_state_bits() {
        let mut ctx = Gw2Context::default();

        ctx.ui_state = 1 << 0;
        assert!(ctx.ui_state().contains(UiState::MAP_OPEN));
        assert!(!ctx.ui_state().contains(UiState::COMPASS_TOP_RIGHT));

        for i in 0..7 {
            ctx.ui_state = 1 << i;
            assert_eq!(ctx.ui_state().bits(), 1 << i);
        }
    }

    #[test]
    fn unknown_ui_bits_are_dropped() {
        let ctx = Gw2Context {
            ui_state: (1 << 6) | (1 << 20),
            ..Default::default()
        };
        assert_eq!(ctx.ui_state(), UiState::IN_COMBAT);
    }

    #[test]
    fn short_context_is_rejected() {
        assert!(Gw2Context::from_context(&[0u8; 48]).is_none());
    }

    #[test]
    fn decodes_map_fields_at_fixed_offsets() {
        let mut blob = [0u8; 256];
        blob[28..32].copy_from_slice(&15u32.to_ne_bytes()); // map_id
        blob[48..52].copy_from_slice(&UiState::GAME_FOCUS.bits().to_ne_bytes());
        blob[76..80].copy_from_slice(&2.5f32.to_ne_bytes()); // map_scale
        blob[84] = 3; // mount_index

        let ctx = Gw2Context::from_context(&blob).unwrap();
        assert_eq!(ctx.map_id(), 15);
        assert_eq!(ctx.ui_state(), UiState::GAME_FOCUS);
        assert_eq!(ctx.map_scale(), 2.5);
        assert_eq!({ ctx.mount_index }, 3);
    }
}
