//! Mumble Link record layouts.
//!
//! Defines `LinkedMem` (5460 bytes), the record an application publishes in
//! shared memory, and `LinkedMemTruncated` (1364 bytes), the prefix of it
//! that is relayed over UDP.
//!
//! Both structs are `#[repr(C, packed)]` with native byte order. The
//! truncated shape must stay byte-for-byte identical to the full one up to
//! and including `context`; the offset assertions below enforce it.
//!
//! Text fields hold UTF-16 code units and are not guaranteed to be
//! NUL-terminated. Decoding stops at the first NUL or at capacity.

use core::mem::{offset_of, size_of};
use static_assertions::const_assert_eq;

use crate::consts::{CONTEXT_LEN, DESCRIPTION_LEN, LINKED_MEM_SIZE, PAYLOAD_SIZE, TEXT_FIELD_LEN};

/// Full Mumble Link record as laid out in the shared segment.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug)]
pub struct LinkedMem {
    /// Layout version written by the publisher.
    pub ui_version: u32,
    /// Change counter, incremented by the publisher on every update.
    pub ui_tick: u32,
    /// Avatar position.
    pub avatar_position: [f32; 3],
    /// Avatar facing vector.
    pub avatar_front: [f32; 3],
    /// Avatar up vector.
    pub avatar_top: [f32; 3],
    /// Application name.
    pub name: [u16; TEXT_FIELD_LEN],
    /// Camera position.
    pub camera_position: [f32; 3],
    /// Camera facing vector.
    pub camera_front: [f32; 3],
    /// Camera up vector.
    pub camera_top: [f32; 3],
    /// Application-defined identity string (JSON for Guild Wars 2).
    pub identity: [u16; TEXT_FIELD_LEN],
    /// Number of meaningful bytes in `context`.
    pub context_len: u32,
    /// Opaque application context.
    pub context: [u8; CONTEXT_LEN],
    /// Free-form description. Not relayed.
    pub description: [u16; DESCRIPTION_LEN],
}

/// `LinkedMem` without the trailing `description`. This is the UDP payload.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug)]
pub struct LinkedMemTruncated {
    /// Layout version written by the publisher.
    pub ui_version: u32,
    /// Change counter.
    pub ui_tick: u32,
    /// Avatar position.
    pub avatar_position: [f32; 3],
    /// Avatar facing vector.
    pub avatar_front: [f32; 3],
    /// Avatar up vector.
    pub avatar_top: [f32; 3],
    /// Application name.
    pub name: [u16; TEXT_FIELD_LEN],
    /// Camera position.
    pub camera_position: [f32; 3],
    /// Camera facing vector.
    pub camera_front: [f32; 3],
    /// Camera up vector.
    pub camera_top: [f32; 3],
    /// Application-defined identity string.
    pub identity: [u16; TEXT_FIELD_LEN],
    /// Number of meaningful bytes in `context`.
    pub context_len: u32,
    /// Opaque application context.
    pub context: [u8; CONTEXT_LEN],
}

const_assert_eq!(size_of::<LinkedMem>(), LINKED_MEM_SIZE);
const_assert_eq!(size_of::<LinkedMemTruncated>(), PAYLOAD_SIZE);
const_assert_eq!(
    size_of::<LinkedMemTruncated>(),
    size_of::<LinkedMem>() - DESCRIPTION_LEN * 2
);

// Prefix equivalence between the two shapes.
const_assert_eq!(offset_of!(LinkedMem, ui_tick), 4);
const_assert_eq!(offset_of!(LinkedMem, ui_tick), offset_of!(LinkedMemTruncated, ui_tick));
const_assert_eq!(offset_of!(LinkedMem, name), offset_of!(LinkedMemTruncated, name));
const_assert_eq!(
    offset_of!(LinkedMem, camera_position),
    offset_of!(LinkedMemTruncated, camera_position)
);
const_assert_eq!(offset_of!(LinkedMem, identity), offset_of!(LinkedMemTruncated, identity));
const_assert_eq!(
    offset_of!(LinkedMem, context_len),
    offset_of!(LinkedMemTruncated, context_len)
);
const_assert_eq!(offset_of!(LinkedMem, context), offset_of!(LinkedMemTruncated, context));
const_assert_eq!(offset_of!(LinkedMem, description), PAYLOAD_SIZE);

/// Byte offset of `ui_tick` inside the shared segment.
pub const TICK_OFFSET: usize = offset_of!(LinkedMem, ui_tick);

/// Decode a fixed-capacity UTF-16 buffer.
///
/// Stops at the first NUL code unit, or uses the whole buffer when there is
/// none. Unpaired surrogates become U+FFFD.
pub fn decode_utf16_field(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// Encode `text` into a fixed-capacity UTF-16 buffer, truncating at `N`
/// code units. Remaining units are zero.
pub fn encode_utf16_field<const N: usize>(text: &str) -> [u16; N] {
    let mut out = [0u16; N];
    for (slot, unit) in out.iter_mut().zip(text.encode_utf16()) {
        *slot = unit;
    }
    out
}

impl LinkedMem {
    /// All-zero record, the state of a freshly created segment.
    pub fn zeroed() -> Self {
        // SAFETY: only integer and float fields; all-zeros is valid.
        unsafe { core::mem::zeroed() }
    }

    /// Change counter.
    #[inline]
    pub fn tick(&self) -> u32 {
        self.ui_tick
    }

    /// Layout version.
    #[inline]
    pub fn version(&self) -> u32 {
        self.ui_version
    }

    /// Avatar position.
    pub fn avatar_position(&self) -> [f32; 3] {
        self.avatar_position
    }

    /// Camera position.
    pub fn camera_position(&self) -> [f32; 3] {
        self.camera_position
    }

    /// Camera facing vector.
    pub fn camera_front(&self) -> [f32; 3] {
        self.camera_front
    }

    /// Decoded application name.
    pub fn name(&self) -> String {
        let name = self.name;
        decode_utf16_field(&name)
    }

    /// Decoded identity string.
    pub fn identity(&self) -> String {
        let identity = self.identity;
        decode_utf16_field(&identity)
    }

    /// Decoded description.
    pub fn description(&self) -> String {
        let description = self.description;
        decode_utf16_field(&description)
    }

    /// Meaningful part of the context blob.
    pub fn context_bytes(&self) -> &[u8] {
        context_prefix(&self.context, self.context_len)
    }

    /// The relayed prefix of this record.
    pub fn truncated(&self) -> LinkedMemTruncated {
        let mut out = LinkedMemTruncated::zeroed();
        out.as_bytes_mut()
            .copy_from_slice(&self.as_bytes()[..PAYLOAD_SIZE]);
        out
    }

    /// Raw record bytes in native byte order.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: packed, no padding, every byte is initialized.
        unsafe {
            core::slice::from_raw_parts(self as *const Self as *const u8, size_of::<Self>())
        }
    }
}

impl From<LinkedMemTruncated> for LinkedMem {
    fn from(value: LinkedMemTruncated) -> Self {
        let mut out = LinkedMem::zeroed();
        // SAFETY: `out` spans LINKED_MEM_SIZE bytes; the prefix has the same layout.
        unsafe {
            core::ptr::copy_nonoverlapping(
                value.as_bytes().as_ptr(),
                &mut out as *mut LinkedMem as *mut u8,
                PAYLOAD_SIZE,
            );
        }
        out
    }
}

impl LinkedMemTruncated {
    /// All-zero payload.
    pub fn zeroed() -> Self {
        // SAFETY: only integer and float fields; all-zeros is valid.
        unsafe { core::mem::zeroed() }
    }

    /// Rebuild a payload from exactly [`PAYLOAD_SIZE`] bytes.
    ///
    /// Returns `None` on any other length; see [`crate::wire::decode_payload`]
    /// for the error-reporting variant.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PAYLOAD_SIZE {
            return None;
        }
        // SAFETY: length checked, align 1, every bit pattern is valid.
        Some(unsafe { core::ptr::read_unaligned(bytes.as_ptr() as *const Self) })
    }

    /// Change counter.
    #[inline]
    pub fn tick(&self) -> u32 {
        self.ui_tick
    }

    /// Avatar position.
    pub fn avatar_position(&self) -> [f32; 3] {
        self.avatar_position
    }

    /// Camera position.
    pub fn camera_position(&self) -> [f32; 3] {
        self.camera_position
    }

    /// Decoded application name.
    pub fn name(&self) -> String {
        let name = self.name;
        decode_utf16_field(&name)
    }

    /// Decoded identity string.
    pub fn identity(&self) -> String {
        let identity = self.identity;
        decode_utf16_field(&identity)
    }

    /// Meaningful part of the context blob.
    pub fn context_bytes(&self) -> &[u8] {
        context_prefix(&self.context, self.context_len)
    }

    /// Raw wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: packed, no padding, every byte is initialized.
        unsafe {
            core::slice::from_raw_parts(self as *const Self as *const u8, size_of::<Self>())
        }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above; any byte pattern is a valid value.
        unsafe {
            core::slice::from_raw_parts_mut(self as *mut Self as *mut u8, size_of::<Self>())
        }
    }
}

/// `context_len` is publisher-controlled; clamp it to the buffer.
fn context_prefix(context: &[u8; CONTEXT_LEN], len: u32) -> &[u8] {
    let len = (len as usize).min(CONTEXT_LEN);
    &context[..len]
}
