//! UDP payload validation.
//!
//! One datagram carries exactly one [`LinkedMemTruncated`] snapshot in
//! native byte order. There is no framing beyond the datagram boundary, so
//! the only check a receiver can make is the length.

use thiserror::Error;

use crate::consts::PAYLOAD_SIZE;
use crate::layout::LinkedMemTruncated;

/// Errors raised while decoding a relayed datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Datagram length differs from the payload size.
    #[error("Wrong payload size: got {actual} bytes, expected {expected}")]
    WrongSize {
        /// Expected length in bytes.
        expected: usize,
        /// Received length in bytes.
        actual: usize,
    },
}

/// Decode one relayed datagram.
pub fn decode_payload(bytes: &[u8]) -> Result<LinkedMemTruncated, WireError> {
    LinkedMemTruncated::from_bytes(bytes).ok_or(WireError::WrongSize {
        expected: PAYLOAD_SIZE,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LinkedMem, encode_utf16_field};

    #[test]
    fn decodes_exact_payload() {
        let mut mem = LinkedMem::zeroed();
        mem.ui_tick = 9;
        mem.name = encode_utf16_field("Guild Wars 2");
        let bytes = mem.truncated().as_bytes().to_vec();

        let decoded = decode_payload(&bytes).unwrap();
        assert_eq!(decoded.tick(), 9);
        assert_eq!(decoded.name(), "Guild Wars 2");
    }

    #[test]
    fn rejects_full_record() {
        let mem = LinkedMem::zeroed();
        let err = decode_payload(mem.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            WireError::WrongSize {
                expected: PAYLOAD_SIZE,
                actual: 5460
            }
        );
    }

    #[test]
    fn rejects_empty_datagram() {
        assert!(matches!(
            decode_payload(&[]),
            Err(WireError::WrongSize { actual: 0, .. })
        ));
    }

    #[test]
    fn error_message_names_both_sizes() {
        let msg = decode_payload(&[0u8; 10]).unwrap_err().to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("1364"));
    }
}
