//! POSIX shared memory operations (Linux).
//!
//! Thin wrappers over `shm_open` that hand back `std::fs::File` so sizing and
//! mapping go through std and memmap2.

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{shm_open, shm_unlink};
use nix::sys::stat::Mode;
use nix::unistd::getuid;
use std::fs::File;

use crate::error::MappingError;

/// Owner read/write only.
fn segment_mode() -> Mode {
    Mode::S_IRUSR | Mode::S_IWUSR
}

/// Normalize a segment name to the `/name` form `shm_open` expects.
pub fn normalize_name(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

/// Segment name following the Mumble POSIX convention for the current user.
pub fn default_segment_name() -> String {
    link::consts::default_segment_name(getuid().as_raw())
}

/// Open an existing object read/write.
///
/// Returns `Ok(None)` when no object with this name exists.
pub fn open_existing(name: &str) -> Result<Option<File>, MappingError> {
    match shm_open(name, OFlag::O_RDWR, segment_mode()) {
        Ok(fd) => Ok(Some(File::from(fd))),
        Err(Errno::ENOENT) => Ok(None),
        Err(source) => Err(MappingError::Open {
            name: name.to_string(),
            source,
        }),
    }
}

/// Exclusively create a new object and size it to `size` bytes.
///
/// Returns `Ok(None)` when another process created it first.
pub fn create_exclusive(name: &str, size: usize) -> Result<Option<File>, MappingError> {
    let fd = match shm_open(
        name,
        OFlag::O_RDWR | OFlag::O_CREAT | OFlag::O_EXCL,
        segment_mode(),
    ) {
        Ok(fd) => fd,
        Err(Errno::EEXIST) => return Ok(None),
        Err(source) => {
            return Err(MappingError::Create {
                name: name.to_string(),
                source,
            });
        }
    };

    let file = File::from(fd);
    if let Err(source) = file.set_len(size as u64) {
        // Do not leave a zero-length object behind for the publisher.
        let _ = shm_unlink(name);
        return Err(MappingError::Resize {
            name: name.to_string(),
            size,
            source,
        });
    }
    Ok(Some(file))
}

/// Current size of an opened object in bytes.
pub fn object_size(name: &str, file: &File) -> Result<u64, MappingError> {
    file.metadata()
        .map(|meta| meta.len())
        .map_err(|source| MappingError::Stat {
            name: name.to_string(),
            source,
        })
}

/// Remove a named object. Mapped views stay valid until unmapped.
pub fn unlink(name: &str) -> nix::Result<()> {
    shm_unlink(name)
}
