//! Mumble Link shared segment.
//!
//! Attaches to the publisher's segment, or creates and zero-fills it when the
//! publisher has not started yet. The mapping lives as long as the
//! [`SharedSegment`] value; dropping it unmaps the view and closes the
//! handle. The object itself is never unlinked here since the publisher may
//! still be using it.

use link::consts::{LINKED_MEM_SIZE, PAYLOAD_SIZE};
use link::layout::{LinkedMem, TICK_OFFSET};
use memmap2::{MmapMut, MmapOptions};
use std::fs::File;
use tracing::{debug, info, warn};

use crate::error::MappingError;
use crate::platform::{create_exclusive, normalize_name, object_size, open_existing};

/// How the segment was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOrigin {
    /// The publisher (or an earlier relay) had already created it.
    Attached,
    /// Created by this process and zero-filled.
    Created,
}

/// Mapped Mumble Link segment, read-only from the relay's point of view.
pub struct SharedSegment {
    name: String,
    origin: SegmentOrigin,
    mmap: MmapMut,
    // Dropped after `mmap`.
    _file: File,
}

impl SharedSegment {
    /// Attach to `name`, or create it sized to [`LINKED_MEM_SIZE`] bytes.
    ///
    /// An attached object smaller than the record is grown to fit.
    ///
    /// A newly created segment is zero-filled once before it is returned. An
    /// attached segment is left untouched.
    ///
    /// # Errors
    /// Any failure to open, create, size or map the object.
    pub fn open_or_create(name: &str) -> Result<Self, MappingError> {
        let name = normalize_name(name);

        let (file, origin) = match open_existing(&name)? {
            Some(file) => (file, SegmentOrigin::Attached),
            None => {
                debug!("No existing segment {}, creating a new one", name);
                match create_exclusive(&name, LINKED_MEM_SIZE)? {
                    Some(file) => (file, SegmentOrigin::Created),
                    // Publisher won the creation race.
                    None => match open_existing(&name)? {
                        Some(file) => (file, SegmentOrigin::Attached),
                        None => {
                            return Err(MappingError::Open {
                                name,
                                source: nix::Error::ENOENT,
                            });
                        }
                    },
                }
            }
        };

        let mut size = object_size(&name, &file)?;
        if size < LINKED_MEM_SIZE as u64 {
            // Creator died (or has not resized yet) between shm_open and
            // ftruncate. Growing keeps existing bytes and zero-fills the tail.
            warn!(
                "Segment {} is {} bytes, growing to {}",
                name, size, LINKED_MEM_SIZE
            );
            if let Err(source) = file.set_len(LINKED_MEM_SIZE as u64) {
                return Err(MappingError::TooSmall {
                    name,
                    actual: size,
                    expected: LINKED_MEM_SIZE,
                    source,
                });
            }
            size = LINKED_MEM_SIZE as u64;
        }

        // SAFETY: the object is at least LINKED_MEM_SIZE bytes and stays
        // mapped for the lifetime of `mmap`.
        let mut mmap = unsafe { MmapOptions::new().len(LINKED_MEM_SIZE).map_mut(&file) }
            .map_err(|source| MappingError::Map {
                name: name.clone(),
                source,
            })?;

        if origin == SegmentOrigin::Created {
            mmap.fill(0);
        }

        info!(
            "Segment {} {} ({} bytes)",
            name,
            match origin {
                SegmentOrigin::Attached => "attached",
                SegmentOrigin::Created => "created",
            },
            size
        );

        Ok(Self {
            name,
            origin,
            mmap,
            _file: file,
        })
    }

    /// Normalized segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the segment was attached or created.
    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    /// Current publisher tick.
    #[inline]
    pub fn tick(&self) -> u32 {
        // SAFETY: the mapping is page-aligned and TICK_OFFSET is 4, so the
        // read is in bounds and aligned. Volatile: another process writes it.
        unsafe { core::ptr::read_volatile(self.mmap.as_ptr().add(TICK_OFFSET) as *const u32) }
    }

    /// Copy the relayed prefix of the segment into `buf`.
    #[inline]
    pub fn snapshot(&self, buf: &mut [u8; PAYLOAD_SIZE]) {
        // SAFETY: the mapping spans LINKED_MEM_SIZE >= PAYLOAD_SIZE bytes.
        unsafe {
            core::ptr::copy_nonoverlapping(self.mmap.as_ptr(), buf.as_mut_ptr(), PAYLOAD_SIZE);
        }
    }

    /// Copy of the full record.
    pub fn read_record(&self) -> LinkedMem {
        // SAFETY: in bounds, align 1, every bit pattern is valid.
        unsafe { core::ptr::read_unaligned(self.mmap.as_ptr() as *const LinkedMem) }
    }
}

impl std::fmt::Debug for SharedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSegment")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("tick", &self.tick())
            .finish()
    }
}
