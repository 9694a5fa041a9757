//! One-shot neighbor offset table for spatial reuse.
//!
//! Spatial resampling passes walk this table with a per-frame cursor, so the
//! pattern has to stay fixed once written. The table moves from
//! `Uninitialized` to `Initialized` exactly once; every later
//! [`NeighborOffsetTable::ensure_initialized`] call is a no-op, whatever count
//! it is given. A new scene budget gets a new table.
//!
//! The check-and-set takes `&mut self`. Hosts that drive setup from more
//! than one thread must put the table behind a `Mutex`.

use glam::Vec2;

use crate::error::{PreconditionViolation, ResourceError};

/// Offsets are stored as two `RG8Snorm` bytes.
pub const BYTES_PER_OFFSET: u64 = 2;

/// Produces the offset pattern.
pub trait NeighborOffsetGenerator {
    /// Fill every slot of `offsets`.
    fn fill(&self, offsets: &mut [[i8; 2]]);
}

/// R2 low-discrepancy points inside a disc, scaled to signed bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2NeighborOffsets;

impl R2NeighborOffsets {
    /// Offset range: a disc of radius 0.5 maps to +-125.
    const SCALE: f32 = 250.0;
    /// `1 / g` where `g` is the plastic number.
    const PHI2: f32 = 1.0 / 1.324_717_957_244_7;
}

impl NeighborOffsetGenerator for R2NeighborOffsets {
    #[allow(clippy::cast_possible_truncation)]
    fn fill(&self, offsets: &mut [[i8; 2]]) {
        let step = Vec2::new(Self::PHI2, Self::PHI2 * Self::PHI2);
        let center = Vec2::splat(0.5);
        let mut point = center;

        for slot in offsets.iter_mut() {
            let offset = loop {
                point += step;
                if point.x >= 1.0 {
                    point.x -= 1.0;
                }
                if point.y >= 1.0 {
                    point.y -= 1.0;
                }
                let offset = point - center;
                if offset.length_squared() <= 0.25 {
                    break offset;
                }
            };
            let scaled = offset * Self::SCALE;
            *slot = [scaled.x as i8, scaled.y as i8];
        }
    }
}

/// Destination of the offset bytes.
pub trait OffsetSink {
    /// Bytes the destination can hold.
    fn capacity(&self) -> u64;
    /// Write `bytes` at offset 0.
    fn write(&mut self, bytes: &[u8]);
}

/// Enqueues the upload on a [`wgpu::Queue`]; it lands with the next submit.
pub struct QueueUpload<'a> {
    queue: &'a wgpu::Queue,
    buffer: &'a wgpu::Buffer,
}

impl<'a> QueueUpload<'a> {
    /// Upload into `buffer` through `queue`.
    #[must_use]
    pub fn new(queue: &'a wgpu::Queue, buffer: &'a wgpu::Buffer) -> Self {
        Self { queue, buffer }
    }
}

impl OffsetSink for QueueUpload<'_> {
    fn capacity(&self) -> u64 {
        self.buffer.size()
    }

    fn write(&mut self, bytes: &[u8]) {
        let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
        if bytes.len() % align == 0 {
            self.queue.write_buffer(self.buffer, 0, bytes);
        } else {
            // write_buffer wants whole words
            let mut padded = bytes.to_vec();
            padded.resize(bytes.len().next_multiple_of(align), 0);
            self.queue.write_buffer(self.buffer, 0, &padded);
        }
    }
}

/// Result of [`NeighborOffsetTable::ensure_initialized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The table was generated and written by this call.
    Populated,
    /// The table already existed; nothing was written.
    AlreadyInitialized,
}

#[derive(Debug, Default)]
enum TableState {
    #[default]
    Uninitialized,
    Initialized { count: u32, offsets: Vec<[i8; 2]> },
}

/// The neighbor offset table and its one-way initialization flag.
#[derive(Debug, Default)]
pub struct NeighborOffsetTable {
    state: TableState,
}

impl NeighborOffsetTable {
    /// An empty, uninitialized table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the table has been written.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        matches!(self.state, TableState::Initialized { .. })
    }

    /// Offsets written by the first successful call.
    #[must_use]
    pub fn offsets(&self) -> Option<&[[i8; 2]]> {
        match &self.state {
            TableState::Uninitialized => None,
            TableState::Initialized { offsets, .. } => Some(offsets.as_slice()),
        }
    }

    /// Number of offsets in the table.
    #[must_use]
    pub const fn count(&self) -> Option<u32> {
        match self.state {
            TableState::Uninitialized => None,
            TableState::Initialized { count, .. } => Some(count),
        }
    }

    /// Raw bytes as uploaded (two per offset).
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.offsets().map(bytemuck::cast_slice)
    }

    /// Generate `count` offsets and write them to `sink`, unless the table
    /// already exists.
    ///
    /// # Errors
    ///
    /// On the first call only: [`ResourceError::Precondition`] if `count` is
    /// zero or the offsets do not fit in `sink`. The table stays
    /// uninitialized, so a corrected call may follow.
    pub fn ensure_initialized(
        &mut self,
        sink: &mut impl OffsetSink,
        count: u32,
        generator: &impl NeighborOffsetGenerator,
    ) -> Result<InitOutcome, ResourceError> {
        if self.is_initialized() {
            log::trace!("neighbor offsets already initialized, ignoring count {count}");
            return Ok(InitOutcome::AlreadyInitialized);
        }
        if count == 0 {
            return Err(PreconditionViolation::Zero {
                what: "neighbor offset count",
            }
            .into());
        }
        let capacity = sink.capacity();
        if u64::from(count) * BYTES_PER_OFFSET > capacity {
            return Err(
                PreconditionViolation::NeighborOffsetCapacity { count, capacity }.into(),
            );
        }

        let mut offsets = vec![[0i8; 2]; count as usize];
        generator.fill(&mut offsets);
        sink.write(bytemuck::cast_slice(&offsets));
        log::info!("initialized {count} neighbor offsets");

        self.state = TableState::Initialized { count, offsets };
        Ok(InitOutcome::Populated)
    }
}
