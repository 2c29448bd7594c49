//! Decoding of line records into text rows

use textline_core::TextRow;
use tracing::trace;

/// Growable byte buffer owned by one partition's decode loop
///
/// Capacity only grows, and each growth allocates exactly the requested
/// length.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
    grow_count: usize,
}

impl ScratchBuffer {
    /// Create a buffer with the given starting capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
            grow_count: 0,
        }
    }

    /// Current capacity in bytes
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Number of times the buffer has been reallocated
    pub fn grow_count(&self) -> usize {
        self.grow_count
    }

    /// Copy `data` into the front of the buffer, growing it if needed
    fn fill(&mut self, data: &[u8]) -> &[u8] {
        if data.len() > self.bytes.len() {
            trace!(from = self.bytes.len(), to = data.len(), "growing scratch buffer");
            self.bytes = vec![0; data.len()];
            self.grow_count += 1;
        }

        let target = &mut self.bytes[..data.len()];
        target.copy_from_slice(data);
        target
    }
}

/// Turns line records into rows, reusing one scratch buffer
///
/// Line bytes are copied because the reader may overwrite its record buffer
/// on the next read. The returned row borrows the decoder, so it cannot
/// outlive the next decode.
#[derive(Debug, Default)]
pub struct RowDecoder {
    scratch: ScratchBuffer,
}

impl RowDecoder {
    /// Create a decoder with an empty scratch buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder whose scratch buffer starts at `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: ScratchBuffer::with_capacity(capacity),
        }
    }

    /// Decode one line record
    pub fn decode(&mut self, line: &[u8]) -> TextRow<'_> {
        TextRow::new(self.scratch.fill(line))
    }

    /// The decoder's scratch buffer
    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }
}
