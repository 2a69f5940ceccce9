/// Sink for big-endian frame bytes.
pub trait ByteWrite {
    fn write_byte(&mut self, byte: u8);
    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_byte(*byte);
        }
    }
    fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }
}

/// A writer with a fixed byte budget.
///
/// Callers measure with [`FrameWriter::counter`] first and only write once the
/// counter reports that the whole record fits, so a `FrameWriter` never holds
/// a partially written record.
///
/// # Panics
/// Writing past the capacity panics.
pub struct FrameWriter {
    buffer: Vec<u8>,
    capacity: usize,
}

impl FrameWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn counter(&self) -> ByteCounter {
        ByteCounter::new(self.bytes_free())
    }

    pub fn bytes_free(&self) -> usize {
        self.capacity - self.buffer.len()
    }

    pub fn bytes_written(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Hands back everything written so far and resets the writer to empty,
    /// keeping its capacity.
    pub fn flush(&mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.capacity);
        std::mem::swap(&mut out, &mut self.buffer);
        out
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl ByteWrite for FrameWriter {
    fn write_byte(&mut self, byte: u8) {
        if self.buffer.len() >= self.capacity {
            panic!("FrameWriter overflow! Measure with counter() before writing");
        }
        self.buffer.push(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if bytes.len() > self.bytes_free() {
            panic!("FrameWriter overflow! Measure with counter() before writing");
        }
        self.buffer.extend_from_slice(bytes);
    }
}

/// Dry-run writer which only measures.
pub struct ByteCounter {
    start_free: usize,
    current: usize,
}

impl ByteCounter {
    pub fn new(start_free: usize) -> Self {
        Self {
            start_free,
            current: 0,
        }
    }

    pub fn overflowed(&self) -> bool {
        self.current > self.start_free
    }

    pub fn bytes_needed(&self) -> usize {
        self.current
    }
}

impl ByteWrite for ByteCounter {
    fn write_byte(&mut self, _: u8) {
        self.current += 1;
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.current += bytes.len();
    }
}
