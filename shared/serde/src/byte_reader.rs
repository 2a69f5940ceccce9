use crate::SerdeErr;

/// Cursor over a received frame buffer.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_remaining() == 0
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u64(&mut self) -> Result<u64, SerdeErr> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    /// Reads a u64 length field and converts it to `usize`.
    pub fn read_length(&mut self) -> Result<usize, SerdeErr> {
        let length = self.read_u64()?;
        usize::try_from(length).map_err(|_| SerdeErr::LengthOverflow { length })
    }

    pub fn peek_u64(&self) -> Result<u64, SerdeErr> {
        let available = self.bytes_remaining();
        if available < 8 {
            return Err(SerdeErr::UnexpectedEnd {
                needed: 8,
                available,
            });
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.buffer[self.position..self.position + 8]);
        Ok(u64::from_be_bytes(raw))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        let available = self.bytes_remaining();
        if count > available {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                available,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }
}
