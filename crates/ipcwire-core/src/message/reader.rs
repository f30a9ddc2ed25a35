use crate::wire::error::WireError;

use super::layout;

/// Bounds-checked access to the fixed part of a message header.
pub struct HeaderReader<'a> {
    stream: &'a [u8],
}

impl<'a> HeaderReader<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self { stream }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), WireError> {
        if self.stream.len() < needed {
            return Err(WireError::TooSmall {
                needed,
                actual: self.stream.len(),
            });
        }
        Ok(())
    }

    pub fn require_aligned(&self) -> Result<(), WireError> {
        if (self.stream.as_ptr() as usize) % layout::MESSAGE_ALIGN != 0 {
            return Err(WireError::BadAlignment);
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, WireError> {
        self.stream
            .get(offset)
            .copied()
            .ok_or(WireError::TooSmall {
                needed: offset + 1,
                actual: self.stream.len(),
            })
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, WireError> {
        let bytes = self.read_slice(range)?;
        let bytes: [u8; 4] = bytes.try_into().map_err(|_| WireError::TooSmall {
            needed: 4,
            actual: bytes.len(),
        })?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], WireError> {
        self.stream.get(range.clone()).ok_or(WireError::TooSmall {
            needed: range.end,
            actual: self.stream.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HeaderReader;
    use crate::wire::error::WireError;

    #[test]
    fn require_len_reports_sizes() {
        let stream = [0u8; 3];
        let reader = HeaderReader::new(&stream);
        assert_eq!(
            reader.require_len(16),
            Err(WireError::TooSmall {
                needed: 16,
                actual: 3
            })
        );
    }

    #[test]
    fn reads_little_endian_u32() {
        let stream = [0u8, 0, 0, 0, 0x78, 0x56, 0x34, 0x12];
        let reader = HeaderReader::new(&stream);
        assert_eq!(reader.read_u32_le(4..8).unwrap(), 0x1234_5678);
        assert!(reader.read_u32_le(6..10).is_err());
    }
}
