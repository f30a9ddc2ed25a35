const ALIGN: usize = 8;

/// Owned bytes whose first byte sits on an 8-byte boundary.
///
/// Header parsing requires the message start to be 8-byte aligned; a plain
/// `Vec<u8>` gives no such guarantee.
///
/// # Examples
/// ```
/// use ipcwire_core::AlignedBuf;
///
/// let buf = AlignedBuf::from_bytes(&[1, 2, 3]);
/// assert_eq!(buf.as_slice(), &[1, 2, 3]);
/// assert_eq!(buf.as_slice().as_ptr() as usize % 8, 0);
/// ```
#[derive(Debug)]
pub struct AlignedBuf {
    storage: Vec<u8>,
    start: usize,
    len: usize,
}

impl AlignedBuf {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut storage = vec![0u8; bytes.len() + ALIGN - 1];
        let start = (ALIGN - storage.as_ptr() as usize % ALIGN) % ALIGN;
        storage[start..start + bytes.len()].copy_from_slice(bytes);
        Self {
            storage,
            start,
            len: bytes.len(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.start..self.start + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// A derived clone would copy `start` into storage with a different address.
impl Clone for AlignedBuf {
    fn clone(&self) -> Self {
        Self::from_bytes(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::AlignedBuf;

    #[test]
    fn start_is_aligned_for_any_length() {
        for len in 0..32 {
            let bytes: Vec<u8> = (0..len as u8).collect();
            let buf = AlignedBuf::from_bytes(&bytes);
            assert_eq!(buf.as_slice().as_ptr() as usize % 8, 0);
            assert_eq!(buf.as_slice(), bytes.as_slice());
            assert_eq!(buf.len(), len);
        }
    }

    #[test]
    fn clone_keeps_alignment() {
        let buf = AlignedBuf::from_bytes(b"lmessage");
        let copy = buf.clone();
        assert_eq!(copy.as_slice(), b"lmessage");
        assert_eq!(copy.as_slice().as_ptr() as usize % 8, 0);
    }
}
