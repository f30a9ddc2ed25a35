use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::message::layout::MAX_MESSAGE_LEN;

use super::{AlignedBuf, SourceError};

/// A captured message loaded from disk into an aligned buffer.
#[derive(Debug, Clone)]
pub struct MessageFile {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    buf: AlignedBuf,
}

impl MessageFile {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let metadata = fs::metadata(path)?;
        if metadata.len() > MAX_MESSAGE_LEN as u64 {
            return Err(SourceError::TooLarge {
                len: metadata.len(),
                max: MAX_MESSAGE_LEN,
            });
        }
        let bytes = fs::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
            buf: AlignedBuf::from_bytes(&bytes),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::MessageFile;
    use crate::message::layout::MAX_MESSAGE_LEN;
    use crate::source::SourceError;

    #[test]
    fn open_reads_whole_file_aligned() {
        let dir = std::env::temp_dir().join(format!("ipcwire-source-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("message.bin");
        fs::write(&path, [b'l', 1, 0, 1]).unwrap();

        let file = MessageFile::open(&path).unwrap();
        assert_eq!(file.bytes(), &[b'l', 1, 0, 1]);
        assert_eq!(file.bytes().as_ptr() as usize % 8, 0);
        assert!(file.modified.is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let dir = std::env::temp_dir().join(format!("ipcwire-oversized-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("huge.bin");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_MESSAGE_LEN as u64 + 1).unwrap();
        drop(file);

        let err = MessageFile::open(&path).unwrap_err();
        assert!(matches!(
            err,
            SourceError::TooLarge { len, max } if len == MAX_MESSAGE_LEN as u64 + 1 && max == MAX_MESSAGE_LEN
        ));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MessageFile::open(std::path::Path::new("does/not/exist.bin")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
