//! File input, isolated from the pure decoding layers.

mod aligned;
mod file;

pub use aligned::AlignedBuf;
pub use file::MessageFile;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("message file is {len} bytes, larger than the {max} byte limit")]
    TooLarge { len: u64, max: usize },
}
