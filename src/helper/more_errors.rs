use super::unique_id_gen::UniqueId;
use std::{error, fmt, io};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    InvalidId { raw_id: UniqueId },
    /// The id refers to a slot that has since been recycled
    StaleId { raw_id: UniqueId, generation: u32 },
}
impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidId { raw_id } => write!(f, "invalid id {}", raw_id),
            Self::StaleId { raw_id, generation } => write!(
                f,
                "id {} generation {} no longer refers to a live entry",
                raw_id, generation
            ),
        }
    }
}
impl error::Error for CollectionError {}

#[derive(Debug)]
pub enum IoError {
    CreateDirectoryFailed(String, io::Error),
    WriteFileFailed(String, io::Error),
    ReadFileFailed(String, io::Error),
    FileNotFound(String),
    /// Save file is shorter than the precursor bytes or was written by something else
    UnrecognizedFile(String),
    SerializeFailed(bincode::Error),
    DeserializeFailed(bincode::Error),
}
impl IoError {
    pub fn read_file_error(io_error: io::Error, file_path: String) -> Self {
        match io_error.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound(file_path),
            _ => Self::ReadFileFailed(file_path, io_error),
        }
    }
}
impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CreateDirectoryFailed(dir, _) => write!(f, "failed to create directory {}", dir),
            Self::WriteFileFailed(path, _) => write!(f, "failed to write file {}", path),
            Self::ReadFileFailed(path, _) => write!(f, "failed to read file {}", path),
            Self::FileNotFound(path) => write!(f, "file {} not found", path),
            Self::UnrecognizedFile(path) => write!(f, "{} is not a recognized save file", path),
            Self::SerializeFailed(_) => write!(f, "failed to serialize save state"),
            Self::DeserializeFailed(_) => write!(f, "failed to deserialize save state"),
        }
    }
}
impl error::Error for IoError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::CreateDirectoryFailed(_, e)
            | Self::WriteFileFailed(_, e)
            | Self::ReadFileFailed(_, e) => Some(e),
            Self::SerializeFailed(e) | Self::DeserializeFailed(e) => Some(e),
            Self::FileNotFound(_) | Self::UnrecognizedFile(_) => None,
        }
    }
}
