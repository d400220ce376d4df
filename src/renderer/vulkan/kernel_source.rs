use ash::util::read_spv;
use std::{error, fmt, io::Cursor, path::Path};

const SPIRV_MAGIC: u32 = 0x0723_0203;
const SPIRV_HEADER_WORDS: usize = 5;
const OP_ENTRY_POINT: u32 = 15;
const EXECUTION_MODEL_GL_COMPUTE: u32 = 5;

/// A SPIR-V module loaded from disk, kept as words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSource {
    words: Vec<u32>,
}

impl KernelSource {
    /// Accepts either byte order. Fails on a missing header or an unknown magic number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KernelSourceError> {
        let words = read_spv(&mut Cursor::new(bytes))
            .map_err(|e| KernelSourceError::Invalid(e.to_string()))?;
        if words.len() < SPIRV_HEADER_WORDS {
            return Err(KernelSourceError::Truncated(bytes.len()));
        }
        if words[0] != SPIRV_MAGIC {
            return Err(KernelSourceError::BadMagic(words[0]));
        }
        Ok(Self { words })
    }

    pub fn from_file(path: &Path) -> Result<Self, KernelSourceError> {
        let bytes = std::fs::read(path).map_err(|e| KernelSourceError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Names of the compute entry points declared by the module
    pub fn compute_entry_points(&self) -> Vec<String> {
        let mut entry_points = Vec::new();
        let mut index = SPIRV_HEADER_WORDS;
        while index < self.words.len() {
            let instruction = self.words[index];
            let word_count = (instruction >> 16) as usize;
            let opcode = instruction & 0xFFFF;
            if word_count == 0 || index + word_count > self.words.len() {
                break;
            }
            // OpEntryPoint: model, function id, literal name, interface ids...
            if opcode == OP_ENTRY_POINT
                && word_count > 3
                && self.words[index + 1] == EXECUTION_MODEL_GL_COMPUTE
            {
                entry_points.push(decode_literal_string(&self.words[index + 3..index + word_count]));
            }
            index += word_count;
        }
        entry_points
    }

    pub fn has_compute_entry_point(&self, name: &str) -> bool {
        self.compute_entry_points().iter().any(|e| e == name)
    }
}

/// Literal strings are nul terminated UTF-8 packed little end first into words
fn decode_literal_string(words: &[u32]) -> String {
    let mut bytes = Vec::new();
    'words: for word in words {
        for byte in word.to_le_bytes() {
            if byte == 0 {
                break 'words;
            }
            bytes.push(byte);
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSourceError {
    Read { path: String, reason: String },
    /// Rejected by the SPIR-V reader, e.g. a length that isn't whole words
    Invalid(String),
    Truncated(usize),
    BadMagic(u32),
}

impl fmt::Display for KernelSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, reason } => write!(f, "failed to read {}: {}", path, reason),
            Self::Invalid(reason) => write!(f, "invalid SPIR-V module: {}", reason),
            Self::Truncated(len) => write!(f, "{} bytes is not a valid SPIR-V module", len),
            Self::BadMagic(magic) => write!(f, "bad SPIR-V magic number {:#010x}", magic),
        }
    }
}

impl error::Error for KernelSourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_string(s: &str) -> Vec<u32> {
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        while bytes.len() % 4 != 0 {
            bytes.push(0);
        }
        bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    fn module_with_entry_points(names: &[(u32, &str)]) -> Vec<u8> {
        let mut words = vec![SPIRV_MAGIC, 0x0001_0300, 0, 100, 0];
        for (model, name) in names {
            let name_words = encode_string(name);
            let word_count = 3 + name_words.len() as u32;
            words.push((word_count << 16) | OP_ENTRY_POINT);
            words.push(*model);
            words.push(1);
            words.extend(name_words);
        }
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn finds_compute_entry_points() {
        let bytes = module_with_entry_points(&[
            (EXECUTION_MODEL_GL_COMPUTE, "CSMain"),
            (4, "FragMain"),
            (EXECUTION_MODEL_GL_COMPUTE, "Blend"),
        ]);
        let source = KernelSource::from_bytes(&bytes).unwrap();
        assert_eq!(source.compute_entry_points(), vec!["CSMain", "Blend"]);
        assert!(source.has_compute_entry_point("CSMain"));
        assert!(!source.has_compute_entry_point("FragMain"));
    }

    #[test]
    fn big_endian_modules_are_swapped() {
        let little = module_with_entry_points(&[(EXECUTION_MODEL_GL_COMPUTE, "CSMain")]);
        let big: Vec<u8> = little
            .chunks_exact(4)
            .flat_map(|c| [c[3], c[2], c[1], c[0]])
            .collect();
        let source = KernelSource::from_bytes(&big).unwrap();
        assert!(source.has_compute_entry_point("CSMain"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            KernelSource::from_bytes(&[1, 2, 3]),
            Err(KernelSourceError::Invalid(_))
        ));
        assert_eq!(
            KernelSource::from_bytes(&[0; 8]),
            Err(KernelSourceError::Truncated(8))
        );
        assert!(matches!(
            KernelSource::from_bytes(&[0xAB; 20]),
            Err(KernelSourceError::BadMagic(_))
        ));
    }
}
