//! Raw log input and its resolved encoding

use crate::encoding::{CharsetDetector, EncodingResolver, ResolvedEncoding};
use crate::error::{DiagnoseError, DiagnoseResult};
use crate::lines::LineIndex;
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};

/// Immutable handle on a log's bytes and how they were decoded
#[derive(Debug, Clone)]
pub struct LogSource {
    path: PathBuf,
    raw_bytes: Vec<u8>,
    encoding: ResolvedEncoding,
    decode_errors: usize,
}

impl LogSource {
    /// Read a log file and build its line index
    pub fn open<D: CharsetDetector>(
        path: impl AsRef<Path>,
        explicit: Option<&'static Encoding>,
        resolver: &EncodingResolver<D>,
    ) -> DiagnoseResult<(Self, LineIndex)> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DiagnoseError::read(path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read log");
        Ok(Self::from_bytes(path, bytes, explicit, resolver))
    }

    /// Resolve, decode and index in-memory log bytes
    ///
    /// `path` is informational only.
    pub fn from_bytes<D: CharsetDetector>(
        path: impl Into<PathBuf>,
        raw_bytes: Vec<u8>,
        explicit: Option<&'static Encoding>,
        resolver: &EncodingResolver<D>,
    ) -> (Self, LineIndex) {
        let encoding = resolver.resolve(&raw_bytes, explicit);
        let (text, decode_errors) = encoding.decode(&raw_bytes);
        if decode_errors > 0 {
            tracing::warn!(
                encoding = encoding.name(),
                decode_errors,
                "log decoded with replacement characters"
            );
        }
        let index = LineIndex::new(&text);
        let source = Self {
            path: path.into(),
            raw_bytes,
            encoding,
            decode_errors,
        };
        (source, index)
    }

    /// Path the log was read from
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Undecoded content
    #[inline]
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Encoding used to decode the content
    #[inline]
    #[must_use]
    pub fn encoding(&self) -> ResolvedEncoding {
        self.encoding
    }

    /// Replacement characters substituted while decoding
    #[inline]
    #[must_use]
    pub fn decode_errors(&self) -> usize {
        self.decode_errors
    }
}
