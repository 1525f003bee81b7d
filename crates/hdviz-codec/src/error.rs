// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecErrorCode {
    Io,
    Header,
    ElementSize,
    ShortRead,
    Shape,
}

impl CodecErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io_error",
            Self::Header => "malformed_header",
            Self::ElementSize => "unsupported_element_size",
            Self::ShortRead => "short_read",
            Self::Shape => "shape_mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub code: CodecErrorCode,
    pub path: PathBuf,
    pub message: String,
}

impl CodecError {
    #[must_use]
    pub fn new(code: CodecErrorCode, path: &Path, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.code.as_str(),
            self.path.display(),
            self.message
        )
    }
}

impl std::error::Error for CodecError {}
