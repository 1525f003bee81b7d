// SPDX-License-Identifier: Apache-2.0

use hdviz_codec::CodecError;
use hdviz_model::ValidationError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StoreErrorCode {
    OutOfRange,
    InvalidArgument,
    DataLoad,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfRange => "out_of_range",
            Self::InvalidArgument => "invalid_argument",
            Self::DataLoad => "data_load_error",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::OutOfRange, message)
    }

    #[must_use]
    pub fn data_load(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::DataLoad, message)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::data_load(value.to_string())
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::new(StoreErrorCode::InvalidArgument, value.0)
    }
}
