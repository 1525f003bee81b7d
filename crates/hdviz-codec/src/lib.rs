// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Dense vector/matrix files in the `.data.hdr` header format.
//!
//! A header is a short ASCII file naming the container kind, its shape, the
//! element width and a sibling raw data file:
//!
//! ```text
//! DenseMatrix
//! Size: 3 x 50
//! ElementSize: 8
//! RowMajor: false
//! DataFile: ps_2_crystal_0_Rs.data
//! ```
//!
//! The raw file holds little-endian elements, column-major unless the header
//! says `RowMajor: true`.

mod element;
mod error;
mod header;
mod io;
mod matrix;

pub use element::Element;
pub use error::{CodecError, CodecErrorCode};
pub use header::{data_file_name, Header, HeaderKind};
pub use io::{probe_header, read_matrix, read_vector, write_matrix, write_vector};
pub use matrix::DenseMatrix;

pub const CRATE_NAME: &str = "hdviz-codec";
