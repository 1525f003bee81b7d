// SPDX-License-Identifier: Apache-2.0

use crate::element::Element;
use crate::error::{CodecError, CodecErrorCode};
use crate::header::{data_file_name, Header, HeaderKind};
use crate::matrix::DenseMatrix;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Reads and parses a header without touching its data file.
pub fn probe_header(header_path: &Path) -> Result<Header, CodecError> {
    let text = fs::read_to_string(header_path)
        .map_err(|e| CodecError::new(CodecErrorCode::Io, header_path, e.to_string()))?;
    Header::parse(&text, header_path)
}

pub fn read_vector<T: Element>(header_path: &Path) -> Result<Vec<T>, CodecError> {
    let header = probe_header(header_path)?;
    if header.kind != HeaderKind::Vector {
        return Err(CodecError::new(
            CodecErrorCode::Header,
            header_path,
            format!("expected DenseVector, found {}", header.kind.as_str()),
        ));
    }
    read_elements(header_path, &header)
}

pub fn read_matrix<T: Element>(header_path: &Path) -> Result<DenseMatrix<T>, CodecError> {
    let header = probe_header(header_path)?;
    if header.kind != HeaderKind::Matrix {
        return Err(CodecError::new(
            CodecErrorCode::Header,
            header_path,
            format!("expected DenseMatrix, found {}", header.kind.as_str()),
        ));
    }
    let values = read_elements::<T>(header_path, &header)?;
    let matrix = if header.row_major {
        DenseMatrix::from_row_major(header.rows, header.cols, &values)
    } else {
        DenseMatrix::from_column_major(header.rows, header.cols, values)
    };
    matrix.ok_or_else(|| {
        CodecError::new(
            CodecErrorCode::Shape,
            header_path,
            "element count does not match declared size",
        )
    })
}

pub fn write_vector<T: Element>(header_path: &Path, values: &[T]) -> Result<(), CodecError> {
    let header = Header {
        kind: HeaderKind::Vector,
        rows: values.len(),
        cols: 1,
        element_size: T::SIZE,
        row_major: false,
        data_file: data_file_name(header_path),
    };
    write_elements(header_path, &header, values)
}

pub fn write_matrix<T: Element>(
    header_path: &Path,
    matrix: &DenseMatrix<T>,
) -> Result<(), CodecError> {
    let header = Header {
        kind: HeaderKind::Matrix,
        rows: matrix.rows(),
        cols: matrix.cols(),
        element_size: T::SIZE,
        row_major: false,
        data_file: data_file_name(header_path),
    };
    write_elements(header_path, &header, matrix.as_slice())
}

fn read_elements<T: Element>(header_path: &Path, header: &Header) -> Result<Vec<T>, CodecError> {
    if !T::accepts(header.element_size) {
        return Err(CodecError::new(
            CodecErrorCode::ElementSize,
            header_path,
            format!(
                "cannot decode {}-byte elements as {}",
                header.element_size,
                T::NAME
            ),
        ));
    }
    let expected = header.byte_len().ok_or_else(|| {
        CodecError::new(
            CodecErrorCode::Header,
            header_path,
            format!(
                "Size {} x {} of {}-byte elements overflows",
                header.rows, header.cols, header.element_size
            ),
        )
    })?;
    let data_path = header.data_path(header_path);
    let bytes = fs::read(&data_path)
        .map_err(|e| CodecError::new(CodecErrorCode::Io, &data_path, e.to_string()))?;
    if bytes.len() < expected {
        return Err(CodecError::new(
            CodecErrorCode::ShortRead,
            &data_path,
            format!("expected {expected} bytes, found {}", bytes.len()),
        ));
    }
    if bytes.len() > expected {
        return Err(CodecError::new(
            CodecErrorCode::Header,
            &data_path,
            format!(
                "data file holds {} trailing bytes beyond declared size",
                bytes.len() - expected
            ),
        ));
    }
    Ok(bytes
        .chunks_exact(header.element_size.max(1))
        .map(T::decode)
        .collect())
}

fn write_elements<T: Element>(
    header_path: &Path,
    header: &Header,
    values: &[T],
) -> Result<(), CodecError> {
    let mut payload = Vec::with_capacity(values.len() * T::SIZE);
    for v in values {
        v.encode(&mut payload);
    }
    write_and_sync(&header.data_path(header_path), &payload)?;
    write_and_sync(header_path, header.render().as_bytes())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let mut file =
        File::create(path).map_err(|e| CodecError::new(CodecErrorCode::Io, path, e.to_string()))?;
    file.write_all(bytes)
        .map_err(|e| CodecError::new(CodecErrorCode::Io, path, e.to_string()))?;
    file.sync_all()
        .map_err(|e| CodecError::new(CodecErrorCode::Io, path, e.to_string()))
}
