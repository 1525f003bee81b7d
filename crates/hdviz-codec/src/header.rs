// SPDX-License-Identifier: Apache-2.0

use crate::error::{CodecError, CodecErrorCode};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Vector,
    Matrix,
}

impl HeaderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "DenseVector",
            Self::Matrix => "DenseMatrix",
        }
    }
}

/// Parsed contents of a `.data.hdr` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub kind: HeaderKind,
    pub rows: usize,
    pub cols: usize,
    pub element_size: usize,
    pub row_major: bool,
    /// As written in the header, relative to the header's directory.
    pub data_file: String,
}

impl Header {
    /// Element count; saturates for headers built by hand with absurd sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Payload size in bytes, or `None` when it does not fit in `usize`.
    #[must_use]
    pub fn byte_len(&self) -> Option<usize> {
        self.rows
            .checked_mul(self.cols)
            .and_then(|n| n.checked_mul(self.element_size))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn data_path(&self, header_path: &Path) -> PathBuf {
        header_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.data_file)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, CodecError> {
        let malformed = |msg: String| CodecError::new(CodecErrorCode::Header, path, msg);
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let kind = match lines.next() {
            Some("DenseVector") => HeaderKind::Vector,
            Some("DenseMatrix") => HeaderKind::Matrix,
            Some(other) => return Err(malformed(format!("unknown container type `{other}`"))),
            None => return Err(malformed("empty header".to_string())),
        };

        let mut size: Option<(usize, usize)> = None;
        let mut element_size: Option<usize> = None;
        let mut row_major = false;
        let mut data_file: Option<String> = None;

        for line in lines {
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| malformed(format!("expected `Key: value`, got `{line}`")))?;
            let value = value.trim();
            match key.trim() {
                "Size" => size = Some(parse_size(kind, value).map_err(malformed)?),
                "ElementSize" => {
                    element_size = Some(
                        value
                            .parse::<usize>()
                            .map_err(|e| malformed(format!("bad ElementSize `{value}`: {e}")))?,
                    );
                }
                "RowMajor" => {
                    row_major = match value {
                        "true" | "1" => true,
                        "false" | "0" => false,
                        other => return Err(malformed(format!("bad RowMajor `{other}`"))),
                    };
                }
                "DataFile" => {
                    if value.is_empty() {
                        return Err(malformed("DataFile must not be empty".to_string()));
                    }
                    data_file = Some(value.to_string());
                }
                other => return Err(malformed(format!("unknown header key `{other}`"))),
            }
        }

        let (rows, cols) = size.ok_or_else(|| malformed("missing Size".to_string()))?;
        let header = Self {
            kind,
            rows,
            cols,
            element_size: element_size
                .ok_or_else(|| malformed("missing ElementSize".to_string()))?,
            row_major,
            data_file: data_file.ok_or_else(|| malformed("missing DataFile".to_string()))?,
        };
        if header.byte_len().is_none() {
            return Err(malformed(format!(
                "Size {rows} x {cols} of {}-byte elements overflows",
                header.element_size
            )));
        }
        Ok(header)
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self.kind {
            HeaderKind::Vector => format!(
                "DenseVector\nSize: {}\nElementSize: {}\nDataFile: {}\n",
                self.len(),
                self.element_size,
                self.data_file
            ),
            HeaderKind::Matrix => format!(
                "DenseMatrix\nSize: {} x {}\nElementSize: {}\nRowMajor: {}\nDataFile: {}\n",
                self.rows, self.cols, self.element_size, self.row_major, self.data_file
            ),
        }
    }
}

fn parse_size(kind: HeaderKind, value: &str) -> Result<(usize, usize), String> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad Size `{value}`: {e}"))
    };
    match kind {
        HeaderKind::Vector => Ok((parse(value)?, 1)),
        HeaderKind::Matrix => {
            let (rows, cols) = value
                .split_once('x')
                .ok_or_else(|| format!("matrix Size must be `rows x cols`, got `{value}`"))?;
            Ok((parse(rows)?, parse(cols)?))
        }
    }
}

/// Raw data file name paired with a header: `foo.data.hdr` -> `foo.data`.
#[must_use]
pub fn data_file_name(header_path: &Path) -> String {
    let name = header_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".hdr") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{name}.data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_matrix_header_with_row_major_flag() {
        let text = "DenseMatrix\nSize: 3 x 50\nElementSize: 8\nRowMajor: true\nDataFile: a.data\n";
        let header = Header::parse(text, Path::new("a.data.hdr")).expect("header");
        assert_eq!(header.kind, HeaderKind::Matrix);
        assert_eq!((header.rows, header.cols), (3, 50));
        assert!(header.row_major);
        assert_eq!(
            header.data_path(Path::new("/data/set/a.data.hdr")),
            PathBuf::from("/data/set/a.data")
        );
    }

    #[test]
    fn vector_size_is_a_single_length() {
        let text = "DenseVector\nSize: 4\nElementSize: 4\nDataFile: v.data";
        let header = Header::parse(text, Path::new("v.data.hdr")).expect("header");
        assert_eq!((header.rows, header.cols), (4, 1));
        assert_eq!(Header::parse(&header.render(), Path::new("v")).expect("reparse"), header);
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = Header::parse("DenseVector\nSize: 4\n", Path::new("v.data.hdr"))
            .expect_err("no element size");
        assert_eq!(err.code, CodecErrorCode::Header);
        assert!(err.message.contains("ElementSize"), "{err}");
        assert!(Header::parse("Tensor\n", Path::new("t")).is_err());
        assert!(Header::parse("DenseMatrix\nSize: 3\n", Path::new("m")).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let text = concat!(
            "DenseMatrix\nSize: 9223372036854775808 x 2\n",
            "ElementSize: 8\nDataFile: m.data\n"
        );
        let err = Header::parse(text, Path::new("m.data.hdr")).expect_err("overflow");
        assert_eq!(err.code, CodecErrorCode::Header);
        assert!(err.message.contains("overflows"), "{err}");

        let text = format!(
            "DenseVector\nSize: {}\nElementSize: 8\nDataFile: v.data\n",
            usize::MAX
        );
        let err = Header::parse(&text, Path::new("v.data.hdr")).expect_err("overflow");
        assert_eq!(err.code, CodecErrorCode::Header);

        let header = Header {
            kind: HeaderKind::Matrix,
            rows: usize::MAX,
            cols: 2,
            element_size: 8,
            row_major: false,
            data_file: "m.data".to_string(),
        };
        assert_eq!(header.len(), usize::MAX);
        assert_eq!(header.byte_len(), None);
    }

    #[test]
    fn data_file_name_strips_header_suffix() {
        assert_eq!(data_file_name(Path::new("x/Geom.data.hdr")), "Geom.data");
        assert_eq!(data_file_name(Path::new("plain")), "plain.data");
    }
}
