// SPDX-License-Identifier: Apache-2.0

use crate::files::HEADER_SUFFIX;
use crate::level::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 2D embedding used to place cells on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Isomap,
    Pca,
    Pca2,
}

/// File naming for one layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutFiles {
    pub cell_suffix: &'static str,
    pub extrema_prefix: &'static str,
    pub min_file: &'static str,
    pub max_file: &'static str,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 3] = [LayoutMode::Isomap, LayoutMode::Pca, LayoutMode::Pca2];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isomap => "isomap",
            Self::Pca => "pca",
            Self::Pca2 => "pca2",
        }
    }

    #[must_use]
    pub const fn files(self) -> LayoutFiles {
        match self {
            Self::Isomap => LayoutFiles {
                cell_suffix: "isolayout",
                extrema_prefix: "IsoExtremaLayout",
                min_file: "IsoMin.data.hdr",
                max_file: "IsoMax.data.hdr",
            },
            Self::Pca => LayoutFiles {
                cell_suffix: "layout",
                extrema_prefix: "ExtremaLayout",
                min_file: "PCAMin.data.hdr",
                max_file: "PCAMax.data.hdr",
            },
            Self::Pca2 => LayoutFiles {
                cell_suffix: "pca2layout",
                extrema_prefix: "PCA2ExtremaLayout",
                min_file: "PCA2Min.data.hdr",
                max_file: "PCA2Max.data.hdr",
            },
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "isomap" | "iso" => Ok(Self::Isomap),
            "pca" => Ok(Self::Pca),
            "pca2" => Ok(Self::Pca2),
            other => Err(ValidationError(format!(
                "unrecognized layout mode `{other}` (expected isomap, pca or pca2)"
            ))),
        }
    }
}

impl LayoutFiles {
    #[must_use]
    pub fn cell_file(&self, level: i32, cell: usize) -> String {
        format!("ps_{level}_crystal_{cell}_{}{HEADER_SUFFIX}", self.cell_suffix)
    }

    #[must_use]
    pub fn extrema_file(&self, level: i32) -> String {
        format!("{}_{level}{HEADER_SUFFIX}", self.extrema_prefix)
    }
}

impl Display for LayoutMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Wire discriminants used by renderers that pass the mode as a byte.
impl TryFrom<u8> for LayoutMode {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Isomap),
            1 => Ok(Self::Pca),
            2 => Ok(Self::Pca2),
            other => Err(ValidationError(format!(
                "unrecognized layout mode discriminant {other}"
            ))),
        }
    }
}
