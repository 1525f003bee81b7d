// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HEADER_SUFFIX: &str = ".data.hdr";
pub const DEFAULT_PERSISTENCE_FILE: &str = "Persistence.data.hdr";
pub const DEFAULT_PERSISTENCE_START_FILE: &str = "PersistenceStart.data.hdr";
pub const DEFAULT_GEOMETRY_FILE: &str = "Geom.data.hdr";
pub const DEFAULT_NAMES_FILE: &str = "names.txt";

/// Names of the dataset-wide files read once when a dataset is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetFiles {
    pub persistence: String,
    pub persistence_start: String,
    pub geometry: String,
    pub names: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            persistence: DEFAULT_PERSISTENCE_FILE.to_string(),
            persistence_start: DEFAULT_PERSISTENCE_START_FILE.to_string(),
            geometry: DEFAULT_GEOMETRY_FILE.to_string(),
            names: DEFAULT_NAMES_FILE.to_string(),
        }
    }
}

impl DatasetFiles {
    #[must_use]
    pub fn persistence_path(&self, root: &Path) -> PathBuf {
        root.join(&self.persistence)
    }

    #[must_use]
    pub fn persistence_start_path(&self, root: &Path) -> PathBuf {
        root.join(&self.persistence_start)
    }

    #[must_use]
    pub fn geometry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.geometry)
    }

    #[must_use]
    pub fn names_path(&self, root: &Path) -> PathBuf {
        root.join(&self.names)
    }
}

#[must_use]
pub fn crystals_file(level: i32) -> String {
    format!("Crystals_{level}{HEADER_SUFFIX}")
}

#[must_use]
pub fn extrema_values_file(level: i32) -> String {
    format!("ExtremaValues_{level}{HEADER_SUFFIX}")
}

#[must_use]
pub fn extrema_widths_file(level: i32) -> String {
    format!("ExtremaWidths_{level}{HEADER_SUFFIX}")
}

/// Per-cell arrays that do not depend on the layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellArray {
    Mean,
    Gradient,
    Variance,
    Color,
    Width,
    Density,
}

impl CellArray {
    pub const ALL: [CellArray; 6] = [
        CellArray::Mean,
        CellArray::Gradient,
        CellArray::Variance,
        CellArray::Color,
        CellArray::Width,
        CellArray::Density,
    ];

    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Mean => "Rs",
            Self::Gradient => "gradRs",
            Self::Variance => "Svar",
            Self::Color => "fmean",
            Self::Width => "mdists",
            Self::Density => "spdf",
        }
    }

    #[must_use]
    pub fn file(self, level: i32, cell: usize) -> String {
        format!("ps_{level}_crystal_{cell}_{}{HEADER_SUFFIX}", self.suffix())
    }
}
