// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Domain model for Morse-Smale level datasets.
//!
//! Everything here is pure: no I/O, no logging. The store crate builds on
//! these types to locate and normalize the per-level array files.

mod color;
mod files;
mod layout;
mod level;

pub use color::{
    ColorMapper, ColorStop, Rgba, DENSITY_PALETTE_BLUE, DENSITY_PALETTE_GREEN,
    DENSITY_PALETTE_RED, VALUE_PALETTE_BLUE, VALUE_PALETTE_GREEN, VALUE_PALETTE_RED,
};
pub use files::{
    crystals_file, extrema_values_file, extrema_widths_file, CellArray, DatasetFiles,
    DEFAULT_GEOMETRY_FILE, DEFAULT_NAMES_FILE, DEFAULT_PERSISTENCE_FILE,
    DEFAULT_PERSISTENCE_START_FILE, HEADER_SUFFIX,
};
pub use layout::{LayoutFiles, LayoutMode};
pub use level::{LevelRange, ValidationError};

pub const CRATE_NAME: &str = "hdviz-model";
