// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Inclusive range of persistence levels available in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelRange {
    pub min: i32,
    pub max: i32,
}

impl LevelRange {
    pub fn new(min: i32, max: i32) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError(format!(
                "persistence start level {min} exceeds max level {max}"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn contains(&self, level: i32) -> bool {
        level >= self.min && level <= self.max
    }

    pub fn check(&self, level: i32) -> Result<i32, ValidationError> {
        if self.contains(level) {
            Ok(level)
        } else {
            Err(ValidationError(format!(
                "persistence level {level} outside [{}, {}]",
                self.min, self.max
            )))
        }
    }

    /// Levels from coarsest to finest.
    pub fn iter(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }

    #[must_use]
    pub fn len(&self) -> usize {
        (i64::from(self.max) - i64::from(self.min) + 1) as usize
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Display for LevelRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
