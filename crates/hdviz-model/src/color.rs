// SPDX-License-Identifier: Apache-2.0

use crate::level::ValidationError;
use serde::{Deserialize, Serialize};

/// Start, mid and end channel values of the diverging value palette.
pub const VALUE_PALETTE_RED: [f64; 3] = [0.0, 204.0 / 255.0, 210.0 / 255.0];
pub const VALUE_PALETTE_GREEN: [f64; 3] = [102.0 / 255.0, 204.0 / 255.0, 41.0 / 255.0];
pub const VALUE_PALETTE_BLUE: [f64; 3] = [204.0 / 255.0, 0.0, 5.0 / 255.0];

/// White to black through mid gray.
pub const DENSITY_PALETTE_RED: [f64; 3] = [1.0, 0.5, 0.0];
pub const DENSITY_PALETTE_GREEN: [f64; 3] = [1.0, 0.5, 0.0];
pub const DENSITY_PALETTE_BLUE: [f64; 3] = [1.0, 0.5, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn opaque(rgb: [f64; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorStop {
    pub fraction: f64,
    pub rgb: [f64; 3],
}

/// Piecewise-linear map from a scalar range onto colors.
///
/// Stops are placed at fractions of `[min, max]`; values outside the range
/// take the color of the nearest end stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorMapper {
    min: f64,
    max: f64,
    stops: Vec<ColorStop>,
}

impl ColorMapper {
    /// Grayscale map from black at `min` to white at `max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            stops: vec![
                ColorStop {
                    fraction: 0.0,
                    rgb: [0.0; 3],
                },
                ColorStop {
                    fraction: 1.0,
                    rgb: [1.0; 3],
                },
            ],
        }
    }

    /// Three stops at fractions 0, 0.5 and 1, given channel by channel as
    /// `[start, mid, end]`.
    #[must_use]
    pub fn with_channels(mut self, red: [f64; 3], green: [f64; 3], blue: [f64; 3]) -> Self {
        self.stops = [0.0, 0.5, 1.0]
            .iter()
            .enumerate()
            .map(|(i, fraction)| ColorStop {
                fraction: *fraction,
                rgb: [red[i], green[i], blue[i]],
            })
            .collect();
        self
    }

    pub fn with_stops(mut self, stops: Vec<ColorStop>) -> Result<Self, ValidationError> {
        if stops.is_empty() {
            return Err(ValidationError("color map needs at least one stop".to_string()));
        }
        if stops.iter().any(|s| !(0.0..=1.0).contains(&s.fraction)) {
            return Err(ValidationError("color stop fractions must lie in [0, 1]".to_string()));
        }
        if stops.windows(2).any(|w| w[1].fraction < w[0].fraction) {
            return Err(ValidationError("color stop fractions must be ascending".to_string()));
        }
        self.stops = stops;
        Ok(self)
    }

    /// Value colormap over the extrema range of a level.
    #[must_use]
    pub fn value_palette(min: f64, max: f64) -> Self {
        Self::new(min, max).with_channels(
            VALUE_PALETTE_RED,
            VALUE_PALETTE_GREEN,
            VALUE_PALETTE_BLUE,
        )
    }

    /// Density colormap over `[0, max]`.
    #[must_use]
    pub fn density_palette(max: f64) -> Self {
        Self::new(0.0, max).with_channels(
            DENSITY_PALETTE_RED,
            DENSITY_PALETTE_GREEN,
            DENSITY_PALETTE_BLUE,
        )
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    #[must_use]
    pub fn map(&self, value: f64) -> Rgba {
        let span = self.max - self.min;
        let t = if span > 0.0 {
            (value - self.min) / span
        } else {
            0.0
        };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let (Some(first), Some(last)) = (self.stops.first().copied(), self.stops.last().copied())
        else {
            return Rgba::opaque([0.0; 3]);
        };
        if t <= first.fraction {
            return Rgba::opaque(first.rgb);
        }
        if t >= last.fraction {
            return Rgba::opaque(last.rgb);
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.fraction {
                let width = hi.fraction - lo.fraction;
                let local = if width > 0.0 {
                    (t - lo.fraction) / width
                } else {
                    1.0
                };
                return Rgba::opaque(lerp_rgb(lo.rgb, hi.rgb, local));
            }
        }
        Rgba::opaque(last.rgb)
    }
}

fn lerp_rgb(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
