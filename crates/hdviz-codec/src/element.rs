// SPDX-License-Identifier: Apache-2.0

use std::fmt::Debug;

/// Scalar types that can be stored in a data file.
pub trait Element: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Width written by the encoder.
    const SIZE: usize;
    const NAME: &'static str;

    /// Whether values stored with `element_size` bytes can be decoded.
    fn accepts(element_size: usize) -> bool {
        element_size == Self::SIZE
    }

    /// Decodes one little-endian element. `bytes.len()` equals an accepted
    /// element size.
    fn decode(bytes: &[u8]) -> Self;

    fn encode(self, out: &mut Vec<u8>);
}

impl Element for f64 {
    const SIZE: usize = 8;
    const NAME: &'static str = "f64";

    fn accepts(element_size: usize) -> bool {
        element_size == 8 || element_size == 4
    }

    fn decode(bytes: &[u8]) -> Self {
        match bytes.len() {
            4 => f64::from(f32::decode(bytes)),
            _ => {
                let mut raw = [0_u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                f64::from_le_bytes(raw)
            }
        }
    }

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for f32 {
    const SIZE: usize = 4;
    const NAME: &'static str = "f32";

    fn decode(bytes: &[u8]) -> Self {
        let mut raw = [0_u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        f32::from_le_bytes(raw)
    }

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for i32 {
    const SIZE: usize = 4;
    const NAME: &'static str = "i32";

    fn decode(bytes: &[u8]) -> Self {
        let mut raw = [0_u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        i32::from_le_bytes(raw)
    }

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}
