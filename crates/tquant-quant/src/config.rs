//! Quantization Configuration
//!
//! Integer grid parameters for fake quantization. A config is a plain value
//! built per call; it can be deserialized from host configuration files,
//! with every missing field taking its default.
//!
//! @version 0.1.0
//! @author tquant Development Team

use serde::{Deserialize, Serialize};

use crate::bound::bits_to_bound;
use crate::error::QuantResult;

/// Default bit width.
pub const DEFAULT_BIT_WIDTH: u32 = 8;

/// Integer grid a tensor is fake-quantized onto.
///
/// `narrow_range` drops the most negative signed level so the grid is
/// symmetric; it has no effect on unsigned grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizationConfig {
    /// Number of bits per quantized value.
    pub bit_width: u32,
    /// Quantize onto `[0, bound]` instead of `[-bound, bound]`.
    pub is_unsigned: bool,
    /// Use `2^(bits-1) - 1` rather than `2^(bits-1)` as the signed bound.
    pub narrow_range: bool,
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self {
            bit_width: DEFAULT_BIT_WIDTH,
            is_unsigned: false,
            narrow_range: true,
        }
    }
}

impl QuantizationConfig {
    /// Creates a config from all three fields.
    pub const fn new(bit_width: u32, is_unsigned: bool, narrow_range: bool) -> Self {
        Self {
            bit_width,
            is_unsigned,
            narrow_range,
        }
    }

    /// Signed 8-bit, narrow range (bound 127).
    pub const fn int8() -> Self {
        Self::new(8, false, true)
    }

    /// Unsigned 8-bit (bound 255).
    pub const fn uint8() -> Self {
        Self::new(8, true, false)
    }

    /// Signed 4-bit, narrow range (bound 7).
    pub const fn int4() -> Self {
        Self::new(4, false, true)
    }

    /// Sets the bit width.
    pub const fn with_bit_width(mut self, bit_width: u32) -> Self {
        self.bit_width = bit_width;
        self
    }

    /// Sets signedness.
    pub const fn with_unsigned(mut self, is_unsigned: bool) -> Self {
        self.is_unsigned = is_unsigned;
        self
    }

    /// Sets the narrow-range flag.
    pub const fn with_narrow_range(mut self, narrow_range: bool) -> Self {
        self.narrow_range = narrow_range;
        self
    }

    /// Largest representable integer magnitude for this config.
    pub fn bound(&self) -> QuantResult<f64> {
        bits_to_bound(*self)
    }

    /// Checks that the config describes a usable grid.
    pub fn validate(&self) -> QuantResult<()> {
        self.bound().map(|_| ())
    }
}

// =============================================================================
// Tests
// =============================================================================
