//! Bound Calculator
//!
//! Maps a [`QuantizationConfig`] to the largest integer magnitude on its grid:
//!
//! | signedness | narrow range | bound |
//! |---|---|---|
//! | unsigned | either | `2^bits - 1` |
//! | signed | yes | `2^(bits-1) - 1` |
//! | signed | no | `2^(bits-1)` |
//!
//! @version 0.1.0
//! @author tquant Development Team

use crate::config::QuantizationConfig;
use crate::error::{QuantError, QuantResult};

/// Widest supported grid.
pub const MAX_BIT_WIDTH: u32 = 32;

/// Returns the representable integer bound for `config`.
///
/// Fails for a bit width of 0 or above [`MAX_BIT_WIDTH`], and for the 1-bit
/// signed narrow grid whose bound is 0.
pub fn bits_to_bound(config: QuantizationConfig) -> QuantResult<f64> {
    let bits = config.bit_width;
    if bits == 0 || bits > MAX_BIT_WIDTH {
        return Err(QuantError::InvalidBitWidth {
            bits,
            max: MAX_BIT_WIDTH,
        });
    }

    let bound: u64 = if config.is_unsigned {
        (1u64 << bits) - 1
    } else if config.narrow_range {
        (1u64 << (bits - 1)) - 1
    } else {
        1u64 << (bits - 1)
    };

    if bound == 0 {
        return Err(QuantError::EmptyRange { bits });
    }

    Ok(bound as f64)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(bits: u32, is_unsigned: bool, narrow_range: bool) -> QuantResult<f64> {
        bits_to_bound(QuantizationConfig::new(bits, is_unsigned, narrow_range))
    }

    #[test]
    fn test_eight_bit_bounds() {
        assert_eq!(bound(8, false, true).unwrap(), 127.0);
        assert_eq!(bound(8, false, false).unwrap(), 128.0);
        assert_eq!(bound(8, true, false).unwrap(), 255.0);
        assert_eq!(bound(8, true, true).unwrap(), 255.0);
    }

    #[test]
    fn test_extreme_widths() {
        assert_eq!(bound(1, true, false).unwrap(), 1.0);
        assert_eq!(bound(1, false, false).unwrap(), 1.0);
        assert_eq!(bound(32, true, false).unwrap(), 4_294_967_295.0);
        assert_eq!(bound(32, false, false).unwrap(), 2_147_483_648.0);
    }

    #[test]
    fn test_invalid_widths() {
        assert_eq!(
            bound(0, false, true),
            Err(QuantError::InvalidBitWidth { bits: 0, max: 32 })
        );
        assert_eq!(
            bound(33, true, false),
            Err(QuantError::InvalidBitWidth { bits: 33, max: 32 })
        );
        assert_eq!(bound(1, false, true), Err(QuantError::EmptyRange { bits: 1 }));
    }
}
