//! Data Types - tquant Type System
//!
//! Defines the element types tensors may hold and the traits the kernels are
//! generic over. Fake quantization is defined on floating-point tensors only,
//! so the runtime tag distinguishes single from double precision.
//!
//! # Key Features
//! - Type-safe numeric operations via traits
//! - Runtime dtype information via `DType` enum
//! - Round-half-to-even as a first-class float operation
//!
//! @version 0.1.0
//! @author tquant Development Team

use bytemuck::{Pod, Zeroable};
use num_traits::{Float as NumFloat, Num, NumCast, One, Zero};

use core::fmt::Debug;

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of tensor data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DType {
    /// 32-bit floating point (single precision).
    #[default]
    F32,
    /// 64-bit floating point (double precision).
    F64,
}

impl DType {
    /// Returns the size in bytes of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Scalar Trait
// =============================================================================

/// Trait for all scalar types that can be stored in a tensor.
pub trait Scalar: Copy + Clone + Debug + Default + Send + Sync + Pod + Zeroable + 'static {
    /// The runtime dtype for this scalar type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }
}

// =============================================================================
// Numeric Trait
// =============================================================================

/// Trait for numeric types that support arithmetic operations.
pub trait Numeric: Scalar + Num + NumCast + PartialOrd + Zero + One {
    /// The zero value for this type.
    const ZERO: Self;

    /// The one value for this type.
    const ONE: Self;
}

// =============================================================================
// Float Trait
// =============================================================================

/// Trait for floating point types the quantization kernels operate on.
pub trait Float: Numeric + NumFloat {
    /// Not a Number value.
    const NAN: Self;

    /// Positive infinity.
    const INFINITY: Self;

    /// Machine epsilon.
    const EPSILON: Self;

    /// Rounds to the nearest integer, ties to the even neighbour.
    fn round_ties_even_value(self) -> Self;

    /// Widens to f64 without loss.
    fn to_f64_value(self) -> f64;

    /// Narrows from f64 with round-to-nearest.
    fn from_f64_value(value: f64) -> Self;
}

// =============================================================================
// Scalar Implementations
// =============================================================================

macro_rules! impl_scalar {
    ($ty:ty, $dtype:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
        }
    };
}

impl_scalar!(f32, DType::F32);
impl_scalar!(f64, DType::F64);

// =============================================================================
// Numeric Implementations
// =============================================================================

macro_rules! impl_numeric {
    ($ty:ty, $zero:expr, $one:expr) => {
        impl Numeric for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;
        }
    };
}

impl_numeric!(f32, 0.0, 1.0);
impl_numeric!(f64, 0.0, 1.0);

// =============================================================================
// Float Implementations
// =============================================================================

macro_rules! impl_float {
    ($ty:ty) => {
        impl Float for $ty {
            const NAN: Self = <$ty>::NAN;
            const INFINITY: Self = <$ty>::INFINITY;
            const EPSILON: Self = <$ty>::EPSILON;

            fn round_ties_even_value(self) -> Self {
                self.round_ties_even()
            }

            fn to_f64_value(self) -> f64 {
                self as f64
            }

            fn from_f64_value(value: f64) -> Self {
                value as $ty
            }
        }
    };
}

impl_float!(f32);
impl_float!(f64);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F32.size_of(), 4);
        assert_eq!(DType::F64.size_of(), 8);
    }

    #[test]
    fn test_dtype_display() {
        assert_eq!(DType::F32.to_string(), "f32");
        assert_eq!(DType::F64.name(), "f64");
    }

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(f32::dtype(), DType::F32);
        assert_eq!(f64::dtype(), DType::F64);
        assert_eq!(DType::default(), DType::F32);
    }

    #[test]
    fn test_round_ties_even() {
        assert_eq!(0.5_f32.round_ties_even_value(), 0.0);
        assert_eq!(1.5_f32.round_ties_even_value(), 2.0);
        assert_eq!(2.5_f32.round_ties_even_value(), 2.0);
        assert_eq!((-2.5_f64).round_ties_even_value(), -2.0);
        assert_eq!(2.6_f64.round_ties_even_value(), 3.0);
    }

    #[test]
    fn test_f64_conversions() {
        assert_eq!(1.25_f32.to_f64_value(), 1.25);
        assert_eq!(f32::from_f64_value(0.5), 0.5);
    }
}
