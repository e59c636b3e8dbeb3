//! Property-based tests for the fake-quantization operators.
//!
//! @version 0.1.0
//! @author tquant Development Team

use proptest::prelude::*;
use tquant_quant::{
    fake_quant, fake_quant_per_axis, round_to_e4m3, QuantizationConfig, E4M3,
};
use tquant_tensor::{Device, Tensor};

fn accel(data: Vec<f32>, shape: &[usize]) -> Tensor<f32> {
    Tensor::from_vec_on(data, shape, Device::Accelerator(0)).unwrap()
}

fn config_strategy() -> impl Strategy<Value = QuantizationConfig> {
    (2u32..=16, any::<bool>(), any::<bool>())
        .prop_map(|(bits, unsigned, narrow)| QuantizationConfig::new(bits, unsigned, narrow))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Quantizing an already fake-quantized tensor changes nothing
    #[test]
    fn prop_idempotent(
        values in prop::collection::vec(-10.0f32..10.0, 1..64),
        amax in 0.01f32..10.0,
        config in config_strategy(),
    ) {
        let n = values.len();
        let amax = Tensor::scalar(amax);
        let once = fake_quant(&accel(values, &[n]), &amax, config).unwrap();
        let twice = fake_quant(&once, &amax, config).unwrap();
        prop_assert_eq!(once.to_vec(), twice.to_vec());
    }

    /// Outputs stay within [-amax, amax], and unsigned grids never go negative
    #[test]
    fn prop_output_range(
        values in prop::collection::vec(-100.0f32..100.0, 1..64),
        amax in 0.01f32..50.0,
        config in config_strategy(),
    ) {
        let n = values.len();
        let y = fake_quant(&accel(values, &[n]), &Tensor::scalar(amax), config).unwrap();
        for v in y.to_vec() {
            prop_assert!(v.abs() <= amax * (1.0 + 1e-5), "{} exceeds {}", v, amax);
            if config.is_unsigned {
                prop_assert!(v >= 0.0, "unsigned output {}", v);
            }
        }
    }

    /// Zero is always on the grid
    #[test]
    fn prop_zero_preserved(
        amax in 0.0f32..100.0,
        config in config_strategy(),
    ) {
        let y = fake_quant(&accel(vec![0.0; 4], &[4]), &Tensor::scalar(amax), config).unwrap();
        prop_assert_eq!(y.to_vec(), vec![0.0; 4]);
    }

    /// Per-axis with one shared amax is per-tensor
    #[test]
    fn prop_uniform_per_axis_matches_per_tensor(
        rows in 1usize..6,
        cols in 1usize..6,
        seed in prop::collection::vec(-5.0f32..5.0, 36),
        amax in 0.01f32..5.0,
        axis in 0i64..2,
        config in config_strategy(),
    ) {
        let data: Vec<f32> = seed[..rows * cols].to_vec();
        let x = accel(data, &[rows, cols]);
        let extent = if axis == 0 { rows } else { cols };
        let amax_vec = Tensor::from_vec(vec![amax; extent], &[extent]).unwrap();

        let per_axis = fake_quant_per_axis(&x, &amax_vec, axis, config).unwrap();
        let per_tensor = fake_quant(&x, &Tensor::scalar(amax), config).unwrap();
        prop_assert_eq!(per_axis.to_vec(), per_tensor.to_vec());
    }

    /// E4M3 rounding is idempotent and saturates instead of overflowing
    #[test]
    fn prop_e4m3_idempotent(x in -1.0e6f64..1.0e6) {
        let once = round_to_e4m3(x);
        prop_assert_eq!(round_to_e4m3(once), once);
        prop_assert!(once.abs() <= E4M3::MAX);
        prop_assert_eq!(once.is_sign_negative(), x.is_sign_negative());
    }

    /// E4M3 relative error is bounded by half a mantissa step for normals
    #[test]
    fn prop_e4m3_relative_error(x in E4M3::MIN_NORMAL..E4M3::MAX) {
        let r = round_to_e4m3(x);
        prop_assert!((r - x).abs() <= x / 16.0, "{} -> {}", x, r);
    }
}
