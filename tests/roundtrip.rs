//! End-to-end round-trip tests for the dctlab pipeline

use dctlab::{pipeline, ColorMode, Component, Error, PixelBuffer, RoundingMode, Subsampling};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Create a grayscale gradient image (r = g = b) as an RGB buffer
fn create_gradient_buffer(width: usize, height: usize) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let v = ((row * 13 + col * 7) % 256) as f64;
            pixels.push(dctlab::Pixel::Rgb { r: v, g: v, b: v, row, col });
        }
    }
    PixelBuffer::new(pixels, ColorMode::Rgb, width, height).unwrap()
}

/// Create a uniform RGB buffer
fn create_uniform_buffer(width: usize, height: usize, value: f64) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            pixels.push(dctlab::Pixel::Rgb { r: value, g: value, b: value, row, col });
        }
    }
    PixelBuffer::new(pixels, ColorMode::Rgb, width, height).unwrap()
}

#[test]
fn test_flat_midgray_block_survives_unchanged() {
    // Mid-gray maps to luma 128; level-shifted it is the zero block, so the
    // DC coefficient and all AC coefficients vanish and the round trip
    // reproduces constant 128 exactly.
    let buffer = create_uniform_buffer(8, 8, 128.0);

    let dct = pipeline::dct_stage(&buffer).unwrap();
    assert!(dct.values.iter().all(|v| *v == 0.0), "DCT of flat block: {:?}", dct.values);

    let quantized =
        pipeline::quantization_stage(&dct.values, 8, 8, 50, RoundingMode::Classic).unwrap();
    assert!(quantized.values.iter().all(|v| *v == 0.0));

    let dequantized = pipeline::dequantization_stage(&quantized.values, 8, 8, 50).unwrap();
    let idct = pipeline::idct_stage(&dequantized.values, 8, 8).unwrap();
    assert!(idct.values.iter().all(|v| *v == 128.0));

    let result = pipeline::full_round_trip(buffer, 50, RoundingMode::Classic).unwrap();
    for value in result.component_values(Component::R).unwrap() {
        assert_eq!(value, 128.0);
    }
}

#[test]
fn test_full_round_trip_q100_is_near_lossless() {
    let buffer = create_gradient_buffer(16, 16);
    let expected = buffer.component_values(Component::R).unwrap();

    let result = pipeline::full_round_trip(buffer, 100, RoundingMode::Classic).unwrap();
    assert_eq!(result.color_mode(), ColorMode::Rgb);

    // Quality 100 quantizes by an all-ones matrix; the only loss left is
    // coefficient rounding, which stays within a few gray levels
    for (orig, restored) in expected.iter().zip(result.component_values(Component::R).unwrap()) {
        assert!(
            (orig - restored).abs() <= 3.0,
            "expected ~{}, got {}",
            orig,
            restored
        );
    }
}

#[test]
fn test_low_quality_loses_more_than_high_quality() {
    let buffer = create_gradient_buffer(16, 16);
    let expected = buffer.component_values(Component::R).unwrap();

    let error_at = |quality: u8| -> f64 {
        let result =
            pipeline::full_round_trip(buffer.clone(), quality, RoundingMode::Classic).unwrap();
        result
            .component_values(Component::R)
            .unwrap()
            .iter()
            .zip(&expected)
            .map(|(restored, orig)| (restored - orig).abs())
            .sum()
    };

    assert!(error_at(1) > error_at(90));
}

#[test]
fn test_staged_chain_matches_block_content() {
    let buffer = create_gradient_buffer(16, 16);
    let cropped = pipeline::crop_block(&buffer, 1, 1).unwrap();
    let expected = cropped
        .clone()
        .into_color_mode(ColorMode::YCbCr)
        .component_values(Component::Y)
        .unwrap();

    let dct = pipeline::dct_stage(&cropped).unwrap();
    let quantized =
        pipeline::quantization_stage(&dct.values, 8, 8, 100, RoundingMode::Classic).unwrap();
    let dequantized = pipeline::dequantization_stage(&quantized.values, 8, 8, 100).unwrap();
    let idct = pipeline::idct_stage(&dequantized.values, 8, 8).unwrap();

    for (orig, restored) in expected.iter().zip(&idct.values) {
        assert!((orig - restored).abs() <= 3.0, "expected ~{}, got {}", orig, restored);
    }
}

#[test]
fn test_rounding_round_trip_identity_is_lossless() {
    let buffer = create_gradient_buffer(16, 16);
    let expected = buffer.component_values(Component::R).unwrap();

    let result = pipeline::rounding_round_trip(&buffer, RoundingMode::Identity).unwrap();
    assert_eq!(result.idct_blocks.len(), 4);
    for (orig, restored) in expected
        .iter()
        .zip(result.buffer.component_values(Component::R).unwrap())
    {
        assert!((orig - restored).abs() <= 1.0 + 1e-9);
    }
}

#[test]
fn test_recalculated_round_trip_tracks_full_round_trip() {
    let buffer = create_gradient_buffer(16, 16);

    let recalculated = pipeline::rounding_round_trip(&buffer, RoundingMode::Identity).unwrap();
    let from_blocks =
        pipeline::recalculated_round_trip(&recalculated.idct_blocks, 50, 16, 16).unwrap();
    let direct = pipeline::full_round_trip(buffer, 50, RoundingMode::Classic).unwrap();

    // With identity rounding the recalculated blocks equal the original
    // level-shifted luma up to DCT round-trip error, so both paths land on
    // the same displayed values give or take a rounding boundary
    for (a, b) in from_blocks
        .component_values(Component::R)
        .unwrap()
        .iter()
        .zip(direct.component_values(Component::R).unwrap())
    {
        assert!((a - b).abs() <= 1.0, "{} vs {}", a, b);
    }
}

#[test]
fn test_random_rounding_is_reproducible_with_seed() {
    let buffer = create_gradient_buffer(16, 16);

    let first = pipeline::full_round_trip_with_rng(
        buffer.clone(),
        40,
        RoundingMode::RandomInInterval,
        &mut StdRng::seed_from_u64(99),
    )
    .unwrap();
    let second = pipeline::full_round_trip_with_rng(
        buffer,
        40,
        RoundingMode::RandomInInterval,
        &mut StdRng::seed_from_u64(99),
    )
    .unwrap();

    assert_eq!(
        first.component_values(Component::R).unwrap(),
        second.component_values(Component::R).unwrap()
    );
}

#[test]
fn test_subsampling_444_pipeline_is_identity() {
    let buffer = create_gradient_buffer(16, 16);
    let expected = buffer.component_values(Component::G).unwrap();

    let result = pipeline::subsample_pipeline(buffer, Subsampling::S444).unwrap();
    for (orig, restored) in expected.iter().zip(result.component_values(Component::G).unwrap()) {
        assert!((orig - restored).abs() < 1e-6);
    }
}

#[test]
fn test_subsampling_420_averages_each_square() {
    // A colored gradient so the chroma actually varies between pixels
    let mut pixels = Vec::new();
    for row in 0..16 {
        for col in 0..16 {
            pixels.push(dctlab::Pixel::Rgb {
                r: (row * 15) as f64,
                g: (col * 15) as f64,
                b: ((row + col) * 7) as f64,
                row,
                col,
            });
        }
    }
    let buffer = PixelBuffer::new(pixels, ColorMode::Rgb, 16, 16)
        .unwrap()
        .into_color_mode(ColorMode::YCbCr);
    let result = dctlab::subsample::subsample(&buffer, Subsampling::S420).unwrap();

    let cb = result.component_values(Component::Cb).unwrap();
    for row in (0..16).step_by(2) {
        for col in (0..16).step_by(2) {
            let quad = [
                cb[row * 16 + col],
                cb[row * 16 + col + 1],
                cb[(row + 1) * 16 + col],
                cb[(row + 1) * 16 + col + 1],
            ];
            assert!(quad.iter().all(|v| *v == quad[0]), "square at ({row},{col}): {quad:?}");
        }
    }
}

#[test]
fn test_shape_and_domain_violations_fail_eagerly() {
    // 10x10 does not divide into 8x8 blocks
    let buffer = create_gradient_buffer(10, 10);
    assert!(matches!(
        pipeline::full_round_trip(buffer, 50, RoundingMode::Classic),
        Err(Error::InvalidShape { .. })
    ));

    let buffer = create_gradient_buffer(8, 8);
    assert!(matches!(
        pipeline::full_round_trip(buffer, 0, RoundingMode::Classic),
        Err(Error::OutOfRange { what: "quality", .. })
    ));
}

#[test]
fn test_component_views() {
    use dctlab::DisplayComponent;

    let buffer = create_gradient_buffer(8, 8);

    let original = pipeline::component_view(&buffer, DisplayComponent::Original).unwrap();
    assert_eq!(original, buffer);

    // A red view keeps the red channel and zeroes the others; the view is
    // spatially transposed by the value mapping
    let red =
        pipeline::component_view(&buffer, DisplayComponent::Single(Component::R)).unwrap();
    for row in 0..8 {
        for col in 0..8 {
            assert_eq!(
                red.get_pixel(row, col).unwrap().component(Component::R),
                buffer.get_pixel(col, row).unwrap().component(Component::R)
            );
        }
    }
    assert!(red.component_values(Component::G).unwrap().iter().all(|v| *v == 0.0));

    // A luma view carries the value in every channel (grayscale)
    let luma =
        pipeline::component_view(&buffer, DisplayComponent::Single(Component::Y)).unwrap();
    assert_eq!(
        luma.component_values(Component::Y).unwrap(),
        luma.component_values(Component::Cb).unwrap()
    );
}
