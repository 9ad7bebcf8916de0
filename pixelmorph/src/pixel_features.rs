use crate::error::PixelmorphError;
use crate::photo::Photo;
use tracing::debug;

/// ITU-R BT.601 luma weights used for every brightness computation in the crate.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Per-pixel feature record produced by [extract_features].
///
/// One record exists per grid cell, in row-major order. Records are plain
/// values and never mutated after extraction; the matching stage consumes them
/// by copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelFeature {
    /// Red channel, 0..=255.
    pub r: u8,
    /// Green channel, 0..=255.
    pub g: u8,
    /// Blue channel, 0..=255.
    pub b: u8,
    /// Column of the pixel within the image.
    pub x: u32,
    /// Row of the pixel within the image.
    pub y: u32,
    /// Weighted luminance of `(r, g, b)` (BT.601).
    pub brightness: f32,
    /// Local gradient magnitude: the sum of absolute brightness differences
    /// with the right and bottom neighbors. A one-sided forward difference,
    /// so the value is not symmetric between neighboring pixels; pixels with
    /// no computable neighbor in either direction hold 0.
    pub edge_strength: f32,
}

/// Computes the BT.601 weighted luminance of an RGB triple.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

/// Extracts one [PixelFeature] per pixel of `photo`, in row-major order
/// (y outer, x inner).
///
/// Downstream sorts are stable, so the row-major ordering produced here is the
/// tie-break for equal sort keys and must not be altered.
///
/// # Returns
/// Exactly `width * height` records; an empty list for a zero-area photo.
///
/// # Errors
/// Returns [PixelmorphError::InvalidInput] when the photo's buffer length does
/// not equal `width * height * 4`. The check is repeated here because `Photo`
/// exposes its fields publicly.
pub fn extract_features(photo: &Photo) -> Result<Vec<PixelFeature>, PixelmorphError> {
    let width = photo.width;
    let height = photo.height;
    let expected = width * height * 4;
    if photo.img_data.len() != expected {
        return Err(PixelmorphError::InvalidInput {
            width,
            height,
            expected,
            got: photo.img_data.len(),
        });
    }

    let data = &photo.img_data;
    let mut features = Vec::with_capacity(width * height);

    // Brightness of every pixel is needed twice (own value and as a neighbor),
    // so compute the plane once up front.
    let mut luma = Vec::with_capacity(width * height);
    for chunk in data.chunks_exact(4) {
        luma.push(brightness(chunk[0], chunk[1], chunk[2]));
    }

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            let byte_index = index * 4;
            let own = luma[index];

            let mut edge_strength = 0.0f32;
            if x < width - 1 {
                edge_strength += (own - luma[index + 1]).abs();
            }
            if y < height - 1 {
                edge_strength += (own - luma[index + width]).abs();
            }

            features.push(PixelFeature {
                r: data[byte_index],
                g: data[byte_index + 1],
                b: data[byte_index + 2],
                x: x as u32,
                y: y as u32,
                brightness: own,
                edge_strength,
            });
        }
    }

    debug!(width, height, records = features.len(), "extracted pixel features");
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn photo_from_rgb(width: usize, height: usize, rgb: &[(u8, u8, u8)]) -> Photo {
        let mut img_data = Vec::with_capacity(width * height * 4);
        for &(r, g, b) in rgb {
            img_data.extend_from_slice(&[r, g, b, 255]);
        }
        Photo::from_raw(img_data, width, height).unwrap()
    }

    #[test]
    fn produces_one_record_per_pixel_in_row_major_order() {
        let photo = photo_from_rgb(
            3,
            2,
            &[
                (1, 0, 0),
                (2, 0, 0),
                (3, 0, 0),
                (4, 0, 0),
                (5, 0, 0),
                (6, 0, 0),
            ],
        );
        let features = extract_features(&photo).unwrap();
        assert_eq!(features.len(), 6);
        let coords: Vec<(u32, u32)> = features.iter().map(|f| (f.x, f.y)).collect();
        assert_eq!(
            coords,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)],
            "records must follow buffer iteration order (y outer, x inner)"
        );
        assert_eq!(features[4].r, 5);
    }

    #[test]
    fn brightness_uses_bt601_weights() {
        assert!((brightness(255, 0, 0) - 76.245).abs() < 1e-3);
        assert!((brightness(0, 255, 0) - 149.685).abs() < 1e-3);
        assert!((brightness(0, 0, 255) - 29.07).abs() < 1e-3);
    }

    #[test]
    fn uniform_image_has_zero_edge_strength_everywhere() {
        let photo = photo_from_rgb(4, 4, &[(90, 90, 90); 16]);
        let features = extract_features(&photo).unwrap();
        assert!(features.iter().all(|f| f.edge_strength == 0.0));
    }

    #[test]
    fn edge_strength_is_one_sided_forward_difference() {
        // Left column black, right column white: only the left pixels see the
        // step, the right pixels have no right neighbor and equal rows below.
        let photo = photo_from_rgb(
            2,
            2,
            &[(0, 0, 0), (255, 255, 255), (0, 0, 0), (255, 255, 255)],
        );
        let features = extract_features(&photo).unwrap();
        let step = brightness(255, 255, 255);
        assert!((features[0].edge_strength - step).abs() < 1e-3);
        assert!((features[1].edge_strength - 0.0).abs() < 1e-3);
        assert!((features[2].edge_strength - step).abs() < 1e-3);
        assert_eq!(features[3].edge_strength, 0.0, "last pixel has no neighbors");
    }

    #[test]
    fn zero_area_photo_yields_empty_list() {
        let photo = Photo::default();
        assert!(extract_features(&photo).unwrap().is_empty());
    }

    #[test]
    fn malformed_buffer_is_rejected() {
        let photo = Photo {
            img_data: vec![0u8; 15],
            width: 2,
            height: 2,
        };
        assert!(extract_features(&photo).is_err());
    }

    proptest! {
        #[test]
        fn record_count_always_equals_pixel_count(
            width in 0usize..12,
            height in 0usize..12,
            seed in 0u8..255,
        ) {
            let pixels = vec![(seed, seed.wrapping_add(7), seed.wrapping_mul(3)); width * height];
            let photo = photo_from_rgb(width, height, &pixels);
            let features = extract_features(&photo).unwrap();
            prop_assert_eq!(features.len(), width * height);
        }
    }
}
