//! Color-ID codec for GPU picking.
//!
//! Each point is rendered into the pick buffer with its index encoded as an
//! RGB color, so reading a single pixel recovers the index. The encoded id
//! is `index + 1`: id 0 is reserved for the background, which the pick pass
//! clears to zero alpha. That reservation is what distinguishes "nothing
//! under the cursor" from "point 0 is under the cursor".

use crate::error::{PickError, Result};

/// Largest id representable in 24 bits of RGB.
const MAX_ID: u32 = (1 << 24) - 1;

/// Maximum number of points the codec can address.
///
/// A data set of `2^24 - 1` or more points must be rejected before it
/// reaches the GPU; see [`ensure_addressable`].
pub const MAX_POINT_COUNT: usize = (1 << 24) - 2;

/// Encodes a point index as a pick color.
///
/// Returns `[r, g, b]` where:
/// - r contains bits 0-7 of `index + 1`
/// - g contains bits 8-15
/// - b contains bits 16-23
pub fn encode_index(index: u32) -> Result<[u8; 3]> {
    if index >= MAX_ID {
        return Err(PickError::AddressSpaceExceeded {
            count: index as usize + 1,
            max: MAX_POINT_COUNT,
        });
    }
    let id = index + 1;
    Ok([
        (id & 0xFF) as u8,
        ((id >> 8) & 0xFF) as u8,
        ((id >> 16) & 0xFF) as u8,
    ])
}

/// Decodes a pick-buffer pixel back to a point index.
///
/// Returns `None` for the background (zero alpha), the reserved id 0, or an
/// id beyond `point_count` (stale or corrupt pixel). Otherwise the decoded
/// id minus one is a valid index into the current point sequence.
#[must_use]
pub fn decode_pixel(pixel: [u8; 4], point_count: usize) -> Option<u32> {
    let [r, g, b, a] = pixel;
    if a == 0 {
        return None;
    }
    let id = u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16);
    if id == 0 || id as usize > point_count {
        return None;
    }
    Some(id - 1)
}

/// Validates that a point count fits the 24-bit address space.
///
/// Policy: an oversized data set is rejected outright, never clamped.
pub fn ensure_addressable(count: usize) -> Result<()> {
    if count > MAX_POINT_COUNT {
        return Err(PickError::AddressSpaceExceeded {
            count,
            max: MAX_POINT_COUNT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_alpha(rgb: [u8; 3], a: u8) -> [u8; 4] {
        [rgb[0], rgb[1], rgb[2], a]
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        for index in [0u32, 1, 254, 255, 256, 65534, 65535, 65536, (1 << 24) - 2] {
            let rgb = encode_index(index).expect("index should be encodable");
            let decoded = decode_pixel(with_alpha(rgb, 255), usize::MAX);
            assert_eq!(decoded, Some(index), "roundtrip failed for index {index}");
        }
    }

    #[test]
    fn test_specific_colors() {
        // id = index + 1, little-endian byte order per channel
        assert_eq!(encode_index(0).unwrap(), [1, 0, 0]);
        assert_eq!(encode_index(254).unwrap(), [255, 0, 0]);
        assert_eq!(encode_index(255).unwrap(), [0, 1, 0]);
        assert_eq!(encode_index(65535).unwrap(), [0, 0, 1]);
    }

    #[test]
    fn test_encode_rejects_address_space_overflow() {
        assert!(encode_index((1 << 24) - 2).is_ok());
        assert!(matches!(
            encode_index((1 << 24) - 1),
            Err(PickError::AddressSpaceExceeded { .. })
        ));
    }

    #[test]
    fn test_decode_zero_alpha_is_background() {
        assert_eq!(decode_pixel([42, 7, 3, 0], 1000), None);
        assert_eq!(decode_pixel([255, 255, 255, 0], 1000), None);
    }

    #[test]
    fn test_decode_reserved_id_zero() {
        assert_eq!(decode_pixel([0, 0, 0, 255], 1000), None);
    }

    #[test]
    fn test_decode_rejects_out_of_range_ids() {
        // id 11 decodes to index 10, which needs at least 11 points
        let rgb = encode_index(10).unwrap();
        assert_eq!(decode_pixel(with_alpha(rgb, 255), 10), None);
        assert_eq!(decode_pixel(with_alpha(rgb, 255), 11), Some(10));
    }

    #[test]
    fn test_ensure_addressable_policy() {
        assert!(ensure_addressable(0).is_ok());
        assert!(ensure_addressable(MAX_POINT_COUNT).is_ok());
        // Exactly 2^24 - 1 points must trigger the reject policy.
        let err = ensure_addressable((1 << 24) - 1).unwrap_err();
        assert!(matches!(
            err,
            PickError::AddressSpaceExceeded {
                count,
                max,
            } if count == (1 << 24) - 1 && max == MAX_POINT_COUNT
        ));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_all_valid_indices(index in 0u32..((1 << 24) - 1)) {
            let rgb = encode_index(index).unwrap();
            prop_assert_eq!(
                decode_pixel(with_alpha(rgb, 255), index as usize + 1),
                Some(index)
            );
        }

        #[test]
        fn prop_zero_alpha_never_hits(r: u8, g: u8, b: u8, count in 0usize..10_000) {
            prop_assert_eq!(decode_pixel([r, g, b, 0], count), None);
        }

        #[test]
        fn prop_decode_stays_in_bounds(r: u8, g: u8, b: u8, a: u8, count in 0usize..100_000) {
            if let Some(index) = decode_pixel([r, g, b, a], count) {
                prop_assert!((index as usize) < count);
            }
        }
    }
}
