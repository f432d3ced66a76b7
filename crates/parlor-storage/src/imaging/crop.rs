//! Percentage crops and their pixel equivalents.

use serde::{Deserialize, Serialize};

/// A crop region in percent (0-100) of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    /// Width in percent of the image width.
    pub width: u32,
    /// Height in percent of the image height.
    pub height: u32,
    /// Left edge in percent of the image width.
    pub x: u32,
    /// Top edge in percent of the image height.
    pub y: u32,
}

impl Crop {
    /// The whole image.
    pub const FULL: Crop = Crop {
        width: 100,
        height: 100,
        x: 0,
        y: 0,
    };

    /// True when every field lies in 0..=100.
    pub fn is_within_percent(&self) -> bool {
        [self.width, self.height, self.x, self.y]
            .iter()
            .all(|v| *v <= 100)
    }
}

/// A crop region in absolute pixels of one specific image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCrop {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
}

impl PixelCrop {
    /// The region forced square and kept inside `width`x`height`.
    ///
    /// The side is the requested width, shrunk to whatever room is left
    /// right of `x` and below `y`. An origin outside the image yields an
    /// empty region.
    pub fn squared_within(self, width: u32, height: u32) -> Self {
        let side = self
            .width
            .min(width.saturating_sub(self.x))
            .min(height.saturating_sub(self.y));
        Self {
            width: side,
            height: side,
            ..self
        }
    }

    /// True when the region is non-empty and lies inside `width`x`height`.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// Converts percentage crops into pixel crops.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropCalculator;

impl CropCalculator {
    /// Integer floor conversion. Widths and x scale with the image width,
    /// heights and y with the image height. No clamping is applied.
    pub fn to_pixels(crop: Crop, image_width: u32, image_height: u32) -> PixelCrop {
        let scale = |dim: u32, percent: u32| -> u32 {
            let px = u64::from(dim) * u64::from(percent) / 100;
            u32::try_from(px).unwrap_or(u32::MAX)
        };
        PixelCrop {
            width: scale(image_width, crop.width),
            height: scale(image_height, crop.height),
            x: scale(image_width, crop.x),
            y: scale(image_height, crop.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixels_square_image() {
        let crop = Crop {
            width: 50,
            height: 50,
            x: 25,
            y: 25,
        };
        assert_eq!(
            CropCalculator::to_pixels(crop, 1000, 1000),
            PixelCrop {
                width: 500,
                height: 500,
                x: 250,
                y: 250
            }
        );
    }

    #[test]
    fn test_to_pixels_floors_per_axis() {
        let crop = Crop {
            width: 33,
            height: 33,
            x: 10,
            y: 10,
        };
        let px = CropCalculator::to_pixels(crop, 640, 481);
        assert_eq!(px.width, 640 * 33 / 100);
        assert_eq!(px.height, 481 * 33 / 100);
        assert_eq!(px.x, 64);
        assert_eq!(px.y, 48);
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let crop = Crop {
            width: 150,
            height: 100,
            x: 0,
            y: 0,
        };
        let px = CropCalculator::to_pixels(crop, 200, 200);
        assert_eq!(px.width, 300);
        assert!(!px.fits(200, 200));
        assert!(!crop.is_within_percent());
    }

    #[test]
    fn test_full_crop_squares_inside_landscape_and_portrait() {
        let landscape = CropCalculator::to_pixels(Crop::FULL, 640, 480).squared_within(640, 480);
        assert_eq!(
            landscape,
            PixelCrop {
                width: 480,
                height: 480,
                x: 0,
                y: 0
            }
        );
        assert!(landscape.fits(640, 480));

        let portrait = CropCalculator::to_pixels(Crop::FULL, 480, 640).squared_within(480, 640);
        assert_eq!((portrait.width, portrait.height), (480, 480));
        assert!(portrait.fits(480, 640));
    }

    #[test]
    fn test_squared_within_shrinks_to_room_left() {
        let crop = Crop {
            width: 50,
            height: 10,
            x: 80,
            y: 25,
        };
        let px = CropCalculator::to_pixels(crop, 1000, 800).squared_within(1000, 800);
        assert_eq!(
            px,
            PixelCrop {
                width: 200,
                height: 200,
                x: 800,
                y: 200
            }
        );
        assert!(px.fits(1000, 800));
    }

    #[test]
    fn test_squared_within_origin_outside_is_empty() {
        let crop = Crop {
            width: 50,
            height: 50,
            x: 100,
            y: 0,
        };
        let px = CropCalculator::to_pixels(crop, 300, 300).squared_within(300, 300);
        assert_eq!(px.width, 0);
        assert!(!px.fits(300, 300));
    }

    #[test]
    fn test_fits_rejects_empty_region() {
        let px = CropCalculator::to_pixels(
            Crop {
                width: 0,
                height: 0,
                x: 0,
                y: 0,
            },
            100,
            100,
        );
        assert!(!px.fits(100, 100));
        assert!(CropCalculator::to_pixels(Crop::FULL, 100, 100).fits(100, 100));
    }
}
