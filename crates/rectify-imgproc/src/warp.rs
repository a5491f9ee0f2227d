use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use rectify_homography::Mat33;

use crate::{ImageSize, WarpError};

/// Interpolation used to sample the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation.
    Nearest,
}

impl From<InterpolationMode> for Interpolation {
    fn from(mode: InterpolationMode) -> Self {
        match mode {
            InterpolationMode::Bilinear => Interpolation::Bilinear,
            InterpolationMode::Nearest => Interpolation::Nearest,
        }
    }
}

/// Converts a row-major homography into the projection consumed by the warp.
///
/// Returns [`WarpError::NonInvertible`] if the matrix has no inverse.
pub fn to_projection(m: &Mat33) -> Result<Projection, WarpError> {
    #[rustfmt::skip]
    let m_f32 = [
        m[0][0] as f32, m[0][1] as f32, m[0][2] as f32,
        m[1][0] as f32, m[1][1] as f32, m[1][2] as f32,
        m[2][0] as f32, m[2][1] as f32, m[2][2] as f32,
    ];
    Projection::from_matrix(m_f32).ok_or(WarpError::NonInvertible)
}

/// Applies a perspective transformation to an image.
///
/// Every output pixel is traced back through the inverse of `m` into `src`
/// and sampled there. Pixels that land outside `src` are filled with black.
///
/// * `src` - The input image.
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `size` - The size of the output image.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The warped image with the requested size.
///
/// # Example
///
/// ```
/// use rectify_imgproc::{warp::{warp_perspective, InterpolationMode}, ImageSize, RgbImage};
///
/// let src = RgbImage::new(4, 5);
/// let m = [[1.0, 0.0, -1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]];
///
/// let dst = warp_perspective(
///     &src,
///     &m,
///     ImageSize { width: 2, height: 3 },
///     InterpolationMode::Bilinear,
/// ).unwrap();
///
/// assert_eq!(dst.dimensions(), (2, 3));
/// ```
pub fn warp_perspective(
    src: &RgbImage,
    m: &Mat33,
    size: ImageSize,
    interpolation: InterpolationMode,
) -> Result<RgbImage, WarpError> {
    if size.width == 0 || size.height == 0 {
        return Err(WarpError::InvalidSize(size));
    }

    let [width, height]: [u32; 2] = size.try_into()?;

    let projection = to_projection(m)?;

    let mut dst = RgbImage::new(width, height);
    warp_into(src, &projection, interpolation.into(), Rgb([0, 0, 0]), &mut dst);

    log::debug!(
        "warped {}x{} image into {}",
        src.width(),
        src.height(),
        size
    );

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (y * width + x) as u8;
            Rgb([v, v, v])
        })
    }

    #[test]
    fn warp_perspective_identity() -> Result<(), WarpError> {
        let image = ramp(4, 5);
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

        let warped = warp_perspective(
            &image,
            &m,
            ImageSize {
                width: 4,
                height: 5,
            },
            InterpolationMode::Nearest,
        )?;

        assert_eq!(warped.as_raw(), image.as_raw());
        Ok(())
    }

    #[test]
    fn warp_perspective_shift() -> Result<(), WarpError> {
        let image = ramp(4, 4);

        // shift right by 1 pixel
        let m = [[1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

        let warped = warp_perspective(
            &image,
            &m,
            ImageSize {
                width: 4,
                height: 4,
            },
            InterpolationMode::Nearest,
        )?;

        for y in 0..4 {
            assert_eq!(warped.get_pixel(0, y), &Rgb([0, 0, 0]));
            for x in 1..4 {
                assert_eq!(warped.get_pixel(x, y), image.get_pixel(x - 1, y));
            }
        }
        Ok(())
    }

    #[test]
    fn warp_perspective_output_size() -> Result<(), WarpError> {
        let image = ramp(8, 8);
        let m = [[0.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 1.0]];

        let warped = warp_perspective(
            &image,
            &m,
            ImageSize {
                width: 3,
                height: 2,
            },
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(warped.dimensions(), (3, 2));
        Ok(())
    }

    #[test]
    fn warp_perspective_invalid_size() {
        let image = ramp(4, 4);
        let size = ImageSize {
            width: 0,
            height: 4,
        };
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let res = warp_perspective(&image, &m, size, InterpolationMode::Bilinear);
        assert_eq!(res.err(), Some(WarpError::InvalidSize(size)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn warp_perspective_size_overflow() {
        let image = ramp(4, 4);
        let size = ImageSize {
            width: 4,
            height: u32::MAX as usize + 1,
        };
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let res = warp_perspective(&image, &m, size, InterpolationMode::Bilinear);
        assert_eq!(res.err(), Some(WarpError::SizeOverflow(size)));
    }

    #[test]
    fn warp_perspective_non_invertible() {
        let image = ramp(4, 4);
        let m = [[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]];
        let res = warp_perspective(
            &image,
            &m,
            ImageSize {
                width: 4,
                height: 4,
            },
            InterpolationMode::Bilinear,
        );
        assert_eq!(res.err(), Some(WarpError::NonInvertible));
    }
}
