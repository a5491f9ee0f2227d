#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::{IoError, WarpError};

/// Reading and writing image files.
pub mod io;

/// Image geometric transformations driven by a homography.
pub mod warp;

pub use image::RgbImage;

/// Image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels.
    pub width: usize,
    /// Height of the image in pixels.
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl TryFrom<ImageSize> for [u32; 2] {
    type Error = WarpError;

    fn try_from(size: ImageSize) -> Result<Self, Self::Error> {
        match (u32::try_from(size.width), u32::try_from(size.height)) {
            (Ok(width), Ok(height)) => Ok([width, height]),
            _ => Err(WarpError::SizeOverflow(size)),
        }
    }
}

/// Get the size of an image buffer.
pub fn image_size(image: &RgbImage) -> ImageSize {
    let (width, height) = image.dimensions();
    ImageSize {
        width: width as usize,
        height: height as usize,
    }
}
