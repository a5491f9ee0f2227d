use std::path::Path;

use image::RgbImage;

use crate::IoError;

/// Reads an image file of any format supported by the `image` crate as RGB8.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
///
/// # Returns
///
/// The decoded image with three 8-bit channels.
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<RgbImage, IoError> {
    let file_path = file_path.as_ref().to_owned();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path));
    }

    let image = image::open(&file_path)?.to_rgb8();
    log::debug!(
        "read {} ({}x{})",
        file_path.display(),
        image.width(),
        image.height()
    );

    Ok(image)
}

/// Writes an RGB8 image, choosing the format from the file extension.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
pub fn write_image(file_path: impl AsRef<Path>, image: &RgbImage) -> Result<(), IoError> {
    image.save(file_path.as_ref())?;
    Ok(())
}
