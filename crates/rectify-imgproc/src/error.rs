/// An error type for reading and writing images.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode or encode the image.
    #[error("Failed to decode or encode the image. {0}")]
    ImageCodecError(#[from] image::ImageError),
}

/// An error type for perspective warps.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarpError {
    /// The requested output image has no pixels.
    #[error("Invalid output size: {0}")]
    InvalidSize(crate::ImageSize),

    /// The output size does not fit the pixel buffer index type.
    #[error("Output size is too large: {0}")]
    SizeOverflow(crate::ImageSize),

    /// The transform has no inverse, so output pixels cannot be traced back.
    #[error("Perspective matrix is not invertible")]
    NonInvertible,
}
