#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use rectify_homography as homography;

#[doc(inline)]
pub use rectify_imgproc as imgproc;
