#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Rectify Homography
//!
//! Computes the 3x3 perspective transform that maps four source points onto
//! four destination points, the same matrix a rectification warp consumes.
//!
//! ## Example
//!
//! ```rust
//! use rectify_homography::{get_perspective_transform, linalg};
//!
//! let src = [[10.0, 457.0], [395.0, 291.0], [624.0, 291.0], [1000.0, 457.0]];
//! let dst = [[46.0, 920.0], [46.0, 100.0], [600.0, 100.0], [600.0, 920.0]];
//!
//! let h = get_perspective_transform(&src, &dst)?;
//! assert_eq!(h[2][2], 1.0);
//!
//! let p = linalg::transform_point(&h, src[0]).unwrap();
//! assert!((p[0] - 46.0).abs() < 1e-4 && (p[1] - 920.0).abs() < 1e-4);
//! # Ok::<(), rectify_homography::HomographyError>(())
//! ```

mod error;
pub use error::HomographyError;

/// Perspective transform estimation.
pub mod homography;
pub use homography::{
    get_perspective_transform, get_perspective_transform_4pt,
    get_perspective_transform_with_params, solve_homography_lstsq, SolverParams,
    MIN_CORRESPONDENCES,
};

/// Small fixed-size matrix utilities for 3x3 projective transforms.
pub mod linalg;

/// A 2d point as `[x, y]`.
pub type Point2 = [f64; 2];

/// A row-major 3x3 matrix.
pub type Mat33 = [[f64; 3]; 3];
