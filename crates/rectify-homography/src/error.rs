/// Errors raised while estimating a perspective transform.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HomographyError {
    /// The source and destination point sets have different lengths.
    #[error("Mismatched point set lengths: source ({0}) != destination ({1})")]
    MismatchedLengths(usize, usize),

    /// Not enough correspondences to determine the 8 free parameters.
    #[error("Homography requires at least {required} point correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum number of correspondences required.
        required: usize,
        /// Number of correspondences provided.
        actual: usize,
    },

    /// A point holds a NaN or infinite coordinate.
    #[error("Point correspondence {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    /// The linear system built from the correspondences has no inverse.
    #[error("Singular linear system: point configuration is degenerate")]
    SingularSystem,
}

impl HomographyError {
    /// Returns true when the error was caused by the shape or content of the
    /// input point sets rather than by their geometry.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MismatchedLengths(..)
                | Self::InsufficientCorrespondences { .. }
                | Self::NonFinitePoint(_)
        )
    }
}
