use faer::prelude::{SpSolver, SpSolverLstsq};

use crate::{linalg, HomographyError, Mat33, Point2};

/// Minimum number of point correspondences needed to determine a homography.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Number of free parameters of a homography with `h33` fixed to one.
const NUM_PARAMS: usize = 8;

/// Numeric tolerances used by the homography solvers.
#[derive(Debug, Clone)]
pub struct SolverParams {
    /// Reciprocal condition threshold. The normalized linear system is
    /// rejected as singular when its smallest singular value is below `rcond`
    /// times its largest one. For four points it is also the smallest
    /// cross product accepted between any three of them in normalized
    /// coordinates.
    pub rcond: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self { rcond: 1e-12 }
    }
}

/// Compute the perspective transform that maps `src` points onto `dst` points.
///
/// Each correspondence contributes two rows to a linear system `A * a = b` in
/// the eight unknowns `a11..a32`, with `a33` fixed to one. Both point sets are
/// first normalized (centroid at the origin, mean distance `sqrt(2)`) so the
/// system is equally well conditioned at any coordinate scale. With exactly four
/// correspondences the square system is solved directly; with more, the
/// least-squares solution is returned (see [`solve_homography_lstsq`]).
///
/// # Arguments
///
/// * `src` - The source 2d points with shape (N, 2).
/// * `dst` - The destination 2d points with shape (N, 2).
///
/// # Returns
///
/// The row-major 3x3 homography from src to dst with `h[2][2] == 1.0`.
///
/// # Errors
///
/// * [`HomographyError::MismatchedLengths`] if `src` and `dst` differ in length.
/// * [`HomographyError::InsufficientCorrespondences`] if fewer than 4 points are given.
/// * [`HomographyError::NonFinitePoint`] if a coordinate is NaN or infinite.
/// * [`HomographyError::SingularSystem`] for degenerate configurations such as
///   collinear or repeated points.
///
/// # Example
///
/// ```
/// use rectify_homography::get_perspective_transform;
///
/// let src = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// let dst = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
///
/// let h = get_perspective_transform(&src, &dst).unwrap();
/// assert!((h[0][0] - 2.0).abs() < 1e-9);
/// assert!((h[1][1] - 2.0).abs() < 1e-9);
/// ```
pub fn get_perspective_transform(
    src: &[Point2],
    dst: &[Point2],
) -> Result<Mat33, HomographyError> {
    get_perspective_transform_with_params(src, dst, &SolverParams::default())
}

/// Compute the perspective transform between exactly four correspondences.
///
/// Same as [`get_perspective_transform`] but the point count is checked by the
/// type system.
pub fn get_perspective_transform_4pt(
    src: &[Point2; 4],
    dst: &[Point2; 4],
) -> Result<Mat33, HomographyError> {
    get_perspective_transform(src, dst)
}

/// Compute the perspective transform with explicit solver tolerances.
///
/// See [`get_perspective_transform`] for the details.
pub fn get_perspective_transform_with_params(
    src: &[Point2],
    dst: &[Point2],
    params: &SolverParams,
) -> Result<Mat33, HomographyError> {
    let system = NormalizedSystem::new(src, dst, params)?;
    let (mat_a, mat_b) = (&system.mat_a, &system.mat_b);

    let h = if src.len() == MIN_CORRESPONDENCES {
        log::debug!("solving square 8x8 homography system");
        mat_a.as_ref().partial_piv_lu().solve(mat_b.as_ref())
    } else {
        log::debug!(
            "solving overdetermined {}x8 homography system in the least-squares sense",
            mat_a.nrows()
        );
        mat_a.as_ref().qr().solve_lstsq(mat_b.as_ref())
    };

    denormalize(&params_to_mat33(&h)?, &system.t_src, &system.t_dst)
}

/// Compute the least-squares perspective transform from N >= 4 correspondences.
///
/// Minimizes the algebraic error `||A * a - b||` of the stacked system with a QR
/// decomposition. For N == 4 this agrees with the direct solve. No outlier
/// rejection or iterative refinement is performed.
pub fn solve_homography_lstsq(
    src: &[Point2],
    dst: &[Point2],
    params: &SolverParams,
) -> Result<Mat33, HomographyError> {
    let system = NormalizedSystem::new(src, dst, params)?;
    let (mat_a, mat_b) = (&system.mat_a, &system.mat_b);

    let h = mat_a.as_ref().qr().solve_lstsq(mat_b.as_ref());

    denormalize(&params_to_mat33(&h)?, &system.t_src, &system.t_dst)
}

/// The linear system of a correspondence set in normalized coordinates.
struct NormalizedSystem {
    mat_a: faer::Mat<f64>,
    mat_b: faer::Mat<f64>,
    t_src: Mat33,
    t_dst: Mat33,
}

impl NormalizedSystem {
    fn new(src: &[Point2], dst: &[Point2], params: &SolverParams) -> Result<Self, HomographyError> {
        check_correspondences(src, dst)?;

        let (src_n, t_src) = normalize_points(src)?;
        let (dst_n, t_dst) = normalize_points(dst)?;

        if src.len() == MIN_CORRESPONDENCES {
            check_quad(&src_n, params)?;
            check_quad(&dst_n, params)?;
        }

        let (mat_a, mat_b) = build_linear_system(&src_n, &dst_n);
        check_rank(&mat_a, params)?;

        Ok(Self {
            mat_a,
            mat_b,
            t_src,
            t_dst,
        })
    }
}

fn check_correspondences(src: &[Point2], dst: &[Point2]) -> Result<(), HomographyError> {
    if src.len() != dst.len() {
        return Err(HomographyError::MismatchedLengths(src.len(), dst.len()));
    }

    if src.len() < MIN_CORRESPONDENCES {
        return Err(HomographyError::InsufficientCorrespondences {
            required: MIN_CORRESPONDENCES,
            actual: src.len(),
        });
    }

    let non_finite = src
        .iter()
        .zip(dst.iter())
        .position(|(p, q)| !(p.iter().chain(q.iter()).all(|v| v.is_finite())));

    match non_finite {
        Some(i) => Err(HomographyError::NonFinitePoint(i)),
        None => Ok(()),
    }
}

/// Similarity transform moving the centroid of `points` to the origin and
/// scaling their mean distance from it to `sqrt(2)`.
///
/// Returns the transformed points together with the transform `T`.
fn normalize_points(points: &[Point2]) -> Result<(Vec<Point2>, Mat33), HomographyError> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let mean_dist = points
        .iter()
        .map(|p| (p[0] - cx).hypot(p[1] - cy))
        .sum::<f64>()
        / n;

    // coincident points leave nothing to scale; the rank check rejects them
    let s = if mean_dist > 0.0 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let t = [[s, 0.0, -s * cx], [0.0, s, -s * cy], [0.0, 0.0, 1.0]];

    let points_n = linalg::transform_points(&t, points)
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(HomographyError::SingularSystem)?;

    if points_n.iter().flatten().any(|v| !v.is_finite()) {
        return Err(HomographyError::SingularSystem);
    }

    Ok((points_n, t))
}

/// Reject a normalized 4-point set in which three points are collinear or
/// coincide, since no invertible homography maps it onto a proper quad.
fn check_quad(points: &[Point2], params: &SolverParams) -> Result<(), HomographyError> {
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

    for [i, j, k] in TRIPLES {
        let (a, b, c) = (points[i], points[j], points[k]);
        let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        if cross.abs() <= params.rcond {
            log::warn!("points {i}, {j} and {k} are collinear");
            return Err(HomographyError::SingularSystem);
        }
    }

    Ok(())
}

/// Map a homography between normalized point sets back to input
/// coordinates as `T_dst^-1 * H * T_src`, rescaled so that `h33 == 1`.
fn denormalize(h_n: &Mat33, t_src: &Mat33, t_dst: &Mat33) -> Result<Mat33, HomographyError> {
    let t_dst_inv = linalg::inverse_mat33(t_dst)?;
    let mut h = linalg::mat33_mul(&t_dst_inv, &linalg::mat33_mul(h_n, t_src));

    // h33 == 0 cannot be expressed with the last entry fixed to one
    if h[2][2] == 0.0 || !h[2][2].is_finite() {
        return Err(HomographyError::SingularSystem);
    }

    linalg::normalize_mat33_inplace(&mut h);
    h[2][2] = 1.0;

    if h.iter().flatten().any(|v| !v.is_finite()) {
        return Err(HomographyError::SingularSystem);
    }

    Ok(h)
}

/// Stack two equations per correspondence into `A` (2N x 8) and `b` (2N x 1).
///
///   [x, y, 1, 0, 0, 0, -x * x', -y * x'] * a = x'
///   [0, 0, 0, x, y, 1, -x * y', -y * y'] * a = y'
fn build_linear_system(src: &[Point2], dst: &[Point2]) -> (faer::Mat<f64>, faer::Mat<f64>) {
    let num_rows = 2 * src.len();

    let mat_a = faer::Mat::<f64>::from_fn(num_rows, NUM_PARAMS, |row, col| {
        let ([x, y], [xp, yp]) = (src[row / 2], dst[row / 2]);
        let (u, v, target) = if row % 2 == 0 {
            ([x, y, 1.0], [0.0; 3], xp)
        } else {
            ([0.0; 3], [x, y, 1.0], yp)
        };
        match col {
            0..=2 => u[col],
            3..=5 => v[col - 3],
            6 => -x * target,
            _ => -y * target,
        }
    });

    let mat_b = faer::Mat::<f64>::from_fn(num_rows, 1, |row, _| {
        let [xp, yp] = dst[row / 2];
        if row % 2 == 0 {
            xp
        } else {
            yp
        }
    });

    (mat_a, mat_b)
}

fn check_rank(mat_a: &faer::Mat<f64>, params: &SolverParams) -> Result<(), HomographyError> {
    let singular_values = mat_a.as_ref().singular_values();

    if singular_values.iter().any(|s| !s.is_finite()) {
        log::warn!("homography system has non-finite singular values");
        return Err(HomographyError::SingularSystem);
    }

    let s_max = singular_values.iter().copied().fold(0.0, f64::max);
    let s_min = singular_values.iter().copied().fold(f64::INFINITY, f64::min);

    if s_max == 0.0 || s_min <= params.rcond * s_max {
        log::warn!("homography system is rank deficient: s_min = {s_min:e}, s_max = {s_max:e}");
        return Err(HomographyError::SingularSystem);
    }

    Ok(())
}

fn params_to_mat33(h: &faer::Mat<f64>) -> Result<Mat33, HomographyError> {
    let a: Vec<f64> = (0..NUM_PARAMS).map(|i| h.read(i, 0)).collect();

    if a.iter().any(|v| !v.is_finite()) {
        return Err(HomographyError::SingularSystem);
    }

    // a33 is fixed, not estimated
    Ok([
        [a[0], a[1], a[2]],
        [a[3], a[4], a[5]],
        [a[6], a[7], 1.0],
    ])
}
