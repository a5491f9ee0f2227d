use crate::{HomographyError, Mat33, Point2};

/// The 3x3 identity matrix.
pub const IDENTITY: Mat33 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Compute the determinant of a 3x3 matrix.
#[rustfmt::skip]
pub fn det_mat33(m: &Mat33) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[rustfmt::skip]
fn adjugate_mat33(m: &Mat33) -> Mat33 {
    [
        [
            m[1][1] * m[2][2] - m[1][2] * m[2][1],  // [0, 0]
            m[0][2] * m[2][1] - m[0][1] * m[2][2],  // [0, 1]
            m[0][1] * m[1][2] - m[0][2] * m[1][1],  // [0, 2]
        ],
        [
            m[1][2] * m[2][0] - m[1][0] * m[2][2],  // [1, 0]
            m[0][0] * m[2][2] - m[0][2] * m[2][0],  // [1, 1]
            m[0][2] * m[1][0] - m[0][0] * m[1][2],  // [1, 2]
        ],
        [
            m[1][0] * m[2][1] - m[1][1] * m[2][0],  // [2, 0]
            m[0][1] * m[2][0] - m[0][0] * m[2][1],  // [2, 1]
            m[0][0] * m[1][1] - m[0][1] * m[1][0],  // [2, 2]
        ],
    ]
}

/// Compute the inverse of a 3x3 matrix through its adjugate.
///
/// # Errors
///
/// Returns [`HomographyError::SingularSystem`] if the determinant is zero.
pub fn inverse_mat33(m: &Mat33) -> Result<Mat33, HomographyError> {
    let det = det_mat33(m);
    if det == 0.0 || !det.is_finite() {
        return Err(HomographyError::SingularSystem);
    }

    let inv_det = 1.0 / det;
    let mut inv_m = adjugate_mat33(m);
    inv_m
        .iter_mut()
        .flat_map(|row| row.iter_mut())
        .for_each(|v| *v *= inv_det);

    Ok(inv_m)
}

/// Multiply a 3x3 matrix by a 3d column vector.
pub fn mat33_mul_vec3(m: &Mat33, v: &[f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (out_i, row) in out.iter_mut().zip(m.iter()) {
        *out_i = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
    }
    out
}

/// Multiply two 3x3 matrices as `a * b`.
pub fn mat33_mul(a: &Mat33, b: &Mat33) -> Mat33 {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Scale a projective matrix in place so that its bottom-right entry is one.
///
/// Leaves the matrix untouched when that entry is zero.
pub fn normalize_mat33_inplace(m: &mut Mat33) {
    let s = m[2][2];
    if s == 0.0 {
        return;
    }
    m.iter_mut()
        .flat_map(|row| row.iter_mut())
        .for_each(|v| *v /= s);
}

/// Map a 2d point through a homography.
///
/// The point is lifted to homogeneous coordinates `[x, y, 1]`, multiplied by
/// `m` and divided by the resulting third coordinate.
///
/// Returns `None` when the point maps to infinity.
pub fn transform_point(m: &Mat33, p: Point2) -> Option<Point2> {
    let [x, y, w] = mat33_mul_vec3(m, &[p[0], p[1], 1.0]);
    if w == 0.0 {
        return None;
    }
    Some([x / w, y / w])
}

/// Map a set of 2d points through a homography.
///
/// Points that map to infinity are reported as `None`.
pub fn transform_points(m: &Mat33, points: &[Point2]) -> Vec<Option<Point2>> {
    points.iter().map(|p| transform_point(m, *p)).collect()
}

/// Compute the root-mean-square distance between `m * src` and `dst`.
///
/// Returns `None` if the sets are empty, differ in length or any source
/// point maps to infinity.
pub fn reprojection_error(m: &Mat33, src: &[Point2], dst: &[Point2]) -> Option<f64> {
    if src.is_empty() || src.len() != dst.len() {
        return None;
    }

    let mut sum_sq = 0.0;
    for (p, q) in src.iter().zip(dst.iter()) {
        let p_dst = transform_point(m, *p)?;
        let (dx, dy) = (p_dst[0] - q[0], p_dst[1] - q[1]);
        sum_sq += dx * dx + dy * dy;
    }

    Some((sum_sq / src.len() as f64).sqrt())
}
