//! Command line helpers shared by the demo binaries.

use rectify::homography::Point2;

/// A 2d point given on the command line as `x,y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointArg(pub Point2);

impl std::str::FromStr for PointArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected a point as `x,y`, got `{s}`"))?;
        let x = x.trim().parse().map_err(|e| format!("invalid x in `{s}`: {e}"))?;
        let y = y.trim().parse().map_err(|e| format!("invalid y in `{s}`: {e}"))?;
        Ok(Self([x, y]))
    }
}

/// Pick the correspondences to solve for.
///
/// The defaults are used only when neither `--src` nor `--dst` is given.
/// Otherwise both lists are passed on as they are, so a one-sided list
/// reaches the solver and fails there as a length mismatch.
pub fn resolve_points(
    src: &[PointArg],
    dst: &[PointArg],
    default_src: &[Point2],
    default_dst: &[Point2],
) -> (Vec<Point2>, Vec<Point2>) {
    if src.is_empty() && dst.is_empty() {
        return (default_src.to_vec(), default_dst.to_vec());
    }
    (
        src.iter().map(|p| p.0).collect(),
        dst.iter().map(|p| p.0).collect(),
    )
}
