use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use rectify_homography::{
    get_perspective_transform, linalg, HomographyError, Mat33, Point2, SolverParams,
};

fn project_all(h: &Mat33, points: &[Point2]) -> Vec<Point2> {
    points
        .iter()
        .map(|p| linalg::transform_point(h, *p).expect("point maps to infinity"))
        .collect()
}

#[test]
fn identity_for_equal_point_sets() -> Result<(), HomographyError> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        // one jittered point per quadrant keeps the quad non-degenerate
        let points: Vec<Point2> = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
            .iter()
            .map(|c| {
                [
                    c[0] * 500.0 + rng.random_range(0.0..200.0),
                    c[1] * 500.0 + rng.random_range(0.0..200.0),
                ]
            })
            .collect();

        let h = get_perspective_transform(&points, &points)?;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(h[i][j], linalg::IDENTITY[i][j], epsilon = 1e-9);
            }
        }
    }
    Ok(())
}

// H acting on points scaled by `scale`: diag(s, s, 1) * H * diag(1 / s, 1 / s, 1)
fn rescale_homography(h: &Mat33, scale: f64) -> Mat33 {
    let s = [[scale, 0.0, 0.0], [0.0, scale, 0.0], [0.0, 0.0, 1.0]];
    let s_inv = [[1.0 / scale, 0.0, 0.0], [0.0, 1.0 / scale, 0.0], [0.0, 0.0, 1.0]];
    linalg::mat33_mul(&s, &linalg::mat33_mul(h, &s_inv))
}

#[test]
fn recovers_known_homography() -> Result<(), HomographyError> {
    let mut rng = StdRng::seed_from_u64(42);

    for scale in [1e-6, 1e-3, 1.0, 1e3, 1e6] {
        for _ in 0..40 {
            // one corner per cell of a unit square keeps the quad convex
            let quad: Vec<Point2> = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
                .iter()
                .map(|c| {
                    [
                        0.6 * c[0] + rng.random_range(0.0..0.4),
                        0.6 * c[1] + rng.random_range(0.0..0.4),
                    ]
                })
                .collect();

            let h_unit = [
                [
                    1.0 + rng.random_range(-0.2..0.2),
                    rng.random_range(-0.2..0.2),
                    rng.random_range(-0.5..0.5),
                ],
                [
                    rng.random_range(-0.2..0.2),
                    1.0 + rng.random_range(-0.2..0.2),
                    rng.random_range(-0.5..0.5),
                ],
                [
                    rng.random_range(-0.3..0.3),
                    rng.random_range(-0.3..0.3),
                    1.0,
                ],
            ];

            let src: Vec<Point2> = quad.iter().map(|p| [p[0] * scale, p[1] * scale]).collect();
            let h_true = rescale_homography(&h_unit, scale);
            let dst = project_all(&h_true, &src);

            let h = get_perspective_transform(&src, &dst)?;
            assert_eq!(h[2][2], 1.0);

            // compare at unit scale so every entry has the same magnitude
            let h_back = rescale_homography(&h, 1.0 / scale);
            for i in 0..3 {
                for j in 0..3 {
                    assert_relative_eq!(h_back[i][j], h_unit[i][j], epsilon = 1e-6);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn rectifies_document_quad() -> Result<(), HomographyError> {
    let src = [[207.0, 151.0], [517.0, 285.0], [17.0, 601.0], [343.0, 731.0]];
    let dst = [[0.0, 0.0], [337.0, 0.0], [0.0, 488.0], [337.0, 488.0]];

    let h = get_perspective_transform(&src, &dst)?;
    let rmse = linalg::reprojection_error(&h, &src, &dst)
        .ok_or(HomographyError::SingularSystem)?;
    assert!(rmse < 1e-6, "rmse too large: {rmse}");

    // the inverse maps the rectified corners back onto the photo
    let h_inv = linalg::inverse_mat33(&h)?;
    let back = project_all(&h_inv, &dst);
    for (p, q) in back.iter().zip(src.iter()) {
        assert_relative_eq!(p[0], q[0], epsilon = 1e-6);
        assert_relative_eq!(p[1], q[1], epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn rejects_invalid_inputs() {
    let _ = env_logger::builder().is_test(true).try_init();

    let quad = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let err = get_perspective_transform(&quad[..3], &quad[..3]).unwrap_err();
    assert!(err.is_invalid_input());

    let err = get_perspective_transform(&quad, &quad[..3]).unwrap_err();
    assert!(err.is_invalid_input());

    let collinear = [[0.0, 0.0], [2.0, 1.0], [4.0, 2.0], [6.0, 3.0]];
    let err = get_perspective_transform(&collinear, &quad).unwrap_err();
    assert_eq!(err, HomographyError::SingularSystem);
    assert!(!err.is_invalid_input());
}

#[test]
fn solves_concurrently() {
    let src = [[10.0, 457.0], [395.0, 291.0], [624.0, 291.0], [1000.0, 457.0]];
    let dst = [[46.0, 920.0], [46.0, 100.0], [600.0, 100.0], [600.0, 920.0]];
    let expected = get_perspective_transform(&src, &dst).expect("solve failed");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                rectify_homography::get_perspective_transform_with_params(
                    &src,
                    &dst,
                    &SolverParams::default(),
                )
            })
        })
        .collect();

    for handle in handles {
        let h = handle.join().expect("thread panicked").expect("solve failed");
        assert_eq!(h, expected);
    }
}
