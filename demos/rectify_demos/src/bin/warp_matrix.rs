use argh::FromArgs;

use rectify::homography::{get_perspective_transform, linalg};
use rectify_demos::{resolve_points, PointArg};

#[derive(FromArgs)]
/// Compute the perspective transform between two point sets and print it
struct Args {
    /// source point as `x,y`; repeat for every correspondence
    #[argh(option)]
    src: Vec<PointArg>,

    /// destination point as `x,y`; repeat for every correspondence
    #[argh(option)]
    dst: Vec<PointArg>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let (src, dst) = resolve_points(
        &args.src,
        &args.dst,
        &[[10.0, 457.0], [395.0, 291.0], [624.0, 291.0], [1000.0, 457.0]],
        &[[46.0, 920.0], [46.0, 100.0], [600.0, 100.0], [600.0, 920.0]],
    );

    let h = get_perspective_transform(&src, &dst)?;

    println!("warp matrix:");
    for row in h.iter() {
        println!("[{:>14.6e} {:>14.6e} {:>14.6e}]", row[0], row[1], row[2]);
    }

    if let Some(rmse) = linalg::reprojection_error(&h, &src, &dst) {
        log::info!("reprojection rmse: {rmse:.3e} px");
    }

    Ok(())
}
