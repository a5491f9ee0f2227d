use argh::FromArgs;
use std::path::PathBuf;

use rectify::{
    homography::get_perspective_transform,
    imgproc::{
        image_size, io,
        warp::{warp_perspective, InterpolationMode},
        ImageSize, RgbImage,
    },
};
use rectify_demos::{resolve_points, PointArg};

#[derive(FromArgs)]
/// Rectify a quadrilateral of an image and show it in Rerun
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// source corner as `x,y`; repeat four times
    #[argh(option)]
    src: Vec<PointArg>,

    /// destination corner as `x,y`; repeat four times
    #[argh(option)]
    dst: Vec<PointArg>,

    /// width of the rectified image
    #[argh(option, default = "337")]
    width: usize,

    /// height of the rectified image
    #[argh(option, default = "488")]
    height: usize,

    /// path to save the rectified image
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// do not open the Rerun viewer
    #[argh(switch)]
    no_viewer: bool,
}

fn log_image(
    rec: &rerun::RecordingStream,
    name: &str,
    img: &RgbImage,
) -> Result<(), Box<dyn std::error::Error>> {
    rec.log(
        name,
        &rerun::Image::from_elements(
            img.as_raw().as_slice(),
            [img.width(), img.height()],
            rerun::ColorModel::RGB,
        ),
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // the corners of the document in the photo and where they should land
    let (src, dst) = resolve_points(
        &args.src,
        &args.dst,
        &[[207.0, 151.0], [517.0, 285.0], [17.0, 601.0], [343.0, 731.0]],
        &[[0.0, 0.0], [337.0, 0.0], [0.0, 488.0], [337.0, 488.0]],
    );

    let img = io::read_image_rgb8(&args.image_path)?;
    log::info!("image size: {}", image_size(&img));

    let h = get_perspective_transform(&src, &dst)?;
    log::info!("warp matrix: {h:?}");

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let rectified = warp_perspective(&img, &h, size, InterpolationMode::Bilinear)?;

    if let Some(output) = &args.output {
        io::write_image(output, &rectified)?;
        log::info!("saved rectified image to {}", output.display());
    }

    if args.no_viewer {
        return Ok(());
    }

    // create a Rerun recording stream
    let rec = rerun::RecordingStreamBuilder::new("Rectify App").spawn()?;

    log_image(&rec, "src", &img)?;
    log_image(&rec, "result", &rectified)?;

    println!("press enter to exit");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    Ok(())
}
