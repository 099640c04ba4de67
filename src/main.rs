use nalgebra::{Isometry3, Point3};
use rigcam_rs::camera_rig::{
    CameraImageStore, CameraIntrinsics, FixedFrameGraph, PointSet, StaticCalibrationProvider,
    StoreConfig, wire::types::pixel_format, wire::RawImageMessage,
};
use rigcam_rs::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting rigcam demo rig...");

    let mut calibration = StaticCalibrationProvider::new();
    calibration.add_camera(
        "CAMERA_LEFT",
        CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0, 640, 480),
        "CAMERA_LEFT_FRAME",
    );
    calibration.add_camera(
        "CAMERACHEST_LEFT",
        CameraIntrinsics::new(265.0, 265.0, 320.0, 240.0, 640, 480),
        "CAMERACHEST_LEFT_FRAME",
    );
    // Wide-angle chest unit: skip edge samples during colorization.
    calibration.set_edge_exclusion("CAMERACHEST_LEFT");

    let mut frames = FixedFrameGraph::new();
    frames.add_sample(
        "local",
        "CAMERA_LEFT_FRAME",
        0,
        Isometry3::translation(0.0, 0.0, 1.0),
    );

    let mut store = CameraImageStore::with_config(calibration, frames, StoreConfig::default());
    store.add_camera_stream_single("CAMERA_LEFT");
    store.add_camera_stream_single("CAMERACHEST_LEFT");

    info!("Camera store initialized");
    info!("Registered cameras: {:?}", store.camera_names());

    // Push one synthetic gradient frame through the single-image path.
    let (w, h) = (640u32, 480u32);
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for row in 0..h {
        for col in 0..w {
            data.extend_from_slice(&[(col % 256) as u8, (row % 256) as u8, 128]);
        }
    }
    store.on_image_message(
        "CAMERA_LEFT",
        RawImageMessage {
            utime: 1_000,
            width: w,
            height: h,
            row_stride: w * 3,
            pixel_format: pixel_format::RGB,
            data,
        },
    );

    let image = store.decoded_image("CAMERA_LEFT")?;
    info!(
        width = image.width,
        height = image.height,
        utime = image.utime,
        "Decoded latest frame"
    );

    let mut set = PointSet::from_points(vec![
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.2, 0.1, 2.0),
        Point3::new(5.0, 5.0, 1.0),
    ]);
    match store.colorize_points("CAMERA_LEFT", &mut set) {
        Ok(()) => info!("Colorized demo points: {:?}", set.rgb),
        Err(e) => error!("Colorization failed: {e}"),
    }

    Ok(())
}
