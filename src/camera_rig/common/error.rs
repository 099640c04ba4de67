use thiserror::Error;

#[derive(Error, Debug)]
pub enum RigError {
    #[error("unknown camera: {0}")]
    UnknownCamera(String),

    #[error("no calibration available for camera: {0}")]
    MissingCalibration(String),

    #[error("calibration lookup failed for {0}: {1}")]
    CalibrationLookup(String, String),

    #[error("frame lookup failed from '{from}' to '{to}' at {utime}")]
    FrameLookup {
        from: String,
        to: String,
        utime: i64,
    },

    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(i32),

    #[error("unexpected pixel layout for camera {0}: expected 8-bit RGB")]
    LayoutMismatch(String),

    #[error("no images received on channel: {0}")]
    NoBundle(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RigError>;
