pub mod camera_rig;
pub mod logger;
