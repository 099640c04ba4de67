//! Outgoing message publishing.

use crate::camera_rig::common::error::Result;
use crate::camera_rig::decode::DecodedImage;
use crate::camera_rig::wire::{ImageBundle, ImageSlot, RawImageMessage};

use super::encoder::{ImageEncoder, encode_rgb};

/// Transport seam for outgoing messages.
pub trait ImageSink {
    fn publish_image(&self, channel: &str, message: &RawImageMessage) -> Result<()>;

    fn publish_bundle(&self, channel: &str, bundle: &ImageBundle) -> Result<()>;
}

/// Encodes and publishes a single uncompressed RGB image.
pub fn publish_rgb_image(
    sink: &dyn ImageSink,
    channel: &str,
    image: &DecodedImage,
    utime: i64,
) -> Result<()> {
    let mut message = encode_rgb(image)?;
    message.utime = utime;
    sink.publish_image(channel, &message)
}

/// Encodes and publishes a color + compressed-depth pair as one bundle.
///
/// Slots follow the stereo-head convention: the color frame rides in `LEFT`,
/// the depth frame in `DEPTH_MM_ZIPPED`.
pub fn publish_rgbd_bundle(
    sink: &dyn ImageSink,
    encoder: &mut ImageEncoder,
    channel: &str,
    color: &DecodedImage,
    depth: &DecodedImage,
    utime: i64,
) -> Result<()> {
    let mut color_message = encode_rgb(color)?;
    color_message.utime = utime;

    let mut depth_message = encoder.encode_compressed_depth(depth)?;
    depth_message.utime = utime;

    let bundle = ImageBundle {
        utime,
        images: vec![
            (ImageSlot::Left, color_message),
            (ImageSlot::DepthMmZipped, depth_message),
        ],
    };
    sink.publish_bundle(channel, &bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_rig::decode::PixelLayout;
    use crate::camera_rig::wire::types::pixel_format;

    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        images: Mutex<Vec<(String, RawImageMessage)>>,
        bundles: Mutex<Vec<(String, ImageBundle)>>,
    }

    impl ImageSink for RecordingSink {
        fn publish_image(&self, channel: &str, message: &RawImageMessage) -> Result<()> {
            self.images
                .lock()
                .unwrap()
                .push((channel.to_string(), message.clone()));
            Ok(())
        }

        fn publish_bundle(&self, channel: &str, bundle: &ImageBundle) -> Result<()> {
            self.bundles
                .lock()
                .unwrap()
                .push((channel.to_string(), bundle.clone()));
            Ok(())
        }
    }

    fn rgb(w: u32, h: u32) -> DecodedImage {
        DecodedImage {
            width: w,
            height: h,
            layout: PixelLayout::Rgb8,
            utime: 0,
            data: vec![128u8; (w * h * 3) as usize],
        }
    }

    fn depth(w: u32, h: u32) -> DecodedImage {
        DecodedImage {
            width: w,
            height: h,
            layout: PixelLayout::Gray16,
            utime: 0,
            data: vec![200u8; (w * h * 2) as usize],
        }
    }

    #[test]
    fn publishes_rgb_with_requested_timestamp() {
        let sink = RecordingSink::default();
        publish_rgb_image(&sink, "CAMERA_OUT", &rgb(4, 4), 777).unwrap();

        let sent = sink.images.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "CAMERA_OUT");
        assert_eq!(sent[0].1.utime, 777);
        assert_eq!(sent[0].1.pixel_format, pixel_format::RGB);
    }

    struct FailingSink;

    impl ImageSink for FailingSink {
        fn publish_image(&self, _channel: &str, _message: &RawImageMessage) -> Result<()> {
            Err(crate::camera_rig::common::RigError::Transport(
                "socket closed".to_string(),
            ))
        }

        fn publish_bundle(&self, _channel: &str, _bundle: &ImageBundle) -> Result<()> {
            Err(crate::camera_rig::common::RigError::Transport(
                "socket closed".to_string(),
            ))
        }
    }

    #[test]
    fn transport_failures_come_back_to_the_caller() {
        let result = publish_rgb_image(&FailingSink, "CAMERA_OUT", &rgb(4, 4), 1);
        assert!(matches!(
            result,
            Err(crate::camera_rig::common::RigError::Transport(_))
        ));
    }

    #[test]
    fn rgbd_bundle_carries_both_slots_with_one_timestamp() {
        let sink = RecordingSink::default();
        let mut encoder = ImageEncoder::new();
        publish_rgbd_bundle(&sink, &mut encoder, "RGBD_OUT", &rgb(8, 8), &depth(8, 8), 31)
            .unwrap();

        let sent = sink.bundles.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let bundle = &sent[0].1;
        assert_eq!(bundle.utime, 31);
        assert_eq!(bundle.images.len(), 2);
        assert_eq!(bundle.image_for(ImageSlot::Left).unwrap().utime, 31);
        let depth_message = bundle.image_for(ImageSlot::DepthMmZipped).unwrap();
        assert_eq!(depth_message.utime, 31);
        assert_eq!(depth_message.pixel_format, pixel_format::INVALID);
    }
}
