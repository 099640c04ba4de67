use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rigcam_rs::camera_rig::{
    DecodedImage, ImageEncoder, PixelLayout, decode::decode_message, wire::RawImageMessage,
    wire::types::pixel_format,
};

fn gradient_rgb_message(width: u32, height: u32) -> RawImageMessage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for row in 0..height {
        for col in 0..width {
            let value = ((col + row) % 256) as u8;
            data.extend_from_slice(&[value, value, value]);
        }
    }
    RawImageMessage {
        utime: 0,
        width,
        height,
        row_stride: width * 3,
        pixel_format: pixel_format::RGB,
        data,
    }
}

fn gradient_depth_image(width: u32, height: u32) -> DecodedImage {
    let mut data = Vec::with_capacity((width * height * 2) as usize);
    for row in 0..height {
        for col in 0..width {
            data.extend_from_slice(&(((col + row) % 4096) as u16).to_le_bytes());
        }
    }
    DecodedImage {
        width,
        height,
        layout: PixelLayout::Gray16,
        utime: 0,
        data,
    }
}

fn benchmark_decode_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_rgb_by_size");

    let sizes = vec![
        (320, 240, "320x240"),
        (640, 480, "640x480"),
        (1024, 1024, "1024x1024"),
    ];

    for (width, height, label) in sizes {
        let message = gradient_rgb_message(width, height);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &message,
            |b, message| {
                b.iter(|| {
                    let _ = decode_message(black_box(message), false);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_depth_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("compressed_depth");
    let depth = gradient_depth_image(640, 480);

    group.bench_function("encode", |b| {
        let mut encoder = ImageEncoder::new();
        b.iter(|| {
            let _ = encoder.encode_compressed_depth(black_box(&depth));
        });
    });

    group.bench_function("encode_decode", |b| {
        let mut encoder = ImageEncoder::new();
        b.iter(|| {
            let message = encoder.encode_compressed_depth(black_box(&depth)).unwrap();
            let _ = decode_message(&message, false);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_decode_sizes, benchmark_depth_round_trip);
criterion_main!(benches);
