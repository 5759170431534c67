// Longest-side cap applied during image preparation
use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};

use pixel_peek::image_handler::{
    DEFAULT_MAX_DIMENSION, ImageConfig, ImageHandler, ImagePreviewProfile, ImageSource, capped_dimensions,
};

fn png(img: DynamicImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png).expect("failed to encode test image");
    cursor.into_inner()
}

fn gradient(width: u32, height: u32) -> Vec<u8> {
    png(DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    })))
}

fn handler() -> ImageHandler {
    let _ = env_logger::builder().is_test(true).try_init();
    ImageHandler::new(ImageConfig::default()).expect("handler init failed")
}

#[test]
fn default_cap_is_500() {
    assert_eq!(DEFAULT_MAX_DIMENSION, 500);
    assert_eq!(ImageConfig::default().max_dimension, 500);
}

#[test]
fn wide_image_is_scaled_to_cap() {
    let prepared = handler()
        .prepare(ImageSource::Bytes(gradient(1000, 500)))
        .expect("prepare should succeed");

    assert_eq!(prepared.dimensions(), (500, 250));
    assert_eq!((prepared.bitmap.width, prepared.bitmap.height), (500, 250));
    assert_eq!(prepared.original_size, (1000, 500));
    assert!(prepared.was_downscaled());
}

#[test]
fn tall_image_is_scaled_to_cap() {
    let prepared = handler()
        .prepare(ImageSource::Bytes(gradient(300, 900)))
        .expect("prepare should succeed");

    assert_eq!(prepared.dimensions(), (166, 500));
}

#[test]
fn small_image_keeps_native_size() {
    let prepared = handler()
        .prepare(ImageSource::Bytes(gradient(300, 200)))
        .expect("prepare should succeed");

    assert_eq!(prepared.dimensions(), (300, 200));
    assert!(!prepared.was_downscaled());
}

#[test]
fn native_size_pixels_are_preserved_exactly() {
    let prepared = handler()
        .prepare(ImageSource::Bytes(gradient(64, 32)))
        .expect("prepare should succeed");

    let pixels = prepared.raster.pixels();
    assert_eq!(pixels.len(), 64 * 32);
    assert_eq!((pixels[0].r, pixels[0].g, pixels[0].b), (0, 0, 64));
    let last = pixels[64 * 32 - 1];
    assert_eq!((last.r, last.g, last.b), (63, 31, 64));
}

#[test]
fn alpha_channel_is_dropped() {
    let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(4, 4, Rgba([10, 20, 30, 0])));

    let prepared = handler()
        .prepare(ImageSource::Bytes(png(rgba)))
        .expect("prepare should succeed");

    let first = prepared.raster.pixels()[0];
    assert_eq!((first.r, first.g, first.b), (10, 20, 30));
}

#[test]
fn profile_changes_cap() {
    let handler = handler();
    handler
        .set_preview_profile(ImagePreviewProfile::Compact)
        .expect("set profile failed");

    let prepared = handler
        .prepare(ImageSource::Bytes(gradient(1000, 500)))
        .expect("prepare should succeed");

    assert_eq!(prepared.dimensions(), (400, 200));
}

#[test]
fn capped_dimensions_edge_cases() {
    assert_eq!(capped_dimensions(500, 500, 500), (500, 500));
    assert_eq!(capped_dimensions(501, 1, 500), (500, 1));
    assert_eq!(capped_dimensions(10_000, 1, 500), (500, 1));
    assert_eq!(capped_dimensions(1, 10_000, 500), (1, 500));
    assert_eq!(capped_dimensions(999, 333, 500), (500, 166));
}
