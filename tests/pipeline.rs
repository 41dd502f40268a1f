//! Pipeline properties: parse, fit, render and encode together

use placeholdr::rendering::fit::{fit, BASE_POINT_SIZE, FILL_RATIO};
use placeholdr::rendering::font::{load_font, measure};
use placeholdr::{generate, parse, Format, RequestDescriptor};
use sha2::{Digest, Sha256};

fn descriptor(width: u32, height: u32, text: &str, format: Format) -> RequestDescriptor {
    RequestDescriptor {
        width,
        height,
        text: text.to_string(),
        format,
    }
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[test]
fn every_format_decodes_at_requested_size() {
    for path in ["/64x32.png", "/label/64x32.jpg", "/64x32.jpeg", "/64x32.gif"] {
        let req = parse(path).expect("parse");
        let image = generate(&req).expect("generate");
        let decoded = image::load_from_memory(&image.bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (64, 32), "{path}");
    }
}

#[test]
fn identical_descriptors_produce_identical_bytes() {
    for format in [Format::Png, Format::Jpeg, Format::Gif] {
        let req = descriptor(200, 100, "same every time", format);
        let a = generate(&req).unwrap();
        let b = generate(&req).unwrap();
        assert_eq!(digest(&a.bytes), digest(&b.bytes), "{format:?}");
    }
}

#[test]
fn different_labels_produce_different_images() {
    let a = generate(&descriptor(120, 60, "one", Format::Png)).unwrap();
    let b = generate(&descriptor(120, 60, "two", Format::Png)).unwrap();
    assert_ne!(digest(&a.bytes), digest(&b.bytes));
}

#[test]
fn timestamps_are_monotonic() {
    let first: i64 = parse("/timestamp/100x50.gif").unwrap().text.parse().unwrap();
    let second = parse("/timestamp/100x50.gif").unwrap();
    assert_eq!(second.format, Format::Gif);
    let second: i64 = second.text.parse().unwrap();
    assert!(second >= first);
}

#[test]
fn timestamp_falls_inside_the_call() {
    let before = chrono::Utc::now().timestamp_millis();
    let req = parse("/timestamp/100x50.png").unwrap();
    let after = chrono::Utc::now().timestamp_millis();

    let stamp: i64 = req.text.parse().unwrap();
    assert!(before <= stamp && stamp <= after, "{before} <= {stamp} <= {after}");
}

#[test]
fn fitted_size_respects_margin_for_many_canvases() {
    let font = load_font().unwrap();
    for (w, h) in [(300, 150), (50, 50), (1920, 1080), (80, 600), (2000, 30)] {
        let text = format!("{w}x{h}");
        let points = fit(&font, w, h, &text, BASE_POINT_SIZE).unwrap();
        let extent = measure(&font, &text, points).unwrap();
        assert!(extent.width <= FILL_RATIO * w as f32 + 1e-3, "{text}");
        assert!(extent.height <= FILL_RATIO * h as f32 + 1e-3, "{text}");
    }
}

#[test]
fn png_output_is_gray_at_the_corners() {
    let image = generate(&descriptor(90, 45, "corner", Format::Png)).unwrap();
    let decoded = image::load_from_memory(&image.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [127, 127, 127, 255]);
    assert_eq!(decoded.get_pixel(89, 44).0, [127, 127, 127, 255]);
}
