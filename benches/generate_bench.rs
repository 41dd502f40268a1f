use criterion::{black_box, criterion_group, criterion_main, Criterion};
use placeholdr::rendering::fit::{fit, BASE_POINT_SIZE};
use placeholdr::rendering::font::load_font;
use placeholdr::{generate, parse, Format, RequestDescriptor};

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_labelled_path", |b| {
        b.iter(|| parse(black_box("/some label here/640x480.jpeg")).unwrap())
    });
}

fn bench_fit(c: &mut Criterion) {
    let font = load_font().unwrap();
    c.bench_function("fit_label", |b| {
        b.iter(|| fit(&font, black_box(640), black_box(480), "640x480", BASE_POINT_SIZE).unwrap())
    });
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_640x480");
    for format in [Format::Png, Format::Jpeg, Format::Gif] {
        let req = RequestDescriptor {
            width: 640,
            height: 480,
            text: "640x480".to_string(),
            format,
        };
        group.bench_function(format!("{format:?}"), |b| b.iter(|| generate(black_box(&req)).unwrap()));
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_fit, bench_generate);
criterion_main!(benches);
