use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tdse_cli::core::dub::aligner::{align, CharCountPolicy};
use tdse_cli::core::dub::splitter::split_proportionally;
use tdse_cli::core::dub::types::RecognizerSegment;

fn sample_text(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("This is sentence number {i} of the translated track."))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sample_segments(n: usize) -> Vec<RecognizerSegment> {
    (0..n)
        .map(|i| RecognizerSegment {
            start_s: i as f64 * 2.0,
            end_s: i as f64 * 2.0 + 1.5,
            text: format!("segment {i}"),
        })
        .collect()
}

fn bench_splitter(c: &mut Criterion) {
    let text = sample_text(50);

    c.bench_function("split_proportionally_20_parts", |b| {
        b.iter(|| split_proportionally(black_box(&text), black_box(20), black_box(0.2)).unwrap())
    });

    c.bench_function("split_proportionally_200_parts", |b| {
        let long_text = sample_text(400);
        b.iter(|| split_proportionally(black_box(&long_text), black_box(200), black_box(0.2)).unwrap())
    });
}

fn bench_aligner(c: &mut Criterion) {
    let policy = CharCountPolicy;

    c.bench_function("align_one_to_one_50_segments", |b| {
        let segments = sample_segments(50);
        let parts = split_proportionally(&sample_text(50), segments.len(), 0.2).unwrap();
        b.iter(|| align(black_box(&parts), black_box(&segments), black_box(100.0), &policy).unwrap())
    });

    c.bench_function("align_redistribution_200_parts_over_50_segments", |b| {
        let segments = sample_segments(50);
        let parts = split_proportionally(&sample_text(200), 200, 0.2).unwrap();
        b.iter(|| align(black_box(&parts), black_box(&segments), black_box(100.0), &policy).unwrap())
    });
}

criterion_group!(benches, bench_splitter, bench_aligner);
criterion_main!(benches);
