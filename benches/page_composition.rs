//! Page Composition Benchmarks
//!
//! Measures the per-page compose step for each pattern style and the full
//! single-document pipeline (rasterize, compose, write).
//!
//! Run with: `cargo bench --bench page_composition`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use std::time::Duration;

use notebook_server::notebook::compose::compose_page;
use notebook_server::notebook::types::PageImage;
use notebook_server::notebook::{
    create_shared_pool, resolve, NotebookOptions, NotebookPipeline, PageSize, PatternStyle,
    Placement, SourceDocument, Spacing,
};

const DPI: u32 = 96;

/// Letter-size single page PDF (xref offsets are repaired on load)
fn create_letter_pdf() -> Vec<u8> {
    let pdf_content = b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << >> >>
endobj
4 0 obj
<< /Length 35 >>
stream
0.2 0.2 0.6 rg 100 100 412 592 re f
endstream
endobj
trailer
<< /Size 5 /Root 1 0 R >>
%%EOF";
    pdf_content.to_vec()
}

/// Benchmark compose_page for every style
fn bench_compose_styles(c: &mut Criterion) {
    let page_size = PageSize::new(612.0, 792.0);
    let layout = resolve(page_size, Placement::Left);
    let page = PageImage {
        index: 0,
        image: RgbImage::from_pixel(816, 1056, Rgb([40, 40, 160])),
    };

    let mut group = c.benchmark_group("compose_page");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(10));

    for style in PatternStyle::ALL {
        let options = NotebookOptions {
            placement: Placement::Left,
            style,
            spacing: Spacing::default(),
        };

        group.bench_with_input(BenchmarkId::new("letter", style), &options, |b, options| {
            b.iter(|| {
                let out = compose_page(black_box(&page), &layout, options, DPI)
                    .expect("Failed to compose page");
                black_box(out)
            })
        });
    }

    group.finish();
}

/// Benchmark the full pipeline for one document
fn bench_pipeline(c: &mut Criterion) {
    let pool = create_shared_pool(4).expect("Failed to create worker pool");
    let pipeline = NotebookPipeline::new(pool, DPI);
    let source = SourceDocument::from_bytes(create_letter_pdf(), "bench.pdf")
        .expect("Failed to open benchmark PDF");
    let options = NotebookOptions::default();

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(15));

    group.bench_function("letter_single_page", |b| {
        b.iter(|| {
            let out = pipeline
                .process_document(black_box(&source), &options)
                .expect("Failed to convert document");
            black_box(out)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compose_styles, bench_pipeline);
criterion_main!(benches);
