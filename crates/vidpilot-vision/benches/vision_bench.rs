//! vidpilot-vision 성능 벤치마크
//!
//! 실행: cargo bench -p vidpilot-vision
//!
//! 벤치마크 대상:
//! - 템플릿 매칭 (TemplateMatcher::find)
//! - 비디오 영역 스캔 (ElementClassifier::scan_video_areas)
//! - 영역 병합 (merge_overlapping)

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vidpilot_core::config::VisionConfig;
use vidpilot_core::models::detection::{DetectedElement, ElementType};
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::models::geometry::BoundingBox;
use vidpilot_vision::classifier::ElementClassifier;
use vidpilot_vision::region_merger::merge_overlapping;
use vidpilot_vision::template_matcher::TemplateMatcher;

/// 테스트용 패턴 프레임 생성
fn create_test_frame(width: u32, height: u32, seed: u8) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let r = (x as u8).wrapping_add(seed).wrapping_mul(17);
        let g = (y as u8).wrapping_add(seed).wrapping_mul(31);
        let b = (x as u8).wrapping_add(y as u8).wrapping_add(seed);
        [r, g, b, 255]
    })
}

/// 중앙에 어두운 플레이어 영역이 있는 프레임
fn create_player_frame(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        if x > width / 4 && x < width * 3 / 4 && y > height / 4 && y < height * 3 / 4 {
            [8, 8, 8, 255]
        } else {
            [230, 230, 230, 255]
        }
    })
}

/// 템플릿 매칭 벤치마크
fn bench_template_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_match");
    let matcher = TemplateMatcher::new(10, 2);

    let resolutions = [(640, 480), (1280, 720), (1920, 1080)];
    for (width, height) in resolutions {
        let frame = create_test_frame(width, height, 42);
        let Ok(template) = frame.crop(&BoundingBox::new(width as i32 / 2, height as i32 / 2, 48, 48))
        else {
            continue;
        };
        group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));

        group.bench_with_input(
            BenchmarkId::new("48x48_template", format!("{}x{}", width, height)),
            &(&frame, &template),
            |b, (frame, template)| {
                b.iter(|| black_box(matcher.find(frame, template)));
            },
        );
    }

    group.finish();
}

/// 비디오 영역 스캔 벤치마크
fn bench_video_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("video_scan");
    let classifier = ElementClassifier::new(&VisionConfig::default());

    for (width, height) in [(1280, 720), (1920, 1080), (2560, 1440)] {
        let frame = create_player_frame(width, height);
        group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));

        group.bench_with_input(
            BenchmarkId::new("scan", format!("{}x{}", width, height)),
            &frame,
            |b, frame| {
                b.iter(|| black_box(classifier.scan_video_areas(frame)));
            },
        );
    }

    group.finish();
}

/// 영역 병합 벤치마크 (격자 후보 = 스캔 결과와 같은 형태)
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_merge");

    for count in [16usize, 64, 256] {
        let side = (count as f64).sqrt() as i32;
        let candidates: Vec<DetectedElement> = (0..count as i32)
            .map(|i| {
                DetectedElement::new(
                    ElementType::VideoArea,
                    BoundingBox::new((i % side) * 50, (i / side) * 50, 200, 150),
                    0.9,
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("grid", count), &candidates, |b, c| {
            b.iter(|| black_box(merge_overlapping(c.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_template_match, bench_video_scan, bench_merge);
criterion_main!(benches);
