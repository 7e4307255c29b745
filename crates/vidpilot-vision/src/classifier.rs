//! 요소 분류기.
//!
//! 두 가지 독립 휴리스틱:
//! - 텍스트 조각 + 버튼 서술자 키워드 → 버튼 요소
//! - 고정 크기 블록 격자의 어두운 픽셀 비율 → 비디오 영역 후보
//!
//! 비디오 스캔은 블록 내부를 성기게 샘플링하는 근사치다. 격자에 정렬되지 않은
//! 어두운 영역은 놓칠 수 있으며, 병합 단계가 일부 보완한다.

use tracing::debug;

use vidpilot_core::config::VisionConfig;
use vidpilot_core::models::detection::{DetectedElement, ElementType, TextSpan};
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::models::geometry::BoundingBox;

use crate::descriptors;

/// 비디오 후보 박스 = 블록 4×3개
const VIDEO_SPAN_BLOCKS_X: u32 = 4;
const VIDEO_SPAN_BLOCKS_Y: u32 = 3;

/// 휴리스틱 요소 분류기
#[derive(Debug, Clone)]
pub struct ElementClassifier {
    block_size: u32,
    sample_step: u32,
    dark_luminance: u32,
    dark_ratio: f64,
}

impl ElementClassifier {
    /// 설정에서 분류기 생성
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            block_size: config.video_block_size.max(1),
            sample_step: config.video_sample_step.max(1),
            dark_luminance: config.video_dark_luminance,
            dark_ratio: config.video_dark_ratio,
        }
    }

    /// 텍스트 조각 → 버튼 요소
    ///
    /// 한 조각이 여러 버튼 서술자에 맞으면 유형마다 하나씩 생성한다.
    /// 신뢰도는 조각의 OCR 신뢰도(0~100)를 그대로 쓴다.
    pub fn classify_buttons(&self, spans: &[TextSpan]) -> Vec<DetectedElement> {
        let mut buttons = Vec::new();
        for span in spans {
            for (element_type, descriptor) in descriptors::buttons() {
                if descriptor.matches_text(&span.text) {
                    buttons.push(
                        DetectedElement::new(element_type.clone(), span.bbox, span.confidence)
                            .with_text(span.text.clone()),
                    );
                }
            }
        }
        debug!(spans = spans.len(), buttons = buttons.len(), "버튼 분류 완료");
        buttons
    }

    /// 어두운 블록 스캔 → 비디오 영역 후보 (병합 전)
    pub fn scan_video_areas(&self, frame: &PixelBuffer) -> Vec<DetectedElement> {
        let b = self.block_size;
        let (width, height) = (frame.width(), frame.height());
        let mut candidates = Vec::new();
        if width <= b || height <= b {
            return candidates;
        }

        let mut y = 0;
        while y < height - b {
            let mut x = 0;
            while x < width - b {
                let ratio = self.dark_fraction(frame, x, y);
                if ratio > self.dark_ratio {
                    let bbox = BoundingBox::new(
                        x as i32,
                        y as i32,
                        b * VIDEO_SPAN_BLOCKS_X,
                        b * VIDEO_SPAN_BLOCKS_Y,
                    );
                    candidates.push(DetectedElement::new(ElementType::VideoArea, bbox, ratio));
                }
                x += b;
            }
            y += b;
        }

        debug!(candidates = candidates.len(), block = b, "비디오 영역 스캔 완료");
        candidates
    }

    /// 블록 내부 샘플 중 어두운 픽셀 비율
    fn dark_fraction(&self, frame: &PixelBuffer, x: u32, y: u32) -> f64 {
        let threshold = self.dark_luminance * 3;
        let mut dark = 0u32;
        let mut total = 0u32;
        for dy in (0..self.block_size).step_by(self.sample_step as usize) {
            for dx in (0..self.block_size).step_by(self.sample_step as usize) {
                let [r, g, b] = frame.rgb_at(x + dx, y + dy);
                if u32::from(r) + u32::from(g) + u32::from(b) < threshold {
                    dark += 1;
                }
                total += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }
        f64::from(dark) / f64::from(total)
    }
}
