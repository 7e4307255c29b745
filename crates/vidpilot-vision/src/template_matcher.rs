//! 템플릿 매처.
//!
//! 고정 보폭 슬라이딩 윈도우로 참조 이미지를 큰 프레임에서 찾는다.
//! 윈도우 점수는 템플릿 픽셀을 성기게 샘플링한 RGB 평균 절대 차이로 계산한다:
//! `similarity = max(0, 1 - meanDiff / 765)` (알파 무시).
//!
//! 최고 점수 윈도우는 임계값과 무관하게 반환되며, 수용 여부는 호출자가 판단한다.

use std::path::Path;

use tracing::debug;

use vidpilot_core::error::CoreError;
use vidpilot_core::models::detection::CustomElement;
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::models::geometry::{BoundingBox, Point};

/// 채널 차이 최대합 (255 × 3)
const MAX_CHANNEL_DIFF: f64 = 765.0;

/// 최고 점수 윈도우
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch {
    /// 윈도우 영역 (템플릿 크기)
    pub bbox: BoundingBox,
    /// 윈도우 중심
    pub center: Point,
    /// 유사도 (0.0 ~ 1.0)
    pub confidence: f64,
}

/// 슬라이딩 윈도우 템플릿 매처
#[derive(Debug, Clone, Copy)]
pub struct TemplateMatcher {
    stride: u32,
    sample_step: u32,
}

impl TemplateMatcher {
    /// 새 매처 생성 (0 값은 1로 보정)
    pub fn new(stride: u32, sample_step: u32) -> Self {
        Self {
            stride: stride.max(1),
            sample_step: sample_step.max(1),
        }
    }

    /// 프레임에서 템플릿과 가장 비슷한 윈도우 탐색
    ///
    /// 템플릿이 비었거나 프레임보다 크면 None.
    pub fn find(&self, image: &PixelBuffer, template: &PixelBuffer) -> Option<TemplateMatch> {
        let (tw, th) = (template.width(), template.height());
        if template.is_empty() || tw > image.width() || th > image.height() {
            debug!(
                template_width = tw,
                template_height = th,
                image_width = image.width(),
                image_height = image.height(),
                "템플릿이 프레임에 들어가지 않음"
            );
            return None;
        }

        let (mut best_x, mut best_y, mut best) = (0u32, 0u32, 0.0f64);
        let mut windows = 0usize;
        for y in (0..=image.height() - th).step_by(self.stride as usize) {
            for x in (0..=image.width() - tw).step_by(self.stride as usize) {
                let score = self.similarity(image, template, x, y);
                windows += 1;
                if score > best {
                    (best_x, best_y, best) = (x, y, score);
                }
            }
        }

        let bbox = BoundingBox::new(best_x as i32, best_y as i32, tw, th);
        debug!(windows, confidence = best, x = best_x, y = best_y, "템플릿 매칭 완료");
        Some(TemplateMatch {
            bbox,
            center: bbox.center(),
            confidence: best,
        })
    }

    /// 오프셋 `(ox, oy)` 윈도우의 유사도
    pub fn similarity(&self, image: &PixelBuffer, template: &PixelBuffer, ox: u32, oy: u32) -> f64 {
        let step = self.sample_step as usize;
        let mut total_diff = 0u64;
        let mut samples = 0u64;
        for ty in (0..template.height()).step_by(step) {
            for tx in (0..template.width()).step_by(step) {
                let a = image.rgb_at(ox + tx, oy + ty);
                let b = template.rgb_at(tx, ty);
                total_diff += a
                    .iter()
                    .zip(b.iter())
                    .map(|(p, q)| u64::from(p.abs_diff(*q)))
                    .sum::<u64>();
                samples += 1;
            }
        }
        if samples == 0 {
            return 0.0;
        }
        let mean = total_diff as f64 / samples as f64;
        (1.0 - mean / MAX_CHANNEL_DIFF).max(0.0)
    }
}

/// 이미지 파일(PNG/JPEG 등)을 읽어 사용자 정의 요소 생성
pub fn load_custom_element(
    name: impl Into<String>,
    path: impl AsRef<Path>,
) -> Result<CustomElement, CoreError> {
    let path = path.as_ref();
    let rgba = image::open(path)
        .map_err(|e| CoreError::Internal(format!("템플릿 로드 실패 {}: {e}", path.display())))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(CustomElement {
        name: name.into(),
        template: PixelBuffer::from_raw(width, height, rgba.into_raw())?,
    })
}
