//! 감지 파이프라인.
//!
//! 캡처 → (선택) 텍스트 인식 → 버튼 분류 → 비디오 스캔 → 병합 → 템플릿 매칭
//! 순서로 한 감지 사이클을 실행한다. 단계는 순차 실행되며 병렬로 돌지 않는다.
//!
//! 캡처 실패만 사이클 전체를 중단시키고, 그 외 단계 실패는 로그 후
//! 해당 슬롯을 빈 목록으로 채운다.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vidpilot_core::config::VisionConfig;
use vidpilot_core::error::CoreError;
use vidpilot_core::models::detection::{
    CustomElement, DetectOptions, DetectedElement, DetectionResult, ElementType, TextSpan,
};
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::ports::ocr_provider::OcrProvider;
use vidpilot_core::ports::vision::ScreenSource;

use crate::capture::ScreenCapturer;
use crate::classifier::ElementClassifier;
use crate::region_merger::merge_overlapping;
use crate::template_matcher::TemplateMatcher;
use crate::text_recognizer::TextRecognizer;

/// 감지 파이프라인: 인스턴스당 한 번에 한 사이클
pub struct DetectionPipeline {
    capturer: ScreenCapturer,
    recognizer: TextRecognizer,
    classifier: ElementClassifier,
    matcher: TemplateMatcher,
    match_threshold: f64,
}

impl DetectionPipeline {
    /// 새 파이프라인 생성 (OCR 엔진은 첫 텍스트 인식 시 시작)
    pub fn new(
        source: Arc<dyn ScreenSource>,
        ocr: Arc<dyn OcrProvider>,
        config: &VisionConfig,
    ) -> Self {
        Self {
            capturer: ScreenCapturer::new(source, config.screenshot_dir.clone()),
            recognizer: TextRecognizer::new(
                ocr,
                config.ocr_language.clone(),
                config.min_text_confidence,
            ),
            classifier: ElementClassifier::new(config),
            matcher: TemplateMatcher::new(config.template_stride, config.template_sample_step),
            match_threshold: config.template_match_threshold,
        }
    }

    /// 한 감지 사이클 실행
    pub async fn detect(&self, options: &DetectOptions) -> Result<DetectionResult, CoreError> {
        let capture = self
            .capturer
            .capture(options.region.as_ref(), options.filename.as_deref())
            .await?;
        let frame = &capture.buffer;
        let mut result = DetectionResult::empty(capture.timestamp);

        if options.detect_text {
            result.text_regions = self.recognize_text(frame).await;
        }

        if options.detect_buttons {
            result.buttons = self.classifier.classify_buttons(&result.text_regions);
        }

        if options.detect_videos {
            let candidates = self.classifier.scan_video_areas(frame);
            result.videos = merge_overlapping(candidates);
        }

        for custom in &options.custom_elements {
            if let Some(element) = self.detect_custom(frame, custom) {
                result.elements.push(element);
            }
        }

        info!(
            elements = result.element_count(),
            text_regions = result.text_regions.len(),
            buttons = result.buttons.len(),
            videos = result.videos.len(),
            custom = result.elements.len(),
            "요소 감지 완료"
        );
        Ok(result)
    }

    /// OCR 엔진 해제: 이후 사이클의 텍스트 인식은 빈 목록으로 강등
    pub async fn shutdown(&self) -> Result<(), CoreError> {
        self.recognizer.shutdown().await
    }

    async fn recognize_text(&self, frame: &PixelBuffer) -> Vec<TextSpan> {
        match self.recognizer.recognize(frame).await {
            Ok(spans) => spans,
            Err(e) => {
                warn!(error = %e, "텍스트 인식 실패, 빈 결과로 대체");
                Vec::new()
            }
        }
    }

    /// 템플릿 매칭: 신뢰도가 임계값 초과일 때만 요소 생성
    fn detect_custom(&self, frame: &PixelBuffer, custom: &CustomElement) -> Option<DetectedElement> {
        let found = self.matcher.find(frame, &custom.template)?;
        if found.confidence <= self.match_threshold {
            debug!(
                name = %custom.name,
                confidence = found.confidence,
                threshold = self.match_threshold,
                "템플릿 매칭 임계값 미달"
            );
            return None;
        }
        Some(DetectedElement::new(
            ElementType::Custom(custom.name.clone()),
            found.bbox,
            found.confidence,
        ))
    }
}
