//! 감지 파이프라인 통합 테스트.
//!
//! 설정(JSON) → 파이프라인 조립 → 캡처/인식/분류/병합/템플릿 매칭 검증.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use vidpilot_core::config::EngineConfig;
use vidpilot_core::error::CoreError;
use vidpilot_core::models::detection::{DetectOptions, ElementType};
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::models::geometry::{BoundingBox, Point};
use vidpilot_core::ports::ocr_provider::{OcrProvider, OcrResult};
use vidpilot_core::ports::vision::ScreenSource;
use vidpilot_vision::pipeline::DetectionPipeline;
use vidpilot_vision::template_matcher::load_custom_element;

/// 플레이어 화면: 밝은 배경 + (100..200, 100..150) 검정 영상 + (320..340, 200..220) 빨간 아이콘
fn player_frame() -> PixelBuffer {
    PixelBuffer::from_fn(400, 300, |x, y| {
        if (100..200).contains(&x) && (100..150).contains(&y) {
            [0, 0, 0, 255]
        } else if (320..340).contains(&x) && (200..220).contains(&y) {
            [220, 30, 30, 255]
        } else {
            [245, 245, 245, 255]
        }
    })
}

struct PlayerScreen;

#[async_trait]
impl ScreenSource for PlayerScreen {
    async fn capture_screen(&self) -> Result<PixelBuffer, CoreError> {
        Ok(player_frame())
    }
    fn source_name(&self) -> &str {
        "player"
    }
}

/// 고정 단어 목록을 돌려주는 OCR
struct PlayerOcr;

#[async_trait]
impl OcrProvider for PlayerOcr {
    async fn initialize(&self, _language: &str) -> Result<(), CoreError> {
        Ok(())
    }

    async fn extract_elements(&self, _image: &PixelBuffer) -> Result<Vec<OcrResult>, CoreError> {
        Ok(vec![
            OcrResult {
                text: "暂停".to_string(),
                x: 300,
                y: 20,
                width: 60,
                height: 20,
                confidence: 55.0,
            },
            OcrResult {
                text: "播放".to_string(),
                x: 20,
                y: 20,
                width: 40,
                height: 20,
                confidence: 45.0,
            },
            OcrResult {
                text: "第3集".to_string(),
                x: 150,
                y: 250,
                width: 50,
                height: 20,
                confidence: 91.0,
            },
        ])
    }

    async fn terminate(&self) -> Result<(), CoreError> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "player-ocr"
    }
}

fn pipeline_with(config: &EngineConfig) -> DetectionPipeline {
    DetectionPipeline::new(Arc::new(PlayerScreen), Arc::new(PlayerOcr), &config.vision)
}

#[tokio::test]
async fn default_threshold_drops_low_confidence_words() {
    let config = EngineConfig::default_config();
    let result = pipeline_with(&config)
        .detect(&DetectOptions::default())
        .await
        .unwrap();

    // 60 이하 신뢰도 단어는 제외
    assert_eq!(result.text_regions.len(), 1);
    assert_eq!(result.text_regions[0].text, "第3集");
    assert!(result.buttons.is_empty());
    assert_eq!(result.videos.len(), 1);
}

#[tokio::test]
async fn config_override_changes_text_threshold() {
    let config = EngineConfig::from_json_str(r#"{"vision": {"min_text_confidence": 50.0}}"#).unwrap();
    let result = pipeline_with(&config)
        .detect(&DetectOptions::default())
        .await
        .unwrap();

    assert_eq!(result.text_regions.len(), 2);
    let pause = result.find(&ElementType::PauseButton).unwrap();
    assert_eq!(pause.center, Point::new(330, 30));
    assert_eq!(pause.text.as_deref(), Some("暂停"));
    assert!(result.find(&ElementType::PlayButton).is_none());
}

#[tokio::test]
async fn region_capture_reports_relative_coordinates() {
    let config = EngineConfig::default_config();
    let options = DetectOptions {
        detect_text: false,
        detect_buttons: false,
        region: Some(BoundingBox::new(50, 50, 300, 200)),
        ..Default::default()
    };
    let result = pipeline_with(&config).detect(&options).await.unwrap();

    assert_eq!(result.videos.len(), 1);
    assert_eq!(result.videos[0].bbox, BoundingBox::new(50, 50, 250, 150));
    assert_eq!(result.videos[0].element_type, ElementType::VideoArea);
}

#[tokio::test]
async fn screenshot_is_persisted_when_directory_configured() {
    let dir = TempDir::new().unwrap();
    let mut config = EngineConfig::default_config();
    config.vision.screenshot_dir = Some(dir.path().join("shots"));

    let options = DetectOptions {
        detect_text: false,
        filename: Some("cycle.png".to_string()),
        ..Default::default()
    };
    pipeline_with(&config).detect(&options).await.unwrap();

    let saved = image::open(dir.path().join("shots").join("cycle.png")).unwrap();
    assert_eq!((saved.width(), saved.height()), (400, 300));
}

#[tokio::test]
async fn template_from_disk_is_located() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("icon.png");
    let icon = player_frame().crop(&BoundingBox::new(310, 190, 40, 40)).unwrap();
    image::save_buffer(
        &path,
        icon.as_raw(),
        icon.width(),
        icon.height(),
        image::ColorType::Rgba8,
    )
    .unwrap();

    let config = EngineConfig::default_config();
    let options = DetectOptions {
        detect_text: false,
        detect_buttons: false,
        detect_videos: false,
        custom_elements: vec![load_custom_element("icon", &path).unwrap()],
        ..Default::default()
    };
    let result = pipeline_with(&config).detect(&options).await.unwrap();

    assert_eq!(result.elements.len(), 1);
    let found = &result.elements[0];
    assert_eq!(found.element_type, ElementType::Custom("icon".to_string()));
    assert_eq!(found.bbox, BoundingBox::new(310, 190, 40, 40));
    assert_eq!(found.center, Point::new(330, 210));
    assert!(found.confidence > 0.99);
}
