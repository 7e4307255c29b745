//! 감지 결과 모델.
//!
//! 텍스트 인식 → 요소 분류 → 템플릿 매칭 → 영역 병합 파이프라인이
//! 생산하는 데이터 구조를 정의한다. 모두 한 감지 사이클 동안만 유효한 스냅샷이다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::frame::PixelBuffer;
use crate::models::geometry::{BoundingBox, Point};

// ============================================================
// TextSpan: OCR 텍스트 조각
// ============================================================

/// OCR이 인식한 텍스트 조각
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// 인식된 텍스트
    pub text: String,
    /// 인식 신뢰도 (0 ~ 100)
    pub confidence: f64,
    /// 텍스트 영역
    pub bbox: BoundingBox,
}

// ============================================================
// ElementType: 의미 요소 유형
// ============================================================

/// 감지된 UI 요소 유형
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    /// 재생 버튼
    PlayButton,
    /// 일시정지 버튼
    PauseButton,
    /// 다음 회차 버튼
    NextButton,
    /// 비디오 재생 영역
    VideoArea,
    /// 진행 막대
    ProgressBar,
    /// 호출자가 정의한 템플릿 요소
    Custom(String),
}

impl ElementType {
    /// 버튼 계열인지 (키워드 기반 버튼 감지 대상)
    pub fn is_button(&self) -> bool {
        matches!(
            self,
            Self::PlayButton | Self::PauseButton | Self::NextButton
        )
    }

    /// 표시용 이름
    pub fn as_str(&self) -> &str {
        match self {
            Self::PlayButton => "playButton",
            Self::PauseButton => "pauseButton",
            Self::NextButton => "nextButton",
            Self::VideoArea => "videoArea",
            Self::ProgressBar => "progressBar",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// DetectedElement: 감지된 요소
// ============================================================

/// 분류기/매처가 생산하고 병합기가 통합하는 감지 요소
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedElement {
    /// 요소 유형
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// 요소 영역
    pub bbox: BoundingBox,
    /// 중심 좌표 (bbox에서 파생)
    pub center: Point,
    /// 감지 신뢰도 (버튼은 OCR 스케일 0~100, 그 외 0.0~1.0)
    pub confidence: f64,
    /// 버튼 감지의 근거 텍스트
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 병합된 원본 요소 수 (병합된 경우만)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<usize>,
}

impl DetectedElement {
    /// 새 감지 요소 생성 (중심 좌표는 bbox에서 계산)
    pub fn new(element_type: ElementType, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            element_type,
            bbox,
            center: bbox.center(),
            confidence,
            text: None,
            merged_from: None,
        }
    }

    /// 근거 텍스트 설정
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

// ============================================================
// DetectionResult: 한 감지 사이클의 스냅샷
// ============================================================

/// 한 감지 사이클의 결과 스냅샷
///
/// 비활성화되었거나 실패한 단계의 슬롯은 빈 목록이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// 캡처 시각
    pub timestamp: DateTime<Utc>,
    /// 신뢰도 필터를 통과한 텍스트 영역
    pub text_regions: Vec<TextSpan>,
    /// 키워드 기반 버튼
    pub buttons: Vec<DetectedElement>,
    /// 병합된 비디오 영역
    pub videos: Vec<DetectedElement>,
    /// 사용자 정의 템플릿 요소
    pub elements: Vec<DetectedElement>,
}

impl DetectionResult {
    /// 빈 결과 생성
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            text_regions: Vec::new(),
            buttons: Vec::new(),
            videos: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// 감지된 요소 총수 (텍스트 영역 제외)
    pub fn element_count(&self) -> usize {
        self.buttons.len() + self.videos.len() + self.elements.len()
    }

    /// 유형이 일치하는 첫 요소 (버튼 → 비디오 → 사용자 정의 순)
    pub fn find(&self, element_type: &ElementType) -> Option<&DetectedElement> {
        self.buttons
            .iter()
            .chain(self.videos.iter())
            .chain(self.elements.iter())
            .find(|e| &e.element_type == element_type)
    }
}

// ============================================================
// DetectOptions: 감지 옵션
// ============================================================

/// 사용자 정의 템플릿 요소 (이름 + 참조 이미지)
#[derive(Debug, Clone)]
pub struct CustomElement {
    /// 결과에 기록할 요소 이름
    pub name: String,
    /// 참조 템플릿 이미지
    pub template: PixelBuffer,
}

/// 감지 사이클 옵션: 단계별 토글
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// OCR 텍스트 인식
    pub detect_text: bool,
    /// 키워드 기반 버튼 감지
    pub detect_buttons: bool,
    /// 어두운 영역 비디오 감지
    pub detect_videos: bool,
    /// 캡처 영역 제한 (None이면 전체 화면)
    pub region: Option<BoundingBox>,
    /// 스크린샷 저장 파일 이름 (저장 활성 시)
    pub filename: Option<String>,
    /// 템플릿 매칭 대상
    pub custom_elements: Vec<CustomElement>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            detect_text: true,
            detect_buttons: true,
            detect_videos: true,
            region: None,
            filename: None,
            custom_elements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_center_is_derived() {
        let e = DetectedElement::new(
            ElementType::PlayButton,
            BoundingBox::new(10, 20, 40, 20),
            88.0,
        );
        assert_eq!(e.center, Point::new(30, 30));
        assert!(e.merged_from.is_none());
    }

    #[test]
    fn element_type_names() {
        assert_eq!(ElementType::NextButton.as_str(), "nextButton");
        assert_eq!(ElementType::Custom("logo".into()).to_string(), "logo");
        assert!(ElementType::PauseButton.is_button());
        assert!(!ElementType::VideoArea.is_button());
        assert!(!ElementType::ProgressBar.is_button());
    }

    #[test]
    fn element_serializes_camel_case() {
        let mut e = DetectedElement::new(
            ElementType::VideoArea,
            BoundingBox::new(0, 0, 200, 150),
            0.9,
        );
        e.merged_from = Some(3);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "videoArea");
        assert_eq!(json["mergedFrom"], 3);
        assert!(json.get("text").is_none());
    }

    #[test]
    fn result_find_and_count() {
        let mut result = DetectionResult::empty(Utc::now());
        assert_eq!(result.element_count(), 0);
        result.videos.push(DetectedElement::new(
            ElementType::VideoArea,
            BoundingBox::new(0, 0, 10, 10),
            0.8,
        ));
        result.buttons.push(DetectedElement::new(
            ElementType::NextButton,
            BoundingBox::new(5, 5, 10, 10),
            90.0,
        ));
        assert_eq!(result.element_count(), 2);
        assert!(result.find(&ElementType::NextButton).is_some());
        assert!(result.find(&ElementType::PlayButton).is_none());
    }

    #[test]
    fn default_options_enable_all_stages() {
        let opts = DetectOptions::default();
        assert!(opts.detect_text && opts.detect_buttons && opts.detect_videos);
        assert!(opts.custom_elements.is_empty());
    }
}
