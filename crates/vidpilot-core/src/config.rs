//! 엔진 설정 구조체.
//!
//! 비전 파이프라인과 입력 액추에이터의 수치/동작 설정을 정의한다.
//! 모든 필드에 serde 기본값이 있으므로 부분 JSON 문서는 내장 기본값 위에
//! 얕게 병합된다. 범위 검증은 하지 않는다 (호출자 책임).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 엔진 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 비전(감지) 설정
    #[serde(default)]
    pub vision: VisionConfig,
    /// 액추에이터(입력) 설정
    #[serde(default)]
    pub actuator: ActuatorConfig,
}

// ============================================================
// 비전 설정
// ============================================================

/// 비전 파이프라인 설정: 캡처, OCR, 분류기, 템플릿 매칭
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// 스크린샷 저장 디렉토리 (None이면 저장하지 않음)
    #[serde(default)]
    pub screenshot_dir: Option<PathBuf>,
    /// OCR 언어 (Tesseract 형식, 예: "chi_sim+eng")
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
    /// 이 값 이하의 OCR 신뢰도(0~100)는 버린다
    #[serde(default = "default_min_text_confidence")]
    pub min_text_confidence: f64,
    /// 템플릿 매칭 수용 임계값 (0.0 ~ 1.0)
    #[serde(default = "default_template_match_threshold")]
    pub template_match_threshold: f64,
    /// 슬라이딩 윈도우 보폭 (픽셀)
    #[serde(default = "default_template_stride")]
    pub template_stride: u32,
    /// 윈도우 내부 샘플링 간격 (픽셀)
    #[serde(default = "default_template_sample_step")]
    pub template_sample_step: u32,
    /// 비디오 영역 스캔 블록 크기 (픽셀)
    #[serde(default = "default_video_block_size")]
    pub video_block_size: u32,
    /// 블록 내부 샘플링 간격 (픽셀)
    #[serde(default = "default_video_sample_step")]
    pub video_sample_step: u32,
    /// 어두운 픽셀 판정 휘도 상한 ((r+g+b)/3 < 값)
    #[serde(default = "default_video_dark_luminance")]
    pub video_dark_luminance: u32,
    /// 비디오 후보 판정 어두운 픽셀 비율 (초과 시 후보)
    #[serde(default = "default_video_dark_ratio")]
    pub video_dark_ratio: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: None,
            ocr_language: default_ocr_language(),
            tessdata_path: None,
            min_text_confidence: default_min_text_confidence(),
            template_match_threshold: default_template_match_threshold(),
            template_stride: default_template_stride(),
            template_sample_step: default_template_sample_step(),
            video_block_size: default_video_block_size(),
            video_sample_step: default_video_sample_step(),
            video_dark_luminance: default_video_dark_luminance(),
            video_dark_ratio: default_video_dark_ratio(),
        }
    }
}

// ============================================================
// 액추에이터 설정
// ============================================================

/// 입력 액추에이터 설정: 속도, 지연, 안전 여백, 재시도
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// 마우스 속도 (높을수록 단계 간 지연이 짧아짐, 단계 수는 불변)
    #[serde(default = "default_mouse_speed")]
    pub mouse_speed: u32,
    /// 버튼 이벤트 전 안정화 지연 (밀리초)
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
    /// 더블 클릭 두 번째 클릭 전 지연 (밀리초)
    #[serde(default = "default_double_click_delay_ms")]
    pub double_click_delay_ms: u64,
    /// 키 조합 단계 사이 지연 (밀리초)
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
    /// 복합 키 유지 시간 (밀리초)
    #[serde(default = "default_combo_hold_ms")]
    pub combo_hold_ms: u64,
    /// 드래그 버튼 누름/놓음 전후 지연 (밀리초)
    #[serde(default = "default_drag_hold_ms")]
    pub drag_hold_ms: u64,
    /// 스크롤 전 이동 후 안정화 지연 (밀리초)
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,
    /// 문자 단위 타이핑 지연 (밀리초)
    #[serde(default = "default_type_delay_ms")]
    pub type_delay_ms: u64,
    /// 보간 이동 기본 사용 여부
    #[serde(default = "default_true")]
    pub move_smooth: bool,
    /// 화면 가장자리 안전 여백 (픽셀)
    #[serde(default = "default_safety_margin")]
    pub safety_margin: i32,
    /// 스마트 클릭 최대 시도 횟수
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// 재시도 백오프 단위 (밀리초, 시도 번호에 곱해짐)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// 클릭 검증 대기 (밀리초)
    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u64,
    /// 사람 흉내 지연 하한 (밀리초, 포함)
    #[serde(default = "default_human_delay_min_ms")]
    pub human_delay_min_ms: u64,
    /// 사람 흉내 지연 상한 (밀리초, 미포함)
    #[serde(default = "default_human_delay_max_ms")]
    pub human_delay_max_ms: u64,
    /// 사람 흉내 좌표 흔들림 (±픽셀)
    #[serde(default = "default_human_jitter_px")]
    pub human_jitter_px: i32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            mouse_speed: default_mouse_speed(),
            click_delay_ms: default_click_delay_ms(),
            double_click_delay_ms: default_double_click_delay_ms(),
            key_delay_ms: default_key_delay_ms(),
            combo_hold_ms: default_combo_hold_ms(),
            drag_hold_ms: default_drag_hold_ms(),
            scroll_settle_ms: default_scroll_settle_ms(),
            type_delay_ms: default_type_delay_ms(),
            move_smooth: true,
            safety_margin: default_safety_margin(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            verify_delay_ms: default_verify_delay_ms(),
            human_delay_min_ms: default_human_delay_min_ms(),
            human_delay_max_ms: default_human_delay_max_ms(),
            human_jitter_px: default_human_jitter_px(),
        }
    }
}

impl ActuatorConfig {
    /// 보간 이동 단계 간 지연: `max(1, floor(20 / mouse_speed))` 밀리초
    pub fn step_delay(&self) -> Duration {
        let ms = 20u64.checked_div(u64::from(self.mouse_speed)).unwrap_or(20);
        Duration::from_millis(ms.max(1))
    }
}

// ============================================================
// EngineConfig impl
// ============================================================

impl EngineConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }

    /// JSON 문자열에서 설정 로드 (누락 필드는 기본값)
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Config(format!("설정 파싱 실패: {e}")))
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_ocr_language() -> String {
    "chi_sim+eng".to_string()
}
fn default_min_text_confidence() -> f64 {
    60.0
}
fn default_template_match_threshold() -> f64 {
    0.7
}
fn default_template_stride() -> u32 {
    10
}
fn default_template_sample_step() -> u32 {
    2
}
fn default_video_block_size() -> u32 {
    50
}
fn default_video_sample_step() -> u32 {
    5
}
fn default_video_dark_luminance() -> u32 {
    30
}
fn default_video_dark_ratio() -> f64 {
    0.7
}

fn default_mouse_speed() -> u32 {
    3
}
fn default_click_delay_ms() -> u64 {
    100
}
fn default_double_click_delay_ms() -> u64 {
    50
}
fn default_key_delay_ms() -> u64 {
    10
}
fn default_combo_hold_ms() -> u64 {
    50
}
fn default_drag_hold_ms() -> u64 {
    50
}
fn default_scroll_settle_ms() -> u64 {
    100
}
fn default_type_delay_ms() -> u64 {
    50
}
fn default_safety_margin() -> i32 {
    10
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    500
}
fn default_verify_delay_ms() -> u64 {
    200
}
fn default_human_delay_min_ms() -> u64 {
    100
}
fn default_human_delay_max_ms() -> u64 {
    300
}
fn default_human_jitter_px() -> i32 {
    3
}
