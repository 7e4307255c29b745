//! 텍스트 인식기.
//!
//! `OcrProvider`를 감싸 엔진을 첫 호출 시 지연 시작하고, 이후 호출에서 재사용한다.
//! 엔진은 `shutdown()`으로 정확히 한 번 해제된다.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use vidpilot_core::error::CoreError;
use vidpilot_core::models::detection::TextSpan;
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::models::geometry::BoundingBox;
use vidpilot_core::ports::ocr_provider::{OcrProvider, OcrResult};

/// 엔진 수명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerState {
    /// 엔진 미시작
    Idle,
    /// 엔진 상주 중
    Ready,
    /// 해제 완료 (재시작하지 않음)
    ShutDown,
}

/// OCR 기반 텍스트 인식기
pub struct TextRecognizer {
    provider: Arc<dyn OcrProvider>,
    language: String,
    min_confidence: f64,
    state: Mutex<RecognizerState>,
}

impl TextRecognizer {
    /// 새 인식기 생성 (엔진은 아직 시작하지 않음)
    pub fn new(provider: Arc<dyn OcrProvider>, language: impl Into<String>, min_confidence: f64) -> Self {
        Self {
            provider,
            language: language.into(),
            min_confidence,
            state: Mutex::new(RecognizerState::Idle),
        }
    }

    /// 현재 엔진 상태
    pub async fn state(&self) -> RecognizerState {
        *self.state.lock().await
    }

    /// 픽셀 버퍼에서 텍스트 조각 추출
    ///
    /// 텍스트가 없으면 빈 목록. 엔진 실패 또는 해제 후 호출은 `CoreError::Recognition`.
    pub async fn recognize(&self, frame: &PixelBuffer) -> Result<Vec<TextSpan>, CoreError> {
        // 상태 잠금을 인식 끝까지 유지: 같은 인스턴스의 인식은 직렬화된다
        let mut state = self.state.lock().await;
        match *state {
            RecognizerState::ShutDown => {
                return Err(CoreError::Recognition("OCR 엔진이 이미 해제됨".to_string()));
            }
            RecognizerState::Idle => {
                self.provider
                    .initialize(&self.language)
                    .await
                    .map_err(into_recognition)?;
                *state = RecognizerState::Ready;
                info!(
                    provider = self.provider.provider_name(),
                    language = %self.language,
                    "OCR 엔진 시작"
                );
            }
            RecognizerState::Ready => {}
        }

        let words = self
            .provider
            .extract_elements(frame)
            .await
            .map_err(into_recognition)?;
        let total = words.len();
        let spans = filter_spans(words, self.min_confidence);
        debug!(total, kept = spans.len(), "텍스트 인식 완료");
        Ok(spans)
    }

    /// 엔진 해제: 첫 호출만 효과가 있다
    pub async fn shutdown(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        let previous = std::mem::replace(&mut *state, RecognizerState::ShutDown);
        match previous {
            RecognizerState::Ready => {
                self.provider.terminate().await.map_err(|e| {
                    warn!(error = %e, "OCR 엔진 해제 실패");
                    e
                })?;
                info!("OCR 엔진 해제 완료");
            }
            RecognizerState::Idle => debug!("OCR 엔진 미시작 상태에서 종료"),
            RecognizerState::ShutDown => debug!("OCR 엔진 이미 해제됨, 무시"),
        }
        Ok(())
    }
}

fn into_recognition(e: CoreError) -> CoreError {
    match e {
        CoreError::Recognition(_) => e,
        other => CoreError::Recognition(other.to_string()),
    }
}

/// 워드 결과 → 텍스트 조각 (신뢰도 `> min_confidence`, 빈 박스 제외)
pub fn filter_spans(words: Vec<OcrResult>, min_confidence: f64) -> Vec<TextSpan> {
    words
        .into_iter()
        .filter(|w| w.confidence > min_confidence && w.width > 0 && w.height > 0)
        .map(|w| TextSpan {
            bbox: BoundingBox::new(w.x, w.y, w.width, w.height),
            text: w.text,
            confidence: w.confidence,
        })
        .collect()
}
