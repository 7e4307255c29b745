//! VIDPILOT 핵심 에러 타입.
//!
//! 비전/자동화 crate는 모두 `CoreError`를 그대로 반환한다.
//! 어댑터 내부 에러(예: Tesseract `OcrError`)는 경계에서 `CoreError`로 변환한다.

use thiserror::Error;

/// 코어 레이어 에러.
///
/// 감지 단계 에러(`Recognition`)는 파이프라인에서 빈 결과로 강등되고,
/// 입력 에러(`InvalidCoordinate`, `Actuation`)는 호출자에게 그대로 전파된다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 안전 여백 밖의 좌표: 입력 장치 I/O 전에 발생
    #[error("유효하지 않은 좌표: ({x}, {y})")]
    InvalidCoordinate {
        /// X 좌표
        x: i32,
        /// Y 좌표
        y: i32,
    },

    /// 스크린 캡처 실패 (디스플레이 없음, 권한 거부 등)
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// OCR 엔진 실패 (손상된 버퍼, 엔진 크래시)
    #[error("텍스트 인식 에러: {0}")]
    Recognition(String),

    /// 알 수 없는 액션 태그
    #[error("지원하지 않는 액션 유형: {0}")]
    UnsupportedAction(String),

    /// 입력 합성 실패 (장치 사용 중 등)
    #[error("입력 실행 에러: {0}")]
    Actuation(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
