//! OCR 제공자 포트.
//!
//! Tesseract 등 외부 OCR 엔진을 추상화하는 인터페이스를 정의한다.
//! 엔진은 시작 비용이 크므로 `initialize` 후 여러 번 재사용하고,
//! 종료 시 `terminate`로 한 번 해제한다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::frame::PixelBuffer;

/// OCR 워드 결과 (제공자 무관 표준 구조)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// 인식된 텍스트
    pub text: String,
    /// 바운딩 박스 X 좌표
    pub x: i32,
    /// 바운딩 박스 Y 좌표
    pub y: i32,
    /// 바운딩 박스 너비
    pub width: u32,
    /// 바운딩 박스 높이
    pub height: u32,
    /// 인식 신뢰도 (0 ~ 100)
    pub confidence: f64,
}

/// OCR 제공자: 엔진 수명주기 + 워드 단위 인식
///
/// 구현체: `LocalOcrProvider` (`ocr` feature 시 Tesseract, 아니면 빈 결과)
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// 엔진 시작 + 언어 로드
    async fn initialize(&self, language: &str) -> Result<(), CoreError>;

    /// 이미지에서 워드 + 바운딩 박스 추출
    ///
    /// 텍스트가 없으면 빈 목록. 엔진 수준 실패만 에러.
    async fn extract_elements(&self, image: &PixelBuffer) -> Result<Vec<OcrResult>, CoreError>;

    /// 엔진 해제
    async fn terminate(&self) -> Result<(), CoreError>;

    /// 제공자 이름 (예: "local-tesseract")
    fn provider_name(&self) -> &str;
}
