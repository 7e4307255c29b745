//! 화면 캡처 소스 포트.
//!
//! 구현: `vidpilot-vision` crate (xcap)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::PixelBuffer;

/// 화면 캡처 소스: 전체 화면 RGBA 픽셀 제공
///
/// 구현체: `XcapScreenSource` (주 모니터), 테스트용 고정 프레임 소스
#[async_trait]
pub trait ScreenSource: Send + Sync {
    /// 전체 화면 픽셀 캡처
    ///
    /// 디스플레이 없음, 권한 거부 등 OS 캡처 실패 시 `CoreError::Capture`.
    async fn capture_screen(&self) -> Result<PixelBuffer, CoreError>;

    /// 소스 이름 (예: "xcap")
    fn source_name(&self) -> &str;
}
