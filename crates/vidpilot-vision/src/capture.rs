//! 스크린 캡처.
//!
//! xcap 기반 주 모니터 캡처 소스와, 영역 자르기/스크린샷 저장을 담당하는
//! `ScreenCapturer`를 제공한다. 캡처 실패는 감지 사이클에 치명적이며
//! 내부에서 재시도하지 않는다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use xcap::Monitor;

use vidpilot_core::error::CoreError;
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::models::geometry::BoundingBox;
use vidpilot_core::ports::vision::ScreenSource;

// ============================================================
// XcapScreenSource: 주 모니터 캡처
// ============================================================

/// xcap 기반 화면 소스 (주 모니터)
pub struct XcapScreenSource;

impl XcapScreenSource {
    /// 새 캡처 소스 생성
    pub fn new() -> Self {
        Self
    }

    /// 주 모니터 동기 캡처
    fn capture_primary() -> Result<PixelBuffer, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;

        let monitor = monitors
            .into_iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| Monitor::all().ok()?.into_iter().next())
            .ok_or_else(|| CoreError::Capture("모니터를 찾을 수 없음".to_string()))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?;

        let (width, height) = image.dimensions();
        debug!("스크린 캡처 완료: {}x{}", width, height);

        PixelBuffer::from_raw(width, height, image.into_raw())
            .map_err(|e| CoreError::Capture(e.to_string()))
    }
}

impl Default for XcapScreenSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenSource for XcapScreenSource {
    async fn capture_screen(&self) -> Result<PixelBuffer, CoreError> {
        tokio::task::spawn_blocking(Self::capture_primary)
            .await
            .map_err(|e| CoreError::Capture(format!("캡처 작업 조인 실패: {e}")))?
    }

    fn source_name(&self) -> &str {
        "xcap"
    }
}

// ============================================================
// ScreenCapturer: 영역 자르기 + 스크린샷 저장
// ============================================================

/// 한 번의 캡처 결과
#[derive(Debug, Clone)]
pub struct Capture {
    /// 캡처 픽셀 (영역 지정 시 잘린 버퍼)
    pub buffer: PixelBuffer,
    /// 캡처 시각
    pub timestamp: DateTime<Utc>,
    /// 저장된 스크린샷 경로 (저장 비활성 또는 실패 시 None)
    pub saved_path: Option<PathBuf>,
}

/// 화면 캡처기: 소스 캡처 후 선택적으로 저장/자르기
pub struct ScreenCapturer {
    source: Arc<dyn ScreenSource>,
    screenshot_dir: Option<PathBuf>,
}

impl ScreenCapturer {
    /// 새 캡처기 생성 (`screenshot_dir`이 None이면 저장하지 않음)
    pub fn new(source: Arc<dyn ScreenSource>, screenshot_dir: Option<PathBuf>) -> Self {
        Self {
            source,
            screenshot_dir,
        }
    }

    /// 화면 캡처
    ///
    /// - `region`: 지정 시 해당 하위 영역만 반환
    /// - `filename`: 스크린샷 파일 이름 (None이면 `screenshot_<millis>.png`)
    pub async fn capture(
        &self,
        region: Option<&BoundingBox>,
        filename: Option<&str>,
    ) -> Result<Capture, CoreError> {
        let timestamp = Utc::now();
        let full = self.source.capture_screen().await?;

        let saved_path = match &self.screenshot_dir {
            Some(dir) => {
                let name = filename
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("screenshot_{}.png", timestamp.timestamp_millis()));
                let path = dir.join(name);
                match persist_screenshot(&full, &path).await {
                    Ok(()) => {
                        info!(path = %path.display(), "스크린샷 저장 완료");
                        Some(path)
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "스크린샷 저장 실패 (무시)");
                        None
                    }
                }
            }
            None => None,
        };

        let buffer = match region {
            Some(r) => full
                .crop(r)
                .map_err(|e| CoreError::Capture(format!("캡처 영역 자르기 실패: {e}")))?,
            None => full,
        };

        debug!(
            width = buffer.width(),
            height = buffer.height(),
            source = self.source.source_name(),
            "캡처 완료"
        );

        Ok(Capture {
            buffer,
            timestamp,
            saved_path,
        })
    }
}

/// PNG로 스크린샷 저장 (블로킹 인코딩은 별도 스레드)
async fn persist_screenshot(buffer: &PixelBuffer, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let frame = buffer.clone();
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image::save_buffer(
            &path,
            frame.as_raw(),
            frame.width(),
            frame.height(),
            image::ColorType::Rgba8,
        )
        .map_err(|e| CoreError::Internal(format!("PNG 인코딩 실패: {e}")))
    })
    .await
    .map_err(|e| CoreError::Internal(format!("저장 작업 조인 실패: {e}")))?
}
