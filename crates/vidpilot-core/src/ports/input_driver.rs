//! 입력 드라이버 포트.
//!
//! OS 입력 계층(마우스/키보드 합성, 포인터 위치, 화면 크기)에 대한
//! 크로스 플랫폼 인터페이스를 정의한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::automation::{ButtonAction, MouseButton, ScrollDirection};
use crate::models::geometry::{Point, ScreenGeometry};

/// 입력 드라이버: 저수준 마우스/키보드 시뮬레이션 인터페이스
///
/// 구현체: `EnigoInputDriver` (실제 입력), `NoOpInputDriver` (테스트용)
#[async_trait]
pub trait InputDriver: Send + Sync {
    /// 포인터를 절대 좌표로 즉시 이동
    async fn mouse_move(&self, x: i32, y: i32) -> Result<(), CoreError>;

    /// 현재 위치에서 버튼 이벤트
    async fn mouse_button(&self, button: MouseButton, action: ButtonAction)
        -> Result<(), CoreError>;

    /// 스크롤 (클릭 단위)
    async fn scroll(&self, direction: ScrollDirection, clicks: u32) -> Result<(), CoreError>;

    /// 텍스트 입력
    async fn type_text(&self, text: &str) -> Result<(), CoreError>;

    /// 키 누름
    async fn key_press(&self, key: &str) -> Result<(), CoreError>;

    /// 키 놓음
    async fn key_release(&self, key: &str) -> Result<(), CoreError>;

    /// 키 탭 (누름 + 놓음)
    async fn key_tap(&self, key: &str) -> Result<(), CoreError>;

    /// 현재 포인터 위치 (OS 입력 계층 소유, 관찰만)
    async fn cursor_position(&self) -> Result<Point, CoreError>;

    /// 주 디스플레이 크기
    async fn screen_size(&self) -> Result<ScreenGeometry, CoreError>;

    /// 플랫폼 이름 (예: "macos", "windows", "linux")
    fn platform(&self) -> &str;
}
