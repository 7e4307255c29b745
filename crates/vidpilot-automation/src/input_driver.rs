//! 입력 드라이버 구현.
//!
//! `NoOpInputDriver` (테스트/시뮬레이션용)와 `EnigoInputDriver` (실제 입력)를 제공한다.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use vidpilot_core::error::CoreError;
use vidpilot_core::models::automation::{ButtonAction, MouseButton, ScrollDirection};
use vidpilot_core::models::geometry::{Point, ScreenGeometry};
use vidpilot_core::ports::input_driver::InputDriver;

/// 디스플레이를 조회할 수 없을 때 쓰는 기본 화면 크기
pub const FALLBACK_GEOMETRY: ScreenGeometry = ScreenGeometry {
    width: 1920,
    height: 1080,
};

// ============================================================
// NoOpInputDriver: 테스트/디버깅용
// ============================================================

/// No-Op 입력 드라이버: 모든 입력을 로깅만 하고 실행하지 않음
///
/// 포인터 위치는 마지막 이동 좌표로 추적한다.
pub struct NoOpInputDriver {
    geometry: ScreenGeometry,
    cursor: Mutex<Point>,
}

impl NoOpInputDriver {
    /// 지정 화면 크기로 생성 (포인터는 화면 중앙)
    pub fn new(geometry: ScreenGeometry) -> Self {
        let center = Point::new(geometry.width as i32 / 2, geometry.height as i32 / 2);
        Self {
            geometry,
            cursor: Mutex::new(center),
        }
    }
}

impl Default for NoOpInputDriver {
    fn default() -> Self {
        Self::new(FALLBACK_GEOMETRY)
    }
}

#[async_trait]
impl InputDriver for NoOpInputDriver {
    async fn mouse_move(&self, x: i32, y: i32) -> Result<(), CoreError> {
        *self.cursor.lock().await = Point::new(x, y);
        Ok(())
    }

    async fn mouse_button(
        &self,
        button: MouseButton,
        action: ButtonAction,
    ) -> Result<(), CoreError> {
        debug!(button = button.as_str(), ?action, "[NoOp] 마우스 버튼");
        Ok(())
    }

    async fn scroll(&self, direction: ScrollDirection, clicks: u32) -> Result<(), CoreError> {
        debug!(?direction, clicks, "[NoOp] 스크롤");
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), CoreError> {
        debug!(text_len = text.len(), "[NoOp] 텍스트 입력");
        Ok(())
    }

    async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[NoOp] 키 누름");
        Ok(())
    }

    async fn key_release(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[NoOp] 키 놓음");
        Ok(())
    }

    async fn key_tap(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[NoOp] 키 탭");
        Ok(())
    }

    async fn cursor_position(&self) -> Result<Point, CoreError> {
        Ok(*self.cursor.lock().await)
    }

    async fn screen_size(&self) -> Result<ScreenGeometry, CoreError> {
        Ok(self.geometry)
    }

    fn platform(&self) -> &str {
        "noop"
    }
}

// ============================================================
// EnigoInputDriver: 실제 마우스/키보드 입력
// ============================================================

/// 실제 마우스/키보드 입력 드라이버 (enigo 기반)
///
/// macOS: Accessibility 권한 필요
/// Windows: UIAccess 또는 관리자 권한 필요
/// Linux: X11 또는 Wayland + uinput 권한 필요
#[cfg(feature = "enigo")]
pub struct EnigoInputDriver {
    /// enigo 인스턴스 (Send지만 !Sync → tokio::sync::Mutex 사용)
    enigo: Mutex<enigo::Enigo>,
}

#[cfg(feature = "enigo")]
impl EnigoInputDriver {
    /// 새 EnigoInputDriver 생성
    pub fn new() -> Result<Self, CoreError> {
        let settings = enigo::Settings::default();
        let enigo = enigo::Enigo::new(&settings)
            .map_err(|e| CoreError::Actuation(format!("입력 드라이버 초기화 실패: {e}")))?;
        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }

    async fn key_with(&self, key: &str, direction: enigo::Direction) -> Result<(), CoreError> {
        use enigo::Keyboard;
        let parsed = parse_key(key)?;
        let mut enigo = self.enigo.lock().await;
        enigo
            .key(parsed, direction)
            .map_err(|e| CoreError::Actuation(format!("키 입력 실패 ({key}): {e}")))
    }
}

/// 문자열 → enigo 키 매핑
///
/// 특수 키 이름은 대소문자를 무시하고, 그 외 단일 문자는 Unicode 키로 매핑한다.
#[cfg(feature = "enigo")]
pub fn parse_key(key: &str) -> Result<enigo::Key, CoreError> {
    use enigo::Key;
    let parsed = match key.to_lowercase().as_str() {
        "enter" | "return" => Key::Return,
        "tab" => Key::Tab,
        "escape" | "esc" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "space" => Key::Space,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "up" | "uparrow" => Key::UpArrow,
        "down" | "downarrow" => Key::DownArrow,
        "left" | "leftarrow" => Key::LeftArrow,
        "right" | "rightarrow" => Key::RightArrow,
        "ctrl" | "control" => Key::Control,
        "shift" => Key::Shift,
        "alt" | "option" => Key::Alt,
        "meta" | "command" | "cmd" | "super" | "win" => Key::Meta,
        "capslock" => Key::CapsLock,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Key::Unicode(ch),
                _ => return Err(CoreError::Actuation(format!("알 수 없는 키: {key}"))),
            }
        }
    };
    Ok(parsed)
}

#[cfg(feature = "enigo")]
#[async_trait]
impl InputDriver for EnigoInputDriver {
    async fn mouse_move(&self, x: i32, y: i32) -> Result<(), CoreError> {
        use enigo::Mouse;
        let mut enigo = self.enigo.lock().await;
        enigo
            .move_mouse(x, y, enigo::Coordinate::Abs)
            .map_err(|e| CoreError::Actuation(format!("마우스 이동 실패: {e}")))
    }

    async fn mouse_button(
        &self,
        button: MouseButton,
        action: ButtonAction,
    ) -> Result<(), CoreError> {
        use enigo::Mouse;
        debug!(button = button.as_str(), ?action, "[Enigo] 마우스 버튼");
        let btn = match button {
            MouseButton::Left => enigo::Button::Left,
            MouseButton::Right => enigo::Button::Right,
            MouseButton::Middle => enigo::Button::Middle,
        };
        let direction = match action {
            ButtonAction::Press => enigo::Direction::Press,
            ButtonAction::Release => enigo::Direction::Release,
            ButtonAction::Click => enigo::Direction::Click,
        };
        let mut enigo = self.enigo.lock().await;
        enigo
            .button(btn, direction)
            .map_err(|e| CoreError::Actuation(format!("마우스 버튼 실패: {e}")))
    }

    async fn scroll(&self, direction: ScrollDirection, clicks: u32) -> Result<(), CoreError> {
        use enigo::Mouse;
        debug!(?direction, clicks, "[Enigo] 스크롤");
        // enigo: 양수 = 아래
        let length = i32::try_from(clicks).unwrap_or(i32::MAX);
        let length = match direction {
            ScrollDirection::Down => length,
            ScrollDirection::Up => -length,
        };
        let mut enigo = self.enigo.lock().await;
        enigo
            .scroll(length, enigo::Axis::Vertical)
            .map_err(|e| CoreError::Actuation(format!("스크롤 실패: {e}")))
    }

    async fn type_text(&self, text: &str) -> Result<(), CoreError> {
        use enigo::Keyboard;
        let mut enigo = self.enigo.lock().await;
        enigo
            .text(text)
            .map_err(|e| CoreError::Actuation(format!("텍스트 입력 실패: {e}")))
    }

    async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[Enigo] 키 누름");
        self.key_with(key, enigo::Direction::Press).await
    }

    async fn key_release(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[Enigo] 키 놓음");
        self.key_with(key, enigo::Direction::Release).await
    }

    async fn key_tap(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "[Enigo] 키 탭");
        self.key_with(key, enigo::Direction::Click).await
    }

    async fn cursor_position(&self) -> Result<Point, CoreError> {
        use enigo::Mouse;
        let enigo = self.enigo.lock().await;
        let (x, y) = enigo
            .location()
            .map_err(|e| CoreError::Actuation(format!("포인터 위치 조회 실패: {e}")))?;
        Ok(Point::new(x, y))
    }

    async fn screen_size(&self) -> Result<ScreenGeometry, CoreError> {
        use enigo::Mouse;
        let enigo = self.enigo.lock().await;
        let (w, h) = enigo
            .main_display()
            .map_err(|e| CoreError::Actuation(format!("화면 크기 조회 실패: {e}")))?;
        let width = u32::try_from(w).map_err(|_| CoreError::Actuation(format!("잘못된 화면 너비: {w}")))?;
        let height =
            u32::try_from(h).map_err(|_| CoreError::Actuation(format!("잘못된 화면 높이: {h}")))?;
        Ok(ScreenGeometry::new(width, height))
    }

    fn platform(&self) -> &str {
        #[cfg(target_os = "macos")]
        {
            "macos"
        }
        #[cfg(target_os = "windows")]
        {
            "windows"
        }
        #[cfg(target_os = "linux")]
        {
            "linux"
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            "unknown"
        }
    }
}

// ============================================================
// 마우스 버튼 매핑 유틸
// ============================================================

/// 문자열 → 마우스 버튼 매핑
///
/// 인식 가능한 값: "left", "right", "middle" (약어 l/r/m), 그 외는 왼쪽
pub fn parse_mouse_button(button: &str) -> MouseButton {
    match button.to_lowercase().as_str() {
        "right" | "r" => MouseButton::Right,
        "middle" | "m" => MouseButton::Middle,
        _ => MouseButton::Left,
    }
}

/// 플랫폼별 입력 드라이버 생성 팩토리
///
/// `enigo` feature 활성화 시 실제 입력 드라이버 반환,
/// 비활성화 또는 초기화 실패 시 NoOp 드라이버 반환.
pub fn create_platform_input_driver() -> Arc<dyn InputDriver> {
    #[cfg(feature = "enigo")]
    {
        match EnigoInputDriver::new() {
            Ok(driver) => {
                tracing::info!("실제 입력 드라이버 (enigo) 초기화 완료");
                return Arc::new(driver);
            }
            Err(e) => {
                tracing::warn!("enigo 초기화 실패, NoOp 폴백: {e}");
            }
        }
    }
    Arc::new(NoOpInputDriver::default())
}

// ============================================================
// 테스트
// ============================================================
