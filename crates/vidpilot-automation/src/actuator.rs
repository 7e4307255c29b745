//! 입력 액추에이터.
//!
//! 액션 요청을 검증한 뒤 입력 드라이버 호출과 타이밍 지연의 순서열로 실행한다.
//! 좌표는 안전 여백 안에서만 허용되며, 검증 실패 시 어떤 입력 I/O도 발생하지 않는다.
//! 인스턴스당 한 번에 한 액션만 실행된다 (액션 잠금).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use vidpilot_core::config::ActuatorConfig;
use vidpilot_core::error::CoreError;
use vidpilot_core::models::automation::{
    ActionRequest, ActionResult, BatchEntry, BatchItem, ButtonAction, MouseButton, RejectedItem,
    ScrollDirection,
};
use vidpilot_core::models::geometry::{BoundingBox, Point, ScreenGeometry};
use vidpilot_core::ports::input_driver::InputDriver;
use vidpilot_core::ports::vision::ScreenSource;

use crate::motion::interpolate;

/// 밀리초 대기 (0이면 즉시 반환)
async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// 입력 액추에이터
pub struct Actuator {
    driver: Arc<dyn InputDriver>,
    screen: Arc<dyn ScreenSource>,
    config: ActuatorConfig,
    geometry: ScreenGeometry,
    action_lock: Mutex<()>,
}

impl Actuator {
    /// 드라이버에서 화면 크기를 읽어 액추에이터 생성
    pub async fn new(
        driver: Arc<dyn InputDriver>,
        screen: Arc<dyn ScreenSource>,
        config: ActuatorConfig,
    ) -> Result<Self, CoreError> {
        let geometry = driver.screen_size().await?;
        info!(
            width = geometry.width,
            height = geometry.height,
            platform = driver.platform(),
            "액추에이터 초기화 완료"
        );
        Ok(Self::with_geometry(driver, screen, config, geometry))
    }

    /// 알려진 화면 크기로 액추에이터 생성
    pub fn with_geometry(
        driver: Arc<dyn InputDriver>,
        screen: Arc<dyn ScreenSource>,
        config: ActuatorConfig,
        geometry: ScreenGeometry,
    ) -> Self {
        Self {
            driver,
            screen,
            config,
            geometry,
            action_lock: Mutex::new(()),
        }
    }

    /// 좌표가 안전 여백 안인지 (`margin ≤ x ≤ width − margin`, y 동일)
    pub fn is_valid_coordinate(&self, x: i32, y: i32) -> bool {
        self.geometry
            .contains_with_margin(x, y, self.config.safety_margin)
    }

    fn ensure_valid(&self, x: i32, y: i32) -> Result<(), CoreError> {
        if self.is_valid_coordinate(x, y) {
            Ok(())
        } else {
            warn!(x, y, margin = self.config.safety_margin, "안전 여백 밖 좌표 거부");
            Err(CoreError::InvalidCoordinate { x, y })
        }
    }

    // ============================================================
    // 조회
    // ============================================================

    /// 초기화 시점의 화면 크기
    pub fn screen_geometry(&self) -> ScreenGeometry {
        self.geometry
    }

    /// 현재 포인터 위치
    pub async fn current_position(&self) -> Result<Point, CoreError> {
        self.driver.cursor_position().await
    }

    /// 좌표의 RGB 색상
    ///
    /// 좌표 검증 후 화면 소스에서 한 프레임을 받아 1×1로 잘라 읽는다.
    pub async fn pixel_color(&self, x: i32, y: i32) -> Result<[u8; 3], CoreError> {
        self.ensure_valid(x, y)?;
        let frame = self.screen.capture_screen().await?;
        let pixel = frame.crop(&BoundingBox::new(x, y, 1, 1))?;
        let [r, g, b, _] = pixel
            .get_pixel(0, 0)
            .ok_or_else(|| CoreError::Capture(format!("픽셀 ({x}, {y}) 읽기 실패")))?;
        Ok([r, g, b])
    }

    // ============================================================
    // 액션 실행
    // ============================================================

    /// 단일 액션 실행
    ///
    /// 성공 시 요청을 에코하는 결과, 실패 시 원인 에러를 그대로 반환한다.
    pub async fn perform_action(&self, request: &ActionRequest) -> Result<ActionResult, CoreError> {
        let _guard = self.action_lock.lock().await;
        match self.dispatch(request).await {
            Ok(()) => {
                info!(action = request.kind(), "액션 실행 완료");
                Ok(ActionResult::succeeded(request.clone()))
            }
            Err(e) => {
                error!(action = request.kind(), error = %e, "액션 실행 실패");
                Err(e)
            }
        }
    }

    /// 배치 실행: 실행된 항목마다 결과 하나
    ///
    /// 성공 후 `delay_ms`만큼 대기하고, 실패한 항목에 `stop_on_error`가 있으면
    /// 나머지를 실행하지 않는다.
    pub async fn perform_batch(&self, items: &[BatchItem]) -> Vec<ActionResult> {
        self.run_batch(items.iter().map(Ok::<_, &RejectedItem>), items.len())
            .await
    }

    /// 와이어 배치 실행: 파싱 단계에서 거부된 항목도 실패 결과 하나로 기록
    ///
    /// 거부된 항목은 입력 I/O 없이 실패로 처리되며, 그 항목의 `stop_on_error`를 따른다.
    pub async fn perform_batch_entries(&self, entries: &[BatchEntry]) -> Vec<ActionResult> {
        self.run_batch(entries.iter().map(Result::as_ref), entries.len())
            .await
    }

    async fn run_batch<'a, I>(&self, entries: I, total: usize) -> Vec<ActionResult>
    where
        I: Iterator<Item = Result<&'a BatchItem, &'a RejectedItem>>,
    {
        let mut results = Vec::with_capacity(total);
        for (index, entry) in entries.enumerate() {
            let stop = match entry {
                Ok(item) => match self.perform_action(&item.action).await {
                    Ok(result) => {
                        results.push(result);
                        if let Some(delay) = item.delay_ms {
                            pause(delay).await;
                        }
                        false
                    }
                    Err(e) => {
                        results.push(ActionResult::failed(item.action.kind(), &e));
                        item.stop_on_error
                    }
                },
                Err(rejected) => {
                    warn!(
                        index,
                        action = %rejected.action,
                        error = %rejected.error,
                        "배치 항목 거부"
                    );
                    results.push(ActionResult::failed(&rejected.action, &rejected.error));
                    rejected.stop_on_error
                }
            };
            if stop {
                warn!(index, total, "배치 실행 중단 (stopOnError)");
                break;
            }
        }

        let failed = results.iter().filter(|r| !r.success).count();
        info!(total, executed = results.len(), failed, "배치 실행 완료");
        results
    }

    /// 재시도 클릭
    ///
    /// 시도 `n` 실패 후 `retry_backoff_ms × n` 대기. 모든 시도 실패 시 마지막 에러 반환.
    pub async fn smart_click(
        &self,
        x: i32,
        y: i32,
        retries: Option<u32>,
        verify: bool,
    ) -> Result<ActionResult, CoreError> {
        let attempts = retries.unwrap_or(self.config.max_retries).max(1);
        let request = ActionRequest::Click {
            x,
            y,
            button: MouseButton::Left,
            smooth: None,
        };

        let mut attempt = 1u32;
        loop {
            match self.perform_action(&request).await {
                Ok(result) => {
                    if verify {
                        pause(self.config.verify_delay_ms).await;
                    }
                    return Ok(result);
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "스마트 클릭 시도 실패");
                    if attempt >= attempts {
                        return Err(e);
                    }
                    pause(self.config.retry_backoff_ms * u64::from(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// 사람 흉내 실행: 무작위 선행 지연 + 대상 좌표 흔들림
    pub async fn human_like_action(
        &self,
        request: &ActionRequest,
    ) -> Result<ActionResult, CoreError> {
        let (min, max) = (
            self.config.human_delay_min_ms,
            self.config.human_delay_max_ms,
        );
        let delay = if max > min {
            rand::random_range(min..max)
        } else {
            min
        };
        pause(delay).await;

        let jitter = self.config.human_jitter_px.max(0);
        let request = if request.target().is_some() && jitter > 0 {
            request.offset_by(
                rand::random_range(-jitter..=jitter),
                rand::random_range(-jitter..=jitter),
            )
        } else {
            request.clone()
        };
        debug!(delay_ms = delay, target = ?request.target(), "사람 흉내 액션");
        self.perform_action(&request).await
    }

    // ============================================================
    // 액션별 시퀀스
    // ============================================================

    async fn dispatch(&self, request: &ActionRequest) -> Result<(), CoreError> {
        match request {
            ActionRequest::Click {
                x,
                y,
                button,
                smooth,
            } => self.click(Point::new(*x, *y), *button, *smooth).await,
            ActionRequest::DoubleClick {
                x,
                y,
                button,
                smooth,
            } => self.double_click(Point::new(*x, *y), *button, *smooth).await,
            ActionRequest::RightClick { x, y, smooth } => {
                self.click(Point::new(*x, *y), MouseButton::Right, *smooth)
                    .await
            }
            ActionRequest::Move { x, y, smooth } => {
                self.ensure_valid(*x, *y)?;
                self.travel(Point::new(*x, *y), *smooth).await
            }
            ActionRequest::Drag {
                from_x,
                from_y,
                to_x,
                to_y,
                button,
                smooth,
            } => {
                self.drag(
                    Point::new(*from_x, *from_y),
                    Point::new(*to_x, *to_y),
                    *button,
                    *smooth,
                )
                .await
            }
            ActionRequest::Scroll {
                x,
                y,
                direction,
                clicks,
            } => self.scroll(*x, *y, *direction, *clicks).await,
            ActionRequest::Key { key, modifiers } => self.press_key(key, modifiers).await,
            ActionRequest::Type { text, delay_ms } => {
                self.type_chars(text, delay_ms.unwrap_or(self.config.type_delay_ms))
                    .await
            }
            ActionRequest::Combo { keys } => self.key_combo(keys).await,
        }
    }

    /// 목표점으로 이동 (smooth가 None이면 설정값)
    async fn travel(&self, target: Point, smooth: Option<bool>) -> Result<(), CoreError> {
        if smooth.unwrap_or(self.config.move_smooth) {
            self.smooth_move_to(target).await
        } else {
            self.driver.mouse_move(target.x, target.y).await
        }
    }

    /// 현재 위치에서 목표점까지 보간 이동
    async fn smooth_move_to(&self, target: Point) -> Result<(), CoreError> {
        let start = self.driver.cursor_position().await?;
        let step_delay = self.config.step_delay();
        let path = interpolate(start, target);
        debug!(
            from = ?start,
            to = ?target,
            steps = path.len() - 1,
            "보간 이동"
        );
        for point in path {
            self.driver.mouse_move(point.x, point.y).await?;
            tokio::time::sleep(step_delay).await;
        }
        Ok(())
    }

    async fn click(
        &self,
        target: Point,
        button: MouseButton,
        smooth: Option<bool>,
    ) -> Result<(), CoreError> {
        self.ensure_valid(target.x, target.y)?;
        self.travel(target, smooth).await?;
        pause(self.config.click_delay_ms).await;
        self.driver.mouse_button(button, ButtonAction::Click).await
    }

    async fn double_click(
        &self,
        target: Point,
        button: MouseButton,
        smooth: Option<bool>,
    ) -> Result<(), CoreError> {
        self.ensure_valid(target.x, target.y)?;
        self.travel(target, smooth).await?;
        pause(self.config.click_delay_ms).await;
        self.driver.mouse_button(button, ButtonAction::Click).await?;
        pause(self.config.double_click_delay_ms).await;
        self.driver.mouse_button(button, ButtonAction::Click).await
    }

    async fn drag(
        &self,
        from: Point,
        to: Point,
        button: MouseButton,
        smooth: Option<bool>,
    ) -> Result<(), CoreError> {
        self.ensure_valid(from.x, from.y)?;
        self.ensure_valid(to.x, to.y)?;

        self.travel(from, smooth).await?;
        pause(self.config.click_delay_ms).await;
        self.with_held_button(button, async {
            pause(self.config.drag_hold_ms).await;
            self.travel(to, smooth).await?;
            pause(self.config.drag_hold_ms).await;
            Ok(())
        })
        .await
    }

    /// 버튼을 누른 채 `held` 실행: 결과와 무관하게 버튼 해제 시도
    ///
    /// `held`가 실패한 경우 해제 에러는 로그만 남기고 원래 에러를 반환한다.
    async fn with_held_button<T, F>(&self, button: MouseButton, held: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let outcome = match self.driver.mouse_button(button, ButtonAction::Press).await {
            Ok(()) => held.await,
            Err(e) => Err(e),
        };
        let released = self
            .driver
            .mouse_button(button, ButtonAction::Release)
            .await;

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release_err)) => Err(release_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                warn!(
                    button = button.as_str(),
                    error = %release_err,
                    "실패 후 버튼 해제도 실패"
                );
                Err(e)
            }
        }
    }

    async fn scroll(
        &self,
        x: Option<i32>,
        y: Option<i32>,
        direction: ScrollDirection,
        clicks: u32,
    ) -> Result<(), CoreError> {
        match (x, y) {
            (Some(x), Some(y)) => {
                self.ensure_valid(x, y)?;
                self.driver.mouse_move(x, y).await?;
                pause(self.config.scroll_settle_ms).await;
            }
            (None, None) => {}
            _ => debug!(?x, ?y, "스크롤 좌표 일부만 지정, 현재 위치에서 스크롤"),
        }
        self.driver.scroll(direction, clicks).await
    }

    async fn press_key(&self, key: &str, modifiers: &[String]) -> Result<(), CoreError> {
        self.with_held_keys(modifiers, async {
            pause(self.config.key_delay_ms).await;
            self.driver.key_tap(key).await?;
            pause(self.config.key_delay_ms).await;
            Ok(())
        })
        .await
    }

    async fn type_chars(&self, text: &str, delay_ms: u64) -> Result<(), CoreError> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.driver.type_text(ch.encode_utf8(&mut buf)).await?;
            pause(delay_ms).await;
        }
        Ok(())
    }

    async fn key_combo(&self, keys: &[String]) -> Result<(), CoreError> {
        self.with_held_keys(keys, async {
            pause(self.config.combo_hold_ms).await;
            Ok(())
        })
        .await
    }

    /// 키를 순서대로 누른 채 `held` 실행: 눌린 키만 역순으로 모두 해제
    ///
    /// 누름이나 `held`가 실패하면 `held` 이후 단계는 건너뛰고 해제만 수행한다.
    /// 먼저 난 에러를 반환하며, 그 뒤의 해제 에러는 로그만 남긴다.
    async fn with_held_keys<T, F>(&self, keys: &[String], held: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let mut pressed = 0;
        let mut press_err = None;
        for key in keys {
            match self.driver.key_press(key).await {
                Ok(()) => pressed += 1,
                Err(e) => {
                    press_err = Some(e);
                    break;
                }
            }
        }
        let mut outcome = match press_err {
            None => held.await,
            Some(e) => Err(e),
        };

        for key in keys[..pressed].iter().rev() {
            if let Err(release_err) = self.driver.key_release(key).await {
                if outcome.is_ok() {
                    outcome = Err(release_err);
                } else {
                    warn!(key = %key, error = %release_err, "실패 후 키 해제도 실패");
                }
            }
        }
        outcome
    }
}
