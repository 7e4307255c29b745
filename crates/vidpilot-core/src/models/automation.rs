//! 입력 액션 모델.
//!
//! 호출자가 구성하고 액추에이터가 한 번 소비하는 `ActionRequest`,
//! 액션별 결과 `ActionResult`, 배치 항목 `BatchItem`을 정의한다.
//! 와이어 형식은 `type` 태그 기반 JSON (camelCase).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::geometry::Point;

/// 마우스 버튼 유형
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// 문자열 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        }
    }
}

/// 버튼 이벤트 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// 누름
    Press,
    /// 놓음
    Release,
    /// 누름 + 놓음
    Click,
}

/// 스크롤 방향
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

fn default_scroll_clicks() -> u32 {
    3
}

/// 입력 액션 요청
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionRequest {
    /// 단일 클릭
    Click {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
        /// 보간 이동 사용 여부 (None이면 설정값)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        smooth: Option<bool>,
    },
    /// 더블 클릭
    DoubleClick {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        smooth: Option<bool>,
    },
    /// 오른쪽 클릭
    RightClick {
        x: i32,
        y: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        smooth: Option<bool>,
    },
    /// 포인터 이동
    Move {
        x: i32,
        y: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        smooth: Option<bool>,
    },
    /// 드래그 (누른 채 이동)
    Drag {
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        #[serde(default)]
        button: MouseButton,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        smooth: Option<bool>,
    },
    /// 스크롤 (좌표가 있으면 먼저 이동)
    Scroll {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<i32>,
        #[serde(default)]
        direction: ScrollDirection,
        #[serde(default = "default_scroll_clicks")]
        clicks: u32,
    },
    /// 단일 키 (수정자 포함)
    Key {
        key: String,
        #[serde(default)]
        modifiers: Vec<String>,
    },
    /// 문자 단위 텍스트 입력
    Type {
        text: String,
        /// 문자 간 지연 (None이면 설정값)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delay_ms: Option<u64>,
    },
    /// 복합 키
    Combo { keys: Vec<String> },
}

/// 와이어에서 허용하는 액션 태그
const KNOWN_ACTION_TYPES: &[&str] = &[
    "click",
    "doubleClick",
    "rightClick",
    "move",
    "drag",
    "scroll",
    "key",
    "type",
    "combo",
];

impl ActionRequest {
    /// 액션 태그 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::DoubleClick { .. } => "doubleClick",
            Self::RightClick { .. } => "rightClick",
            Self::Move { .. } => "move",
            Self::Drag { .. } => "drag",
            Self::Scroll { .. } => "scroll",
            Self::Key { .. } => "key",
            Self::Type { .. } => "type",
            Self::Combo { .. } => "combo",
        }
    }

    /// 대상 좌표 (x/y 필드를 가진 액션만)
    pub fn target(&self) -> Option<Point> {
        match self {
            Self::Click { x, y, .. }
            | Self::DoubleClick { x, y, .. }
            | Self::RightClick { x, y, .. }
            | Self::Move { x, y, .. } => Some(Point::new(*x, *y)),
            Self::Scroll {
                x: Some(x),
                y: Some(y),
                ..
            } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// x/y 필드를 가진 액션의 좌표를 평행 이동한 복사본
    ///
    /// 드래그와 키보드 액션은 그대로 반환한다.
    pub fn offset_by(&self, dx: i32, dy: i32) -> Self {
        let mut shifted = self.clone();
        match &mut shifted {
            Self::Click { x, y, .. }
            | Self::DoubleClick { x, y, .. }
            | Self::RightClick { x, y, .. }
            | Self::Move { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Scroll {
                x: Some(x),
                y: Some(y),
                ..
            } => {
                *x += dx;
                *y += dy;
            }
            _ => {}
        }
        shifted
    }
}

/// JSON 값에서 액션 요청 파싱
///
/// 알 수 없는 `type` 태그는 `UnsupportedAction`, 그 외 형식 오류는 `Serialization`.
pub fn parse_action(value: &serde_json::Value) -> Result<ActionRequest, CoreError> {
    check_action_type(value)?;
    Ok(serde_json::from_value(value.clone())?)
}

/// JSON 값에서 배치 항목 파싱
pub fn parse_batch_item(value: &serde_json::Value) -> Result<BatchItem, CoreError> {
    check_action_type(value)?;
    Ok(serde_json::from_value(value.clone())?)
}

/// JSON 값에서 배치 항목 파싱 (실패도 항목 하나로 유지)
///
/// 파싱에 실패한 항목은 원래 태그와 `stopOnError` 플래그를 보존한 `RejectedItem`이 된다.
pub fn parse_batch_entry(value: &serde_json::Value) -> BatchEntry {
    parse_batch_item(value).map_err(|error| RejectedItem {
        action: value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("unknown")
            .to_string(),
        stop_on_error: value
            .get("stopOnError")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        error,
    })
}

fn check_action_type(value: &serde_json::Value) -> Result<(), CoreError> {
    let tag = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| CoreError::UnsupportedAction("<type 누락>".to_string()))?;
    if KNOWN_ACTION_TYPES.contains(&tag) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedAction(tag.to_string()))
    }
}

// ============================================================
// ActionResult / BatchItem
// ============================================================

/// 액션 실행 결과 (요청당 하나)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// 성공 여부
    pub success: bool,
    /// 액션 태그
    pub action: String,
    /// 실제 실행된 요청 (성공 시 파라미터 에코)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ActionRequest>,
    /// 실패 사유
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// 성공 결과
    pub fn succeeded(request: ActionRequest) -> Self {
        Self {
            success: true,
            action: request.kind().to_string(),
            request: Some(request),
            error: None,
        }
    }

    /// 실패 결과
    pub fn failed(action: &str, error: &CoreError) -> Self {
        Self {
            success: false,
            action: action.to_string(),
            request: None,
            error: Some(error.to_string()),
        }
    }
}

/// 배치 실행 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    /// 실행할 액션
    #[serde(flatten)]
    pub action: ActionRequest,
    /// 성공 후 대기 (밀리초)
    #[serde(default, rename = "delay", skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    /// 실패 시 나머지 중단
    #[serde(default)]
    pub stop_on_error: bool,
}

impl BatchItem {
    /// 지연/중단 플래그 없는 배치 항목
    pub fn new(action: ActionRequest) -> Self {
        Self {
            action,
            delay_ms: None,
            stop_on_error: false,
        }
    }

    /// 실패 시 중단 플래그 설정
    pub fn stop_on_error(mut self) -> Self {
        self.stop_on_error = true;
        self
    }

    /// 성공 후 대기 설정
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

/// 파싱 단계에서 거부된 배치 항목
#[derive(Debug)]
pub struct RejectedItem {
    /// 원래 `type` 태그 (없으면 "unknown")
    pub action: String,
    /// 원래 `stopOnError` 플래그
    pub stop_on_error: bool,
    /// 거부 사유
    pub error: CoreError,
}

/// 배치 입력 한 칸: 실행 가능한 항목 또는 거부된 항목
pub type BatchEntry = Result<BatchItem, RejectedItem>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_click_with_defaults() {
        let action = parse_action(&json!({"type": "click", "x": 100, "y": 200})).unwrap();
        assert_eq!(
            action,
            ActionRequest::Click {
                x: 100,
                y: 200,
                button: MouseButton::Left,
                smooth: None,
            }
        );
        assert_eq!(action.kind(), "click");
        assert_eq!(action.target(), Some(Point::new(100, 200)));
    }

    #[test]
    fn parse_drag_camel_case_fields() {
        let action = parse_action(&json!({
            "type": "drag", "fromX": 10, "fromY": 20, "toX": 300, "toY": 400, "button": "right"
        }))
        .unwrap();
        match action {
            ActionRequest::Drag {
                from_x,
                to_y,
                button,
                ..
            } => {
                assert_eq!(from_x, 10);
                assert_eq!(to_y, 400);
                assert_eq!(button, MouseButton::Right);
            }
            other => unreachable!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn parse_scroll_defaults() {
        let action = parse_action(&json!({"type": "scroll"})).unwrap();
        assert_eq!(
            action,
            ActionRequest::Scroll {
                x: None,
                y: None,
                direction: ScrollDirection::Down,
                clicks: 3,
            }
        );
        assert!(action.target().is_none());
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let err = parse_action(&json!({"type": "teleport", "x": 1})).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedAction(ref t) if t == "teleport"));

        let err = parse_action(&json!({"x": 1})).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedAction(_)));
    }

    #[test]
    fn malformed_known_tag_is_serialization_error() {
        let err = parse_action(&json!({"type": "click", "x": "left"})).unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn batch_item_flattens_action() {
        let item = parse_batch_item(&json!({
            "type": "key", "key": "space", "modifiers": ["ctrl"], "delay": 250, "stopOnError": true
        }))
        .unwrap();
        assert_eq!(item.delay_ms, Some(250));
        assert!(item.stop_on_error);
        assert_eq!(item.action.kind(), "key");
    }

    #[test]
    fn rejected_entry_keeps_tag_and_stop_flag() {
        let rejected = parse_batch_entry(&json!({"type": "teleport", "stopOnError": true}))
            .unwrap_err();
        assert_eq!(rejected.action, "teleport");
        assert!(rejected.stop_on_error);
        assert!(matches!(rejected.error, CoreError::UnsupportedAction(ref t) if t == "teleport"));

        let rejected = parse_batch_entry(&json!({"type": "click", "x": "left"})).unwrap_err();
        assert_eq!(rejected.action, "click");
        assert!(!rejected.stop_on_error);
        assert!(matches!(rejected.error, CoreError::Serialization(_)));

        let rejected = parse_batch_entry(&json!({"delay": 10})).unwrap_err();
        assert_eq!(rejected.action, "unknown");

        assert!(parse_batch_entry(&json!({"type": "key", "key": "space"})).is_ok());
    }

    #[test]
    fn offset_moves_only_pointer_targets() {
        let click = ActionRequest::Click {
            x: 100,
            y: 100,
            button: MouseButton::Left,
            smooth: None,
        };
        assert_eq!(click.offset_by(2, -3).target(), Some(Point::new(102, 97)));

        let combo = ActionRequest::Combo {
            keys: vec!["ctrl".into(), "c".into()],
        };
        assert_eq!(combo.offset_by(5, 5), combo);

        let scroll = ActionRequest::Scroll {
            x: None,
            y: None,
            direction: ScrollDirection::Up,
            clicks: 1,
        };
        assert_eq!(scroll.offset_by(5, 5), scroll);
    }

    #[test]
    fn result_constructors() {
        let ok = ActionResult::succeeded(ActionRequest::Combo { keys: vec![] });
        assert!(ok.success);
        assert_eq!(ok.action, "combo");

        let failed = ActionResult::failed("click", &CoreError::InvalidCoordinate { x: 1, y: 2 });
        assert!(!failed.success);
        assert!(failed.request.is_none());
        assert!(failed.error.unwrap().contains("(1, 2)"));
    }
}
