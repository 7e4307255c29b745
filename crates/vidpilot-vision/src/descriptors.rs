//! UI 요소 서술자 레지스트리.
//!
//! 알려진 플레이어 컨트롤(재생/일시정지/다음/비디오/진행 막대)의
//! 키워드·색상·모양 기준을 정적 테이블로 보관한다. 런타임 객체와 무관한 순수 데이터다.

use vidpilot_core::models::detection::ElementType;

/// 서술자가 기대하는 요소 모양
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    RoundedRect,
    Rect,
    Line,
}

/// 한 요소 유형의 매칭 기준
#[derive(Debug, Clone, Copy)]
pub struct UiDescriptor {
    /// 텍스트 매칭 키워드 (대소문자 무시 부분 문자열)
    pub keywords: &'static [&'static str],
    /// 대표 색상 (`#rrggbb`)
    pub colors: &'static [&'static str],
    /// 기대 모양
    pub shapes: &'static [Shape],
}

/// 레지스트리 순서 = 버튼 감지 시 유형 평가 순서
static REGISTRY: [(ElementType, UiDescriptor); 5] = [
    (
        ElementType::PlayButton,
        UiDescriptor {
            keywords: &["播放", "开始", "play", "▶"],
            colors: &["#1890ff", "#409eff", "#007bff"],
            shapes: &[Shape::Circle, Shape::RoundedRect],
        },
    ),
    (
        ElementType::PauseButton,
        UiDescriptor {
            keywords: &["暂停", "pause", "⏸"],
            colors: &["#f56c6c", "#ff4d4f"],
            shapes: &[Shape::Circle, Shape::RoundedRect],
        },
    ),
    (
        ElementType::NextButton,
        UiDescriptor {
            keywords: &["下一集", "下一个", "下一课", "next", "→"],
            colors: &["#67c23a", "#52c41a"],
            shapes: &[Shape::Rect, Shape::RoundedRect],
        },
    ),
    (
        ElementType::VideoArea,
        UiDescriptor {
            keywords: &["video", "视频"],
            colors: &["#000000", "#1a1a1a"],
            shapes: &[Shape::Rect],
        },
    ),
    (
        ElementType::ProgressBar,
        UiDescriptor {
            keywords: &["progress", "进度"],
            colors: &["#1890ff", "#409eff"],
            shapes: &[Shape::Rect, Shape::Line],
        },
    ),
];

/// 버튼 서술자만 (키워드 기반 버튼 감지 대상)
pub fn buttons() -> impl Iterator<Item = &'static (ElementType, UiDescriptor)> {
    REGISTRY.iter().filter(|(t, _)| t.is_button())
}

impl UiDescriptor {
    /// 텍스트에 키워드가 포함되는지 (대소문자 무시)
    pub fn matches_text(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(element_type: &ElementType) -> Option<&'static UiDescriptor> {
        REGISTRY
            .iter()
            .find(|(t, _)| t == element_type)
            .map(|(_, d)| d)
    }

    #[test]
    fn registry_has_all_known_types() {
        for t in [
            ElementType::PlayButton,
            ElementType::PauseButton,
            ElementType::NextButton,
            ElementType::VideoArea,
            ElementType::ProgressBar,
        ] {
            assert!(descriptor(&t).is_some(), "{t} 누락");
        }
        assert!(descriptor(&ElementType::Custom("logo".into())).is_none());
    }

    #[test]
    fn only_buttons_are_button_descriptors() {
        let types: Vec<_> = buttons().map(|(t, _)| t.clone()).collect();
        assert_eq!(
            types,
            vec![
                ElementType::PlayButton,
                ElementType::PauseButton,
                ElementType::NextButton
            ]
        );
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let play = descriptor(&ElementType::PlayButton).unwrap();
        assert!(play.matches_text("PLAY"));
        assert!(play.matches_text("Autoplay on"));
        assert!(play.matches_text("点击播放"));
        assert!(!play.matches_text("stop"));

        let next = descriptor(&ElementType::NextButton).unwrap();
        assert!(next.matches_text("下一集"));
        assert!(next.matches_text("Next →"));
    }
}
