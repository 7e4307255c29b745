//! 화면 좌표 기하 모델.
//!
//! 좌상단 원점, 픽셀 단위 정수 좌표를 사용한다.

use serde::{Deserialize, Serialize};

/// 화면 좌표 (픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// X 좌표
    pub x: i32,
    /// Y 좌표
    pub y: i32,
}

impl Point {
    /// 새 좌표 생성
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 두 점 사이의 유클리드 거리
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// 디스플레이 크기: 시작 시 한 번 조회하며 이후 불변
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    /// 화면 너비 (픽셀)
    pub width: u32,
    /// 화면 높이 (픽셀)
    pub height: u32,
}

impl ScreenGeometry {
    /// 새 화면 크기 생성
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 안전 여백 안쪽 좌표인지 확인 (양 끝 포함)
    ///
    /// `margin ≤ x ≤ width - margin` 그리고 `margin ≤ y ≤ height - margin`
    pub fn contains_with_margin(&self, x: i32, y: i32, margin: i32) -> bool {
        let (x, y, margin) = (i64::from(x), i64::from(y), i64::from(margin));
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        x >= margin && y >= margin && x <= w - margin && y <= h - margin
    }
}

/// 축 정렬 바운딩 박스 (좌상단 원점)
///
/// 불변식: `width > 0`, `height > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// 좌상단 X 좌표
    pub x: i32,
    /// 좌상단 Y 좌표
    pub y: i32,
    /// 너비
    pub width: u32,
    /// 높이
    pub height: u32,
}

impl BoundingBox {
    /// 새 바운딩 박스 생성
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "빈 바운딩 박스");
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 오른쪽 끝 X 좌표 (x + width)
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// 아래쪽 끝 Y 좌표 (y + height)
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// 중심 좌표 (정수 나눗셈)
    pub fn center(&self) -> Point {
        Point::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    /// 두 박스가 겹치는지 확인
    ///
    /// 한쪽이 다른 쪽의 완전히 왼쪽/오른쪽/위/아래에 있지 않으면 겹침.
    /// 모서리가 맞닿는 경우도 겹침으로 본다.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }

    /// 두 박스를 모두 덮는 최소 박스
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        BoundingBox {
            x: min_x,
            y: min_y,
            width: (max_x - min_x) as u32,
            height: (max_y - min_y) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_check_is_inclusive() {
        let screen = ScreenGeometry::new(1920, 1080);
        assert!(!screen.contains_with_margin(5, 5, 10));
        assert!(screen.contains_with_margin(10, 10, 10));
        assert!(screen.contains_with_margin(1910, 10, 10));
        assert!(!screen.contains_with_margin(1911, 10, 10));
        assert!(screen.contains_with_margin(1910, 1070, 10));
        assert!(!screen.contains_with_margin(1910, 1071, 10));
        assert!(!screen.contains_with_margin(-20, 500, 10));
    }

    #[test]
    fn overlap_and_union() {
        let a = BoundingBox::new(0, 0, 50, 50);
        let b = BoundingBox::new(40, 40, 50, 50);
        let c = BoundingBox::new(200, 200, 10, 10);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert_eq!(a.union(&b), BoundingBox::new(0, 0, 90, 90));
    }

    #[test]
    fn touching_edges_overlap() {
        let a = BoundingBox::new(0, 0, 50, 50);
        let b = BoundingBox::new(50, 0, 50, 50);
        let c = BoundingBox::new(51, 0, 50, 50);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn center_uses_integer_division() {
        let bbox = BoundingBox::new(100, 200, 60, 25);
        assert_eq!(bbox.center(), Point::new(130, 212));
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0, 0);
        assert!((a.distance_to(Point::new(3, 4)) - 5.0).abs() < f64::EPSILON);
    }
}
