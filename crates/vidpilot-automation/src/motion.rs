//! 보간 이동 경로 계산.
//!
//! 시작점에서 목표점까지 직선 보간 경로를 만든다. 단계 수는 거리에 비례하되
//! 짧은 이동도 최소 단계를 거치고, 긴 이동은 상한에서 잘린다.

use vidpilot_core::models::geometry::Point;

/// 최소 단계 수
pub const MIN_STEPS: u32 = 10;
/// 최대 단계 수
pub const MAX_STEPS: u32 = 50;
/// 단계당 거리 (픽셀)
const PIXELS_PER_STEP: f64 = 10.0;

/// 거리 → 단계 수: `clamp(floor(d / 10), 10, 50)`
pub fn step_count(distance: f64) -> u32 {
    let raw = (distance / PIXELS_PER_STEP).floor();
    if raw.is_nan() || raw < f64::from(MIN_STEPS) {
        return MIN_STEPS;
    }
    if raw > f64::from(MAX_STEPS) {
        return MAX_STEPS;
    }
    raw as u32
}

/// 보간 경로 (`i = 0..=steps`, 첫 점 = 시작점, 마지막 점 = 목표점)
pub fn interpolate(from: Point, to: Point) -> Vec<Point> {
    let steps = step_count(from.distance_to(to));
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);

    (0..=steps)
        .map(|i| {
            let progress = f64::from(i) / f64::from(steps);
            Point::new(
                (x0 + dx * progress).round() as i32,
                (y0 + dy * progress).round() as i32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_bounds() {
        assert_eq!(step_count(100.0), 10);
        assert_eq!(step_count(1000.0), 50);
        assert_eq!(step_count(5.0), 10);
        assert_eq!(step_count(0.0), 10);
        assert_eq!(step_count(259.9), 25);
        assert_eq!(step_count(500.0), 50);
        assert_eq!(step_count(509.0), 50);
    }

    #[test]
    fn path_starts_and_ends_on_endpoints() {
        let from = Point::new(0, 0);
        let to = Point::new(300, 400); // 거리 500 → 50단계
        let path = interpolate(from, to);

        assert_eq!(path.len(), 51);
        assert_eq!(path[0], from);
        assert_eq!(path[50], to);
        assert_eq!(path[25], Point::new(150, 200));
    }

    #[test]
    fn short_move_still_uses_min_steps() {
        let path = interpolate(Point::new(10, 10), Point::new(13, 14));
        assert_eq!(path.len(), (MIN_STEPS + 1) as usize);
        assert_eq!(*path.last().unwrap(), Point::new(13, 14));
    }

    #[test]
    fn zero_distance_path_stays_put() {
        let p = Point::new(42, 42);
        let path = interpolate(p, p);
        assert!(path.iter().all(|q| *q == p));
    }

    #[test]
    fn path_is_monotonic() {
        let path = interpolate(Point::new(900, 100), Point::new(100, 700));
        for pair in path.windows(2) {
            assert!(pair[1].x <= pair[0].x);
            assert!(pair[1].y >= pair[0].y);
        }
    }
}
