//! 영역 병합기.
//!
//! 겹치는 후보 요소를 한 요소로 통합한다. 각 시드 요소 뒤의 요소를 한 번씩만
//! 훑는 탐욕적 단일 패스이며, 그룹에 이미 들어간 어떤 멤버와 겹쳐도 합류한다.
//! 앞에서 거절된 요소는 그룹이 커진 뒤에도 다시 검사하지 않는다.

use tracing::debug;

use vidpilot_core::models::detection::DetectedElement;
use vidpilot_core::models::geometry::BoundingBox;

/// 겹치는 요소 그룹을 병합
///
/// - 크기 1 그룹: 그대로 통과
/// - 크기 > 1 그룹: 모든 멤버를 덮는 최소 박스, 평균 신뢰도,
///   `merged_from` = 그룹 크기, 유형 = 첫 멤버 유형
pub fn merge_overlapping(elements: Vec<DetectedElement>) -> Vec<DetectedElement> {
    let input = elements.len();
    let mut used = vec![false; input];
    let mut merged = Vec::with_capacity(input);

    for i in 0..input {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut group = vec![i];

        for j in (i + 1)..input {
            if used[j] {
                continue;
            }
            let candidate = &elements[j].bbox;
            if group.iter().any(|&m| elements[m].bbox.overlaps(candidate)) {
                group.push(j);
                used[j] = true;
            }
        }

        if group.len() == 1 {
            merged.push(elements[i].clone());
        } else {
            merged.push(merge_group(&elements, &group));
        }
    }

    debug!(input, output = merged.len(), "영역 병합 완료");
    merged
}

fn merge_group(elements: &[DetectedElement], group: &[usize]) -> DetectedElement {
    let first = &elements[group[0]];
    let bbox = group
        .iter()
        .skip(1)
        .fold(first.bbox, |acc: BoundingBox, &m| acc.union(&elements[m].bbox));
    let confidence =
        group.iter().map(|&m| elements[m].confidence).sum::<f64>() / group.len() as f64;

    let mut element = DetectedElement::new(first.element_type.clone(), bbox, confidence);
    element.merged_from = Some(group.len());
    element
}
