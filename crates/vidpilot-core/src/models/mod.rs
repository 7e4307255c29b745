//! VIDPILOT 도메인 모델.
//!
//! 비전 파이프라인과 액추에이터가 공유하는 핵심 데이터 구조체를 정의한다.
//! 픽셀 버퍼를 제외한 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod automation;
pub mod detection;
pub mod frame;
pub mod geometry;
