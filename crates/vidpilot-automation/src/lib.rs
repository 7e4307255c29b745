//! # vidpilot-automation
//!
//! 입력 액추에이터 크레이트.
//! 좌표 안전 검증, 보간 포인터 이동, 클릭/드래그/스크롤/키 입력,
//! 배치 실행과 재시도 클릭을 담당한다.
//!
//! OS 입력은 `InputDriver` 포트 뒤에 있으며, `enigo` feature가 켜지면
//! 실제 입력 합성을, 아니면 `NoOpInputDriver`를 사용한다.

pub mod actuator;
pub mod input_driver;
pub mod motion;
