//! # vidpilot-core
//!
//! VIDPILOT 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 비전 파이프라인과 입력 액추에이터가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 기하, 픽셀 버퍼, 감지 결과, 입력 액션
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 엔진 설정 구조체
//! - [`config_manager`]: 설정 파일 로드

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
