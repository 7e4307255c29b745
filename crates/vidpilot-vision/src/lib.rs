//! # vidpilot-vision
//!
//! 화면 인식 크레이트.
//! 스크린 캡처, OCR 텍스트 인식, 키워드/어두운 영역 기반 요소 분류,
//! 템플릿 매칭, 영역 병합을 하나의 감지 파이프라인으로 묶는다.

pub mod capture;
pub mod classifier;
pub mod descriptors;
pub mod local_ocr_provider;
pub mod ocr;
pub mod pipeline;
pub mod region_merger;
pub mod template_matcher;
pub mod text_recognizer;
