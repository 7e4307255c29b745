//! 로컬 OCR 제공자: Tesseract 래퍼.
//!
//! `TesseractWorker`를 `OcrProvider` 트레이트로 래핑한다.
//! `ocr` feature 비활성화 시 엔진 없이 항상 빈 결과를 반환한다.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use vidpilot_core::error::CoreError;
use vidpilot_core::models::frame::PixelBuffer;
use vidpilot_core::ports::ocr_provider::{OcrProvider, OcrResult};

// ============================================================
// LocalOcrProvider: Tesseract 래퍼
// ============================================================

/// 로컬 OCR 제공자 (Tesseract 기반)
pub struct LocalOcrProvider {
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    #[cfg_attr(not(feature = "ocr"), allow(dead_code))]
    tessdata_path: Option<PathBuf>,
    /// 상주 워커 (initialize 후 Some)
    #[cfg(feature = "ocr")]
    worker: tokio::sync::Mutex<Option<crate::ocr::TesseractWorker>>,
}

impl LocalOcrProvider {
    /// 새 로컬 OCR 제공자 생성
    pub fn new(tessdata_path: Option<PathBuf>) -> Self {
        Self {
            tessdata_path,
            #[cfg(feature = "ocr")]
            worker: tokio::sync::Mutex::new(None),
        }
    }
}

impl Default for LocalOcrProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl OcrProvider for LocalOcrProvider {
    async fn initialize(&self, language: &str) -> Result<(), CoreError> {
        #[cfg(feature = "ocr")]
        {
            let mut worker = self.worker.lock().await;
            if worker.is_none() {
                let started =
                    crate::ocr::TesseractWorker::start(self.tessdata_path.clone(), language)
                        .await
                        .map_err(|e| CoreError::Recognition(e.to_string()))?;
                *worker = Some(started);
            }
            Ok(())
        }

        #[cfg(not(feature = "ocr"))]
        {
            debug!(language, "OCR feature 비활성화, 엔진 없이 초기화");
            Ok(())
        }
    }

    async fn extract_elements(&self, image: &PixelBuffer) -> Result<Vec<OcrResult>, CoreError> {
        #[cfg(feature = "ocr")]
        {
            let worker = self.worker.lock().await;
            let worker = worker
                .as_ref()
                .ok_or_else(|| CoreError::Recognition("OCR 엔진이 초기화되지 않음".to_string()))?;
            let words = worker
                .recognize(image)
                .await
                .map_err(|e| CoreError::Recognition(e.to_string()))?;
            debug!(count = words.len(), "OCR 워드 추출 완료");
            Ok(words)
        }

        #[cfg(not(feature = "ocr"))]
        {
            let _ = image;
            Ok(vec![])
        }
    }

    async fn terminate(&self) -> Result<(), CoreError> {
        #[cfg(feature = "ocr")]
        {
            if let Some(worker) = self.worker.lock().await.take() {
                worker.shutdown().await;
            }
        }
        debug!("로컬 OCR 제공자 종료");
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "local-tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ocr_provider_name() {
        let provider = LocalOcrProvider::default();
        assert_eq!(provider.provider_name(), "local-tesseract");
        assert!(provider.tessdata_path.is_none());

        let path = PathBuf::from("/usr/share/tessdata");
        let provider = LocalOcrProvider::new(Some(path.clone()));
        assert_eq!(provider.tessdata_path, Some(path));
    }

    #[cfg(not(feature = "ocr"))]
    #[tokio::test]
    async fn without_engine_yields_empty() {
        let provider = LocalOcrProvider::default();
        provider.initialize("eng").await.unwrap();
        let words = provider
            .extract_elements(&PixelBuffer::filled(8, 8, [255, 255, 255, 255]))
            .await
            .unwrap();
        assert!(words.is_empty());
        assert!(provider.terminate().await.is_ok());
    }

    #[cfg(feature = "ocr")]
    #[tokio::test]
    async fn extract_before_initialize_is_recognition_error() {
        let provider = LocalOcrProvider::default();
        let result = provider
            .extract_elements(&PixelBuffer::filled(8, 8, [255, 255, 255, 255]))
            .await;
        assert!(matches!(result, Err(CoreError::Recognition(_))));
    }
}
