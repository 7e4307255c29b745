//! Tesseract OCR 어댑터.
//!
//! `leptess` 기반 Tesseract 엔진을 전용 워커 스레드에 상주시켜
//! 시작 비용을 한 번만 치르고 이후 요청을 재사용한다.
//! 엔진 자체는 `ocr` feature 활성화 시에만 빌드된다.
//!
//! 워드 신뢰도는 Tesseract TSV 출력(level 5 행)에서 읽는다.

use thiserror::Error;
use vidpilot_core::ports::ocr_provider::OcrResult;

/// OCR 에러 타입
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract 초기화 실패
    #[error("OCR 초기화 실패: {0}")]
    Init(String),

    /// 이미지 설정 실패
    #[error("OCR 이미지 설정 실패: {0}")]
    ImageSetup(String),

    /// 텍스트 추출 실패
    #[error("OCR 텍스트 추출 실패: {0}")]
    Extraction(String),

    /// 빈 이미지 입력
    #[error("빈 이미지: 너비 또는 높이가 0")]
    EmptyImage,

    /// 워커 스레드 종료됨
    #[error("OCR 워커 종료됨")]
    WorkerGone,
}

/// TSV에서 워드 행을 나타내는 level 값
const TSV_WORD_LEVEL: &str = "5";

/// Tesseract TSV 출력 → 워드 결과
///
/// 헤더 행, 워드가 아닌 행, 빈 텍스트, 크기 0 박스는 건너뛴다.
pub fn parse_tsv_words(tsv: &str) -> Vec<OcrResult> {
    tsv.lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < 12 || cols[0] != TSV_WORD_LEVEL {
                return None;
            }
            let text = cols[11..].join("\t").trim().to_string();
            if text.is_empty() {
                return None;
            }
            let x = cols[6].parse::<i32>().ok()?;
            let y = cols[7].parse::<i32>().ok()?;
            let width = cols[8].parse::<u32>().ok()?;
            let height = cols[9].parse::<u32>().ok()?;
            let confidence = cols[10].parse::<f64>().ok()?;
            if width == 0 || height == 0 || confidence < 0.0 {
                return None;
            }
            Some(OcrResult {
                text,
                x,
                y,
                width,
                height,
                confidence,
            })
        })
        .collect()
}

#[cfg(feature = "ocr")]
pub use engine::TesseractWorker;

#[cfg(feature = "ocr")]
mod engine {
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::thread;

    use tokio::sync::oneshot;
    use tracing::{debug, info};

    use super::{parse_tsv_words, OcrError};
    use vidpilot_core::models::frame::PixelBuffer;
    use vidpilot_core::ports::ocr_provider::OcrResult;

    type Reply = oneshot::Sender<Result<Vec<OcrResult>, OcrError>>;

    enum Job {
        Recognize { png: Vec<u8>, reply: Reply },
        Shutdown,
    }

    /// 상주 Tesseract 워커: 엔진은 워커 스레드가 소유한다
    pub struct TesseractWorker {
        jobs: mpsc::Sender<Job>,
        handle: Option<thread::JoinHandle<()>>,
    }

    impl TesseractWorker {
        /// 워커 스레드 시작 + 언어 로드 (초기화 완료까지 대기)
        pub async fn start(
            tessdata_path: Option<PathBuf>,
            language: &str,
        ) -> Result<Self, OcrError> {
            let (jobs, rx) = mpsc::channel::<Job>();
            let (ready_tx, ready_rx) = oneshot::channel::<Result<(), OcrError>>();
            let language = language.to_string();

            let handle = thread::Builder::new()
                .name("vidpilot-ocr".to_string())
                .spawn(move || {
                    let tessdata = tessdata_path.map(|p| p.to_string_lossy().to_string());
                    let mut lt = match leptess::LepTess::new(tessdata.as_deref(), &language) {
                        Ok(lt) => {
                            let _ = ready_tx.send(Ok(()));
                            lt
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(OcrError::Init(format!("{e}"))));
                            return;
                        }
                    };

                    while let Ok(job) = rx.recv() {
                        match job {
                            Job::Recognize { png, reply } => {
                                let _ = reply.send(recognize_with(&mut lt, &png));
                            }
                            Job::Shutdown => break,
                        }
                    }
                    debug!("OCR 워커 종료");
                })
                .map_err(|e| OcrError::Init(format!("워커 스레드 생성 실패: {e}")))?;

            ready_rx.await.map_err(|_| OcrError::WorkerGone)??;
            info!("Tesseract 엔진 초기화 완료");

            Ok(Self {
                jobs,
                handle: Some(handle),
            })
        }

        /// 픽셀 버퍼에서 워드 추출
        pub async fn recognize(&self, image: &PixelBuffer) -> Result<Vec<OcrResult>, OcrError> {
            if image.is_empty() {
                return Err(OcrError::EmptyImage);
            }
            let png = encode_png(image)?;
            let (reply, rx) = oneshot::channel();
            self.jobs
                .send(Job::Recognize { png, reply })
                .map_err(|_| OcrError::WorkerGone)?;
            rx.await.map_err(|_| OcrError::WorkerGone)?
        }

        /// 엔진 해제 + 워커 스레드 합류
        pub async fn shutdown(mut self) {
            let _ = self.jobs.send(Job::Shutdown);
            if let Some(handle) = self.handle.take() {
                let _ = tokio::task::spawn_blocking(move || handle.join()).await;
            }
        }
    }

    fn recognize_with(lt: &mut leptess::LepTess, png: &[u8]) -> Result<Vec<OcrResult>, OcrError> {
        lt.set_image_from_mem(png)
            .map_err(|e| OcrError::ImageSetup(format!("{e}")))?;
        let tsv = lt
            .get_tsv_text(0)
            .map_err(|e| OcrError::Extraction(format!("{e}")))?;
        Ok(parse_tsv_words(&tsv))
    }

    fn encode_png(image: &PixelBuffer) -> Result<Vec<u8>, OcrError> {
        let rgba = image::RgbaImage::from_raw(image.width(), image.height(), image.as_raw().to_vec())
            .ok_or_else(|| OcrError::ImageSetup("버퍼 크기 불일치".to_string()))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| OcrError::ImageSetup(format!("PNG 인코딩 실패: {e}")))?;
        Ok(bytes)
    }
}
