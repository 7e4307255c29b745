//! CLI 하위 명령 처리.
//!
//! 각 명령은 설정에서 필요한 컴포넌트만 조립해 한 번 실행하고 결과를 돌려준다.
//! 결과 출력(JSON)은 `main`이 담당한다.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use vidpilot_automation::actuator::Actuator;
use vidpilot_automation::input_driver::{create_platform_input_driver, parse_mouse_button};
use vidpilot_core::config::EngineConfig;
use vidpilot_core::config_manager::project_dirs;
use vidpilot_core::models::automation::{
    parse_action, parse_batch_entry, ActionRequest, ActionResult, BatchEntry,
};
use vidpilot_core::models::detection::{DetectOptions, DetectionResult};
use vidpilot_core::models::geometry::{BoundingBox, Point, ScreenGeometry};
use vidpilot_core::ports::ocr_provider::OcrProvider;
use vidpilot_core::ports::vision::ScreenSource;
use vidpilot_vision::capture::XcapScreenSource;
use vidpilot_vision::local_ocr_provider::LocalOcrProvider;
use vidpilot_vision::pipeline::DetectionPipeline;
use vidpilot_vision::template_matcher::load_custom_element;

/// `detect` 명령 입력
#[derive(Debug, Default)]
pub struct DetectRequest {
    pub skip_text: bool,
    pub skip_buttons: bool,
    pub skip_videos: bool,
    pub region: Option<String>,
    pub templates: Vec<String>,
    pub save: bool,
    pub filename: Option<String>,
}

/// `info` 명령 결과
#[derive(Debug, Serialize)]
pub struct EnvironmentInfo {
    pub platform: String,
    pub screen: ScreenGeometry,
    pub cursor: Point,
    pub ocr_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel: Option<[u8; 3]>,
}

// ============================================================
// 컴포넌트 조립
// ============================================================

fn screen_source() -> Arc<dyn ScreenSource> {
    Arc::new(XcapScreenSource::new())
}

fn ocr_provider(config: &EngineConfig) -> Arc<dyn OcrProvider> {
    Arc::new(LocalOcrProvider::new(config.vision.tessdata_path.clone()))
}

async fn build_actuator(config: &EngineConfig) -> Result<Actuator> {
    let actuator = Actuator::new(
        create_platform_input_driver(),
        screen_source(),
        config.actuator.clone(),
    )
    .await?;
    Ok(actuator)
}

/// 플랫폼 기본 스크린샷 디렉토리 (설정 파일과 같은 앱 디렉토리 루트의 데이터 경로)
pub fn default_screenshot_dir() -> Option<PathBuf> {
    match project_dirs() {
        Ok(dirs) => Some(dirs.data_dir().join("screenshots")),
        Err(e) => {
            warn!(error = %e, "스크린샷 기본 경로 확인 실패, 저장 생략");
            None
        }
    }
}

// ============================================================
// 인자 파싱
// ============================================================

/// `x,y,w,h` 형식 영역 파싱
pub fn parse_region(value: &str) -> Result<BoundingBox> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        bail!("영역 형식은 x,y,width,height 입니다: {value}");
    }
    let x = parts[0].parse::<i32>().context("영역 x")?;
    let y = parts[1].parse::<i32>().context("영역 y")?;
    let width = parts[2].parse::<u32>().context("영역 width")?;
    let height = parts[3].parse::<u32>().context("영역 height")?;
    if width == 0 || height == 0 {
        bail!("영역 크기는 0보다 커야 합니다: {value}");
    }
    Ok(BoundingBox::new(x, y, width, height))
}

/// `name=path` 형식 템플릿 인자 파싱
pub fn parse_template_arg(arg: &str) -> Result<(String, PathBuf)> {
    let (name, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("템플릿 형식은 name=path 입니다: {arg}"))?;
    if name.is_empty() || path.is_empty() {
        bail!("템플릿 이름과 경로가 필요합니다: {arg}");
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

/// 배치 입력 파싱: JSON 배열 문자열 또는 JSON 파일 경로
///
/// 배열 자체가 잘못되면 에러. 개별 항목의 파싱 실패는 해당 칸의 `RejectedItem`으로 남는다.
pub fn parse_batch_input(input: &str) -> Result<Vec<BatchEntry>> {
    let text = if input.trim_start().starts_with('[') {
        input.to_string()
    } else {
        fs::read_to_string(Path::new(input))
            .with_context(|| format!("배치 파일 읽기 실패: {input}"))?
    };

    let value: serde_json::Value = serde_json::from_str(&text).context("배치 JSON 파싱 실패")?;
    let entries = value
        .as_array()
        .ok_or_else(|| anyhow!("배치 입력은 JSON 배열이어야 합니다"))?;

    Ok(entries.iter().map(parse_batch_entry).collect())
}

// ============================================================
// 명령 실행
// ============================================================

/// 감지 사이클 한 번 실행
pub async fn detect(config: &EngineConfig, request: DetectRequest) -> Result<DetectionResult> {
    let mut vision = config.vision.clone();
    if request.save && vision.screenshot_dir.is_none() {
        vision.screenshot_dir = default_screenshot_dir();
    }

    let mut options = DetectOptions {
        detect_text: !request.skip_text,
        detect_buttons: !request.skip_buttons,
        detect_videos: !request.skip_videos,
        region: request.region.as_deref().map(parse_region).transpose()?,
        filename: request.filename,
        custom_elements: Vec::new(),
    };
    for arg in &request.templates {
        let (name, path) = parse_template_arg(arg)?;
        options.custom_elements.push(load_custom_element(name, path)?);
    }

    let pipeline = DetectionPipeline::new(screen_source(), ocr_provider(config), &vision);
    let outcome = pipeline.detect(&options).await;
    if let Err(e) = pipeline.shutdown().await {
        warn!(error = %e, "OCR 엔진 종료 실패");
    }
    Ok(outcome?)
}

/// 단일 액션 실행 (JSON)
pub async fn action(config: &EngineConfig, json: &str, human: bool) -> Result<ActionResult> {
    let value: serde_json::Value = serde_json::from_str(json).context("액션 JSON 파싱 실패")?;
    let request = parse_action(&value)?;
    let actuator = build_actuator(config).await?;
    let result = if human {
        actuator.human_like_action(&request).await?
    } else {
        actuator.perform_action(&request).await?
    };
    Ok(result)
}

/// 단일 클릭 (버튼 이름 지정)
pub async fn click(config: &EngineConfig, x: i32, y: i32, button: &str) -> Result<ActionResult> {
    let request = ActionRequest::Click {
        x,
        y,
        button: parse_mouse_button(button),
        smooth: None,
    };
    let actuator = build_actuator(config).await?;
    Ok(actuator.perform_action(&request).await?)
}

/// 배치 실행
pub async fn batch(config: &EngineConfig, input: &str) -> Result<Vec<ActionResult>> {
    let entries = parse_batch_input(input)?;
    let rejected = entries.iter().filter(|e| e.is_err()).count();
    info!(items = entries.len(), rejected, "배치 입력 로드");
    let actuator = build_actuator(config).await?;
    Ok(actuator.perform_batch_entries(&entries).await)
}

/// 재시도 클릭
pub async fn smart_click(
    config: &EngineConfig,
    x: i32,
    y: i32,
    retries: Option<u32>,
    verify: bool,
) -> Result<ActionResult> {
    let actuator = build_actuator(config).await?;
    Ok(actuator.smart_click(x, y, retries, verify).await?)
}

/// 환경 정보 조회
pub async fn environment_info(
    config: &EngineConfig,
    pixel: Option<(i32, i32)>,
) -> Result<EnvironmentInfo> {
    let driver = create_platform_input_driver();
    let platform = driver.platform().to_string();
    let actuator = Actuator::new(driver, screen_source(), config.actuator.clone()).await?;

    let pixel = match pixel {
        Some((x, y)) => Some(actuator.pixel_color(x, y).await?),
        None => None,
    };

    Ok(EnvironmentInfo {
        platform,
        screen: actuator.screen_geometry(),
        cursor: actuator.current_position().await?,
        ocr_provider: ocr_provider(config).provider_name().to_string(),
        pixel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn region_parsing() {
        assert_eq!(
            parse_region("10, 20,300,200").unwrap(),
            BoundingBox::new(10, 20, 300, 200)
        );
        assert!(parse_region("10,20,300").is_err());
        assert!(parse_region("10,20,0,5").is_err());
        assert!(parse_region("a,b,c,d").is_err());
    }

    #[test]
    fn template_arg_parsing() {
        let (name, path) = parse_template_arg("skip=/tmp/skip.png").unwrap();
        assert_eq!(name, "skip");
        assert_eq!(path, PathBuf::from("/tmp/skip.png"));
        assert!(parse_template_arg("skip").is_err());
        assert!(parse_template_arg("=/tmp/x.png").is_err());
    }

    #[test]
    fn batch_from_inline_json() {
        let items = parse_batch_input(
            r#"[{"type":"click","x":100,"y":100,"delay":200},
                {"type":"key","key":"space","stopOnError":true}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().delay_ms, Some(200));
        assert!(items[1].as_ref().unwrap().stop_on_error);
    }

    #[test]
    fn batch_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, r#"[{"type":"combo","keys":["ctrl","c"]}]"#).unwrap();

        let items = parse_batch_input(path.to_str().unwrap()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap().action.kind(), "combo");
    }

    #[test]
    fn batch_keeps_slot_for_unknown_action() {
        let entries = parse_batch_input(
            r#"[{"type":"click","x":100,"y":100},
                {"type":"teleport","stopOnError":true},
                {"type":"key","key":"space"}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_ok());
        let rejected = entries[1].as_ref().unwrap_err();
        assert_eq!(rejected.action, "teleport");
        assert!(rejected.stop_on_error);
        assert!(entries[2].is_ok());
    }

    #[test]
    fn screenshot_dir_shares_config_root() {
        let Ok(dirs) = project_dirs() else {
            return;
        };
        assert_eq!(
            default_screenshot_dir(),
            Some(dirs.data_dir().join("screenshots"))
        );
    }

    #[test]
    fn batch_requires_array() {
        assert!(parse_batch_input(r#"[1"#).is_err());
        assert!(parse_batch_input(r#"{"type":"click"}"#).is_err());
        assert!(parse_batch_input("/nonexistent/batch.json").is_err());
    }
}
