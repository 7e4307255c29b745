//! # vidpilot-app
//!
//! VIDPILOT 진단 바이너리 진입점.
//! 설정을 로드하고 감지 파이프라인 / 입력 액추에이터를 조립해
//! 하위 명령 하나를 실행한 뒤 결과를 JSON으로 출력한다.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vidpilot_core::config::EngineConfig;
use vidpilot_core::config_manager::ConfigManager;

use crate::commands::DetectRequest;

/// VIDPILOT: 비디오 플레이어 화면 인식 / 입력 자동화 도구
#[derive(Parser, Debug)]
#[command(name = "vidpilot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 감지 사이클 한 번 실행
    Detect {
        /// 텍스트 인식 생략
        #[arg(long)]
        no_text: bool,
        /// 버튼 분류 생략
        #[arg(long)]
        no_buttons: bool,
        /// 비디오 영역 스캔 생략
        #[arg(long)]
        no_videos: bool,
        /// 캡처 영역 (x,y,width,height)
        #[arg(long)]
        region: Option<String>,
        /// 템플릿 매칭 대상 (name=path, 반복 가능)
        #[arg(long = "template", value_name = "NAME=PATH")]
        templates: Vec<String>,
        /// 스크린샷 저장 (설정 디렉토리가 없으면 플랫폼 기본 경로)
        #[arg(long)]
        save: bool,
        /// 스크린샷 파일 이름
        #[arg(long, requires = "save")]
        filename: Option<String>,
    },
    /// 단일 액션 실행 (예: '{"type":"click","x":100,"y":200}')
    Action {
        json: String,
        /// 무작위 지연 + 좌표 흔들림 적용
        #[arg(long)]
        human: bool,
    },
    /// 클릭
    Click {
        x: i32,
        y: i32,
        /// 마우스 버튼 (left, right, middle)
        #[arg(long, default_value = "left")]
        button: String,
    },
    /// 배치 실행 (JSON 배열 문자열 또는 파일 경로)
    Batch { input: String },
    /// 재시도 클릭
    SmartClick {
        x: i32,
        y: i32,
        /// 최대 시도 횟수 (기본: 설정값)
        #[arg(long)]
        retries: Option<u32>,
        /// 성공 후 검증 대기
        #[arg(long)]
        verify: bool,
    },
    /// 화면 크기, 포인터 위치, 픽셀 색상 조회
    Info {
        /// 색상을 읽을 좌표 (x y)
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        pixel: Option<Vec<i32>>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };
    info!("설정 경로: {}", manager.config_path().display());
    Ok(manager.get())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "vidpilot={0},vidpilot_app={0},vidpilot_core={0},vidpilot_vision={0},vidpilot_automation={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config)?;

    match args.command {
        Command::Detect {
            no_text,
            no_buttons,
            no_videos,
            region,
            templates,
            save,
            filename,
        } => {
            let request = DetectRequest {
                skip_text: no_text,
                skip_buttons: no_buttons,
                skip_videos: no_videos,
                region,
                templates,
                save,
                filename,
            };
            print_json(&commands::detect(&config, request).await?)
        }
        Command::Action { json, human } => {
            print_json(&commands::action(&config, &json, human).await?)
        }
        Command::Click { x, y, button } => {
            print_json(&commands::click(&config, x, y, &button).await?)
        }
        Command::Batch { input } => print_json(&commands::batch(&config, &input).await?),
        Command::SmartClick {
            x,
            y,
            retries,
            verify,
        } => print_json(&commands::smart_click(&config, x, y, retries, verify).await?),
        Command::Info { pixel } => {
            let pixel = pixel.and_then(|p| match p.as_slice() {
                [x, y] => Some((*x, *y)),
                _ => None,
            });
            print_json(&commands::environment_info(&config, pixel).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn parses_detect_flags() {
        let args = Args::parse_from([
            "vidpilot",
            "detect",
            "--no-text",
            "--region",
            "0,0,640,480",
            "--template",
            "skip=skip.png",
        ]);
        match args.command {
            Command::Detect {
                no_text,
                region,
                templates,
                ..
            } => {
                assert!(no_text);
                assert_eq!(region.as_deref(), Some("0,0,640,480"));
                assert_eq!(templates, vec!["skip=skip.png".to_string()]);
            }
            other => unreachable!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = Args::parse_from(["vidpilot", "info", "--pixel", "10", "20", "-l", "debug"]);
        assert_eq!(args.log_level, "debug");
        assert!(matches!(args.command, Command::Info { pixel: Some(ref p) } if p == &vec![10, 20]));
    }
}
