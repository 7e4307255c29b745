//! 설정 파일 로드.
//!
//! 플랫폼별 설정 디렉토리(또는 지정 경로)의 JSON 파일에서 설정 오버라이드를 읽는다.
//! 파일이 없으면 내장 기본값을 사용한다. 설정 저장은 하지 않는다.

use crate::config::EngineConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 앱 디렉토리 루트 (설정, 스크린샷 공용)
///
/// - macOS: `~/Library/Application Support/com.vidpilot.vidpilot`
/// - Windows: `%APPDATA%\vidpilot\vidpilot`
/// - Linux: `$XDG_CONFIG_HOME/vidpilot`, `$XDG_DATA_HOME/vidpilot`
pub fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from("com", "vidpilot", "vidpilot")
        .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
}

/// 설정 로더
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 로드된 설정
    config: EngineConfig,
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로에서 설정 로드
    pub fn new() -> Result<Self, CoreError> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// 지정된 경로에서 설정 로드 (파일이 없으면 기본값)
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = if config_path.exists() {
            let config = Self::load_from_file(&config_path)?;
            info!("설정 파일 로드: {}", config_path.display());
            config
        } else {
            debug!("설정 파일 없음, 기본값 사용: {}", config_path.display());
            EngineConfig::default_config()
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> EngineConfig {
        self.config.clone()
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 플랫폼별 기본 설정 파일 경로
    fn default_config_path() -> Result<PathBuf, CoreError> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    /// 파일에서 설정 로드
    fn load_from_file(path: &Path) -> Result<EngineConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            warn!("빈 설정 파일, 기본값 사용: {}", path.display());
            return Ok(EngineConfig::default_config());
        }

        serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })
    }
}
