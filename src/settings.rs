//! 配置模块
//!
//! # 设计思路
//!
//! 配置是一个 JSON 文件，位于系统配置目录下的
//! `clipboard-converter/settings.json`，首次运行时自动写入默认值。
//! 分隔符表与转换规则表从这里进入调度器，运行期仍可整表换入。
//!
//! # 实现思路
//!
//! - serde camelCase 命名，缺失字段回落到默认值，旧配置文件加新
//!   字段不需要迁移。
//! - 解析失败按错误上抛，不悄悄回落默认值：坏配置应当被看见。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::converter::{ConverterRule, DEFAULT_ENGINE_TIMEOUT_MS};
use crate::engine::EngineSettings;
use crate::error::AppError;
use crate::monitor::DEFAULT_POLL_INTERVAL_MS;

const SETTINGS_FILE_NAME: &str = "settings.json";
const APP_DIR_NAME: &str = "clipboard-converter";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// 合法分隔符表，按顺序尝试
    pub separators: Vec<String>,
    /// 转换规则表
    pub converters: Vec<ConverterRule>,
    /// 管线监听的规则类型
    pub listen_type: String,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 引擎调用总闸（毫秒）
    pub engine_timeout_ms: u64,
    /// 引擎选择
    pub engine: EngineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separators: vec![
                ",".to_string(),
                "，".to_string(),
                "-".to_string(),
                "#".to_string(),
            ],
            converters: vec![ConverterRule {
                label: "中文数字".to_string(),
                prefix: None,
                suffix: None,
                listen_type: "contact".to_string(),
            }],
            listen_type: "contact".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            engine_timeout_ms: DEFAULT_ENGINE_TIMEOUT_MS,
            engine: EngineSettings::Builtin,
        }
    }
}

impl Settings {
    /// 读取配置文件；文件不存在时写入默认配置并返回默认值
    pub fn load_or_init(path: &Path) -> Result<Settings, AppError> {
        if !path.exists() {
            let defaults = Settings::default();
            defaults.save(path)?;
            log::info!("⚙️ 配置文件不存在，已写入默认配置 - {}", path.display());
            return Ok(defaults);
        }

        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str::<Settings>(&content)
            .map_err(|e| AppError::Config(format!("解析配置文件失败: {}", e)))?;

        log::info!("⚙️ 配置已加载 - {}", path.display());
        Ok(settings)
    }

    /// 保存配置，必要时创建父目录
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }
}

/// 默认配置文件路径（系统配置目录下）
pub fn default_settings_path() -> Result<PathBuf, AppError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("无法确定系统配置目录".to_string()))?;
    Ok(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "clipboard-converter-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();

        assert!(settings.separators.contains(&",".to_string()));
        assert!(settings.separators.contains(&"，".to_string()));
        assert_eq!(settings.listen_type, "contact");
        assert_eq!(settings.poll_interval_ms, 500);
        assert_eq!(settings.engine_timeout_ms, 10_000);
        assert!(matches!(settings.engine, EngineSettings::Builtin));

        let rule = &settings.converters[0];
        assert_eq!(rule.label, "中文数字");
        assert_eq!(rule.listen_type, "contact");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"listenType":"order"}"#).unwrap();

        assert_eq!(settings.listen_type, "order");
        assert_eq!(settings.poll_interval_ms, 500);
        assert!(!settings.separators.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();

        assert!(value.get("pollIntervalMs").is_some());
        assert!(value.get("engineTimeoutMs").is_some());
        assert!(value.get("listenType").is_some());
        assert_eq!(value["engine"]["type"], "builtin");
        assert_eq!(value["converters"][0]["listenType"], "contact");
    }

    #[test]
    fn save_then_load_roundtrips() {
        let path = temp_path("roundtrip");

        let mut settings = Settings::default();
        settings.listen_type = "order".to_string();
        settings.poll_interval_ms = 250;
        settings.save(&path).unwrap();

        let loaded = Settings::load_or_init(&path).unwrap();
        assert_eq!(loaded.listen_type, "order");
        assert_eq!(loaded.poll_interval_ms, 250);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn first_run_bootstraps_the_file() {
        let path = temp_path("bootstrap");
        let _ = fs::remove_file(&path);

        let loaded = Settings::load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(loaded.listen_type, "contact");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn broken_json_is_an_error_not_a_fallback() {
        let path = temp_path("broken");
        fs::write(&path, "{ not json").unwrap();

        let result = Settings::load_or_init(&path);
        assert!(matches!(result, Err(AppError::Config(_))));

        let _ = fs::remove_file(&path);
    }
}
