// ==========================================
// 设备状态监测系统 - 运行配置
// ==========================================
// 职责: 环境变量 → MonitorSettings;按配置加载阈值目录
// ==========================================

use crate::config::catalog_loader::load_catalog_file;
use crate::config::default_catalog::plant_catalog;
use crate::domain::error::CatalogResult;
use crate::domain::threshold::ThresholdCatalog;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// 配置键（环境变量名）
pub mod env_keys {
    pub const CATALOG_PATH: &str = "CONDITION_MONITOR_CATALOG";
    pub const WINDOW_DAYS: &str = "CONDITION_MONITOR_WINDOW_DAYS";
    pub const FETCH_TIMEOUT_SECS: &str = "CONDITION_MONITOR_FETCH_TIMEOUT_SECS";
    pub const LOG_FORMAT: &str = "CONDITION_MONITOR_LOG_FORMAT";
}

const DEFAULT_WINDOW_DAYS: i64 = 7;
/// 周报窗口上限（约 10 年）
pub const MAX_WINDOW_DAYS: i64 = 3660;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// 运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// 阈值目录文件;None 时使用用户配置目录下的默认位置
    pub catalog_path: Option<PathBuf>,
    /// 周报窗口（天）
    pub report_window_days: i64,
    /// 读数拉取超时
    pub fetch_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            report_window_days: DEFAULT_WINDOW_DAYS,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            log_format: LogFormat::Text,
        }
    }
}

impl MonitorSettings {
    /// 从环境变量读取配置,缺失或非法时回退默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置（便于测试注入）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let catalog_path = non_empty(env_keys::CATALOG_PATH).map(PathBuf::from);

        let report_window_days = match non_empty(env_keys::WINDOW_DAYS) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if (0..=MAX_WINDOW_DAYS).contains(&days) => days,
                _ => {
                    warn!(
                        "{} 配置非法: {} (允许 0..={}), 使用默认值 {}",
                        env_keys::WINDOW_DAYS,
                        raw,
                        MAX_WINDOW_DAYS,
                        DEFAULT_WINDOW_DAYS
                    );
                    defaults.report_window_days
                }
            },
            None => defaults.report_window_days,
        };

        let fetch_timeout = match non_empty(env_keys::FETCH_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "{} 配置非法: {}, 使用默认值 {}",
                        env_keys::FETCH_TIMEOUT_SECS,
                        raw,
                        DEFAULT_FETCH_TIMEOUT_SECS
                    );
                    defaults.fetch_timeout
                }
            },
            None => defaults.fetch_timeout,
        };

        let log_format = match non_empty(env_keys::LOG_FORMAT).as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            catalog_path,
            report_window_days,
            fetch_timeout,
            log_format,
        }
    }

    /// 实际使用的目录文件路径
    pub fn resolved_catalog_path(&self) -> PathBuf {
        if let Some(path) = &self.catalog_path {
            return path.clone();
        }
        default_catalog_path()
    }
}

/// 默认目录位置: <用户配置目录>/condition-monitor/thresholds.json
pub fn default_catalog_path() -> PathBuf {
    let mut path = PathBuf::from("./thresholds.json");

    if let Some(config_dir) = dirs::config_dir() {
        path = config_dir.join("condition-monitor").join("thresholds.json");
    }

    path
}

/// 按配置加载阈值目录
///
/// - 显式指定的文件必须存在且合法
/// - 未显式指定且默认位置无文件时,使用内置的当前标定目录
pub fn load_catalog(settings: &MonitorSettings) -> CatalogResult<ThresholdCatalog> {
    let path = settings.resolved_catalog_path();

    if settings.catalog_path.is_some() || path.exists() {
        return load_catalog_file(&path);
    }

    let catalog = plant_catalog()?;
    info!(version = catalog.version(), "未找到目录文件,使用内置阈值目录");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> MonitorSettings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MonitorSettings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]);
        assert_eq!(settings, MonitorSettings::default());
        assert_eq!(settings.report_window_days, 7);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            (env_keys::CATALOG_PATH, "/etc/cm/thresholds.json"),
            (env_keys::WINDOW_DAYS, "14"),
            (env_keys::FETCH_TIMEOUT_SECS, "5"),
            (env_keys::LOG_FORMAT, "JSON"),
        ]);

        assert_eq!(
            settings.resolved_catalog_path(),
            PathBuf::from("/etc/cm/thresholds.json")
        );
        assert_eq!(settings.report_window_days, 14);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(5));
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = settings_from(&[
            (env_keys::WINDOW_DAYS, "-3"),
            (env_keys::FETCH_TIMEOUT_SECS, "soon"),
            (env_keys::CATALOG_PATH, "   "),
        ]);

        assert_eq!(settings.report_window_days, 7);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(30));
        assert_eq!(settings.catalog_path, None);
    }

    #[test]
    fn test_window_days_upper_bound() {
        let at_limit = settings_from(&[(env_keys::WINDOW_DAYS, "3660")]);
        assert_eq!(at_limit.report_window_days, MAX_WINDOW_DAYS);

        let too_long = settings_from(&[(env_keys::WINDOW_DAYS, "100000000")]);
        assert_eq!(too_long.report_window_days, 7);

        let overflow = settings_from(&[(env_keys::WINDOW_DAYS, "99999999999999999999")]);
        assert_eq!(overflow.report_window_days, 7);
    }

    #[test]
    fn test_explicit_missing_catalog_is_error() {
        let settings = MonitorSettings {
            catalog_path: Some(PathBuf::from("/nonexistent/thresholds.json")),
            ..MonitorSettings::default()
        };
        assert!(load_catalog(&settings).is_err());
    }
}
