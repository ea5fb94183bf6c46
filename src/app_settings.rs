use directories::ProjectDirs;
use ini::Ini;
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AppResult;

const LOGGING_SECTION: &str = "Logging";
const OUTPUT_SECTION: &str = "Output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub enable_file_log: bool,
    pub file_log_level: LevelFilter,
    pub console_log_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enable_file_log: false,
            file_log_level: LevelFilter::Info,
            console_log_level: LevelFilter::Warn,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub log_settings: LogSettings,
    pub output_settings: OutputSettings,
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "UltraStarLyrics", "ultrastar_lyrics") {
            let config_dir = proj_dirs.config_dir();
            if !config_dir.exists() {
                if let Err(e) = fs::create_dir_all(config_dir) {
                    log::error!("无法创建配置目录 {:?}: {}", config_dir, e);
                    return None;
                }
            }
            Some(config_dir.join("ultrastar_lyrics.ini"))
        } else {
            log::error!("无法获取项目配置目录路径。");
            None
        }
    }

    /// 从默认位置加载配置。文件不存在时写入一份默认配置。
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("无法确定配置文件路径。将使用运行时默认配置。");
            return Self::default();
        };

        if !path.exists() {
            log::info!("配置文件 {:?} 未找到。将创建并使用默认配置。", path);
            let default_settings = Self::default();
            if let Err(e) = default_settings.save_to(&path) {
                log::error!("无法保存初始默认配置文件到 {:?}: {}", path, e);
            }
            return default_settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("加载配置文件 {:?} 失败: {}。将使用默认配置。", path, e);
                Self::default()
            }
        }
    }

    /// 从指定的 INI 文件读取配置，缺失或无效的键使用默认值。
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let conf = Ini::load_from_file(path)?;
        let defaults = Self::default();

        let log_section = conf.section(Some(LOGGING_SECTION));
        let level = |key: &str, fallback: LevelFilter| {
            log_section
                .and_then(|s| s.get(key))
                .and_then(|s| LevelFilter::from_str(s).ok())
                .unwrap_or(fallback)
        };
        let log_settings = LogSettings {
            enable_file_log: log_section
                .and_then(|s| s.get("EnableFileLog"))
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(defaults.log_settings.enable_file_log),
            file_log_level: level("FileLogLevel", defaults.log_settings.file_log_level),
            console_log_level: level("ConsoleLogLevel", defaults.log_settings.console_log_level),
        };

        let output_settings = OutputSettings {
            pretty_json: conf
                .section(Some(OUTPUT_SECTION))
                .and_then(|s| s.get("PrettyJson"))
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(defaults.output_settings.pretty_json),
        };

        log::info!("从 {:?} 加载配置成功。", path);
        Ok(Self {
            log_settings,
            output_settings,
        })
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let mut conf = Ini::new();
        conf.with_section(Some(LOGGING_SECTION))
            .set(
                "EnableFileLog",
                self.log_settings.enable_file_log.to_string(),
            )
            .set("FileLogLevel", self.log_settings.file_log_level.to_string())
            .set(
                "ConsoleLogLevel",
                self.log_settings.console_log_level.to_string(),
            );
        conf.with_section(Some(OUTPUT_SECTION))
            .set("PrettyJson", self.output_settings.pretty_json.to_string());

        conf.write_to_file(path)?;
        log::info!("配置已保存到 {:?}。", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let settings = AppSettings {
            log_settings: LogSettings {
                enable_file_log: true,
                file_log_level: LevelFilter::Debug,
                console_log_level: LevelFilter::Error,
            },
            output_settings: OutputSettings { pretty_json: true },
        };

        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(
            &path,
            "[Logging]\nEnableFileLog=maybe\nConsoleLogLevel=loud\n[Output]\nPrettyJson=true\n",
        )
        .unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.log_settings, LogSettings::default());
        assert!(settings.output_settings.pretty_json);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppSettings::load_from(&dir.path().join("none.ini")).is_err());
    }
}
