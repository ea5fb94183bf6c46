use chrono::Local;
use directories::ProjectDirs;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

use crate::app_settings::LogSettings;

fn get_log_file_path() -> Result<PathBuf, String> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "UltraStarLyrics", "ultrastar_lyrics") {
        let log_dir = proj_dirs.data_local_dir();
        if !log_dir.exists() {
            fs::create_dir_all(log_dir)
                .map_err(|e| format!("无法创建日志目录 {log_dir:?}: {e}"))?;
        }
        Ok(log_dir.join("ultrastar_lyrics.log"))
    } else {
        let current_dir_log_path = PathBuf::from("ultrastar_lyrics.log");
        eprintln!("无法获取项目日志目录，将尝试在当前目录创建日志: {current_dir_log_path:?}");
        Ok(current_dir_log_path)
    }
}

fn format_dispatch() -> Dispatch {
    Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "[{}][{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
            record.level(),
            message
        ))
    })
}

/// 初始化全局日志记录器。
///
/// 控制台日志写到 stderr，stdout 留给 JSON 输出。
/// `console_level_override` 来自命令行，优先于配置文件中的级别。
pub fn init_global_logger(settings: &LogSettings, console_level_override: Option<LevelFilter>) {
    let console_level = console_level_override.unwrap_or(settings.console_log_level);

    let console_dispatch = format_dispatch()
        .level(console_level)
        .chain(std::io::stderr());

    let mut final_dispatch = Dispatch::new().chain(console_dispatch);

    if settings.enable_file_log {
        match get_log_file_path().and_then(|path| {
            fern::log_file(&path)
                .map(|file| (path.clone(), file))
                .map_err(|e| format!("无法打开日志文件 {path:?}: {e}"))
        }) {
            Ok((path, log_file)) => {
                final_dispatch = final_dispatch.chain(
                    format_dispatch()
                        .level(settings.file_log_level)
                        .chain(log_file),
                );
                eprintln!("[Logger Init] 文件日志已启用。日志文件将被写入: {path:?}");
            }
            Err(e) => {
                eprintln!("{e}。文件日志将被禁用。");
            }
        }
    }

    if let Err(e) = final_dispatch.apply() {
        eprintln!("日志记录失败: {e}");
    } else {
        log::debug!("日志记录器已初始化。控制台级别: {console_level}");
    }
}
