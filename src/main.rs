use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use ultrastar_lyrics::app_settings::AppSettings;
use ultrastar_lyrics::utils::format_timestamp;
use ultrastar_lyrics::{AppResult, LyricsDocument, io, logger};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Off => Self::Off,
            CliLogLevel::Error => Self::Error,
            CliLogLevel::Warn => Self::Warn,
            CliLogLevel::Info => Self::Info,
            CliLogLevel::Debug => Self::Debug,
            CliLogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ultrastar_lyrics")]
#[command(version)]
#[command(about = "将 UltraStar 歌词文件解析为带毫秒时间的 JSON")]
struct Cli {
    /// UltraStar .txt 文件
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 输出 JSON 文件，省略时写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 格式化 JSON 输出
    #[arg(short, long)]
    pretty: bool,

    /// 只打印每句的开始时间和文本
    #[arg(short, long)]
    summary: bool,

    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

fn print_summary(document: &LyricsDocument) {
    if let Some(title) = document.title() {
        println!("{} - {}", document.artist().unwrap_or("?"), title);
    }
    for sentence in &document.sentences {
        println!("{:>12}  {}", format_timestamp(sentence.start), sentence.text);
    }
}

fn run(cli: &Cli, settings: &AppSettings) -> AppResult<()> {
    let document = io::load_lyrics_from_file(&cli.input)?;
    log::info!(
        "[UltraStar] '{}' 解析完成，共 {} 句。",
        cli.input.display(),
        document.sentences.len()
    );

    if cli.summary {
        print_summary(&document);
        return Ok(());
    }

    let pretty = cli.pretty || settings.output_settings.pretty_json;
    match &cli.output {
        Some(path) => io::save_json(&document, path, pretty),
        None => {
            println!("{}", io::to_json(&document, pretty)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = AppSettings::load();
    logger::init_global_logger(&settings.log_settings, cli.log_level.map(Into::into));

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[UltraStar] 处理 '{}' 失败: {e}", cli.input.display());
            ExitCode::FAILURE
        }
    }
}
