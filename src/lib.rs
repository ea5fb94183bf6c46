//! UltraStar 卡拉OK歌词解析库。
//!
//! 将 UltraStar `.txt` 文件中以拍为单位的音节解析为带绝对毫秒时间的句子和音节。

pub mod app_settings;
pub mod error;
pub mod io;
pub mod logger;
pub mod types;
pub mod ultrastar_parser;
pub mod utils;

pub use error::{AppError, AppResult};
pub use types::{LyricsDocument, Sentence, Syllable};
pub use ultrastar_parser::{UltraStarParser, parse_ultrastar};
