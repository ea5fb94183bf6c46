//! # UltraStar 格式解析器
//!
//! UltraStar 歌词文件 (`.txt`) 以行为单位：
//!
//! ```text
//! #TITLE:All Star
//! #BPM:104
//! #GAP:500
//! : 0 18 54 Some
//! : 9 12 61 bo
//! -
//! ```
//!
//! `#` 开头的是元数据标签，`:` 开头的是音节 (开始拍, 持续拍数, 音高, 文本)，
//! `-` 开头的行结束当前句子。拍数以四分之一拍为单位，
//! 结合 `#BPM` 和 `#GAP` 换算为绝对毫秒时间。

use crate::types::{LyricsDocument, Sentence, Syllable};
use crate::utils::{parse_leading_float, parse_leading_int, split_with_limit};

/// 音节行最多切分的段数：标记、开始拍、持续拍数、音高、文本
const SYLLABLE_FIELD_LIMIT: usize = 5;

/// UltraStar 歌词解析器。
///
/// 构造时即完成解析，之后通过 [`UltraStarParser::lyrics`] 获取结果。
#[derive(Debug, Clone)]
pub struct UltraStarParser {
    lyrics: LyricsDocument,
}

impl UltraStarParser {
    pub fn new(text: &str) -> Self {
        Self {
            lyrics: parse_ultrastar(text),
        }
    }

    /// 解析得到的歌词文档。
    pub fn lyrics(&self) -> &LyricsDocument {
        &self.lyrics
    }

    pub fn into_lyrics(self) -> LyricsDocument {
        self.lyrics
    }
}

/// 单次解析过程中的状态，只在一次 `parse_ultrastar` 调用内存在。
struct ParserState {
    document: LyricsDocument,
    pending: Vec<Syllable>, // 尚未被 `-` 行收尾的音节
    gap: f64,
    bpm: f64,
    ms_per_beat: f64,
}

impl ParserState {
    fn new() -> Self {
        Self {
            document: LyricsDocument::default(),
            pending: Vec::new(),
            gap: 0.0,
            bpm: 0.0,
            ms_per_beat: ms_per_beat(0.0),
        }
    }

    fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
        self.ms_per_beat = ms_per_beat(bpm);
    }
}

/// 每个四分之一拍对应的毫秒数。BPM 为 0 时结果为无穷大。
fn ms_per_beat(bpm: f64) -> f64 {
    60_000.0 / (bpm * 4.0)
}

/// 解析 UltraStar 格式内容到 `LyricsDocument`。
///
/// 解析不会失败：无法识别的行被忽略，无法解析的数字以 NaN 保留在结果中。
/// 文件末尾没有被 `-` 行结束的音节会被丢弃。
pub fn parse_ultrastar(text: &str) -> LyricsDocument {
    let mut state = ParserState::new();
    let normalized = text.replace('\r', "");

    for (index, raw_line) in normalized.split('\n').enumerate() {
        let line_num = index + 1;
        let line = raw_line.trim_start();
        if line.is_empty() {
            continue;
        }

        match line.chars().next() {
            Some('#') => handle_metadata_line(&mut state, line, line_num),
            Some(':') => handle_syllable_line(&mut state, line, line_num),
            Some('-') => handle_sentence_end(&mut state, line_num),
            _ => {
                log::trace!("[UltraStar 解析] 行 {line_num}: 忽略无法识别的行: '{line}'");
            }
        }
    }

    if !state.pending.is_empty() {
        log::warn!(
            "[UltraStar 解析] 文件末尾有 {} 个音节没有以 '-' 结束，已丢弃。",
            state.pending.len()
        );
    }

    log::debug!(
        "[UltraStar 解析] 完成: {} 个元数据标签, {} 个句子。",
        state.document.metadata.len(),
        state.document.sentences.len()
    );

    state.document
}

fn handle_metadata_line(state: &mut ParserState, line: &str, line_num: usize) {
    let body = &line[1..];
    let (key, value) = match body.split_once(':') {
        Some((key, value)) => (key.to_lowercase(), value),
        None => {
            log::warn!("[UltraStar 解析] 行 {line_num}: 元数据标签缺少 ':'，值视为空: '{line}'");
            (body.to_lowercase(), "")
        }
    };

    match key.as_str() {
        "gap" => {
            state.gap = parse_leading_float(value);
            log::debug!("[UltraStar 解析] 行 {line_num}: GAP = {}ms", state.gap);
        }
        "bpm" => {
            state.set_bpm(parse_leading_float(&value.replacen(',', ".", 1)));
            log::debug!(
                "[UltraStar 解析] 行 {line_num}: BPM = {}, 每拍 {}ms",
                state.bpm,
                state.ms_per_beat
            );
        }
        _ => {}
    }

    state.document.metadata.insert(key, value.to_string());
}

fn handle_syllable_line(state: &mut ParserState, line: &str, line_num: usize) {
    let fields = split_with_limit(line, ' ', SYLLABLE_FIELD_LIMIT);
    let fields = &fields[1..];
    if fields.len() < SYLLABLE_FIELD_LIMIT - 1 {
        log::warn!("[UltraStar 解析] 行 {line_num}: 音节行字段不足: '{line}'");
    }

    let field = |i: usize| fields.get(i).copied().unwrap_or("");
    let beat_offset = beats(field(0));
    let beat_duration = beats(field(1));

    if state.bpm == 0.0 || state.bpm.is_nan() {
        log::warn!("[UltraStar 解析] 行 {line_num}: 在有效的 #BPM 之前出现音节，时间无效。");
    }

    let syllable = Syllable {
        start: (beat_offset * state.ms_per_beat + state.gap).floor(),
        length: (beat_duration * state.ms_per_beat).floor(),
        pitch: parse_leading_int(field(2)).and_then(|p| i32::try_from(p).ok()),
        text: field(3).to_string(),
    };
    log::trace!(
        "[UltraStar 解析] 行 {line_num}: 音节 '{}' ({}, {})",
        syllable.text,
        syllable.start,
        syllable.length
    );
    state.pending.push(syllable);
}

fn handle_sentence_end(state: &mut ParserState, line_num: usize) {
    let syllables = std::mem::take(&mut state.pending);
    match Sentence::from_syllables(syllables) {
        Some(sentence) => {
            log::trace!("[UltraStar 解析] 行 {line_num}: 句子 '{}'", sentence.text);
            state.document.sentences.push(sentence);
        }
        None => {
            log::trace!("[UltraStar 解析] 行 {line_num}: 空句子，已跳过。");
        }
    }
}

/// 拍数字段转为浮点数，无法解析时为 NaN。
fn beats(field: &str) -> f64 {
    parse_leading_int(field).map_or(f64::NAN, |b| b as f64)
}
