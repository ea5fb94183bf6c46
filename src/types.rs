// 导入标准库的 HashMap 用于存储元数据键值对
use std::collections::HashMap;
// 导入 serde 的 Serialize 和 Deserialize 特征，用于导出为 JSON
use serde::{Deserialize, Serialize};

use crate::utils::{ms_to_i64, parse_leading_float};

/// 表示一个逐字音节。
///
/// `start` 与 `length` 都是已经向下取整过的毫秒值。
/// 对于缺少 `#BPM` 或数字字段无法解析的行，这两个值可能是 NaN 或无穷大，
/// 解析器不会修正它们，导出 JSON 时会写成 `null`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syllable {
    #[serde(with = "lenient_ms")]
    pub start: f64, // 音节绝对开始时间 (毫秒)
    #[serde(with = "lenient_ms")]
    pub length: f64, // 音节持续时间 (毫秒)
    pub pitch: Option<i32>, // 音高，无法解析时为 None
    pub text: String,       // 音节原始文本，尾随空格有意义
}

impl Syllable {
    /// 音节开始时间的整数形式，时间无效时返回 `None`。
    pub fn start_ms(&self) -> Option<i64> {
        ms_to_i64(self.start)
    }

    pub fn length_ms(&self) -> Option<i64> {
        ms_to_i64(self.length)
    }

    /// 音节结束时间 (开始 + 时长)。
    pub fn end_ms(&self) -> Option<i64> {
        ms_to_i64(self.start + self.length)
    }
}

/// 表示一句歌词，由 `-` 行结束的一组连续音节组成。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(with = "lenient_ms")]
    pub start: f64, // 等于第一个音节的开始时间
    pub text: String,              // 所有音节文本按顺序拼接
    pub syllables: Vec<Syllable>, // 非空
}

impl Sentence {
    /// 由一组已累积的音节构建句子。音节列表为空时返回 `None`。
    pub fn from_syllables(syllables: Vec<Syllable>) -> Option<Self> {
        let start = syllables.first()?.start;
        let text = syllables.iter().map(|s| s.text.as_str()).collect();
        Some(Self {
            start,
            text,
            syllables,
        })
    }

    pub fn start_ms(&self) -> Option<i64> {
        ms_to_i64(self.start)
    }

    /// 句子结束时间，即最后一个音节的结束时间。
    pub fn end_ms(&self) -> Option<i64> {
        self.syllables.last().and_then(Syllable::end_ms)
    }
}

/// 解析得到的完整歌词文档。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyricsDocument {
    /// 小写标签名 -> 原始值
    pub metadata: HashMap<String, String>,
    pub sentences: Vec<Sentence>,
}

impl LyricsDocument {
    /// 按标签名查找元数据，不区分大小写。
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.metadata
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.tag("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.tag("artist")
    }

    /// `#BPM` 标签的数值形式，允许使用逗号作为小数点。
    pub fn bpm(&self) -> Option<f64> {
        self.tag("bpm")
            .map(|v| parse_leading_float(&v.replacen(',', ".", 1)))
            .filter(|v| !v.is_nan())
    }

    /// `#GAP` 标签的数值形式 (毫秒)。
    pub fn gap(&self) -> Option<f64> {
        self.tag("gap")
            .map(parse_leading_float)
            .filter(|v| !v.is_nan())
    }

    /// 所有句子的文本，以换行连接。
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 最后一个音节的结束时间。
    pub fn end_ms(&self) -> Option<i64> {
        self.sentences.last().and_then(Sentence::end_ms)
    }
}

/// 毫秒字段的序列化方式：`i64` 范围内的值写成整数，超出范围的有限值写成浮点数，
/// NaN 和无穷大写成 `null`。
mod lenient_ms {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::utils::ms_to_i64;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        match ms_to_i64(*value) {
            Some(ms) => serializer.serialize_i64(ms),
            None if value.is_finite() => serializer.serialize_f64(*value),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
