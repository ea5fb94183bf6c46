// 导入 once_cell 和 regex，用于静态初始化数字前缀匹配的正则表达式
use once_cell::sync::Lazy;
use regex::Regex;

// 正则表达式：匹配字符串开头的整数部分，例如 "-12abc" 中的 "-12"
static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+").expect("未能编译 LEADING_INT_RE"));

// 正则表达式：匹配字符串开头的浮点数部分，例如 "104.5bpm" 中的 "104.5"
// 指数部分只有在完整时才会被匹配，"1e" 只会匹配到 "1"
static LEADING_FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("未能编译 LEADING_FLOAT_RE")
});

/// 按分隔符切分字符串，最多返回 `max_parts` 段。
///
/// 超出部分不会再被切分，而是作为最后一段原样保留 (包括其中的分隔符)。
/// `max_parts` 为 0 时表示不限制段数。
///
/// # Examples
/// ```
/// use ultrastar_lyrics::utils::split_with_limit;
/// assert_eq!(split_with_limit(": 0 4 5 a b", ' ', 5), vec![":", "0", "4", "5", "a b"]);
/// ```
pub fn split_with_limit(s: &str, delimiter: char, max_parts: usize) -> Vec<&str> {
    if max_parts == 0 {
        s.split(delimiter).collect()
    } else {
        s.splitn(max_parts, delimiter).collect()
    }
}

/// 宽松地解析字符串开头的整数。
///
/// 会忽略前导空白，只读取开头的 `[+-]数字` 部分，其后的内容被忽略。
/// 开头没有数字时返回 `None`。
pub fn parse_leading_int(s: &str) -> Option<i64> {
    LEADING_INT_RE
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// 宽松地解析字符串开头的浮点数，无法解析时返回 NaN。
pub fn parse_leading_float(s: &str) -> f64 {
    let Some(m) = LEADING_FLOAT_RE.find(s.trim_start()) else {
        return f64::NAN;
    };
    match m.as_str() {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        number => number.parse().unwrap_or(f64::NAN),
    }
}

/// 将向下取整后的毫秒值转为 `i64`。
///
/// NaN、无穷大以及超出 `i64` 范围的值返回 `None`，不会被截断到边界值。
pub fn ms_to_i64(ms: f64) -> Option<i64> {
    // i64::MAX as f64 等于 2^63，本身已超出范围
    let floored = ms.floor();
    (floored >= i64::MIN as f64 && floored < i64::MAX as f64).then_some(floored as i64)
}

/// 将毫秒时间格式化为 `1m2s345ms` 这样的标签，用于日志和摘要输出。
pub fn format_timestamp(ms: f64) -> String {
    let Some(total) = ms_to_i64(ms) else {
        return "--".to_string();
    };
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{sign}{}m{}s{}ms",
        total / 60_000,
        (total / 1000) % 60,
        total % 1000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_limit_keeps_remainder() {
        assert_eq!(
            split_with_limit("a b c d e f", ' ', 3),
            vec!["a", "b", "c d e f"]
        );
        assert_eq!(split_with_limit("a b", ' ', 5), vec!["a", "b"]);
        assert_eq!(split_with_limit("", ' ', 5), vec![""]);
    }

    #[test]
    fn test_split_with_limit_unlimited() {
        assert_eq!(split_with_limit("a  b", ' ', 0), vec!["a", "", "b"]);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("18"), Some(18));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("  42abc"), Some(42));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("104"), 104.0);
        assert_eq!(parse_leading_float(" 208.5 "), 208.5);
        assert_eq!(parse_leading_float("1e3x"), 1000.0);
        assert_eq!(parse_leading_float("1e"), 1.0);
        assert_eq!(parse_leading_float(".5"), 0.5);
        assert_eq!(parse_leading_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_leading_float("abc").is_nan());
        assert!(parse_leading_float("").is_nan());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(500.0), "0m0s500ms");
        assert_eq!(format_timestamp(61_234.9), "1m1s234ms");
        assert_eq!(format_timestamp(f64::NAN), "--");
        assert_eq!(format_timestamp(-1500.0), "-0m1s500ms");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(-1e300), "--");
        assert_eq!(format_timestamp(1e25), "--");
        assert_eq!(format_timestamp(i64::MIN as f64), "-153722867280912m55s808ms");
    }

    #[test]
    fn test_ms_to_i64() {
        assert_eq!(ms_to_i64(1798.07), Some(1798));
        assert_eq!(ms_to_i64(-0.5), Some(-1));
        assert_eq!(ms_to_i64(1e25), None);
        assert_eq!(ms_to_i64(-1e300), None);
        assert_eq!(ms_to_i64(f64::INFINITY), None);
        assert_eq!(ms_to_i64(f64::NAN), None);
    }

    #[test]
    fn test_non_ascii_digits_end_the_number() {
        assert_eq!(parse_leading_int("12\u{0663}"), Some(12));
        assert_eq!(parse_leading_int("\u{0663}"), None);
        assert_eq!(parse_leading_float("1.5\u{0663}"), 1.5);
        assert!(parse_leading_float("\u{0663}").is_nan());
    }
}
