use crate::error::AppResult;
use crate::types::LyricsDocument;
use crate::ultrastar_parser::parse_ultrastar;
use std::fs;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// 读取 UltraStar 文件并解析。
///
/// 文件必须是 UTF-8 编码，开头的 BOM 会被去掉。
pub fn load_lyrics_from_file(path: impl AsRef<Path>) -> AppResult<LyricsDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let content = String::from_utf8(bytes)?;
    log::info!("[UltraStar] 已读取文件 '{}'", path.display());
    Ok(load_lyrics_from_str(&content))
}

pub fn load_lyrics_from_str(content: &str) -> LyricsDocument {
    parse_ultrastar(content.strip_prefix(UTF8_BOM).unwrap_or(content))
}

/// 将歌词文档导出为 JSON 字符串。
pub fn to_json(document: &LyricsDocument, pretty: bool) -> AppResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(json)
}

pub fn save_json(document: &LyricsDocument, path: impl AsRef<Path>, pretty: bool) -> AppResult<()> {
    let path = path.as_ref();
    fs::write(path, to_json(document, pretty)?)?;
    log::info!("[UltraStar] JSON 已保存到: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    const SAMPLE: &str = "#TITLE:All Star\n#BPM:104\n#GAP:500\n: 0 18 54 Some\n: 9 12 61 bo\n-\n";

    #[test]
    fn test_load_from_file_matches_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let loaded = load_lyrics_from_file(file.path()).unwrap();
        assert_eq!(loaded, parse_ultrastar(SAMPLE));
    }

    #[test]
    fn test_bom_is_stripped() {
        let with_bom = format!("{UTF8_BOM}{SAMPLE}");
        let doc = load_lyrics_from_str(&with_bom);
        assert_eq!(doc.title(), Some("All Star"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_lyrics_from_file(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'#', 0xff, 0xfe, b'\n']).unwrap();
        let result = load_lyrics_from_file(file.path());
        assert!(matches!(result, Err(AppError::Utf8(_))));
    }

    #[test]
    fn test_json_export() {
        let doc = parse_ultrastar(SAMPLE);
        let json = to_json(&doc, false).unwrap();
        assert!(json.contains(r#""start":500"#));
        assert!(json.contains(r#""text":"Somebo""#));

        let back: LyricsDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_save_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        save_json(&parse_ultrastar(SAMPLE), &out, true).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("\"title\": \"All Star\""));
    }
}
