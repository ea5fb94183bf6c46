use thiserror::Error;

/// 解析器之外的外围操作 (读取文件、导出 JSON、读写配置) 可能发生的错误。
///
/// 解析本身不会失败，因此这里没有解析相关的变体。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("文件不是有效的 UTF-8 文本: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON 序列化/反序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置文件错误: {0}")]
    Settings(#[from] ini::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
