//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 批量缩放链路中的所有失败都收敛到 `ResizeError` 一个枚举，
//! 调用侧既能拿到可读消息，也能按分支匹配或读取稳定的 `code()`。
//! 流水线内部不打印错误日志，只负责向上传递。

/// 图片缩放统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    /// 声明的 MIME 类型不是 `image/*`，携带文件名。
    #[error("文件 {0} 不是图片")]
    InvalidInput(String),

    /// 读取原始字节或解码位图失败。
    #[error("解码错误：{0}")]
    Decode(String),

    /// 未知输出类型，携带原始取值。
    #[error("无效的输出类型：{0}（可选：base64 / formdata）")]
    InvalidOutputType(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 画布分配后重绘失败。
    #[error("重绘错误：{0}")]
    Render(String),

    #[error("编码错误：{0}")]
    Encode(String),

    /// 单文件任务 panic 或被中止。
    #[error("任务执行失败：{0}")]
    Task(String),
}

impl ResizeError {
    /// 稳定错误码，供调用侧上报与分支判断。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Decode(_) => "decode",
            Self::InvalidOutputType(_) => "invalid_output_type",
            Self::InvalidConfig(_) => "invalid_config",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Render(_) => "render",
            Self::Encode(_) => "encode",
            Self::Task(_) => "task",
        }
    }
}

impl From<ResizeError> for String {
    fn from(error: ResizeError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_names_the_file() {
        let err = ResizeError::InvalidInput("notes.txt".to_string());

        assert_eq!(err.to_string(), "文件 notes.txt 不是图片");
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn render_errors_have_their_own_code() {
        assert_eq!(ResizeError::Render("x".to_string()).code(), "render");
        assert_eq!(ResizeError::Encode("x".to_string()).code(), "encode");
    }

    #[test]
    fn invalid_output_type_keeps_offending_value() {
        let message: String = ResizeError::InvalidOutputType("xml".to_string()).into();

        assert!(message.contains("xml"));
    }
}
