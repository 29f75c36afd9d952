use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LogQuery {
    /// 返回条数 (默认 200, 最大 1000)
    pub limit: Option<usize>,
}

/// 一行日志; 无法解析为 JSON 的行原样放在 message 中
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LogLine {
    pub timestamp: Option<String>,
    pub level: Option<String>,
    pub message: String,
    pub target: Option<String>,
}
