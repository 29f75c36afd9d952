use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 更新邮件账号请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateMailSettingsRequest {
    /// SMTP 登录账号, 同时作为发件人地址
    pub mail_username: String,
    pub mail_password: String,
}

/// 邮件设置 (不返回密码)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MailSettingsResponse {
    pub mail_username: Option<String>,
    pub password_set: bool,
}
