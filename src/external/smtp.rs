use crate::config::MailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// 邮件账号 (从 settings 表读取的快照, 每次发送前重新获取)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub username: String,
    pub password: String,
}

impl MailSettings {
    /// 发件人即 SMTP 登录账号
    pub fn sender(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, settings: &MailSettings, mail: OutgoingMail) -> AppResult<()>;
}

/// SMTP transport; the lettre client is rebuilt from the given settings on
/// every send so credential updates apply without a restart.
#[derive(Clone)]
pub struct SmtpMailTransport {
    config: MailConfig,
}

impl SmtpMailTransport {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn build_transport(
        &self,
        settings: &MailSettings,
    ) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
        }
        .map_err(|e| AppError::MailTransportFailure(e.to_string()))?;

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build())
    }
}

pub fn build_message(settings: &MailSettings, mail: OutgoingMail) -> AppResult<Message> {
    let from: Mailbox = settings
        .sender()
        .parse()
        .map_err(|e| AppError::MailTransportFailure(format!("Invalid sender address: {e}")))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|e| AppError::MailTransportFailure(format!("Invalid recipient address: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body)
        .map_err(|e| AppError::MailTransportFailure(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, settings: &MailSettings, mail: OutgoingMail) -> AppResult<()> {
        let message = build_message(settings, mail)?;
        let transport = self.build_transport(settings)?;
        transport
            .send(message)
            .await
            .map_err(|e| AppError::MailTransportFailure(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(username: &str) -> MailSettings {
        MailSettings {
            username: username.to_string(),
            password: "app-password".to_string(),
        }
    }

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            to: to.to_string(),
            subject: "Congratulations! You won: VPS Pro".to_string(),
            body: "Hi Lan, you won VPS Pro!".to_string(),
        }
    }

    #[test]
    fn test_build_message_plain_text() {
        let message = build_message(&settings("lottery@example.com"), mail("lan@example.com"))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: lan@example.com"));
        assert!(raw.contains("From: lottery@example.com"));
        assert!(raw.contains("Subject: Congratulations! You won: VPS Pro"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("Hi Lan, you won VPS Pro!"));
    }

    #[test]
    fn test_invalid_recipient_is_transport_failure() {
        let err = build_message(&settings("lottery@example.com"), mail("not an address"))
            .unwrap_err();
        assert!(matches!(err, AppError::MailTransportFailure(_)));
    }

    #[test]
    fn test_invalid_sender_is_transport_failure() {
        let err = build_message(&settings("lottery"), mail("lan@example.com")).unwrap_err();
        assert!(matches!(err, AppError::MailTransportFailure(_)));
    }
}
