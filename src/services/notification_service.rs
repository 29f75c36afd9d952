use crate::entities::participant_entity as participants;
use crate::error::{AppError, AppResult};
use crate::external::{MailTransport, OutgoingMail};
use crate::models::NotifyWinnerResponse;
use crate::services::{SettingsService, find_draw};
use crate::utils::{
    DEFAULT_WINNER_EMAIL_TEMPLATE, WinnerEmailFields, render_winner_email, winner_email_subject,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
    settings_service: SettingsService,
    transport: Arc<dyn MailTransport>,
}

impl NotificationService {
    pub fn new(
        pool: DatabaseConnection,
        settings_service: SettingsService,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            pool,
            settings_service,
            transport,
        }
    }

    /// 给中奖者发送邮件 (管理员手动触发, 失败不自动重试)
    pub async fn notify_winner(&self, draw_id: i64) -> AppResult<NotifyWinnerResponse> {
        let draw = find_draw(&self.pool, draw_id).await?;
        let winner_id = draw.winner_id.ok_or(AppError::NoWinner)?;
        let winner = participants::Entity::find_by_id(winner_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Winner {winner_id} not found")))?;

        // 每次发送前重新读取账号, 设置修改后立即生效
        let mail_settings = self
            .settings_service
            .mail_settings()
            .await?
            .ok_or(AppError::MailNotConfigured)?;

        let template = draw
            .winner_email_content
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_WINNER_EMAIL_TEMPLATE);
        let body = render_winner_email(
            template,
            &WinnerEmailFields {
                full_name: &winner.full_name,
                phone: &winner.phone,
                email: &winner.email,
                prize_name: &draw.prize_name,
                lucky_number: &winner.lucky_number,
            },
        );
        let subject = winner_email_subject(&draw.prize_name);

        let mail = OutgoingMail {
            to: winner.email.clone(),
            subject: subject.clone(),
            body,
        };

        match self.transport.send(&mail_settings, mail).await {
            Ok(()) => {
                log::info!(
                    "Successfully sent winner email for draw '{}' to {}",
                    draw.prize_name,
                    winner.email
                );
                Ok(NotifyWinnerResponse {
                    recipient: winner.email,
                    subject,
                })
            }
            Err(err) => {
                log::error!(
                    "Error sending winner email for draw '{}' to {}. Details: {}",
                    draw.prize_name,
                    winner.email,
                    err
                );
                Err(match err {
                    AppError::MailTransportFailure(_) => err,
                    other => AppError::MailTransportFailure(other.to_string()),
                })
            }
        }
    }
}
