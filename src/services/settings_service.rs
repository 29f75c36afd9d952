use crate::entities::setting_entity::{self as settings, MAIL_PASSWORD_KEY, MAIL_USERNAME_KEY};
use crate::error::{AppError, AppResult};
use crate::external::MailSettings;
use crate::models::{MailSettingsResponse, UpdateMailSettingsRequest};
use crate::utils::validate_email;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

#[derive(Clone)]
pub struct SettingsService {
    pool: DatabaseConnection,
}

impl SettingsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(settings::Entity::find_by_id(key.to_string())
            .one(&self.pool)
            .await?
            .and_then(|s| s.value))
    }

    /// 当前邮件账号快照; 账号或密码为空时视为未配置
    pub async fn mail_settings(&self) -> AppResult<Option<MailSettings>> {
        let username = self.get(MAIL_USERNAME_KEY).await?.filter(|v| !v.is_empty());
        let password = self.get(MAIL_PASSWORD_KEY).await?.filter(|v| !v.is_empty());

        Ok(match (username, password) {
            (Some(username), Some(password)) => Some(MailSettings { username, password }),
            _ => None,
        })
    }

    pub async fn get_mail_settings(&self) -> AppResult<MailSettingsResponse> {
        let mail_username = self.get(MAIL_USERNAME_KEY).await?;
        let password_set = self
            .get(MAIL_PASSWORD_KEY)
            .await?
            .is_some_and(|v| !v.is_empty());

        Ok(MailSettingsResponse {
            mail_username,
            password_set,
        })
    }

    pub async fn update_mail_settings(
        &self,
        req: UpdateMailSettingsRequest,
    ) -> AppResult<MailSettingsResponse> {
        let username = req.mail_username.trim().to_string();
        validate_email(&username)?;
        if req.mail_password.is_empty() {
            return Err(AppError::ValidationError(
                "Mail password must not be empty".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        Self::upsert(&txn, MAIL_USERNAME_KEY, &username).await?;
        Self::upsert(&txn, MAIL_PASSWORD_KEY, &req.mail_password).await?;
        txn.commit().await?;

        log::info!("Admin updated mail settings (username: {username})");

        Ok(MailSettingsResponse {
            mail_username: Some(username),
            password_set: true,
        })
    }

    async fn upsert<C: ConnectionTrait>(conn: &C, key: &str, value: &str) -> AppResult<()> {
        settings::Entity::insert(settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(Some(value.to_string())),
            updated_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(settings::Column::Key)
                .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_db;

    fn request(username: &str, password: &str) -> UpdateMailSettingsRequest {
        UpdateMailSettingsRequest {
            mail_username: username.into(),
            mail_password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_mail_not_configured_initially() {
        let db = setup_db().await;
        let service = SettingsService::new(db);

        assert!(service.mail_settings().await.unwrap().is_none());
        let view = service.get_mail_settings().await.unwrap();
        assert!(view.mail_username.is_none());
        assert!(!view.password_set);
    }

    #[tokio::test]
    async fn test_update_then_overwrite_mail_settings() {
        let db = setup_db().await;
        let service = SettingsService::new(db);

        service
            .update_mail_settings(request("lottery@example.com", "secret-1"))
            .await
            .unwrap();
        assert_eq!(
            service.mail_settings().await.unwrap(),
            Some(MailSettings {
                username: "lottery@example.com".into(),
                password: "secret-1".into(),
            })
        );

        service
            .update_mail_settings(request("prizes@example.com", "secret-2"))
            .await
            .unwrap();
        let current = service.mail_settings().await.unwrap().unwrap();
        assert_eq!(current.username, "prizes@example.com");
        assert_eq!(current.password, "secret-2");

        let view = service.get_mail_settings().await.unwrap();
        assert_eq!(view.mail_username.as_deref(), Some("prizes@example.com"));
        assert!(view.password_set);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_input() {
        let db = setup_db().await;
        let service = SettingsService::new(db);

        assert!(matches!(
            service.update_mail_settings(request("not-an-email", "x")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service
                .update_mail_settings(request("lottery@example.com", ""))
                .await,
            Err(AppError::ValidationError(_))
        ));
        assert!(service.mail_settings().await.unwrap().is_none());
    }
}
