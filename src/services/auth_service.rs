use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse};
use crate::utils::{JwtService, verify_password};
use async_trait::async_trait;
use std::sync::Arc;

/// 管理员凭据来源
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> AppResult<bool>;
}

/// 配置文件中的单个管理员账号 (bcrypt 哈希)
pub struct ConfigCredentialStore {
    username: String,
    password_hash: String,
}

impl ConfigCredentialStore {
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
        }
    }
}

#[async_trait]
impl CredentialStore for ConfigCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> AppResult<bool> {
        if username != self.username {
            return Ok(false);
        }
        let password = password.to_string();
        let hash = self.password_hash.clone();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::InternalError(format!("Password check panicked: {e}")))?
    }
}

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialStore>, jwt_service: JwtService) -> Self {
        Self {
            credentials,
            jwt_service,
        }
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        if !self.credentials.verify(&req.username, &req.password).await? {
            log::warn!("Failed admin login attempt for username: {}", req.username);
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        let access_token = self.jwt_service.generate_admin_token(&req.username)?;
        log::info!("Admin {} logged in successfully", req.username);

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
