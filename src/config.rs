use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// 管理员账号: 只保存 bcrypt 哈希, 不保存明文密码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password_hash: String,
}

/// SMTP 服务器参数; 账号密码存放在 settings 表中, 运行时可修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// true: STARTTLS (587), false: implicit TLS (465)
    pub starttls: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            starttls: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Optional JSON-lines log file, also served by the admin log viewer.
    #[serde(default)]
    pub file: Option<String>,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Self::from_env_vars(|name| env::var(name).ok())?
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// 无配置文件时完全由环境变量构建; 管理员密码哈希与 JWT 密钥必须提供
    fn from_env_vars<F>(get_env: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password_hash = get_env("ADMIN_PASSWORD_HASH")
            .ok_or("ADMIN_PASSWORD_HASH is not set and no config.toml was found")?;
        let jwt_secret = get_env("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or("JWT_SECRET is not set and no config.toml was found")?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env("PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5000),
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL")
                    .unwrap_or_else(|| "sqlite://lottery.db?mode=rwc".to_string()),
                max_connections: get_env("DB_MAX_CONNECTIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expires_in: get_env("JWT_ACCESS_EXPIRES_IN")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(28_800),
            },
            admin: AdminConfig {
                username: get_env("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password_hash,
            },
            mail: MailConfig::default(),
            logging: LoggingConfig {
                file: get_env("LOG_FILE"),
            },
        })
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.admin.username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD_HASH") {
            self.admin.password_hash = v;
        }
        if let Ok(v) = env::var("SMTP_HOST") {
            self.mail.smtp_host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT")
            && let Ok(p) = v.parse()
        {
            self.mail.smtp_port = p;
        }
        if let Ok(v) = env::var("SMTP_STARTTLS")
            && let Ok(b) = v.parse()
        {
            self.mail.starttls = b;
        }
        if let Ok(v) = env::var("LOG_FILE") {
            self.logging.file = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_only_config_requires_jwt_secret() {
        let err = Config::from_env_vars(lookup(&[("ADMIN_PASSWORD_HASH", "hash")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = Config::from_env_vars(lookup(&[
            ("ADMIN_PASSWORD_HASH", "hash"),
            ("JWT_SECRET", ""),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_env_only_config_requires_admin_password_hash() {
        let err = Config::from_env_vars(lookup(&[("JWT_SECRET", "s3cret")])).unwrap_err();
        assert!(err.to_string().contains("ADMIN_PASSWORD_HASH"));
    }

    #[test]
    fn test_env_only_config_defaults() {
        let config = Config::from_env_vars(lookup(&[
            ("ADMIN_PASSWORD_HASH", "hash"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8081"),
        ]))
        .unwrap();
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.access_token_expires_in, 28_800);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.url, "sqlite://lottery.db?mode=rwc");
        assert_eq!(config.admin.username, "admin");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [jwt]
            secret = "secret"
            access_token_expires_in = 3600

            [admin]
            username = "admin"
            password_hash = "$2b$04$abcdefghijklmnopqrstuv"
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.smtp_port, 587);
        assert!(config.mail.starttls);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_parse_mail_section() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 5000

            [database]
            url = "sqlite://lottery.db?mode=rwc"
            max_connections = 5

            [jwt]
            secret = "secret"
            access_token_expires_in = 3600

            [admin]
            username = "root"
            password_hash = "hash"

            [mail]
            smtp_host = "smtp.example.com"
            smtp_port = 465
            starttls = false

            [logging]
            file = "app.log"
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.mail.smtp_port, 465);
        assert!(!config.mail.starttls);
        assert_eq!(config.logging.file.as_deref(), Some("app.log"));
    }
}
