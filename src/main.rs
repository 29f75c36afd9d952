use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, anyhow};
use std::path::PathBuf;
use std::sync::Arc;

use lucky_draw_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{MailTransport, SmtpMailTransport},
    handlers, logging,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::{JwtService, hash_password},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // `hash-password <密码>`: 生成 admin.password_hash 后退出
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let password = args
            .get(2)
            .ok_or_else(|| anyhow!("usage: {} hash-password <password>", args[0]))?;
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    // 加载配置
    let config = Config::from_toml().map_err(|e| anyhow!("Failed to load configuration: {e}"))?;

    logging::init(&config.logging).context("Failed to open log file")?;

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // 创建JWT服务
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 创建外部服务
    let mail_transport: Arc<dyn MailTransport> =
        Arc::new(SmtpMailTransport::new(config.mail.clone()));
    let credentials = Arc::new(ConfigCredentialStore::new(&config.admin));

    // 创建服务
    let auth_service = AuthService::new(credentials, jwt_service.clone());
    let draw_service = DrawService::new(pool.clone());
    let registration_service = RegistrationService::new(pool.clone());
    let winner_service = WinnerService::new(pool.clone());
    let settings_service = SettingsService::new(pool.clone());
    let notification_service =
        NotificationService::new(pool.clone(), settings_service.clone(), mail_transport);
    let log_service = LogService::new(config.logging.file.as_ref().map(PathBuf::from));

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(registration_service.clone()))
            .app_data(web::Data::new(winner_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(log_service.clone()))
            .configure(swagger_config)
            .configure(handlers::api_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
