use crate::handlers::auth::auth_config;
use crate::models::*;
use crate::services::{DrawService, LogService, NotificationService, SettingsService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;

#[utoipa::path(
    post,
    path = "/admin/draws",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateDrawRequest,
    responses(
        (status = 200, description = "Draw created", body = AdminDrawResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn create_draw(
    service: web::Data<DrawService>,
    request: web::Json<CreateDrawRequest>,
) -> Result<HttpResponse> {
    match service.create_draw(request.into_inner(), Utc::now()).await {
        Ok(draw) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            draw,
            "Draw created".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/draws/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Draw ID")),
    responses(
        (status = 200, description = "Draw and its participants deleted"),
        (status = 404, description = "Draw not found", body = ApiError)
    )
)]
pub async fn delete_draw(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete_draw(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Draw deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/draws/{id}/participants",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Draw ID")),
    responses(
        (status = 200, description = "Draw with its participants", body = ParticipantListResponse),
        (status = 404, description = "Draw not found", body = ApiError)
    )
)]
pub async fn list_participants(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.list_participants(path.into_inner(), Utc::now()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 发送中奖邮件; 失败需管理员手动重试
#[utoipa::path(
    post,
    path = "/admin/draws/{id}/notify",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Draw ID")),
    responses(
        (status = 200, description = "Winner email sent", body = NotifyWinnerResponse),
        (status = 409, description = "Draw has no winner yet", body = ApiError),
        (status = 412, description = "Mail is not configured", body = ApiError),
        (status = 502, description = "SMTP transport failure", body = ApiError)
    )
)]
pub async fn notify_winner(
    service: web::Data<NotificationService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.notify_winner(path.into_inner()).await {
        Ok(result) => {
            let message = format!("Email sent to {}", result.recipient);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(result, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/settings/mail",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Mail settings (password hidden)", body = MailSettingsResponse)
    )
)]
pub async fn get_mail_settings(service: web::Data<SettingsService>) -> Result<HttpResponse> {
    match service.get_mail_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(settings))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/settings/mail",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = UpdateMailSettingsRequest,
    responses(
        (status = 200, description = "Mail settings saved", body = MailSettingsResponse),
        (status = 400, description = "Invalid input", body = ApiError)
    )
)]
pub async fn update_mail_settings(
    service: web::Data<SettingsService>,
    request: web::Json<UpdateMailSettingsRequest>,
) -> Result<HttpResponse> {
    match service.update_mail_settings(request.into_inner()).await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            settings,
            "Mail settings saved".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/logs",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("limit" = Option<usize>, Query, description = "Number of lines (default 200, max 1000)")),
    responses(
        (status = 200, description = "Most recent log lines first", body = [LogLine])
    )
)]
pub async fn get_logs(
    service: web::Data<LogService>,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse> {
    match service.recent(query.limit).await {
        Ok(lines) => Ok(HttpResponse::Ok().json(ApiResponse::success(lines))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .configure(auth_config)
            .route("/draws", web::post().to(create_draw))
            .route("/draws/{id}", web::delete().to(delete_draw))
            .route("/draws/{id}/participants", web::get().to(list_participants))
            .route("/draws/{id}/notify", web::post().to(notify_winner))
            .route("/settings/mail", web::get().to(get_mail_settings))
            .route("/settings/mail", web::put().to(update_mail_settings))
            .route("/logs", web::get().to(get_logs)),
    );
}
