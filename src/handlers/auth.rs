use crate::middlewares::AdminIdentity;
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid username or password", body = ApiError)
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout(req: HttpRequest) -> Result<HttpResponse> {
    // 令牌无状态, 由客户端丢弃
    if let Some(AdminIdentity(username)) = req.extensions().get::<AdminIdentity>() {
        log::info!("Admin {username} logged out");
    }
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out")))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout));
}
