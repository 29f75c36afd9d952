use crate::models::*;
use crate::services::{DrawService, RegistrationService, WinnerService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use std::net::SocketAddr;

/// 客户端 IP (优先 Forwarded / X-Forwarded-For), 去掉端口
fn client_ip(req: &HttpRequest) -> Option<String> {
    let info = req.connection_info();
    let addr = info.realip_remote_addr()?;
    Some(
        addr.parse::<SocketAddr>()
            .map(|socket| socket.ip().to_string())
            .unwrap_or_else(|_| addr.to_string()),
    )
}

#[utoipa::path(
    get,
    path = "/draws",
    tag = "draw",
    responses(
        (status = 200, description = "List draws, newest draw time first", body = [DrawResponse])
    )
)]
pub async fn list_draws(service: web::Data<DrawService>) -> Result<HttpResponse> {
    match service.list_draws(Utc::now()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/{id}",
    tag = "draw",
    params(("id" = i64, Path, description = "Draw ID")),
    responses(
        (status = 200, description = "Draw details", body = DrawResponse),
        (status = 404, description = "Draw not found", body = ApiError)
    )
)]
pub async fn get_draw(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_draw(path.into_inner(), Utc::now()).await {
        Ok(draw) => Ok(HttpResponse::Ok().json(ApiResponse::success(draw))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draws/{id}/register",
    tag = "draw",
    params(("id" = i64, Path, description = "Draw ID")),
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered, lucky number assigned", body = RegistrationResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 404, description = "Draw not found", body = ApiError),
        (status = 409, description = "Draw closed or email/phone already registered", body = ApiError)
    )
)]
pub async fn register(
    service: web::Data<RegistrationService>,
    path: web::Path<i64>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let ip = client_ip(&req);
    match service
        .register(path.into_inner(), request.into_inner(), ip, Utc::now())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 获取中奖者; 首次调用时开奖, 之后返回同一结果
#[utoipa::path(
    get,
    path = "/draws/{id}/winner",
    tag = "draw",
    params(("id" = i64, Path, description = "Draw ID")),
    responses(
        (status = 200, description = "Winner of the draw (selected on first call)", body = WinnerResponse),
        (status = 404, description = "Draw not found or no participants", body = ApiError),
        (status = 409, description = "Draw time has not been reached", body = ApiError)
    )
)]
pub async fn get_winner(
    service: web::Data<WinnerService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.resolve_winner(path.into_inner(), Utc::now()).await {
        Ok(winner) => Ok(HttpResponse::Ok().json(ApiResponse::success(winner))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/draws")
            .route("", web::get().to(list_draws))
            .route("/{id}", web::get().to(get_draw))
            .route("/{id}/register", web::post().to(register))
            .route("/{id}/winner", web::get().to(get_winner)),
    );
}
