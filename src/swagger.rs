use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::draw::list_draws,
        handlers::draw::get_draw,
        handlers::draw::register,
        handlers::draw::get_winner,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::admin::create_draw,
        handlers::admin::delete_draw,
        handlers::admin::list_participants,
        handlers::admin::notify_winner,
        handlers::admin::get_mail_settings,
        handlers::admin::update_mail_settings,
        handlers::admin::get_logs,
    ),
    components(
        schemas(
            DrawStatus,
            CreateDrawRequest,
            WinnerSummary,
            DrawResponse,
            AdminDrawResponse,
            RegisterRequest,
            RegistrationResponse,
            WinnerResponse,
            ParticipantResponse,
            ParticipantListResponse,
            NotifyWinnerResponse,
            LoginRequest,
            LoginResponse,
            UpdateMailSettingsRequest,
            MailSettingsResponse,
            LogLine,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "draw", description = "Public draw API"),
        (name = "auth", description = "Admin authentication API"),
        (name = "admin", description = "Draw administration API"),
    ),
    info(
        title = "Lucky Draw API",
        version = "1.0.0",
        description = "Lucky draw backend REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
