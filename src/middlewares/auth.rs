use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 已登录管理员 (中间件注入到请求扩展中)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity(pub String);

// 受保护路径配置
struct ProtectedPaths {
    prefix_paths: Vec<&'static str>,
    // 需要排除的路径（即使在受保护前缀下也无需认证）
    excluded_paths: Vec<&'static str>,
}

impl ProtectedPaths {
    fn new() -> Self {
        Self {
            prefix_paths: vec!["/api/v1/admin/"],
            excluded_paths: vec!["/api/v1/admin/login"],
        }
    }

    fn requires_admin(&self, path: &str) -> bool {
        if self.excluded_paths.contains(&path) {
            return false;
        }

        path == "/api/v1/admin"
            || self
                .prefix_paths
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            protected_paths: ProtectedPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    protected_paths: ProtectedPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if !self.protected_paths.requires_admin(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let Some(token) = token else {
            let error = AppError::AuthError("Missing access token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        match self.jwt_service.verify_admin_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(AdminIdentity(claims.sub));
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(_) => {
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_paths() {
        let paths = ProtectedPaths::new();
        assert!(paths.requires_admin("/api/v1/admin/draws"));
        assert!(paths.requires_admin("/api/v1/admin/settings/mail"));
        assert!(paths.requires_admin("/api/v1/admin/logout"));
        assert!(!paths.requires_admin("/api/v1/admin/login"));
        assert!(!paths.requires_admin("/api/v1/draws"));
        assert!(!paths.requires_admin("/api/v1/draws/1/winner"));
        assert!(!paths.requires_admin("/swagger-ui/"));
    }
}
