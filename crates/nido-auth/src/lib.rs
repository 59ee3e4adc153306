//! Authentication for the Nido booking backend
//!
//! This crate provides JWT-based authentication and the Actix-web request
//! extractor used by the booking handlers. Credential management and login
//! flows live in the identity subsystem; the booking backend only needs to
//! validate tokens and recover the acting user.
//!
//! # Examples
//!
//! ## Validating a token in a handler
//!
//! ```no_run
//! use actix_web::HttpResponse;
//! use nido_auth::middleware::AuthenticatedUser;
//!
//! async fn protected_route(user: AuthenticatedUser) -> HttpResponse {
//!     HttpResponse::Ok().json(serde_json::json!({
//!         "user_id": user.user_id,
//!         "name": user.name
//!     }))
//! }
//! ```

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::AuthenticatedUser;

#[cfg(test)]
mod tests {
    use super::*;
    use nido_core::models::UserRole;

    #[test]
    fn test_jwt_round_trip() {
        let jwt_service = JwtService::new("test-secret-key-12345", 3600);

        let claims = Claims::new(99, "testuser", UserRole::Member);
        let token = jwt_service.create_token(&claims).unwrap();
        let decoded_claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(decoded_claims.sub, 99);
        assert_eq!(decoded_claims.name, "testuser");
        assert_eq!(decoded_claims.role, UserRole::Member);
    }
}
