//! Cross-origin policy for the REST API.
//!
//! Any origin may call any user endpoint; preflight requests are answered
//! by the middleware without reaching a handler.

use actix_cors::Cors;
use actix_web::http::Method;

/// Build the permissive CORS middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_api::inbound::http::cors::permissive_cors;
///
/// let app = App::new().wrap(permissive_cors());
/// ```
pub fn permissive_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_any_header()
}
