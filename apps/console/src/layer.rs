use std::sync::Arc;

use axum::body::Bytes;
use http::{header::AUTHORIZATION, Method, Request, Response, StatusCode};
use http_body::combinators::UnsyncBoxBody;
use tower_http::{
    cors::{Any, CorsLayer},
    validate_request::{ValidateRequest, ValidateRequestHeaderLayer},
};

use crate::context::Context;

pub fn make_cors_layer() -> CorsLayer {
    let origins = [
        "http://localhost:4200".parse().unwrap(),
        "http://127.0.0.1:4200".parse().unwrap(),
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    CorsLayer::new()
        // allow `GET` and `POST` when accessing the resource
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // allow requests from any origin
        .allow_origin(origins)
        .allow_headers(Any)
}

#[derive(Clone)]
pub struct Auth {
    ctx: Arc<Context>,
}

impl<B> ValidateRequest<B> for Auth {
    type ResponseBody = UnsyncBoxBody<Bytes, axum::Error>;

    fn validate(&mut self, request: &mut Request<B>) -> Result<(), Response<Self::ResponseBody>> {
        if let Some(claims) = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .map(|header| header.strip_prefix("Bearer ").unwrap_or(header))
            .and_then(|token| self.ctx.key.decode_jwt(token))
        {
            request.extensions_mut().insert(Arc::new(claims));

            Ok(())
        } else {
            let unauthorized_response = Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .body(UnsyncBoxBody::default())
                .unwrap();

            Err(unauthorized_response)
        }
    }
}

pub fn make_auth_layer(ctx: Arc<Context>) -> ValidateRequestHeaderLayer<Auth> {
    ValidateRequestHeaderLayer::custom(Auth { ctx })
}
