use axum::{Extension, Router, Server};
use labfed_logger::{error, info, init_logger};
use std::{net::SocketAddr, sync::Arc};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod config;
mod constants;
mod context;
mod error_status;
mod key;
mod layer;
mod metadata;
mod utils;

#[tokio::main]
async fn main() {
    init_logger();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            api::health_check,
            api::make_token,
            api::list_users,
            api::create_user,
            api::list_lms,
            api::create_lms,
            api::get_lms,
            api::list_courses,
            api::create_course,
            api::list_rlms,
            api::create_rlms,
            api::list_laboratories,
            api::list_lab_grants,
            api::grant_laboratory,
            api::list_course_labs,
            api::request_course_access,
            api::list_applications,
            api::get_application,
            api::create_application,
            api::check_url,
        ),
        tags(
            (name = "LMS", description = "Manage federated LMS instances"),
            (name = "RLMS", description = "Manage remote laboratory providers"),
            (name = "Grants", description = "Link laboratories to LMSes and courses"),
            (name = "Embed", description = "Embeddable web tool catalogue"),
            (name = "User", description = "Console users and tokens"),
        )
    )]
    struct ApiDoc;

    let context = Arc::new(context::Context::new().await);

    let app = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::make_rest_route(context.clone()))
        .layer(Extension(context.clone()))
        .layer(layer::make_cors_layer());

    let addr = SocketAddr::from(([0, 0, 0, 0], context.config.listen_port));
    info!("listening on {}", addr);

    if let Err(e) = Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
    {
        error!("Server shutdown due to error: {}", e);
    }

    info!("Server shutdown complete");
}
