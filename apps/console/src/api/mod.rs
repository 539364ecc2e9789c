use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;

use crate::{context::Context, layer::make_auth_layer};

mod common;
mod embed;
mod grants;
mod lms;
mod rlms;
mod user;

pub use common::*;
pub use embed::*;
pub use grants::*;
pub use lms::*;
pub use rlms::*;
pub use user::*;

pub fn make_rest_route(ctx: Arc<Context>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/user/token", post(make_token))
        .route("/apps/", get(list_applications))
        .route("/apps/:identifier/", get(get_application))
        .route("/apps/:identifier/app.html", get(application_html))
        .route("/apps/:identifier/app.xml", get(application_xml))
        .route("/check.json", get(check_url))
        .merge(
            Router::new()
                .route("/lms", get(list_lms).post(create_lms))
                .route(
                    "/lms/:id",
                    get(get_lms).post(update_lms).delete(delete_lms),
                )
                .route("/lms/:id/courses", get(list_courses).post(create_course))
                .route(
                    "/lms/:id/credentials",
                    get(list_credentials).post(create_credential),
                )
                .route("/credentials/:id", delete(delete_credential))
                .route("/rlms", get(list_rlms).post(create_rlms))
                .route(
                    "/rlms/:id",
                    get(get_rlms).post(update_rlms).delete(delete_rlms),
                )
                .route(
                    "/rlms/:id/labs",
                    get(list_laboratories).post(register_laboratory),
                )
                .route(
                    "/lms/:id/labs",
                    get(list_lab_grants).post(grant_laboratory),
                )
                .route("/grants/:id", delete(revoke_lab_grant))
                .route("/courses/:id/labs", get(list_course_labs))
                .route("/courses/:id/permissions", post(request_course_access))
                .route(
                    "/permissions/:id",
                    post(update_access_status).delete(delete_course_permission),
                )
                .route("/admin/users", get(list_users).post(create_user))
                .route("/admin/users/:id", post(update_user).delete(delete_user))
                .route("/user/apps", get(list_own_applications))
                .route("/apps", post(create_application))
                .route(
                    "/apps/:identifier",
                    post(update_application).delete(delete_application),
                )
                .layer(ServiceBuilder::new().layer(make_auth_layer(ctx))),
        )
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use axum::Extension;
    use axum_test_helper::TestClient;
    use labfed_database::{LabDatabase, UserToken};

    /// Spin up a console against an in-memory database and log in as the
    /// seeded administrator.
    pub async fn authed_client() -> (TestClient, String) {
        let db = LabDatabase::init_pool("sqlite::memory:").await.unwrap();
        let context = Arc::new(Context::new_test_client(db));
        let app = make_rest_route(context.clone()).layer(Extension(context));

        let client = TestClient::new(app);
        let resp = client
            .post("/user/token")
            .json(&serde_json::json!({"login": "admin", "password": "password"}))
            .send()
            .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let token: UserToken = resp.json().await;
        (client, format!("Bearer {}", token.token))
    }
}
