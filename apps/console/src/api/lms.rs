use crate::{context::Context, error_status::ErrorStatus};
use axum::{
    extract::Path,
    response::{IntoResponse, Response},
    Extension, Json,
};
use labfed_database::{Claims, CreateCourse, CreateCredential, CreateLms};
use labfed_logger::{error, info, instrument, tracing};
use std::sync::Arc;

/// List federated LMS instances.
#[utoipa::path(
    get,
    tag = "LMS",
    context_path = "/api",
    path = "/lms",
    responses(
        (status = 200, description = "Return LMS list", body = Vec<Lms>),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_lms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
) -> Response {
    info!("list_lms enter");
    match ctx.db.list_lms().await {
        Ok(lms) => Json(lms).into_response(),
        Err(e) => {
            error!("Failed to list lms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Register an LMS instance in the federation.
#[utoipa::path(
    post,
    tag = "LMS",
    context_path = "/api",
    path = "/lms",
    request_body(content = CreateLms, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created LMS", body = Lms),
        (status = 403, description = "Sorry, you do not have permission."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn create_lms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Json(payload): Json<CreateLms>,
) -> Response {
    info!("create_lms enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.create_lms(payload).await {
        Ok(lms) => Json(lms).into_response(),
        Err(e) => {
            error!("Failed to create lms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Get an LMS with its course and credential counts.
#[utoipa::path(
    get,
    tag = "LMS",
    context_path = "/api/lms",
    path = "/{id}",
    params(("id", description = "lms id")),
    responses(
        (status = 200, description = "Return LMS detail", body = LmsDetail),
        (status = 404, description = "LMS not found."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn get_lms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("get_lms enter");
    match ctx.db.get_lms_by_id(&id).await {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to get lms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn update_lms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateLms>,
) -> Response {
    info!("update_lms enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.update_lms(&id, payload).await {
        Ok(Some(lms)) => Json(lms).into_response(),
        Ok(None) => ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to update lms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn delete_lms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("delete_lms enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.delete_lms(&id).await {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to delete lms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// List courses registered under an LMS.
#[utoipa::path(
    get,
    tag = "LMS",
    context_path = "/api/lms",
    path = "/{id}/courses",
    params(("id", description = "lms id")),
    responses(
        (status = 200, description = "Return courses", body = Vec<Course>),
        (status = 404, description = "LMS not found."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_courses(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("list_courses enter");
    match ctx.db.get_lms_by_id(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to get lms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.list_courses(&id).await {
        Ok(courses) => Json(courses).into_response(),
        Err(e) => {
            error!("Failed to list courses: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Register a course under an LMS.
#[utoipa::path(
    post,
    tag = "LMS",
    context_path = "/api/lms",
    path = "/{id}/courses",
    params(("id", description = "lms id")),
    request_body(content = CreateCourse, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created course", body = Course),
        (status = 403, description = "Sorry, you do not have permission."),
        (status = 404, description = "LMS not found."),
        (status = 409, description = "The context is already registered."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn create_course(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCourse>,
) -> Response {
    info!("create_course enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.get_lms_by_id(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to get lms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.create_course(&id, payload).await {
        Ok(Some(course)) => Json(course).into_response(),
        Ok(None) => ErrorStatus::Conflict.into_response(),
        Err(e) => {
            error!("Failed to create course: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_credentials(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("list_credentials enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.get_lms_by_id(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to get lms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.list_credentials(&id).await {
        Ok(credentials) => Json(credentials).into_response(),
        Err(e) => {
            error!("Failed to list credentials: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Store an authentication credential for an LMS.
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn create_credential(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCredential>,
) -> Response {
    info!("create_credential enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.get_lms_by_id(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to get lms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.create_credential(&id, payload).await {
        Ok(Some(credential)) => Json(credential).into_response(),
        Ok(None) => ErrorStatus::Conflict.into_response(),
        Err(e) => {
            error!("Failed to create credential: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn delete_credential(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("delete_credential enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.delete_credential(&id).await {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to delete credential: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::test_utils::authed_client;
    use http::StatusCode;
    use labfed_database::{Course, Credential, Lms, LmsDetail};

    #[tokio::test]
    async fn test_lms_crud() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/lms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "name": "My Moodle",
                "url": "http://moodle.example.org"
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let lms: Lms = resp.json().await;

        let resp = client
            .get(&format!("/lms/{}", lms.id))
            .header("Authorization", token.clone())
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let detail: LmsDetail = resp.json().await;
        assert_eq!(detail.lms.name, "My Moodle");
        assert_eq!(detail.course_count, 0);

        let resp = client
            .post(&format!("/lms/{}", lms.id))
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "name": "Renamed Moodle",
                "url": "http://moodle.example.org"
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client
            .delete(&format!("/lms/{}", lms.id))
            .header("Authorization", token.clone())
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client
            .get(&format!("/lms/{}", lms.id))
            .header("Authorization", token)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_course_conflict() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/lms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "name": "My Moodle",
                "url": "http://moodle.example.org"
            }))
            .send()
            .await;
        let lms: Lms = resp.json().await;

        let course = serde_json::json!({"context_id": "1", "name": "EE101"});
        let resp = client
            .post(&format!("/lms/{}/courses", lms.id))
            .header("Authorization", token.clone())
            .json(&course)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let _: Course = resp.json().await;

        let resp = client
            .post(&format!("/lms/{}/courses", lms.id))
            .header("Authorization", token.clone())
            .json(&course)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // unknown lms
        let resp = client
            .post("/lms/missing/courses")
            .header("Authorization", token)
            .json(&course)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_credentials() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/lms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "name": "My Moodle",
                "url": "http://moodle.example.org"
            }))
            .send()
            .await;
        let lms: Lms = resp.json().await;

        let resp = client
            .post(&format!("/lms/{}/credentials", lms.id))
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "key": "admin",
                "kind": "OAuth1.0",
                "secret": "80072568beb3b2102325eb203f6d0ff92f5cef8e"
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let credential: Credential = resp.json().await;

        let resp = client
            .get(&format!("/lms/{}/credentials", lms.id))
            .header("Authorization", token.clone())
            .send()
            .await;
        let credentials: Vec<Credential> = resp.json().await;
        assert_eq!(credentials.len(), 1);

        let resp = client
            .delete(&format!("/credentials/{}", credential.id))
            .header("Authorization", token)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
