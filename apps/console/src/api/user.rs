use crate::{context::Context, error_status::ErrorStatus};
use axum::{
    extract::Path,
    response::{IntoResponse, Response},
    Extension, Json,
};
use labfed_database::{Claims, CreateUser, UpdateUser, UserLogin, UserToken};
use labfed_logger::{error, info, instrument, tracing};
use std::sync::Arc;

/// Exchange login and password for a bearer token.
/// - Return 200 ok and `UserToken`.
/// - Return 401 Unauthorized on bad credentials.
#[utoipa::path(
    post,
    tag = "User",
    context_path = "/api",
    path = "/user/token",
    request_body(content = UserLogin, content_type = "application/json"),
    responses(
        (status = 200, description = "Return token", body = UserToken),
        (status = 401, description = "Unauthorized."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, payload))]
pub async fn make_token(
    Extension(ctx): Extension<Arc<Context>>,
    Json(payload): Json<UserLogin>,
) -> Response {
    info!("make_token enter");
    match ctx.db.user_login(payload).await {
        Ok(Some(user)) => {
            let token = ctx
                .key
                .sign_jwt(&user, ctx.config.access_token_expire_time);
            Json(UserToken { token }).into_response()
        }
        Ok(None) => ErrorStatus::Unauthorized.into_response(),
        Err(e) => {
            error!("Failed to check user: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// List console users. Callers bound to an LMS only see that LMS's users.
#[utoipa::path(
    get,
    tag = "User",
    context_path = "/api",
    path = "/admin/users",
    responses(
        (status = 200, description = "Return users", body = Vec<User>),
        (status = 403, description = "Sorry, you do not have permission."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_users(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
) -> Response {
    info!("list_users enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.list_users(claims.user.lms_id.clone()).await {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            error!("Failed to list users: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Create a console user. Callers bound to an LMS create users for that LMS
/// only; a caller without an LMS may pick the target LMS in the payload.
#[utoipa::path(
    post,
    tag = "User",
    context_path = "/api",
    path = "/admin/users",
    request_body(content = CreateUser, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created user", body = User),
        (status = 403, description = "Sorry, you do not have permission."),
        (status = 404, description = "Target LMS not found."),
        (status = 409, description = "The login is already taken."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn create_user(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Json(mut payload): Json<CreateUser>,
) -> Response {
    info!("create_user enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    let lms_id = match claims.user.lms_id.clone() {
        bound @ Some(_) => bound,
        None => {
            if let Some(target) = &payload.lms_id {
                match ctx.db.get_lms_by_id(target).await {
                    Ok(Some(_)) => (),
                    Ok(None) => return ErrorStatus::NotFoundLms(target.clone()).into_response(),
                    Err(e) => {
                        error!("Failed to get lms: {}", e);
                        return ErrorStatus::InternalServerError.into_response();
                    }
                }
            }
            payload.lms_id.take()
        }
    };
    match ctx.db.create_user(lms_id, payload).await {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => ErrorStatus::Conflict.into_response(),
        Err(e) => {
            error!("Failed to create user: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Update a console user. Callers bound to an LMS only reach users of that
/// LMS; a caller without an LMS may also move the user to another LMS.
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn update_user(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUser>,
) -> Response {
    info!("update_user enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    if claims.user.lms_id.is_none() {
        if let Some(target) = &payload.lms_id {
            match ctx.db.get_lms_by_id(target).await {
                Ok(Some(_)) => (),
                Ok(None) => return ErrorStatus::NotFoundLms(target.clone()).into_response(),
                Err(e) => {
                    error!("Failed to get lms: {}", e);
                    return ErrorStatus::InternalServerError.into_response();
                }
            }
        }
    }
    match ctx
        .db
        .update_user(&id, claims.user.lms_id.clone(), payload)
        .await
    {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to update user: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn delete_user(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("delete_user enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.delete_user(&id, claims.user.lms_id.clone()).await {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to delete user: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::test_utils::authed_client;
    use http::StatusCode;
    use labfed_database::{Lms, User};

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let (client, _) = authed_client().await;
        let resp = client
            .post("/user/token")
            .json(&serde_json::json!({"login": "admin", "password": "hunter2"}))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_admin_flow() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/admin/users")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "login": "teacher",
                "name": "Teacher",
                "password": "secret",
                "access_level": 0
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let user: User = resp.json().await;
        assert_eq!(user.login, "teacher");

        // duplicate login
        let resp = client
            .post("/admin/users")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "login": "teacher",
                "name": "Another",
                "password": "secret",
                "access_level": 0
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = client
            .post(&format!("/admin/users/{}", user.id))
            .header("Authorization", token.clone())
            .json(&serde_json::json!({"name": "Renamed"}))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let user: User = resp.json().await;
        assert_eq!(user.name, "Renamed");

        let resp = client
            .get("/admin/users")
            .header("Authorization", token.clone())
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let users: Vec<User> = resp.json().await;
        assert_eq!(users.len(), 2);

        let resp = client
            .delete(&format!("/admin/users/{}", user.id))
            .header("Authorization", token.clone())
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_lms_admin_cannot_touch_other_lms_users() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/lms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({"name": "Moodle A", "url": "http://a.example.org"}))
            .send()
            .await;
        let lms_a: Lms = resp.json().await;
        let resp = client
            .post("/lms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({"name": "Moodle B", "url": "http://b.example.org"}))
            .send()
            .await;
        let lms_b: Lms = resp.json().await;

        // provisioning against an unknown LMS is rejected
        let resp = client
            .post("/admin/users")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "login": "ghost",
                "name": "Ghost",
                "password": "secret",
                "access_level": 10,
                "lms_id": "missing"
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = client
            .post("/admin/users")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "login": "admin_a",
                "name": "Admin A",
                "password": "secret",
                "access_level": 10,
                "lms_id": lms_a.id
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let admin_a: User = resp.json().await;
        assert_eq!(admin_a.lms_id, Some(lms_a.id.clone()));

        let resp = client
            .post("/admin/users")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "login": "teacher_b",
                "name": "Teacher B",
                "password": "secret",
                "access_level": 0,
                "lms_id": lms_b.id
            }))
            .send()
            .await;
        let victim: User = resp.json().await;

        let resp = client
            .post("/user/token")
            .json(&serde_json::json!({"login": "admin_a", "password": "secret"}))
            .send()
            .await;
        let token_a: labfed_database::UserToken = resp.json().await;
        let token_a = format!("Bearer {}", token_a.token);

        // LMS A's admin cannot reach LMS B's user
        let resp = client
            .post(&format!("/admin/users/{}", victim.id))
            .header("Authorization", token_a.clone())
            .json(&serde_json::json!({"name": "hijacked"}))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = client
            .delete(&format!("/admin/users/{}", victim.id))
            .header("Authorization", token_a.clone())
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = client
            .get("/admin/users")
            .header("Authorization", token_a)
            .send()
            .await;
        let users: Vec<User> = resp.json().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].login, "admin_a");

        // the victim is untouched
        let resp = client
            .get("/admin/users")
            .header("Authorization", token)
            .send()
            .await;
        let users: Vec<User> = resp.json().await;
        let victim = users.into_iter().find(|u| u.id == victim.id).unwrap();
        assert_eq!(victim.name, "Teacher B");
        assert_eq!(victim.lms_id, Some(lms_b.id));
    }

    #[tokio::test]
    async fn test_instructor_cannot_admin_users() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/admin/users")
            .header("Authorization", token)
            .json(&serde_json::json!({
                "login": "teacher",
                "name": "Teacher",
                "password": "secret",
                "access_level": 0
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client
            .post("/user/token")
            .json(&serde_json::json!({"login": "teacher", "password": "secret"}))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let token: labfed_database::UserToken = resp.json().await;

        let resp = client
            .get("/admin/users")
            .header("Authorization", format!("Bearer {}", token.token))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
