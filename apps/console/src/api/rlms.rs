use crate::{context::Context, error_status::ErrorStatus};
use axum::{
    extract::Path,
    response::{IntoResponse, Response},
    Extension, Json,
};
use labfed_database::{Claims, CreateRlms, RegisterLaboratory, UpdateRlms};
use labfed_logger::{error, info, instrument, tracing};
use std::sync::Arc;

/// List registered remote lab providers.
#[utoipa::path(
    get,
    tag = "RLMS",
    context_path = "/api",
    path = "/rlms",
    responses(
        (status = 200, description = "Return RLMS list", body = Vec<Rlms>),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_rlms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
) -> Response {
    info!("list_rlms enter");
    match ctx.db.list_rlms().await {
        Ok(rlms) => Json(rlms).into_response(),
        Err(e) => {
            error!("Failed to list rlms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Register a remote lab provider.
#[utoipa::path(
    post,
    tag = "RLMS",
    context_path = "/api",
    path = "/rlms",
    request_body(content = CreateRlms, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created RLMS", body = Rlms),
        (status = 403, description = "Sorry, you do not have permission."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn create_rlms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Json(payload): Json<CreateRlms>,
) -> Response {
    info!("create_rlms enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.create_rlms(payload).await {
        Ok(rlms) => Json(rlms).into_response(),
        Err(e) => {
            error!("Failed to create rlms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn get_rlms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("get_rlms enter");
    match ctx.db.get_rlms(&id).await {
        Ok(Some(rlms)) => Json(rlms).into_response(),
        Ok(None) => ErrorStatus::NotFoundRlms(id).into_response(),
        Err(e) => {
            error!("Failed to get rlms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn update_rlms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRlms>,
) -> Response {
    info!("update_rlms enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.update_rlms(&id, payload).await {
        Ok(Some(rlms)) => Json(rlms).into_response(),
        Ok(None) => ErrorStatus::NotFoundRlms(id).into_response(),
        Err(e) => {
            error!("Failed to update rlms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn delete_rlms(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("delete_rlms enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.delete_rlms(&id).await {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFoundRlms(id).into_response(),
        Err(e) => {
            error!("Failed to delete rlms: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// List laboratories offered by an RLMS.
#[utoipa::path(
    get,
    tag = "RLMS",
    context_path = "/api/rlms",
    path = "/{id}/labs",
    params(("id", description = "rlms id")),
    responses(
        (status = 200, description = "Return laboratories", body = Vec<Laboratory>),
        (status = 404, description = "RLMS not found."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_laboratories(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("list_laboratories enter");
    match ctx.db.get_rlms(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundRlms(id).into_response(),
        Err(e) => {
            error!("Failed to get rlms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.list_laboratories(&id).await {
        Ok(labs) => Json(labs).into_response(),
        Err(e) => {
            error!("Failed to list laboratories: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Register a laboratory offered by an RLMS.
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn register_laboratory(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<RegisterLaboratory>,
) -> Response {
    info!("register_laboratory enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.get_rlms(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundRlms(id).into_response(),
        Err(e) => {
            error!("Failed to get rlms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.register_laboratory(&id, payload).await {
        Ok(Some(lab)) => Json(lab).into_response(),
        Ok(None) => ErrorStatus::Conflict.into_response(),
        Err(e) => {
            error!("Failed to register laboratory: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::test_utils::authed_client;
    use http::StatusCode;
    use labfed_database::{Laboratory, Rlms};

    #[tokio::test]
    async fn test_rlms_crud() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/rlms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "kind": "WebLab-Deusto",
                "location": "Deusto Spain",
                "url": "https://www.weblab.deusto.es/",
                "version": "5.0",
                "configuration": {"remote_login": "weblabfed"}
            }))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let rlms: Rlms = resp.json().await;
        assert_eq!(
            rlms.configuration,
            Some(serde_json::json!({"remote_login": "weblabfed"}))
        );

        let resp = client
            .post(&format!("/rlms/{}", rlms.id))
            .header("Authorization", token.clone())
            .json(&serde_json::json!({"version": "5.5"}))
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let rlms: Rlms = resp.json().await;
        assert_eq!(rlms.version, "5.5");

        let resp = client
            .delete(&format!("/rlms/{}", rlms.id))
            .header("Authorization", token.clone())
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client
            .get(&format!("/rlms/{}", rlms.id))
            .header("Authorization", token)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_laboratory_registration() {
        let (client, token) = authed_client().await;

        let resp = client
            .post("/rlms")
            .header("Authorization", token.clone())
            .json(&serde_json::json!({
                "kind": "WebLab-Deusto",
                "location": "Deusto Spain",
                "url": "https://www.weblab.deusto.es/",
                "version": "5.0"
            }))
            .send()
            .await;
        let rlms: Rlms = resp.json().await;

        let lab = serde_json::json!({
            "name": "robot-movement@Robot experiments",
            "laboratory_id": "robot-movement@Robot experiments"
        });
        let resp = client
            .post(&format!("/rlms/{}/labs", rlms.id))
            .header("Authorization", token.clone())
            .json(&lab)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let _: Laboratory = resp.json().await;

        let resp = client
            .post(&format!("/rlms/{}/labs", rlms.id))
            .header("Authorization", token.clone())
            .json(&lab)
            .send()
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = client
            .get(&format!("/rlms/{}/labs", rlms.id))
            .header("Authorization", token)
            .send()
            .await;
        let labs: Vec<Laboratory> = resp.json().await;
        assert_eq!(labs.len(), 1);
    }
}
