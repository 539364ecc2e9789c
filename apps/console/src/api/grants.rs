use crate::{context::Context, error_status::ErrorStatus};
use axum::{
    extract::Path,
    response::{IntoResponse, Response},
    Extension, Json,
};
use labfed_database::{
    Claims, CourseAccessError, CreateCoursePermission, GrantLaboratory, UpdateAccess,
};
use labfed_logger::{error, info, instrument, tracing};
use std::sync::Arc;

/// List the laboratories granted to an LMS, with provider details.
#[utoipa::path(
    get,
    tag = "Grants",
    context_path = "/api/lms",
    path = "/{id}/labs",
    params(("id", description = "lms id")),
    responses(
        (status = 200, description = "Return lab grants", body = Vec<LabGrantDetail>),
        (status = 404, description = "LMS not found."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_lab_grants(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("list_lab_grants enter");
    match ctx.db.get_lms_by_id(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundLms(id).into_response(),
        Err(e) => {
            error!("Failed to get lms: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.list_lab_grants(&id).await {
        Ok(grants) => Json(grants).into_response(),
        Err(e) => {
            error!("Failed to list lab grants: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Grant a laboratory to an LMS under a local identifier.
#[utoipa::path(
    post,
    tag = "Grants",
    context_path = "/api/lms",
    path = "/{id}/labs",
    params(("id", description = "lms id")),
    request_body(content = GrantLaboratory, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created grant", body = LabGrant),
        (status = 403, description = "Sorry, you do not have permission."),
        (status = 404, description = "LMS or laboratory not found."),
        (status = 409, description = "The laboratory or identifier is already granted."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn grant_laboratory(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<GrantLaboratory>,
) -> Response {
    info!("grant_laboratory enter");
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
    match ctx.db.get_laboratory(&payload.laboratory_id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to get laboratory: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.grant_laboratory(&id, payload).await {
        Ok(Some(grant)) => Json(grant).into_response(),
        Ok(None) => ErrorStatus::Conflict.into_response(),
        Err(e) => {
            error!("Failed to grant laboratory: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn revoke_lab_grant(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("revoke_lab_grant enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.revoke_lab_grant(&id).await {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to revoke lab grant: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// List the laboratories a course can reach, with their access status.
#[utoipa::path(
    get,
    tag = "Grants",
    context_path = "/api/courses",
    path = "/{id}/labs",
    params(("id", description = "course id")),
    responses(
        (status = 200, description = "Return course labs", body = Vec<CourseLabAccess>),
        (status = 404, description = "Course not found."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_course_labs(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("list_course_labs enter");
    match ctx.db.get_course(&id).await {
        Ok(Some(_)) => (),
        Ok(None) => return ErrorStatus::NotFoundCourse(id).into_response(),
        Err(e) => {
            error!("Failed to get course: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }
    match ctx.db.list_course_labs(&id).await {
        Ok(labs) => Json(labs).into_response(),
        Err(e) => {
            error!("Failed to list course labs: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Request lab access for a course. The permission starts pending.
#[utoipa::path(
    post,
    tag = "Grants",
    context_path = "/api/courses",
    path = "/{id}/permissions",
    params(("id", description = "course id")),
    request_body(content = CreateCoursePermission, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created permission", body = CoursePermission),
        (status = 400, description = "The laboratory grant belongs to a different LMS."),
        (status = 404, description = "Course or grant not found."),
        (status = 409, description = "The permission already exists."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn request_course_access(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCoursePermission>,
) -> Response {
    info!("request_course_access enter");
    match ctx.db.request_course_access(&id, payload).await {
        Ok(Ok(permission)) => Json(permission).into_response(),
        Ok(Err(CourseAccessError::CourseNotFound)) => {
            ErrorStatus::NotFoundCourse(id).into_response()
        }
        Ok(Err(CourseAccessError::GrantNotFound)) => ErrorStatus::NotFound.into_response(),
        Ok(Err(CourseAccessError::LmsMismatch)) => ErrorStatus::CrossLmsGrant.into_response(),
        Ok(Err(CourseAccessError::Exist)) => ErrorStatus::Conflict.into_response(),
        Err(e) => {
            error!("Failed to request course access: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Move a course permission between pending, granted and denied.
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn update_access_status(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccess>,
) -> Response {
    info!("update_access_status enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.update_access_status(&id, payload.access).await {
        Ok(Some(permission)) => Json(permission).into_response(),
        Ok(None) => ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to update access status: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn delete_course_permission(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Response {
    info!("delete_course_permission enter");
    if !claims.user.access_level.can_admin() {
        return ErrorStatus::Forbidden.into_response();
    }
    match ctx.db.delete_course_permission(&id).await {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFound.into_response(),
        Err(e) => {
            error!("Failed to delete course permission: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}
