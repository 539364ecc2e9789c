use crate::{
    constants::is_supported_language,
    context::Context,
    error_status::ErrorStatus,
    metadata::{get_url_metadata, UrlMetadata},
};
use axum::{
    extract::{Path, Query},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use http::header::CONTENT_TYPE;
use labfed_database::{
    Claims, CreateEmbedApplication, EmbedApplicationDetail, UpdateEmbedApplication,
};
use labfed_logger::{error, info, instrument, tracing};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

/// List the embed application catalogue, oldest update first.
#[utoipa::path(
    get,
    tag = "Embed",
    context_path = "/api",
    path = "/apps/",
    responses(
        (status = 200, description = "Return applications", body = Vec<EmbedApplication>),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx))]
pub async fn list_applications(Extension(ctx): Extension<Arc<Context>>) -> Response {
    info!("list_applications enter");
    match ctx.db.list_embed_applications().await {
        Ok(applications) => Json(applications).into_response(),
        Err(e) => {
            error!("Failed to list applications: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Get an application with its translations.
#[utoipa::path(
    get,
    tag = "Embed",
    context_path = "/api/apps",
    path = "/{identifier}/",
    params(("identifier", description = "application identifier")),
    responses(
        (status = 200, description = "Return application detail", body = EmbedApplicationDetail),
        (status = 404, description = "Application not found."),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx))]
pub async fn get_application(
    Extension(ctx): Extension<Arc<Context>>,
    Path(identifier): Path<String>,
) -> Response {
    info!("get_application enter");
    match ctx.db.get_embed_application(&identifier).await {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => ErrorStatus::NotFoundApplication(identifier).into_response(),
        Err(e) => {
            error!("Failed to get application: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[derive(Serialize)]
struct AppLanguage {
    code: String,
    url: String,
}

#[derive(Serialize)]
struct AppPage {
    name: String,
    url: String,
    description: Option<String>,
    height: Option<String>,
    scale: Option<f32>,
    author: String,
    languages: Vec<AppLanguage>,
}

/// The base URL serves English unless an explicit "en" translation
/// overrides it; the other translations add their languages.
fn page_data(detail: &EmbedApplicationDetail, author: String) -> AppPage {
    let mut languages = Vec::with_capacity(detail.translations.len() + 1);
    if !detail
        .translations
        .iter()
        .any(|translation| translation.language == "en")
    {
        languages.push(AppLanguage {
            code: "en".into(),
            url: detail.application.url.clone(),
        });
    }
    for translation in &detail.translations {
        languages.push(AppLanguage {
            code: translation.language.clone(),
            url: translation.url.clone(),
        });
    }
    languages.sort_by(|a, b| a.code.cmp(&b.code));

    AppPage {
        name: detail.application.name.clone(),
        url: detail.application.url.clone(),
        description: detail.application.description.clone(),
        height: detail.application.height.clone(),
        scale: detail.application.scale.map(|scale| scale as f32 / 100.0),
        author,
        languages,
    }
}

/// Serve the HTML page that frames the tool.
#[instrument(skip(ctx))]
pub async fn application_html(
    Extension(ctx): Extension<Arc<Context>>,
    Path(identifier): Path<String>,
) -> Response {
    info!("application_html enter");
    let detail = match ctx.db.get_embed_application(&identifier).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return ErrorStatus::NotFoundApplication(identifier).into_response(),
        Err(e) => {
            error!("Failed to get application: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    };

    match ctx.pages.render("APP_HTML", &page_data(&detail, String::new())) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("Failed to render application page: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Serve the OpenSocial-style gadget XML.
#[instrument(skip(ctx))]
pub async fn application_xml(
    Extension(ctx): Extension<Arc<Context>>,
    Path(identifier): Path<String>,
) -> Response {
    info!("application_xml enter");
    let detail = match ctx.db.get_embed_application(&identifier).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return ErrorStatus::NotFoundApplication(identifier).into_response(),
        Err(e) => {
            error!("Failed to get application: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    };

    let author = match ctx.db.get_embed_application_owner(&identifier).await {
        Ok(Some(owner)) => owner.name,
        Ok(None) => String::new(),
        Err(e) => {
            error!("Failed to get application owner: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    };

    match ctx.pages.render("APP_XML", &page_data(&detail, author)) {
        Ok(page) => ([(CONTENT_TYPE, "application/xml")], page).into_response(),
        Err(e) => {
            error!("Failed to render application gadget: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct CheckParams {
    url: Option<String>,
}

fn check_error(message: &str) -> JsonValue {
    json!({"error": true, "message": message})
}

/// Why a fetched URL cannot be framed, or None when it can.
pub(super) fn frame_rejection(metadata: &UrlMetadata) -> Option<String> {
    if metadata.status != Some(200) {
        return Some(format!(
            "The URL returned status {}",
            metadata.status.unwrap_or_default()
        ));
    }

    if let Some(xfo) = &metadata.x_frame_options {
        if xfo == "deny" || xfo == "sameorigin" || xfo.starts_with("allow") {
            return Some("The URL cannot be shown in a frame (X-Frame-Options)".into());
        }
    }

    match metadata.content_type.as_deref() {
        Some(content_type) if content_type.contains("html") => None,
        // legacy shockwave/flash objects embed fine
        Some(content_type) if content_type.contains("shockwave") || content_type.contains("flash") => {
            None
        }
        Some(content_type) => Some(format!("Unsupported content type: {content_type}")),
        None => Some("Unsupported content type".into()),
    }
}

pub(super) async fn check_embeddable(ctx: &Context, url: Option<&str>) -> JsonValue {
    let Some(url) = url else {
        return check_error("No URL provided");
    };
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return check_error("URLs must start with http:// or https://");
    }
    // the editor prefills "http://", submitting it unchanged is not an error
    if url == "http://" {
        return json!({"error": false});
    }

    let metadata = get_url_metadata(ctx, url).await;
    if metadata.error_retrieving {
        return check_error("Error retrieving URL");
    }
    if let Some(message) = frame_rejection(&metadata) {
        return check_error(&message);
    }

    json!({
        "error": false,
        "url": metadata.url,
        "name": metadata.name,
        "description": metadata.description,
    })
}

/// Probe whether a URL is suitable for the catalogue.
#[utoipa::path(
    get,
    tag = "Embed",
    context_path = "/api",
    path = "/check.json",
    params(("url" = Option<String>, Query, description = "url to probe")),
    responses(
        (status = 200, description = "Return probe result")
    )
)]
#[instrument(skip(ctx, params))]
pub async fn check_url(
    Extension(ctx): Extension<Arc<Context>>,
    Query(params): Query<CheckParams>,
) -> Response {
    info!("check_url enter");
    Json(check_embeddable(&ctx, params.url.as_deref()).await).into_response()
}

/// List the caller's own applications.
#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn list_own_applications(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
) -> Response {
    info!("list_own_applications enter");
    match ctx
        .db
        .list_embed_applications_by_owner(&claims.user.id)
        .await
    {
        Ok(applications) => Json(applications).into_response(),
        Err(e) => {
            error!("Failed to list applications: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Add an application to the catalogue, owned by the caller.
#[utoipa::path(
    post,
    tag = "Embed",
    context_path = "/api",
    path = "/apps",
    request_body(content = CreateEmbedApplication, content_type = "application/json"),
    responses(
        (status = 200, description = "Return created application", body = EmbedApplication),
        (status = 500, description = "Server error, please try again later.")
    )
)]
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn create_application(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Json(payload): Json<CreateEmbedApplication>,
) -> Response {
    info!("create_application enter");
    match ctx
        .db
        .create_embed_application(&claims.user.id, payload)
        .await
    {
        Ok(application) => Json(application).into_response(),
        Err(e) => {
            error!("Failed to create application: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

/// Edit an application and reconcile its translations. Owner only; language
/// codes outside the supported table are dropped.
#[instrument(skip(ctx, claims, payload), fields(user_id = %claims.user.id))]
pub async fn update_application(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(identifier): Path<String>,
    Json(mut payload): Json<UpdateEmbedApplication>,
) -> Response {
    info!("update_application enter");
    match ctx.db.get_embed_application(&identifier).await {
        Ok(Some(detail)) if detail.application.owner_id == claims.user.id => (),
        Ok(Some(_)) => return ErrorStatus::Forbidden.into_response(),
        Ok(None) => return ErrorStatus::NotFoundApplication(identifier).into_response(),
        Err(e) => {
            error!("Failed to get application: {}", e);
            return ErrorStatus::InternalServerError.into_response();
        }
    }

    payload
        .languages
        .retain(|language, _| is_supported_language(language));

    match ctx.db.update_embed_application(&identifier, payload).await {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => ErrorStatus::NotFoundApplication(identifier).into_response(),
        Err(e) => {
            error!("Failed to update application: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}

#[instrument(skip(ctx, claims), fields(user_id = %claims.user.id))]
pub async fn delete_application(
    Extension(ctx): Extension<Arc<Context>>,
    Extension(claims): Extension<Arc<Claims>>,
    Path(identifier): Path<String>,
) -> Response {
    info!("delete_application enter");
    match ctx
        .db
        .delete_embed_application(&identifier, &claims.user.id)
        .await
    {
        Ok(true) => http::StatusCode::OK.into_response(),
        Ok(false) => ErrorStatus::NotFoundApplication(identifier).into_response(),
        Err(e) => {
            error!("Failed to delete application: {}", e);
            ErrorStatus::InternalServerError.into_response()
        }
    }
}
