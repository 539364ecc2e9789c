use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

pub enum ErrorStatus {
    NotFound,
    NotFoundLms(String),
    NotFoundRlms(String),
    NotFoundCourse(String),
    NotFoundApplication(String),
    InternalServerError,
    CrossLmsGrant,
    Forbidden,
    Unauthorized,
    Conflict,
}

#[derive(Serialize)]
struct ErrorInfo {
    message: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorInfo {
            message: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        match self {
            ErrorStatus::NotFound => {
                error_response(StatusCode::NOT_FOUND, "The resource does not exist.")
            }
            ErrorStatus::NotFoundLms(lms_id) => {
                error_response(StatusCode::NOT_FOUND, &format!("LMS({lms_id:?}) not found."))
            }
            ErrorStatus::NotFoundRlms(rlms_id) => error_response(
                StatusCode::NOT_FOUND,
                &format!("RLMS({rlms_id:?}) not found."),
            ),
            ErrorStatus::NotFoundCourse(course_id) => error_response(
                StatusCode::NOT_FOUND,
                &format!("Course({course_id:?}) not found."),
            ),
            ErrorStatus::NotFoundApplication(identifier) => error_response(
                StatusCode::NOT_FOUND,
                &format!("Application({identifier:?}) not found."),
            ),
            ErrorStatus::InternalServerError => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error, please try again later.",
            ),
            ErrorStatus::CrossLmsGrant => error_response(
                StatusCode::BAD_REQUEST,
                "The laboratory grant belongs to a different LMS.",
            ),
            ErrorStatus::Forbidden => {
                error_response(StatusCode::FORBIDDEN, "Sorry, you do not have permission.")
            }
            ErrorStatus::Unauthorized => error_response(StatusCode::UNAUTHORIZED, "Unauthorized."),
            ErrorStatus::Conflict => {
                error_response(StatusCode::CONFLICT, "The resource already exists.")
            }
        }
    }
}
