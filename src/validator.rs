use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use newsportal_core::{AppError, format_errors};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that also runs `validator` rules.
///
/// Every rejection is a 400 with a readable message in the `error` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::new(StatusCode::BAD_REQUEST, anyhow!("{} is required", field));
    }

    if error_msg.contains("unknown variant") {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("invalid role (must be admin, editor, or user)"),
        );
    }

    if error_msg.contains("invalid type") {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Invalid field type in request"),
        );
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Missing 'Content-Type: application/json' header"),
        );
    }

    AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request payload"))
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::new(StatusCode::BAD_REQUEST, anyhow!("{}", format_errors(&errors)))
        })?;

        Ok(ValidatedJson(value))
    }
}
