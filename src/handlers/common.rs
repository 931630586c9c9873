use crate::{errors::ServiceError, ApiResponse};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

/// JSON body that is rejected with 400 when it is malformed or fails validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Like [`ValidatedJson`], but an empty body yields `T::default()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJsonOrDefault<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJsonOrDefault<T>
where
    T: DeserializeOwned + Validate + Default,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        let value: T = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::BadRequest(format!("invalid JSON body: {err}")))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::success(data))).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Default, Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1))]
        name: String,
    }

    async fn echo(ValidatedJson(body): ValidatedJson<Named>) -> String {
        body.name
    }

    async fn echo_or_default(ValidatedJsonOrDefault(body): ValidatedJsonOrDefault<Named>) -> String {
        format!("[{}]", body.name)
    }

    async fn status_for(body: &'static str) -> StatusCode {
        let app = Router::new().route("/", post(echo));
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        assert_eq!(status_for(r#"{"name":"Lucky 7"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_and_invalid_bodies_are_bad_requests() {
        assert_eq!(status_for("{not json").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("{}").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for(r#"{"name":""}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_body_falls_back_to_default() {
        let app = Router::new().route("/", post(echo_or_default));
        let send = |body: &'static str| {
            app.clone().oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(body))
                    .unwrap(),
            )
        };

        let response = send("").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&text[..], b"[]");

        assert_eq!(send("{oops").await.unwrap().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            send(r#"{"name":""}"#).await.unwrap().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
