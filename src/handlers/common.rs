use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;

/// JSON body extractor whose rejections use the API error format
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string extractor whose rejections use the API error format
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LimitParams {
    #[param(default = 100, minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
}

impl LimitParams {
    /// Requested limit clamped to `1..=100`, defaulting to 100
    pub fn resolve(&self) -> usize {
        self.limit.unwrap_or(100).clamp(1, 100) as usize
    }
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamping() {
        assert_eq!(LimitParams { limit: None }.resolve(), 100);
        assert_eq!(LimitParams { limit: Some(0) }.resolve(), 1);
        assert_eq!(LimitParams { limit: Some(-5) }.resolve(), 1);
        assert_eq!(LimitParams { limit: Some(25) }.resolve(), 25);
        assert_eq!(LimitParams { limit: Some(1000) }.resolve(), 100);
    }
}
