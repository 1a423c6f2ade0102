use std::convert::Infallible;

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::incoming::http_axum::error_mapper::HttpError;
use idprofile_application::error::AppError;

/// Bearer credential from the `Authorization` header.
///
/// A missing or non-bearer header yields an empty token, which the use cases reject as
/// unauthenticated.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map(|TypedHeader(authorization)| authorization.token().to_string())
            .unwrap_or_default();
        Ok(Self(token))
    }
}

/// JSON body whose rejections render as the standard error envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                HttpError(AppError::ValidationError {
                    message: rejection.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}

/// JSON body whose decoding outcome is handed to the handler instead of rejecting.
///
/// Handlers that must authenticate before validating input inspect the result
/// themselves. An empty body decodes as `T::default()`.
pub struct DeferredJson<T>(pub Result<T, AppError>);

impl<S, T> FromRequest<S> for DeferredJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let decoded = match Bytes::from_request(req, state).await {
            Ok(bytes) if bytes.trim_ascii().is_empty() => Ok(T::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| AppError::ValidationError {
                message: format!("Failed to parse the request body as JSON: {}", e),
            }),
            Err(rejection) => Err(AppError::ValidationError {
                message: rejection.body_text(),
            }),
        };
        Ok(Self(decoded))
    }
}

pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate().map_err(|e| {
            HttpError(AppError::ValidationError {
                message: format!("Validation failed: {}", e),
            })
        })?;
        Ok(Self(value))
    }
}
