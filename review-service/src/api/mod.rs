//! HTTP API
//!
//! Transport glue over the service layer; each module owns its routes.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | /v1/review | create review |
//! | GET | /v1/review/{review_id} | get review |
//! | GET | /v1/review/{review_id}/reply | get reply |
//! | POST | /v1/review/reply | create reply |
//! | POST | /v1/review/appeal | create / amend appeal |
//! | POST | /v1/review/audit | audit review |
//! | POST | /v1/appeal/audit | audit appeal |
//! | GET | /v1/user/{user_id}/reviews | list by user |
//! | GET | /v1/store/{store_id}/reviews | list by store |

pub mod appeals;
pub mod health;
pub mod reviews;
pub mod stores;
pub mod users;

use axum::Router;
use axum::extract::{FromRequestParts, Query};
use http::request::Parts;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// `?page=&size=`; missing values fall through to the default window
///
/// Used directly as an extractor so a malformed query string is answered with
/// the usual error body.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(shared::util::DEFAULT_PAGE_SIZE)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text())
            })?;
        Ok(query)
    }
}

/// Build the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(reviews::router())
        .merge(appeals::router())
        .merge(users::router())
        .merge(stores::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
