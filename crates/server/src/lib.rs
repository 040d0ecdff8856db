use std::sync::Arc;

use axum::{Router, http::HeaderName};
use db::DBService;
use services::services::identity::IdentityService;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared handles given to every handler
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    identity: Arc<IdentityService>,
}

impl AppState {
    pub fn new(db: DBService, identity: IdentityService) -> Self {
        Self {
            db,
            identity: Arc::new(identity),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn identity(&self) -> &IdentityService {
        &self.identity
    }
}

/// Full application router with request tracing
pub fn app(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    routes::router(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
