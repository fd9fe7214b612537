//! Service info route

use axum::{extract::State, Json};

use crate::models::ServiceInfo;
use crate::store::SharedStore;

/// GET / - service name, status, and backing store
pub async fn service_info(State(store): State<SharedStore>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Product Service",
        status: "running",
        database: store.describe(),
    })
}
