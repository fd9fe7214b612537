//! Product routes - create, read-one, read-all

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{ServerError, ServerResult};
use crate::models::{CreateProductRequest, Product};
use crate::store::SharedStore;

/// POST /products - Create a product
pub async fn create_product(
    State(store): State<SharedStore>,
    Json(req): Json<CreateProductRequest>,
) -> ServerResult<(StatusCode, Json<Product>)> {
    let new = req
        .validate()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let product = store.insert(&new)?;
    tracing::info!(id = product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id} - Fetch a single product
pub async fn get_product(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Product>> {
    let product = store
        .get(id)?
        .ok_or_else(|| ServerError::NotFound(format!("Product {} not found", id)))?;

    Ok(Json(product))
}

/// GET /products - List all products
pub async fn list_products(State(store): State<SharedStore>) -> ServerResult<Json<Vec<Product>>> {
    let products = store.list()?;
    Ok(Json(products))
}
