// src/handlers/product.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use crate::dtos::product::{ApiResponse, CreateProductRequest, UpdateProductRequest};
use crate::models::product::Product;
use crate::state::AppState;
use crate::error::AppError;
use tracing::instrument;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Path ids are plain unsigned decimals (no sign). Anything above the signed
/// key space is well formed but can never match a row.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    if !raw.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(AppError::validation("invalid product id"));
    }
    let id: u64 = raw
        .parse()
        .map_err(|_| AppError::validation("invalid product id"))?;
    i64::try_from(id).map_err(|_| AppError::not_found("product not found"))
}

fn body<T>(payload: JsonBody<T>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

fn check_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("\"name\" must not be empty"));
    }
    Ok(())
}

// GET /products - List all live products
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = state.products.list_all().await?;
    Ok(Json(ApiResponse::new(products)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    payload: JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let req = body(payload)?;

    let name = req.name.ok_or_else(|| AppError::validation("\"name\" is required"))?;
    let price = req.price.ok_or_else(|| AppError::validation("\"price\" is required"))?;
    check_name(&name)?;

    let product = state.products.create(&name, price).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(product))))
}

// GET /products/{id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let id = parse_id(&id)?;
    let product = state.products.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(product)))
}

// PATCH /products/{id} - Update name and/or price
#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let id = parse_id(&id)?;
    let req = body(payload)?;

    let mut product = state.products.get_by_id(id).await?;

    if req.is_empty() {
        return Err(AppError::validation("\"name\" or \"price\" is required"));
    }
    if let Some(name) = req.name {
        check_name(&name)?;
        product.name = name;
    }
    if let Some(price) = req.price {
        product.price = price;
    }

    // Only what the store returns is reported back.
    let saved = state.products.save(&product).await?;

    Ok(Json(ApiResponse::new(saved)))
}

// DELETE /products/{id} - Soft delete product
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    let id = parse_id(&id)?;
    state.products.delete_by_id(id).await?;
    Ok(Json(ApiResponse::new("product deleted")))
}
