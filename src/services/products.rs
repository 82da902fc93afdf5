//! Product services - Endpoint HTTP dei prodotti

use super::{data_or_errors, status_or_errors};
use crate::core::{ADMIN_ROLE, AppError, AppState, Claims, require_role};
use crate::dtos::UpdateProductDTO;
use crate::features::products::{
    CreateProductCommand, CreateProductHandler, DeleteProductCommand, DeleteProductHandler,
    GetAllProductQuery, GetProductByIdQuery, ProductQueryHandler, UpdateProductCommand,
    UpdateProductHandler,
};
use crate::pipeline::Pipeline;
use crate::repositories::{DbContext, ProductRepository};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateProductCommand>,
) -> Result<Response, AppError> {
    let ctx = DbContext::new(state.pool.clone());
    let products = ProductRepository::new(&ctx);
    let handler = CreateProductHandler::new(&products, &ctx);

    let result = Pipeline::new().send(&handler, body).await?;
    Ok(data_or_errors(result, StatusCode::CREATED))
}

#[instrument(skip(state))]
pub async fn get_all_products(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let ctx = DbContext::new(state.pool.clone());
    let products = ProductRepository::new(&ctx);
    let handler = ProductQueryHandler::new(&products);

    let result = Pipeline::new().send(&handler, GetAllProductQuery).await?;
    Ok(data_or_errors(result, StatusCode::OK))
}

#[instrument(skip(state), fields(product_id = %id))]
pub async fn get_product_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ctx = DbContext::new(state.pool.clone());
    let products = ProductRepository::new(&ctx);
    let handler = ProductQueryHandler::new(&products);

    let result = Pipeline::new().send(&handler, GetProductByIdQuery { id }).await?;
    Ok(data_or_errors(result, StatusCode::OK))
}

#[instrument(skip(state, claims, body), fields(product_id = %id, username = %claims.name))]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductDTO>,
) -> Result<Response, AppError> {
    require_role(&claims, ADMIN_ROLE)?;

    let ctx = DbContext::new(state.pool.clone());
    let products = ProductRepository::new(&ctx);
    let handler = UpdateProductHandler::new(&products, &ctx);
    let command = UpdateProductCommand {
        id,
        name: body.name,
        price: body.price,
        description: body.description,
    };

    let result = Pipeline::new().send(&handler, command).await?;
    Ok(status_or_errors(result))
}

#[instrument(skip(state, claims), fields(product_id = %id, username = %claims.name))]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_role(&claims, ADMIN_ROLE)?;

    let ctx = DbContext::new(state.pool.clone());
    let products = ProductRepository::new(&ctx);
    let handler = DeleteProductHandler::new(&products, &ctx);

    let result = Pipeline::new().send(&handler, DeleteProductCommand { id }).await?;
    Ok(status_or_errors(result))
}
