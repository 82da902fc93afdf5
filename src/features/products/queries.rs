//! Product queries - Lettura di tutti i prodotti e di un prodotto per id

use crate::core::{ApiResult, AppError, FailureKind};
use crate::dtos::ProductDTO;
use crate::pipeline::{Handler, LogRecord, Loggable, Request};
use crate::repositories::ProductStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GetAllProductQuery;

impl Loggable for GetAllProductQuery {
    fn log_repr(&self) -> String {
        LogRecord::new("GetAllProductQuery").finish()
    }
}

impl Request for GetAllProductQuery {
    type Data = Vec<ProductDTO>;
    const NAME: &'static str = "GetAllProductQuery";
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GetProductByIdQuery {
    pub id: Uuid,
}

impl Loggable for GetProductByIdQuery {
    fn log_repr(&self) -> String {
        LogRecord::new("GetProductByIdQuery")
            .field("id", self.id)
            .finish()
    }
}

impl Request for GetProductByIdQuery {
    type Data = ProductDTO;
    const NAME: &'static str = "GetProductByIdQuery";
}

/// Handles both product queries; reads only, so no unit of work
pub struct ProductQueryHandler<'a, P> {
    products: &'a P,
}

impl<'a, P: ProductStore> ProductQueryHandler<'a, P> {
    pub fn new(products: &'a P) -> Self {
        Self { products }
    }
}

impl<P: ProductStore> Handler<GetAllProductQuery> for ProductQueryHandler<'_, P> {
    async fn handle(&self, _request: GetAllProductQuery) -> Result<ApiResult<Vec<ProductDTO>>, AppError> {
        let products = self.products.get_all().await?;
        debug!("Fetched {} products", products.len());

        Ok(ApiResult::succeed(
            products.into_iter().map(ProductDTO::from).collect(),
        ))
    }
}

impl<P: ProductStore> Handler<GetProductByIdQuery> for ProductQueryHandler<'_, P> {
    async fn handle(&self, request: GetProductByIdQuery) -> Result<ApiResult<ProductDTO>, AppError> {
        match self.products.get_by_id(&request.id).await? {
            Some(product) => Ok(ApiResult::succeed(ProductDTO::from(product))),
            None => {
                warn!("Product with ID {} not found.", request.id);
                Ok(ApiResult::failure(FailureKind::NotFound, "Product not found."))
            }
        }
    }
}
