//! Delete product - Comando e handler di cancellazione

use super::validation::{IdRequired, ProductTarget};
use crate::core::{ApiResult, AppError, FailureKind};
use crate::pipeline::{Handler, LogRecord, Loggable, Request, Validator};
use crate::repositories::{ProductStore, UnitOfWork};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeleteProductCommand {
    pub id: Uuid,
}

impl ProductTarget for DeleteProductCommand {
    fn product_id(&self) -> Uuid {
        self.id
    }
}

impl Loggable for DeleteProductCommand {
    fn log_repr(&self) -> String {
        LogRecord::new("DeleteProductCommand")
            .field("id", self.id)
            .finish()
    }
}

impl Request for DeleteProductCommand {
    type Data = String;
    const NAME: &'static str = "DeleteProductCommand";

    fn validators() -> Vec<Box<dyn Validator<Self>>> {
        vec![Box::new(IdRequired)]
    }
}

pub struct DeleteProductHandler<'a, P, U> {
    products: &'a P,
    unit_of_work: &'a U,
}

impl<'a, P: ProductStore, U: UnitOfWork> DeleteProductHandler<'a, P, U> {
    pub fn new(products: &'a P, unit_of_work: &'a U) -> Self {
        Self {
            products,
            unit_of_work,
        }
    }
}

impl<P: ProductStore, U: UnitOfWork> Handler<DeleteProductCommand> for DeleteProductHandler<'_, P, U> {
    async fn handle(&self, request: DeleteProductCommand) -> Result<ApiResult<String>, AppError> {
        let Some(product) = self.products.get_by_id(&request.id).await? else {
            warn!("Product with ID {} not found.", request.id);
            return Ok(ApiResult::failure(FailureKind::NotFound, "Product not found."));
        };

        self.products.delete(&product.id).await;
        // un errore del salvataggio qui non viene gestito: arriva al boundary HTTP
        self.unit_of_work.save_changes().await?;

        info!("Product {} deleted", product.id);
        Ok(ApiResult::succeed(format!(
            "Product with ID {} deleted successfully.",
            product.id
        )))
    }
}
