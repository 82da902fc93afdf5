//! Update product - Comando e handler di aggiornamento

use super::validation::{IdRequired, ProductFields, ProductRules, ProductTarget};
use crate::core::{ApiResult, AppError, FailureKind};
use crate::pipeline::{DeriveValidator, Handler, LogRecord, Loggable, Request, Validator};
use crate::repositories::{ProductStore, UnitOfWork};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateProductCommand {
    pub id: Uuid,
    #[validate(length(max = 100, message = "Product name cannot exceed 100 characters."))]
    pub name: String,
    pub price: Decimal,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters."))]
    pub description: Option<String>,
}

impl ProductFields for UpdateProductCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> Decimal {
        self.price
    }
}

impl ProductTarget for UpdateProductCommand {
    fn product_id(&self) -> Uuid {
        self.id
    }
}

impl Loggable for UpdateProductCommand {
    fn log_repr(&self) -> String {
        LogRecord::new("UpdateProductCommand")
            .field("id", self.id)
            .field("name", &self.name)
            .field("price", self.price)
            .optional("description", self.description.as_deref())
            .finish()
    }
}

impl Request for UpdateProductCommand {
    type Data = String;
    const NAME: &'static str = "UpdateProductCommand";

    fn validators() -> Vec<Box<dyn Validator<Self>>> {
        vec![
            Box::new(IdRequired),
            Box::new(DeriveValidator),
            Box::new(ProductRules),
        ]
    }
}

pub struct UpdateProductHandler<'a, P, U> {
    products: &'a P,
    unit_of_work: &'a U,
}

impl<'a, P: ProductStore, U: UnitOfWork> UpdateProductHandler<'a, P, U> {
    pub fn new(products: &'a P, unit_of_work: &'a U) -> Self {
        Self {
            products,
            unit_of_work,
        }
    }
}

impl<P: ProductStore, U: UnitOfWork> Handler<UpdateProductCommand> for UpdateProductHandler<'_, P, U> {
    async fn handle(&self, request: UpdateProductCommand) -> Result<ApiResult<String>, AppError> {
        let Some(mut product) = self.products.get_by_id(&request.id).await? else {
            warn!("Product with ID {} not found.", request.id);
            return Ok(ApiResult::failure(FailureKind::NotFound, "Product not found."));
        };

        product.name = request.name;
        product.price = request.price;
        product.description = request.description;
        let id = product.id;
        self.products.update(product).await;

        match self.unit_of_work.save_changes().await {
            Ok(_) => Ok(ApiResult::succeed(format!(
                "Product with ID {} updated successfully.",
                id
            ))),
            Err(err) => {
                error!("An error occurred while updating the product: {}", err);
                Ok(ApiResult::failure(
                    FailureKind::Internal,
                    format!("An error occurred while updating the product: {}", err),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Product;
    use crate::pipeline::Pipeline;
    use crate::repositories::fakes::{FakeProductStore, FakeUnitOfWork};
    use std::str::FromStr;

    fn widget() -> Product {
        Product::new(
            "Widget".to_string(),
            Decimal::from_str("9.99").unwrap(),
            Some("desc".to_string()),
        )
    }

    fn command(id: Uuid) -> UpdateProductCommand {
        UpdateProductCommand {
            id,
            name: "Gadget".to_string(),
            price: Decimal::from_str("19.50").unwrap(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_update_overlays_every_field() {
        let existing = widget();
        let store = FakeProductStore::with_products(vec![existing.clone()]);
        let uow = FakeUnitOfWork::default();
        let handler = UpdateProductHandler::new(&store, &uow);

        let result = handler.handle(command(existing.id)).await.unwrap();

        assert_eq!(
            result.data.unwrap(),
            format!("Product with ID {} updated successfully.", existing.id)
        );
        let updated = &store.snapshot()[0];
        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.price, Decimal::from_str("19.5").unwrap());
        assert_eq!(updated.description, None);
        assert_eq!(uow.save_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_without_mutation() {
        let store = FakeProductStore::with_products(vec![widget()]);
        let uow = FakeUnitOfWork::default();
        let handler = UpdateProductHandler::new(&store, &uow);

        let result = handler.handle(command(Uuid::new_v4())).await.unwrap();

        assert!(result.is_failure_of(FailureKind::NotFound));
        assert_eq!(result.error_messages, vec!["Product not found.".to_string()]);
        assert_eq!(store.calls(), (0, 0, 0));
        assert_eq!(uow.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_fault_becomes_internal_failure() {
        let existing = widget();
        let store = FakeProductStore::with_products(vec![existing.clone()]);
        let uow = FakeUnitOfWork::failing("lock wait timeout exceeded");
        let handler = UpdateProductHandler::new(&store, &uow);

        let result = handler.handle(command(existing.id)).await.unwrap();

        assert!(result.is_failure_of(FailureKind::Internal));
        assert!(result.error_messages[0].starts_with("An error occurred while updating the product: "));
        assert!(result.error_messages[0].contains("lock wait timeout exceeded"));
        assert_eq!(store.calls(), (0, 1, 0));
    }

    #[tokio::test]
    async fn test_nil_id_is_rejected_by_validation() {
        let store = FakeProductStore::default();
        let uow = FakeUnitOfWork::default();
        let handler = UpdateProductHandler::new(&store, &uow);

        let err = Pipeline::new().send(&handler, command(Uuid::nil())).await.unwrap_err();

        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].message, "Product ID is required.");
    }
}
