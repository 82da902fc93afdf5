//! Create product - Comando e handler di creazione

use super::validation::{ProductFields, ProductRules};
use crate::core::{ApiResult, AppError, FailureKind};
use crate::entities::Product;
use crate::pipeline::{DeriveValidator, Handler, LogRecord, Loggable, Request, Validator};
use crate::repositories::{ProductStore, UnitOfWork};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateProductCommand {
    #[validate(length(max = 100, message = "Product name cannot exceed 100 characters."))]
    pub name: String,
    pub price: Decimal,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters."))]
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductFields for CreateProductCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> Decimal {
        self.price
    }
}

impl Loggable for CreateProductCommand {
    fn log_repr(&self) -> String {
        LogRecord::new("CreateProductCommand")
            .field("name", &self.name)
            .field("price", self.price)
            .optional("description", self.description.as_deref())
            .finish()
    }
}

impl Request for CreateProductCommand {
    type Data = String;
    const NAME: &'static str = "CreateProductCommand";

    fn validators() -> Vec<Box<dyn Validator<Self>>> {
        vec![Box::new(DeriveValidator), Box::new(ProductRules)]
    }
}

pub struct CreateProductHandler<'a, P, U> {
    products: &'a P,
    unit_of_work: &'a U,
}

impl<'a, P: ProductStore, U: UnitOfWork> CreateProductHandler<'a, P, U> {
    pub fn new(products: &'a P, unit_of_work: &'a U) -> Self {
        Self {
            products,
            unit_of_work,
        }
    }
}

impl<P: ProductStore, U: UnitOfWork> Handler<CreateProductCommand> for CreateProductHandler<'_, P, U> {
    async fn handle(&self, request: CreateProductCommand) -> Result<ApiResult<String>, AppError> {
        if self.products.get_by_name(&request.name).await?.is_some() {
            warn!("A product with the name '{}' already exists.", request.name);
            return Ok(ApiResult::failure(
                FailureKind::Duplicate,
                format!("A product with the name '{}' already exists.", request.name),
            ));
        }

        let product = Product::new(request.name, request.price, request.description);
        let (id, name) = (product.id, product.name.clone());
        self.products.add(product).await;

        match self.unit_of_work.save_changes().await {
            Ok(_) => {
                info!("Product '{}' created with ID {}", name, id);
                Ok(ApiResult::succeed(format!(
                    "Product '{}' with ID {} created successfully.",
                    name, id
                )))
            }
            Err(err) => {
                error!("An error occurred while saving the product {} to the database: {}", name, err);
                Ok(ApiResult::failure(
                    FailureKind::Internal,
                    format!("An error occurred while creating the product: {}", err),
                ))
            }
        }
    }
}
