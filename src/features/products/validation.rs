//! Product validators - Regole sui campi dei comandi prodotto

use crate::pipeline::{ValidationFailure, Validator};
use rust_decimal::Decimal;
use uuid::Uuid;

const PRICE_PRECISION: u32 = 18;
const PRICE_SCALE: u32 = 2;

/// Fields shared by the create and update commands
pub trait ProductFields {
    fn name(&self) -> &str;
    fn price(&self) -> Decimal;
}

/// Commands addressing an existing product
pub trait ProductTarget {
    fn product_id(&self) -> Uuid;
}

/// Name required, price strictly positive with precision-scale (18, 2).
/// Length limits are declared with `#[validate]` on the commands.
pub struct ProductRules;

impl<R: ProductFields + Send + Sync> Validator<R> for ProductRules {
    fn validate(&self, request: &R) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        if request.name().trim().is_empty() {
            failures.push(ValidationFailure::new(
                "name",
                "required",
                "Product name is required.",
            ));
        }

        let price = request.price();
        if price <= Decimal::ZERO {
            failures.push(ValidationFailure::new(
                "price",
                "greater_than",
                "Price must be greater than zero.",
            ));
        }
        if !fits_precision_scale(price, PRICE_PRECISION, PRICE_SCALE) {
            failures.push(ValidationFailure::new(
                "price",
                "precision_scale",
                "Price must have up to 18 digits in total, with 2 decimal places.",
            ));
        }

        failures
    }
}

pub struct IdRequired;

impl<R: ProductTarget + Send + Sync> Validator<R> for IdRequired {
    fn validate(&self, request: &R) -> Vec<ValidationFailure> {
        if request.product_id().is_nil() {
            vec![ValidationFailure::new(
                "id",
                "required",
                "Product ID is required.",
            )]
        } else {
            Vec::new()
        }
    }
}

/// Trailing zeros are ignored: `9.9900` has scale 2
pub fn fits_precision_scale(value: Decimal, precision: u32, scale: u32) -> bool {
    let normalized = value.normalize();
    let digits = normalized.mantissa().unsigned_abs().to_string().len() as u32;
    let value_scale = normalized.scale();
    let integer_digits = digits.saturating_sub(value_scale);
    value_scale <= scale && integer_digits <= precision - scale
}
