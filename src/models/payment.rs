// src/models/payment.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::CourseId;

/// DTO for starting a hosted checkout.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 200))]
    pub course_name: String,
    /// Price in major currency units (e.g. 19.99).
    #[validate(range(exclusive_min = 0.0, max = 1_000_000.0))]
    pub course_price: f64,
}

impl CheckoutRequest {
    /// Price in the smallest currency unit, rounded to the nearest cent.
    pub fn unit_amount(&self) -> i64 {
        (self.course_price * 100.0).round() as i64
    }
}

/// Checkout session created by the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_amount_rounds_to_cents() {
        let req = CheckoutRequest {
            course_id: 1,
            course_name: "Rust".to_string(),
            course_price: 19.99,
        };
        assert_eq!(req.unit_amount(), 1999);
    }

    #[test]
    fn rejects_non_positive_price() {
        let req = CheckoutRequest {
            course_id: 1,
            course_name: "Rust".to_string(),
            course_price: 0.0,
        };
        assert!(req.validate().is_err());
    }
}
