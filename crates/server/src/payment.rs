//! Card payments.
//!
//! Only a mock gateway exists: it always approves after a short pause.

use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub payment_intent_id: String,
    pub amount: Decimal,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` rand and return the processor's receipt
    async fn charge(&self, amount: Decimal, description: &str) -> Result<PaymentReceipt>;
}

#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
    delay: Duration,
}

impl MockPaymentGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    #[instrument(skip(self))]
    async fn charge(&self, amount: Decimal, description: &str) -> Result<PaymentReceipt> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::Payment(format!(
                "amount must be positive, got R{:.2}",
                amount
            )));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let receipt = PaymentReceipt {
            payment_intent_id: format!("pi_mock_{}", Utc::now().timestamp_millis()),
            amount,
        };
        info!("Mock payment approved: {}", receipt.payment_intent_id);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_always_approves() {
        let gateway = MockPaymentGateway::new(Duration::ZERO);
        let receipt = gateway.charge(Decimal::from(150), "order").await.unwrap();
        assert!(receipt.payment_intent_id.starts_with("pi_mock_"));
        assert_eq!(receipt.amount, Decimal::from(150));
    }

    #[tokio::test]
    async fn test_rejects_zero_amount() {
        let gateway = MockPaymentGateway::new(Duration::ZERO);
        let result = gateway.charge(Decimal::ZERO, "order").await;
        assert!(matches!(result, Err(ServiceError::Payment(_))));
    }
}
