//! Payment institution backed by a saved API response.

use std::path::PathBuf;

use async_trait::async_trait;
use onchaincounting_core::order::{Balance, Order, PaymentInstitution, SourceError};
use serde::Deserialize;

/// A saved `{ "orders": [...], "balances": [...] }` document.
#[derive(Debug, Deserialize)]
struct SavedResponse {
    #[serde(default)]
    orders: Vec<Order>,
    #[serde(default)]
    balances: Vec<Balance>,
}

/// Reads orders and balances from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<SavedResponse, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Network(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| SourceError::Malformed(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl PaymentInstitution for JsonFileSource {
    async fn orders(&self) -> Result<Vec<Order>, SourceError> {
        Ok(self.load().await?.orders)
    }

    async fn balances(&self) -> Result<Vec<Balance>, SourceError> {
        Ok(self.load().await?.balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("orders-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_reads_orders_and_balances() {
        let path = temp_file(
            r#"{
                "orders": [{
                    "id": "ord-1",
                    "kind": "redeem",
                    "amount": "12.30",
                    "counterpart": { "identifier": { "standard": "iban", "iban": "CH93" } },
                    "meta": { "state": "processed", "placedAt": "2024-03-15T08:00:00Z" }
                }],
                "balances": [{ "currency": "eur", "amount": "1.5" }]
            }"#,
        );
        let source = JsonFileSource::new(&path);

        let orders = source.orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!((orders[0].amount - 12.3).abs() < f64::EPSILON);
        assert_eq!(source.balances().await.unwrap().len(), 1);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_retryable() {
        let source = JsonFileSource::new(std::env::temp_dir().join("no-such-orders.json"));
        let err = source.orders().await.unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_file_is_not_retryable() {
        let path = temp_file(r#"{ "orders": [ { "id": 1 } ] }"#);
        let err = JsonFileSource::new(&path).orders().await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
        assert!(!err.is_retryable());

        std::fs::remove_file(path).unwrap();
    }
}
