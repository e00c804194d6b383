use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ReferenceConfig;
use crate::decimal::{deserialize_lenient, Money};
use crate::errors::Result;
use crate::records::deserialize_id;
use crate::types::{LoanId, PaymentMethod};

/// body of the payment-creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub loan_id: LoanId,
    /// sent as a json number
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: String,
    pub notes: String,
}

impl CreatePaymentPayload {
    pub fn new(
        loan_id: LoanId,
        amount: Money,
        method: PaymentMethod,
        reference: String,
        notes: &str,
    ) -> Self {
        Self {
            loan_id,
            amount: amount.as_decimal(),
            method,
            reference,
            notes: notes.trim().to_string(),
        }
    }

    pub fn amount(&self) -> Money {
        Money::from_decimal(self.amount)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| crate::errors::PaymentError::MalformedResponse {
            message: e.to_string(),
        })
    }
}

/// what the server returns for a recorded payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub amount: Money,
}

impl PaymentReceipt {
    pub fn from_response(body: &str) -> Result<Self> {
        crate::records::parse_envelope(body)
    }
}

/// client-side payment reference: `<prefix>-<unix millis>-<random hex>`.
///
/// Convenience only; de-duplication is the server's job.
pub fn generate_reference(config: &ReferenceConfig, now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string().to_uppercase();
    let suffix_len = config.suffix_len.clamp(1, random.len());
    format!(
        "{}-{}-{}",
        config.prefix,
        now.timestamp_millis(),
        &random[..suffix_len]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_wire_shape() {
        let payload = CreatePaymentPayload::new(
            "loan-1".to_string(),
            Money::from_str_exact("3000.50").unwrap(),
            PaymentMethod::MobileMoney,
            "PAY-1-ABC".to_string(),
            "  paid at branch  ",
        );
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(value["loanId"], "loan-1");
        assert_eq!(value["amount"].as_f64(), Some(3000.5));
        assert_eq!(value["method"], "MOBILE_MONEY");
        assert_eq!(value["reference"], "PAY-1-ABC");
        assert_eq!(value["notes"], "paid at branch");
        assert_eq!(payload.amount(), Money::from_decimal(dec!(3000.50)));
    }

    #[test]
    fn test_reference_format() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();
        let config = ReferenceConfig::default();
        let reference = generate_reference(&config, now);

        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PAY");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_references_differ() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();
        let config = ReferenceConfig::default();
        assert_ne!(generate_reference(&config, now), generate_reference(&config, now));
    }

    #[test]
    fn test_receipt_from_response() {
        let body = r#"{"success": true, "data": {"id": 77, "reference": "PAY-1-ABC", "amount": "3000"}}"#;
        let receipt = PaymentReceipt::from_response(body).unwrap();
        assert_eq!(receipt.id, "77");
        assert_eq!(receipt.amount, Money::from_major(3000));
    }
}
