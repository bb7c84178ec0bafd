//! Invoice data types.

use chrono::{DateTime, Utc};
use onchaincounting_shared::types::InvoiceId;
use serde::{Deserialize, Serialize};

use crate::currency::{BlockchainNetwork, CryptoCurrency, Currency};

/// A settlement received on chain for an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPayment {
    /// Token amount.
    pub amount: f64,
    /// Token symbol.
    pub currency: CryptoCurrency,
    /// Network the token arrived on.
    pub network: BlockchainNetwork,
}

/// An issued invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Issue date.
    pub date: DateTime<Utc>,
    /// Number printed on the invoice.
    pub invoice_number: String,
    /// Billed client.
    pub client_name: String,
    /// Amount before tax, native currency.
    pub before_tax_amount: f64,
    /// Amount after tax, native currency.
    pub after_tax_amount: f64,
    /// VAT rate in percent.
    pub vat_rate: f64,
    /// VAT amount, native currency (after tax - before tax).
    pub vat_amount: f64,
    /// Native currency.
    pub currency: Currency,
    /// Amount before tax in EUR.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub before_tax_eur_amount: f64,
    /// Amount after tax in EUR.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub after_tax_eur_amount: f64,
    /// VAT amount in EUR.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub vat_eur_amount: f64,
    /// EUR/CUR quote fixed at invoice time.
    pub exchange_rate: f64,
    /// On-chain settlements.
    #[serde(default)]
    pub crypto_payments: Vec<CryptoPayment>,
    /// Path of the source PDF, if kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Invoice form input.
///
/// Every field may be blank until the user (or extraction) fills it in;
/// [`InvoiceService::validate`](super::InvoiceService::validate) decides
/// whether it can become an [`Invoice`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDraft {
    /// Number printed on the invoice.
    pub invoice_number: String,
    /// Issue date.
    pub date: Option<DateTime<Utc>>,
    /// Billed client.
    pub client_name: String,
    /// Native currency.
    pub currency: Option<Currency>,
    /// Amount after tax, native currency.
    pub after_tax_amount: Option<f64>,
    /// Amount before tax, native currency.
    pub before_tax_amount: Option<f64>,
    /// EUR/CUR quote.
    pub exchange_rate: Option<f64>,
    /// VAT rate in percent.
    pub vat_rate: Option<f64>,
    /// On-chain settlements.
    pub crypto_payments: Vec<CryptoPayment>,
    /// Path of the source PDF.
    pub pdf_path: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl InvoiceDraft {
    /// Starts a draft from an existing invoice, for editing.
    #[must_use]
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            date: Some(invoice.date),
            client_name: invoice.client_name.clone(),
            currency: Some(invoice.currency),
            after_tax_amount: Some(invoice.after_tax_amount),
            before_tax_amount: Some(invoice.before_tax_amount),
            exchange_rate: Some(invoice.exchange_rate),
            vat_rate: Some(invoice.vat_rate),
            crypto_payments: invoice.crypto_payments.clone(),
            pdf_path: invoice.pdf_path.clone(),
            notes: invoice.notes.clone(),
        }
    }
}
