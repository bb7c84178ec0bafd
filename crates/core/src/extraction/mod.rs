//! Best-effort invoice field extraction from document text.
//!
//! Extraction never fails: a field whose matchers find nothing usable is
//! simply left unset and the user fills it in by hand.

mod matchers;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;

use crate::currency::Currency;
use crate::fiscal::local_midnight;
use crate::invoice::InvoiceDraft;

/// Fields recognized in an invoice's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInvoice {
    /// Invoice number.
    pub invoice_number: Option<String>,
    /// Total after tax.
    pub after_tax_amount: Option<f64>,
    /// Total before tax.
    pub before_tax_amount: Option<f64>,
    /// Currency of the totals.
    pub currency: Option<Currency>,
    /// VAT rate in percent.
    pub vat_rate: Option<f64>,
    /// EUR/CUR quote.
    pub exchange_rate: Option<f64>,
    /// Issue date.
    pub date: Option<NaiveDate>,
    /// Billed client.
    pub client_name: Option<String>,
}

/// Runs every field matcher over `text`.
#[must_use]
pub fn extract_invoice_fields(text: &str) -> ExtractedInvoice {
    let total = matchers::total_amount(text);
    ExtractedInvoice {
        invoice_number: matchers::invoice_number(text),
        after_tax_amount: total.map(|(amount, _)| amount),
        before_tax_amount: matchers::before_tax_amount(text),
        currency: total.map(|(_, currency)| currency),
        vat_rate: matchers::vat_rate(text),
        exchange_rate: matchers::exchange_rate(text),
        date: matchers::issue_date(text),
        client_name: matchers::client_name(text),
    }
}

impl ExtractedInvoice {
    /// VAT rate, or one estimated from the two totals rounded up to a
    /// whole percent.
    #[must_use]
    pub fn vat_rate_or_estimate(&self) -> Option<f64> {
        self.vat_rate.or_else(|| match (self.after_tax_amount, self.before_tax_amount) {
            (Some(after), Some(before)) if after != 0.0 && before != 0.0 => {
                Some(((after / before - 1.0) * 100.0).ceil())
            }
            _ => None,
        })
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

impl InvoiceDraft {
    /// Applies every non-empty extracted value; other fields keep their
    /// current value. Dates become local midnight in `tz`.
    pub fn prefill(&mut self, extracted: &ExtractedInvoice, tz: Tz) {
        if let Some(number) = extracted.invoice_number.as_ref().filter(|s| !s.is_empty()) {
            self.invoice_number.clone_from(number);
        }
        if let Some(amount) = present(extracted.after_tax_amount) {
            self.after_tax_amount = Some(amount);
        }
        if let Some(amount) = present(extracted.before_tax_amount) {
            self.before_tax_amount = Some(amount);
        }
        if let Some(rate) = present(extracted.vat_rate_or_estimate()) {
            self.vat_rate = Some(rate);
        }
        if let Some(currency) = extracted.currency {
            self.currency = Some(currency);
        }
        if let Some(rate) = present(extracted.exchange_rate) {
            self.exchange_rate = Some(rate);
        }
        if let Some(midnight) = extracted.date.and_then(|d| local_midnight(d, tz)) {
            self.date = Some(midnight);
        }
        if let Some(client) = extracted.client_name.as_ref().filter(|s| !s.is_empty()) {
            self.client_name.clone_from(client);
        }
    }
}
