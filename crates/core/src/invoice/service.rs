//! Invoice validation and EUR derivation.

use chrono::{DateTime, Utc};
use onchaincounting_shared::types::InvoiceId;

use super::error::InvoiceError;
use super::types::{Invoice, InvoiceDraft};
use crate::currency::{Currency, to_reporting};

/// Required draft fields after validation.
#[derive(Debug, Clone, Copy)]
struct Checked {
    date: DateTime<Utc>,
    currency: Currency,
    after_tax_amount: f64,
    before_tax_amount: f64,
    exchange_rate: f64,
    vat_rate: f64,
}

/// Service for invoice business rules.
pub struct InvoiceService;

impl InvoiceService {
    /// Validates a draft against the invoice form rules.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule:
    /// - invoice number, client name, date, currency and all amounts are required
    /// - amounts, exchange rate and settlement amounts must be finite and not negative
    /// - VAT rate must lie within 0..=100
    pub fn validate(draft: &InvoiceDraft) -> Result<(), InvoiceError> {
        Self::check(draft).map(|_| ())
    }

    /// Builds a new invoice from a draft, deriving VAT and EUR amounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft fails validation.
    pub fn create(
        draft: InvoiceDraft,
        id: InvoiceId,
        now: DateTime<Utc>,
    ) -> Result<Invoice, InvoiceError> {
        let checked = Self::check(&draft)?;
        let mut invoice = Invoice {
            id,
            date: checked.date,
            invoice_number: draft.invoice_number.trim().to_string(),
            client_name: draft.client_name.trim().to_string(),
            before_tax_amount: checked.before_tax_amount,
            after_tax_amount: checked.after_tax_amount,
            vat_rate: checked.vat_rate,
            vat_amount: 0.0,
            currency: checked.currency,
            before_tax_eur_amount: 0.0,
            after_tax_eur_amount: 0.0,
            vat_eur_amount: 0.0,
            exchange_rate: checked.exchange_rate,
            crypto_payments: draft.crypto_payments,
            pdf_path: draft.pdf_path,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        Self::rederive(&mut invoice);
        Ok(invoice)
    }

    /// Replaces an invoice with the content of a draft.
    ///
    /// Keeps the id and creation time; every other field, including the
    /// cached EUR amounts, comes from the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft fails validation.
    pub fn update(
        existing: &Invoice,
        draft: InvoiceDraft,
        now: DateTime<Utc>,
    ) -> Result<Invoice, InvoiceError> {
        let mut invoice = Self::create(draft, existing.id, now)?;
        invoice.created_at = existing.created_at;
        Ok(invoice)
    }

    /// Recomputes the VAT amount and all three EUR amounts together.
    pub fn rederive(invoice: &mut Invoice) {
        let vat_amount = invoice.after_tax_amount - invoice.before_tax_amount;
        invoice.vat_amount = vat_amount;
        invoice.before_tax_eur_amount =
            to_reporting(invoice.before_tax_amount, invoice.exchange_rate);
        invoice.after_tax_eur_amount = to_reporting(invoice.after_tax_amount, invoice.exchange_rate);
        invoice.vat_eur_amount = to_reporting(vat_amount, invoice.exchange_rate);
    }

    fn check(draft: &InvoiceDraft) -> Result<Checked, InvoiceError> {
        if draft.invoice_number.trim().is_empty() {
            return Err(InvoiceError::MissingField("invoice number"));
        }
        if draft.client_name.trim().is_empty() {
            return Err(InvoiceError::MissingField("client name"));
        }

        let date = draft.date.ok_or(InvoiceError::MissingField("date"))?;
        let currency = draft.currency.ok_or(InvoiceError::MissingField("currency"))?;
        let after_tax_amount = non_negative(draft.after_tax_amount, "after tax amount")?;
        let before_tax_amount = non_negative(draft.before_tax_amount, "before tax amount")?;
        let exchange_rate = non_negative(draft.exchange_rate, "exchange rate")?;

        let vat_rate = draft.vat_rate.ok_or(InvoiceError::MissingField("VAT rate"))?;
        if !(0.0..=100.0).contains(&vat_rate) {
            return Err(InvoiceError::VatRateOutOfRange(vat_rate));
        }

        for payment in &draft.crypto_payments {
            non_negative(Some(payment.amount), "settlement amount")?;
        }

        Ok(Checked {
            date,
            currency,
            after_tax_amount,
            before_tax_amount,
            exchange_rate,
            vat_rate,
        })
    }
}

fn non_negative(value: Option<f64>, field: &'static str) -> Result<f64, InvoiceError> {
    let value = value.ok_or(InvoiceError::MissingField(field))?;
    if !value.is_finite() {
        return Err(InvoiceError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(InvoiceError::NegativeValue(field));
    }
    Ok(value)
}
