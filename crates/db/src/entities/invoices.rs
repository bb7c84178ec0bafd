//! `SeaORM` Entity for invoices table.

use onchaincounting_core::invoice::Invoice;
use onchaincounting_shared::types::InvoiceId;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{amount_from_column, amount_to_column, from_json, parse_text, to_json};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTimeUtc,
    pub invoice_number: String,
    pub client_name: String,
    pub before_tax_amount: Option<f64>,
    pub after_tax_amount: Option<f64>,
    pub vat_rate: Option<f64>,
    pub vat_amount: Option<f64>,
    pub currency: String,
    pub before_tax_eur_amount: Option<f64>,
    pub after_tax_eur_amount: Option<f64>,
    pub vat_eur_amount: Option<f64>,
    pub exchange_rate: Option<f64>,
    pub crypto_payments: Json,
    pub pdf_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Builds a fully set active model from a domain invoice.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Json` if the settlements cannot be serialized.
    pub fn from_domain(invoice: &Invoice) -> Result<Self, DbErr> {
        Ok(Self {
            id: Set(invoice.id.into_inner()),
            date: Set(invoice.date),
            invoice_number: Set(invoice.invoice_number.clone()),
            client_name: Set(invoice.client_name.clone()),
            before_tax_amount: Set(amount_to_column(invoice.before_tax_amount)),
            after_tax_amount: Set(amount_to_column(invoice.after_tax_amount)),
            vat_rate: Set(amount_to_column(invoice.vat_rate)),
            vat_amount: Set(amount_to_column(invoice.vat_amount)),
            currency: Set(invoice.currency.as_str().to_string()),
            before_tax_eur_amount: Set(amount_to_column(invoice.before_tax_eur_amount)),
            after_tax_eur_amount: Set(amount_to_column(invoice.after_tax_eur_amount)),
            vat_eur_amount: Set(amount_to_column(invoice.vat_eur_amount)),
            exchange_rate: Set(amount_to_column(invoice.exchange_rate)),
            crypto_payments: Set(to_json(&invoice.crypto_payments)?),
            pdf_path: Set(invoice.pdf_path.clone()),
            notes: Set(invoice.notes.clone()),
            created_at: Set(invoice.created_at),
            updated_at: Set(invoice.updated_at),
        })
    }
}

impl TryFrom<Model> for Invoice {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvoiceId::from_uuid(model.id),
            date: model.date,
            invoice_number: model.invoice_number,
            client_name: model.client_name,
            before_tax_amount: amount_from_column(model.before_tax_amount),
            after_tax_amount: amount_from_column(model.after_tax_amount),
            vat_rate: amount_from_column(model.vat_rate),
            vat_amount: amount_from_column(model.vat_amount),
            currency: parse_text("invoices.currency", &model.currency)?,
            before_tax_eur_amount: amount_from_column(model.before_tax_eur_amount),
            after_tax_eur_amount: amount_from_column(model.after_tax_eur_amount),
            vat_eur_amount: amount_from_column(model.vat_eur_amount),
            exchange_rate: amount_from_column(model.exchange_rate),
            crypto_payments: from_json(model.crypto_payments)?,
            pdf_path: model.pdf_path,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
