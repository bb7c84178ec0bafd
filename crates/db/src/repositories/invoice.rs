//! Invoice repository.

use chrono::{DateTime, Duration, Utc};
use onchaincounting_core::invoice::{Invoice, InvoiceDraft, InvoiceService};
use onchaincounting_shared::types::InvoiceId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::RepositoryError;
use crate::entities::invoices;

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates a draft, derives its EUR amounts and stores it.
    pub async fn create(&self, draft: InvoiceDraft) -> Result<Invoice, RepositoryError> {
        let invoice = InvoiceService::create(draft, InvoiceId::new(), Utc::now())?;
        invoices::Entity::insert(invoices::ActiveModel::from_domain(&invoice)?)
            .exec(&self.db)
            .await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Replaces an invoice with a draft, re-deriving every cached amount.
    pub async fn update(
        &self,
        id: InvoiceId,
        draft: InvoiceDraft,
    ) -> Result<Invoice, RepositoryError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("invoice", id))?;
        let invoice = InvoiceService::update(&existing, draft, Utc::now())?;
        invoices::Entity::update(invoices::ActiveModel::from_domain(&invoice)?)
            .exec(&self.db)
            .await?;

        info!(invoice_id = %id, "Invoice updated");
        Ok(invoice)
    }

    /// Deletes an invoice.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), RepositoryError> {
        let result = invoices::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("invoice", id));
        }

        info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    /// Finds an invoice by ID.
    pub async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let model = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(model.map(Invoice::try_from).transpose()?)
    }

    /// Invoices dated within `[start, end]`, oldest first.
    ///
    /// Both bounds are whole seconds; anything within the last second counts.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        let models = invoices::Entity::find()
            .filter(invoices::Column::Date.gte(start))
            .filter(invoices::Column::Date.lt(end + Duration::seconds(1)))
            .order_by_asc(invoices::Column::Date)
            .order_by_asc(invoices::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    /// Every invoice, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let models = invoices::Entity::find()
            .order_by_asc(invoices::Column::Date)
            .order_by_asc(invoices::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }
}

fn to_domain(models: Vec<invoices::Model>) -> Result<Vec<Invoice>, RepositoryError> {
    models
        .into_iter()
        .map(|m| Invoice::try_from(m).map_err(RepositoryError::from))
        .collect()
}
