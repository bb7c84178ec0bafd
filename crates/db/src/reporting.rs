//! Year snapshots loaded from the store and folded by the report service.
//!
//! Aggregation stays pure; this type only gathers the records of one
//! reporting year and re-runs it on every call.

use chrono_tz::Tz;
use onchaincounting_core::fiscal::ReportingYear;
use onchaincounting_core::invoice::Invoice;
use onchaincounting_core::reports::{
    Dashboard, InvoiceMonthGroup, ReportService, TaxReport, VatPolicy, YearlySummary,
};
use sea_orm::DatabaseConnection;

use crate::repositories::{
    ExpenseRepository, InvoiceRepository, OrderRepository, RepositoryError, SummaryRepository,
    WithdrawalRepository,
};

/// Which records count as off-ramps on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OfframpSource {
    /// Redeem orders mirrored from the payment institution.
    #[default]
    Orders,
    /// Manually recorded withdrawals.
    Withdrawals,
}

/// Report queries over one database.
#[derive(Debug, Clone)]
pub struct ReportingQueries {
    invoices: InvoiceRepository,
    expenses: ExpenseRepository,
    withdrawals: WithdrawalRepository,
    orders: OrderRepository,
    summaries: SummaryRepository,
    tz: Tz,
    policy: VatPolicy,
}

impl ReportingQueries {
    /// Creates report queries bucketing in `tz`.
    #[must_use]
    pub fn new(db: DatabaseConnection, tz: Tz, policy: VatPolicy) -> Self {
        Self {
            invoices: InvoiceRepository::new(db.clone()),
            expenses: ExpenseRepository::new(db.clone()),
            withdrawals: WithdrawalRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            summaries: SummaryRepository::new(db),
            tz,
            policy,
        }
    }

    /// Year totals and the twelve-month series.
    pub async fn dashboard(
        &self,
        year: i32,
        source: OfframpSource,
    ) -> Result<Dashboard, RepositoryError> {
        let period = self.period(year)?;
        let invoices = self.invoices_in(&period).await?;

        let dashboard = match source {
            OfframpSource::Orders => {
                let orders = self
                    .orders
                    .list_effective_between(period.start(), period.end())
                    .await?;
                ReportService::dashboard(&period, &invoices, &orders)
            }
            OfframpSource::Withdrawals => {
                let withdrawals = self
                    .withdrawals
                    .list_between(period.start(), period.end())
                    .await?;
                ReportService::dashboard(&period, &invoices, &withdrawals)
            }
        };
        Ok(dashboard)
    }

    /// Invoices of the year grouped by month, newest month first.
    pub async fn invoice_months(&self, year: i32) -> Result<Vec<InvoiceMonthGroup>, RepositoryError> {
        let period = self.period(year)?;
        let invoices = self.invoices_in(&period).await?;
        Ok(ReportService::invoice_months(&period, &invoices))
    }

    /// Tax and profit/loss report for the year.
    pub async fn tax_report(&self, year: i32) -> Result<TaxReport, RepositoryError> {
        let period = self.period(year)?;
        let invoices = self.invoices_in(&period).await?;
        let expenses = self
            .expenses
            .list_between(period.start(), period.end())
            .await?;
        let withdrawals = self
            .withdrawals
            .list_between(period.start(), period.end())
            .await?;

        Ok(ReportService::tax_report(
            &period,
            &invoices,
            &expenses,
            &withdrawals,
            self.policy,
        ))
    }

    /// Recomputes the persisted snapshot of one year and stores it.
    pub async fn refresh_summaries(&self, year: i32) -> Result<YearlySummary, RepositoryError> {
        let period = self.period(year)?;
        let invoices = self.invoices_in(&period).await?;
        let expenses = self
            .expenses
            .list_between(period.start(), period.end())
            .await?;
        let withdrawals = self
            .withdrawals
            .list_between(period.start(), period.end())
            .await?;

        let yearly = ReportService::ledger_summary(&period, &invoices, &expenses, &withdrawals);
        self.summaries.replace_year(&yearly).await?;
        Ok(yearly)
    }

    fn period(&self, year: i32) -> Result<ReportingYear, RepositoryError> {
        ReportingYear::new(year, self.tz).ok_or(RepositoryError::InvalidYear(year))
    }

    async fn invoices_in(&self, period: &ReportingYear) -> Result<Vec<Invoice>, RepositoryError> {
        self.invoices
            .list_between(period.start(), period.end())
            .await
    }
}
