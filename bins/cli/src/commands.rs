//! Command handlers.

use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use onchaincounting_core::backup::{ImportMode, backup_file_name};
use onchaincounting_core::expense::ExpenseDraft;
use onchaincounting_core::extraction::extract_invoice_fields;
use onchaincounting_core::fiscal::{ReportingYear, local_midnight};
use onchaincounting_core::invoice::InvoiceDraft;
use onchaincounting_core::order::{OrderFilter, group_by_period};
use onchaincounting_core::reports::VatPolicy;
use onchaincounting_core::withdrawal::WithdrawalDraft;
use onchaincounting_db::{
    BackupRepository, ExpenseRepository, InvoiceRepository, MirrorService, MirrorView,
    OrderRepository, ReportingQueries, SummaryRepository, WithdrawalRepository,
};
use onchaincounting_shared::AppError;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::args::{
    Command, ExpenseArgs, ExpenseCommand, InvoiceArgs, InvoiceCommand, OrderCommand,
    SummaryCommand, WithdrawalArgs, WithdrawalCommand,
};
use crate::render;
use crate::source::JsonFileSource;

/// Everything a command needs.
pub struct AppContext {
    pub db: DatabaseConnection,
    pub tz: Tz,
    pub policy: VatPolicy,
}

impl AppContext {
    fn reporting(&self) -> ReportingQueries {
        ReportingQueries::new(self.db.clone(), self.tz, self.policy)
    }

    fn date(&self, date: NaiveDate) -> anyhow::Result<DateTime<Utc>> {
        local_midnight(date, self.tz)
            .ok_or_else(|| anyhow!("{date} has no midnight in {}", self.tz))
    }

    fn year(&self, year: i32) -> anyhow::Result<ReportingYear> {
        ReportingYear::new(year, self.tz)
            .ok_or_else(|| AppError::Validation(format!("Invalid reporting year: {year}")).into())
    }
}

pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dashboard { year, offramps } => {
            let dashboard = ctx
                .reporting()
                .dashboard(year, offramps.into())
                .await
                .map_err(AppError::from)?;
            render::dashboard(&dashboard);
        }
        Command::Report { year } => {
            let report = ctx
                .reporting()
                .tax_report(year)
                .await
                .map_err(AppError::from)?;
            render::tax_report(&report);
        }
        Command::Invoices(command) => invoices(ctx, command).await?,
        Command::Expenses(command) => expenses(ctx, command).await?,
        Command::Withdrawals(command) => withdrawals(ctx, command).await?,
        Command::Orders(command) => orders(ctx, command).await?,
        Command::Summaries(command) => summaries(ctx, command).await?,
        Command::Export { out } => {
            let document = BackupRepository::new(ctx.db.clone())
                .export()
                .await
                .map_err(AppError::from)?;
            let text = document
                .to_json()
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let path = out.unwrap_or_else(|| {
                backup_file_name(Utc::now().with_timezone(&ctx.tz).date_naive()).into()
            });
            tokio::fs::write(&path, text)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "Exported {} records to {}",
                document.record_count(),
                path.display()
            );
        }
        Command::Import { file, merge } => {
            let mode = if merge {
                ImportMode::Merge
            } else {
                ImportMode::Replace
            };
            let text = tokio::fs::read_to_string(&file)
                .await
                .map_err(|_| AppError::Import(mode.failure_message().to_string()))?;
            let count = BackupRepository::new(ctx.db.clone())
                .import_json(&text, mode)
                .await
                .map_err(AppError::from)?;
            println!("Imported {count} records from {}", file.display());
        }
    }
    Ok(())
}

async fn invoices(ctx: &AppContext, command: InvoiceCommand) -> anyhow::Result<()> {
    let repo = InvoiceRepository::new(ctx.db.clone());
    match command {
        InvoiceCommand::List { year: Some(year) } => {
            let groups = ctx
                .reporting()
                .invoice_months(year)
                .await
                .map_err(AppError::from)?;
            render::invoice_months(&groups, ctx.tz);
        }
        InvoiceCommand::List { year: None } => {
            let invoices = repo.list_all().await.map_err(AppError::from)?;
            render::invoices(&invoices, ctx.tz);
        }
        InvoiceCommand::Add(fields) => {
            let mut draft = InvoiceDraft::default();
            apply_invoice_args(ctx, &mut draft, fields).await?;
            let invoice = repo.create(draft).await.map_err(AppError::from)?;
            println!("Created invoice {}", invoice.id);
        }
        InvoiceCommand::Update { id, fields } => {
            let existing = repo
                .find_by_id(id)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::NotFound(format!("invoice not found: {id}")))?;
            let mut draft = InvoiceDraft::from_invoice(&existing);
            apply_invoice_args(ctx, &mut draft, fields).await?;
            repo.update(id, draft).await.map_err(AppError::from)?;
            println!("Updated invoice {id}");
        }
        InvoiceCommand::Delete { id } => {
            repo.delete(id).await.map_err(AppError::from)?;
            println!("Deleted invoice {id}");
        }
        InvoiceCommand::Extract { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let extracted = extract_invoice_fields(&text);
            println!("{}", serde_json::to_string_pretty(&extracted)?);
        }
    }
    Ok(())
}

/// Prefills from document text, then applies explicit flags on top.
async fn apply_invoice_args(
    ctx: &AppContext,
    draft: &mut InvoiceDraft,
    fields: InvoiceArgs,
) -> anyhow::Result<()> {
    if let Some(path) = &fields.from_text {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => draft.prefill(&extract_invoice_fields(&text), ctx.tz),
            // Extraction never blocks manual entry.
            Err(e) => warn!(path = %path.display(), error = %e, "Could not read invoice text"),
        }
    }

    if let Some(number) = fields.number {
        draft.invoice_number = number;
    }
    if let Some(client) = fields.client {
        draft.client_name = client;
    }
    if let Some(date) = fields.date {
        draft.date = Some(ctx.date(date)?);
    }
    if fields.currency.is_some() {
        draft.currency = fields.currency;
    }
    if fields.after_tax.is_some() {
        draft.after_tax_amount = fields.after_tax;
    }
    if fields.before_tax.is_some() {
        draft.before_tax_amount = fields.before_tax;
    }
    if fields.rate.is_some() {
        draft.exchange_rate = fields.rate;
    }
    if fields.vat.is_some() {
        draft.vat_rate = fields.vat;
    }
    if !fields.payments.is_empty() {
        draft.crypto_payments = fields.payments;
    }
    if fields.pdf.is_some() {
        draft.pdf_path = fields.pdf;
    }
    if fields.notes.is_some() {
        draft.notes = fields.notes;
    }
    Ok(())
}

async fn expenses(ctx: &AppContext, command: ExpenseCommand) -> anyhow::Result<()> {
    let repo = ExpenseRepository::new(ctx.db.clone());
    match command {
        ExpenseCommand::List { year } => {
            let expenses = match year {
                Some(year) => {
                    let period = ctx.year(year)?;
                    repo.list_between(period.start(), period.end()).await
                }
                None => repo.list_all().await,
            }
            .map_err(AppError::from)?;
            render::expenses(&expenses, ctx.tz);
        }
        ExpenseCommand::Add(fields) => {
            let expense = repo
                .create(expense_draft(ctx, fields)?)
                .await
                .map_err(AppError::from)?;
            println!("Created expense {}", expense.id);
        }
        ExpenseCommand::Update { id, fields } => {
            repo.update(id, expense_draft(ctx, fields)?)
                .await
                .map_err(AppError::from)?;
            println!("Updated expense {id}");
        }
        ExpenseCommand::Delete { id } => {
            repo.delete(id).await.map_err(AppError::from)?;
            println!("Deleted expense {id}");
        }
    }
    Ok(())
}

fn expense_draft(ctx: &AppContext, fields: ExpenseArgs) -> anyhow::Result<ExpenseDraft> {
    Ok(ExpenseDraft {
        date: ctx.date(fields.date)?,
        category: fields.category,
        description: fields.description,
        amount: fields.amount,
        currency: fields.currency,
        vat_deductible: fields.vat_deductible,
        receipt: fields.receipt,
        notes: fields.notes,
    })
}

async fn withdrawals(ctx: &AppContext, command: WithdrawalCommand) -> anyhow::Result<()> {
    let repo = WithdrawalRepository::new(ctx.db.clone());
    match command {
        WithdrawalCommand::List { year } => {
            let withdrawals = match year {
                Some(year) => {
                    let period = ctx.year(year)?;
                    repo.list_between(period.start(), period.end()).await
                }
                None => repo.list_all().await,
            }
            .map_err(AppError::from)?;
            render::withdrawals(&withdrawals, ctx.tz);
        }
        WithdrawalCommand::Add(fields) => {
            let withdrawal = repo
                .create(withdrawal_draft(ctx, fields)?)
                .await
                .map_err(AppError::from)?;
            println!("Created withdrawal {}", withdrawal.id);
        }
        WithdrawalCommand::Update { id, fields } => {
            repo.update(id, withdrawal_draft(ctx, fields)?)
                .await
                .map_err(AppError::from)?;
            println!("Updated withdrawal {id}");
        }
        WithdrawalCommand::Delete { id } => {
            repo.delete(id).await.map_err(AppError::from)?;
            println!("Deleted withdrawal {id}");
        }
    }
    Ok(())
}

fn withdrawal_draft(ctx: &AppContext, fields: WithdrawalArgs) -> anyhow::Result<WithdrawalDraft> {
    Ok(WithdrawalDraft {
        date: ctx.date(fields.date)?,
        source_amount: fields.source_amount,
        source_currency: fields.source_currency,
        source_network: fields.network,
        target_amount: fields.target_amount,
        exchange_rate: fields
            .rate
            .unwrap_or(fields.target_amount / fields.source_amount),
        transaction_hash: fields.tx_hash,
        status: fields.status,
        external_reference: fields.reference,
        notes: fields.notes,
    })
}

async fn orders(ctx: &AppContext, command: OrderCommand) -> anyhow::Result<()> {
    match command {
        OrderCommand::Sync { source } => {
            let mirror = MirrorService::new(JsonFileSource::new(source), ctx.db.clone());
            match mirror.refresh().await.map_err(AppError::from)? {
                MirrorView::Live {
                    orders,
                    balances,
                    last_synced,
                } => {
                    println!(
                        "Synced {} orders at {}",
                        orders.len(),
                        last_synced.to_rfc3339()
                    );
                    println!("Balances");
                    render::balances(&balances);
                }
                MirrorView::Offline {
                    orders,
                    last_synced,
                    error,
                } => {
                    println!("Offline: {error}");
                    if error.is_retryable() {
                        println!("Run the sync again to retry.");
                    }
                    match last_synced {
                        Some(at) => println!("Showing orders mirrored at {}", at.to_rfc3339()),
                        None => println!("Showing mirrored orders"),
                    }
                    let groups = group_by_period(&orders, OrderFilter::default(), ctx.tz);
                    render::order_groups(&groups, ctx.tz);
                }
            }
        }
        OrderCommand::List { direction, rail } => {
            let repo = OrderRepository::new(ctx.db.clone());
            let defaults = OrderFilter::default();
            let filter = OrderFilter {
                direction: direction.unwrap_or(defaults.direction),
                rail: rail.unwrap_or(defaults.rail),
            };
            render::sync_status(&repo.sync_status().await.map_err(AppError::from)?);
            let orders = repo.list_all().await.map_err(AppError::from)?;
            render::order_groups(&group_by_period(&orders, filter, ctx.tz), ctx.tz);
        }
    }
    Ok(())
}

async fn summaries(ctx: &AppContext, command: SummaryCommand) -> anyhow::Result<()> {
    match command {
        SummaryCommand::Refresh { year } => {
            let summary = ctx
                .reporting()
                .refresh_summaries(year)
                .await
                .map_err(AppError::from)?;
            render::yearly_summary(&summary);
        }
        SummaryCommand::Show { year } => {
            let summary = SummaryRepository::new(ctx.db.clone())
                .find_year(year)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::NotFound(format!("no summary stored for {year}")))?;
            render::yearly_summary(&summary);
        }
    }
    Ok(())
}
