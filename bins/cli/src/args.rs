//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use onchaincounting_core::currency::{
    BlockchainNetwork, CryptoCurrency, Currency, ExpenseCurrency,
};
use onchaincounting_core::expense::ExpenseCategory;
use onchaincounting_core::invoice::CryptoPayment;
use onchaincounting_core::order::{Direction, Rail};
use onchaincounting_core::withdrawal::WithdrawalStatus;
use onchaincounting_db::OfframpSource;
use onchaincounting_shared::types::{ExpenseId, InvoiceId, WithdrawalId};

/// Bookkeeping for crypto-settled invoices.
#[derive(Parser, Debug)]
#[command(name = "onchaincounting", version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Year totals and the monthly series
    Dashboard {
        /// Calendar year
        #[arg(long)]
        year: i32,
        /// Records counted as off-ramps
        #[arg(long, value_enum, default_value_t = OfframpArg::Orders)]
        offramps: OfframpArg,
    },
    /// Tax and profit/loss report
    Report {
        /// Calendar year
        #[arg(long)]
        year: i32,
    },
    /// Manage invoices
    #[command(subcommand)]
    Invoices(InvoiceCommand),
    /// Manage expenses
    #[command(subcommand)]
    Expenses(ExpenseCommand),
    /// Manage withdrawals
    #[command(subcommand)]
    Withdrawals(WithdrawalCommand),
    /// Payment institution order mirror
    #[command(subcommand)]
    Orders(OrderCommand),
    /// Persisted summary snapshots
    #[command(subcommand)]
    Summaries(SummaryCommand),
    /// Write every collection to a JSON backup
    Export {
        /// Output file (default: dated file name in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Restore a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
        /// Upsert by key instead of replacing everything
        #[arg(long)]
        merge: bool,
    },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OfframpArg {
    /// Redeem orders from the mirror
    #[default]
    Orders,
    /// Recorded withdrawals
    Withdrawals,
}

impl From<OfframpArg> for OfframpSource {
    fn from(arg: OfframpArg) -> Self {
        match arg {
            OfframpArg::Orders => Self::Orders,
            OfframpArg::Withdrawals => Self::Withdrawals,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum InvoiceCommand {
    /// List invoices, grouped by month when a year is given
    List {
        /// Calendar year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Record an invoice
    Add(InvoiceArgs),
    /// Edit an invoice; omitted fields keep their value
    Update {
        /// Invoice ID
        id: InvoiceId,
        #[command(flatten)]
        fields: InvoiceArgs,
    },
    /// Delete an invoice
    Delete {
        /// Invoice ID
        id: InvoiceId,
    },
    /// Show the fields recognized in an invoice's text
    Extract {
        /// Text file
        file: PathBuf,
    },
}

/// Invoice fields. Explicit flags win over values read with `--from-text`.
#[derive(Args, Debug)]
pub struct InvoiceArgs {
    /// Prefill from the text of an invoice document
    #[arg(long)]
    pub from_text: Option<PathBuf>,
    /// Invoice number
    #[arg(long)]
    pub number: Option<String>,
    /// Client name
    #[arg(long)]
    pub client: Option<String>,
    /// Issue date (YYYY-MM-DD, reporting time zone)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Invoice currency (USD, CHF)
    #[arg(long)]
    pub currency: Option<Currency>,
    /// Total after tax
    #[arg(long)]
    pub after_tax: Option<f64>,
    /// Total before tax
    #[arg(long)]
    pub before_tax: Option<f64>,
    /// EUR/CUR quote
    #[arg(long)]
    pub rate: Option<f64>,
    /// VAT rate in percent
    #[arg(long)]
    pub vat: Option<f64>,
    /// Settlement as AMOUNT:TOKEN:NETWORK, e.g. 120:USDC:starknet (repeatable)
    #[arg(long = "payment", value_parser = parse_payment)]
    pub payments: Vec<CryptoPayment>,
    /// Path of the invoice PDF
    #[arg(long)]
    pub pdf: Option<String>,
    /// Notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    /// List expenses
    List {
        /// Calendar year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Record an expense
    Add(ExpenseArgs),
    /// Replace an expense
    Update {
        /// Expense ID
        id: ExpenseId,
        #[command(flatten)]
        fields: ExpenseArgs,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    /// Payment date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Category
    #[arg(long)]
    pub category: ExpenseCategory,
    /// What was paid for
    #[arg(long)]
    pub description: String,
    /// Amount
    #[arg(long)]
    pub amount: f64,
    /// Currency (USD, EUR)
    #[arg(long)]
    pub currency: ExpenseCurrency,
    /// Input VAT can be deducted
    #[arg(long)]
    pub vat_deductible: bool,
    /// Path of the receipt
    #[arg(long)]
    pub receipt: Option<String>,
    /// Notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum WithdrawalCommand {
    /// List withdrawals
    List {
        /// Calendar year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Record a withdrawal
    Add(WithdrawalArgs),
    /// Replace a withdrawal
    Update {
        /// Withdrawal ID
        id: WithdrawalId,
        #[command(flatten)]
        fields: WithdrawalArgs,
    },
    /// Delete a withdrawal
    Delete {
        /// Withdrawal ID
        id: WithdrawalId,
    },
}

#[derive(Args, Debug)]
pub struct WithdrawalArgs {
    /// Execution date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Token amount sent
    #[arg(long)]
    pub source_amount: f64,
    /// Token sent (USDC, STRK, EURe)
    #[arg(long)]
    pub source_currency: CryptoCurrency,
    /// Network (starknet, gnosis)
    #[arg(long)]
    pub network: BlockchainNetwork,
    /// EUR received
    #[arg(long)]
    pub target_amount: f64,
    /// Applied rate (default: target / source)
    #[arg(long)]
    pub rate: Option<f64>,
    /// Transaction hash
    #[arg(long)]
    pub tx_hash: Option<String>,
    /// Status
    #[arg(long, default_value_t = WithdrawalStatus::Completed)]
    pub status: WithdrawalStatus,
    /// Payment institution reference
    #[arg(long)]
    pub reference: Option<String>,
    /// Notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Refresh the mirror from a saved institution response
    Sync {
        /// JSON file with `orders` and `balances`
        #[arg(long)]
        source: PathBuf,
    },
    /// List mirrored orders by year and month
    List {
        /// all, incoming or outgoing (default: outgoing)
        #[arg(long)]
        direction: Option<Direction>,
        /// all, iban or onchain (default: iban)
        #[arg(long)]
        rail: Option<Rail>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SummaryCommand {
    /// Recompute and store the snapshot of a year
    Refresh {
        /// Calendar year
        #[arg(long)]
        year: i32,
    },
    /// Show the stored snapshot of a year
    Show {
        /// Calendar year
        #[arg(long)]
        year: i32,
    },
}

fn parse_payment(value: &str) -> Result<CryptoPayment, String> {
    let mut parts = value.split(':');
    let (Some(amount), Some(currency), Some(network), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected AMOUNT:TOKEN:NETWORK, got '{value}'"));
    };

    Ok(CryptoPayment {
        amount: amount
            .trim()
            .parse()
            .map_err(|e| format!("invalid amount '{amount}': {e}"))?,
        currency: currency.trim().parse().map_err(|e| format!("{e}"))?,
        network: network.trim().parse().map_err(|e| format!("{e}"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_payment_argument() {
        let payment = parse_payment("120.5:usdc:Starknet").unwrap();
        assert!((payment.amount - 120.5).abs() < f64::EPSILON);
        assert_eq!(payment.currency, CryptoCurrency::Usdc);
        assert_eq!(payment.network, BlockchainNetwork::Starknet);

        assert!(parse_payment("120:USDC").is_err());
        assert!(parse_payment("lots:USDC:gnosis").is_err());
        assert!(parse_payment("1:DOGE:gnosis").is_err());
    }

    #[test]
    fn test_dashboard_defaults_to_order_offramps() {
        let cli = Cli::try_parse_from(["onchaincounting", "dashboard", "--year", "2024"]).unwrap();
        let Command::Dashboard { year, offramps } = cli.command else {
            panic!("expected dashboard");
        };
        assert_eq!(year, 2024);
        assert_eq!(OfframpSource::from(offramps), OfframpSource::Orders);
    }

    #[test]
    fn test_invoice_add_parses_typed_fields() {
        let cli = Cli::try_parse_from([
            "onchaincounting",
            "invoices",
            "add",
            "--number",
            "OD-1",
            "--date",
            "2024-06-15",
            "--currency",
            "chf",
            "--payment",
            "100:EURe:gnosis",
            "--payment",
            "8:USDC:starknet",
        ])
        .unwrap();
        let Command::Invoices(InvoiceCommand::Add(args)) = cli.command else {
            panic!("expected invoices add");
        };
        assert_eq!(args.currency, Some(Currency::Chf));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(args.payments.len(), 2);
        assert_eq!(args.payments[0].currency, CryptoCurrency::Eure);
    }

    #[test]
    fn test_import_merge_flag() {
        let cli = Cli::try_parse_from(["onchaincounting", "import", "backup.json", "--merge"])
            .unwrap();
        assert!(matches!(cli.command, Command::Import { merge: true, .. }));
    }

    #[test]
    fn test_unknown_withdrawal_status_is_rejected() {
        let result = Cli::try_parse_from([
            "onchaincounting",
            "withdrawals",
            "add",
            "--date",
            "2024-01-01",
            "--source-amount",
            "10",
            "--source-currency",
            "USDC",
            "--network",
            "gnosis",
            "--target-amount",
            "9",
            "--status",
            "lost",
        ]);
        assert!(result.is_err());
    }
}
