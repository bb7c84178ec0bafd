//! Per-field matchers. Each list is tried in order; the first usable match wins.

use chrono::{Month, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::currency::{Currency, invert_quote};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex pattern"))
        .collect()
}

/// Where the currency of an amount match comes from.
#[derive(Clone, Copy)]
enum CurrencySource {
    /// Capture group holding a three-letter code.
    Group(usize),
    /// Implied by the pattern.
    Fixed(Currency),
}

struct AmountMatcher {
    regex: Regex,
    amount_group: usize,
    currency: CurrencySource,
}

static TOTAL_AMOUNT: Lazy<Vec<AmountMatcher>> = Lazy::new(|| {
    let specs: [(&str, usize, CurrencySource); 5] = [
        (
            r"(?i)Total After Tax\s*([\d,]+\.?\d*)\s*([A-Z]{3})",
            1,
            CurrencySource::Group(2),
        ),
        (
            r"(?i)Total Amount\s*([A-Z]{3})\s*([\d,]+\.?\d*)",
            2,
            CurrencySource::Group(1),
        ),
        (
            r"(?i)Total Amount\s*([\d,]+\.?\d*)\s*([A-Z]{3})",
            1,
            CurrencySource::Group(2),
        ),
        (
            r"(?i)Total Amount\s*\$\s*([\d,]+\.?\d*)",
            1,
            CurrencySource::Fixed(Currency::Usd),
        ),
        (
            r"(?i)Total gross price\s*([\d\s,]+(?:\.\s?\d*)?)\s*([A-Z]{3})",
            1,
            CurrencySource::Group(2),
        ),
    ];
    specs
        .into_iter()
        .map(|(pattern, amount_group, currency)| AmountMatcher {
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
            amount_group,
            currency,
        })
        .collect()
});

static BEFORE_TAX: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)Total Before Tax\s*([\d,]+\.?\d*)",
        r"(?i)Total without Tax\s*(?:CHF)?\s*([\d,]+\.?\d*)",
        r"Total without Tax\s*\$\s*([\d\s,]+(?:\.\d+)?)",
        r"Total net price\s*([\d\s,]+(?:\.\d+)?)\s*USD",
    ])
});

static VAT_RATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)Total VAT\s*\((\d+(?:\.\d+)?)\s*%\)",
        r"(?i)VAT\s+(\d+)%",
    ])
});

static INVOICE_NUMBER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)INVOICE NO:\s*#([A-Z0-9-]+)",
        r"(?i)Invoice #(\d+)",
        r"(?i)Invoice No\.:\s*(\d+\s*\d+)",
    ])
});

/// EUR/CUR quotes, used as is.
static DIRECT_RATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r"(?i)EUR/USD[:\s]+([\d.]+)", r"(?i)EUR/CHF=([\d.]+)"])
});

/// CUR/EUR quotes, inverted.
static INVERSE_RATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)1\s*USD\s*=\s*([\d.]+)\s*EUR").expect("Invalid regex pattern"));

static ISSUE_DATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)Issue Date\s*([A-Za-z]+\s+\d{1,2},?\s+\d{4})",
        r"(?i)Date[:\s]+(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
        r"(?i)Invoice Date[:\s]+(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
        r"(?i)Issued on:\s*([A-Za-z]+\s+\d{1,2},?\s+\d{4})",
        r"(?i)Issue Date:\s*(\d{1,2}\s*\d?\s*/\s*\d{1,2}\s*\d?\s*/\s*\d{2,4}\s*\d?)",
    ])
});

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{2,4})$").expect("Invalid regex pattern")
});

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)(\d{1,2}),?(\d{4})$").expect("Invalid regex pattern")
});

static CLIENT_NAME: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)Billed to\s*([A-Za-z0-9\s]+)(?:\n|\d)",
        r"(?i)Bill To:?\s*([A-Za-z0-9\s.,]+)(?:\n|Invoice)",
        r"(?i)Client:?\s*([A-Za-z0-9\s.,]+)(?:\n|Invoice)",
        r"(?i)Billed to\s*(?:[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})\s*([A-Za-z0-9\s]+?(?:\s{2}|\n|$))",
        r"(?i)Buyer\s*([\w\s]+)(?:\n|\d)",
    ])
});

/// First capture group of the first matching pattern.
fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text)?.get(1))
        .map(|m| m.as_str())
}

/// Parses a printed amount, ignoring thousands separators and spaces.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse().ok()
}

pub(super) fn total_amount(text: &str) -> Option<(f64, Currency)> {
    TOTAL_AMOUNT.iter().find_map(|matcher| {
        let caps = matcher.regex.captures(text)?;
        let amount = parse_amount(caps.get(matcher.amount_group)?.as_str())?;
        let currency = match matcher.currency {
            CurrencySource::Fixed(currency) => currency,
            CurrencySource::Group(group) => caps.get(group)?.as_str().parse().ok()?,
        };
        Some((amount, currency))
    })
}

pub(super) fn before_tax_amount(text: &str) -> Option<f64> {
    first_capture(&BEFORE_TAX, text).and_then(parse_amount)
}

pub(super) fn vat_rate(text: &str) -> Option<f64> {
    first_capture(&VAT_RATE, text)?.parse().ok()
}

pub(super) fn invoice_number(text: &str) -> Option<String> {
    first_capture(&INVOICE_NUMBER, text).map(str::to_string)
}

pub(super) fn exchange_rate(text: &str) -> Option<f64> {
    if let Some(rate) = first_capture(&DIRECT_RATE, text) {
        return rate.parse().ok();
    }
    let quote: f64 = INVERSE_RATE.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(invert_quote(quote))
}

pub(super) fn issue_date(text: &str) -> Option<NaiveDate> {
    ISSUE_DATE.iter().find_map(|re| {
        let raw = re.captures(text)?.get(1)?.as_str();
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        parse_day_month_year(&compact).or_else(|| parse_month_day_year(&compact))
    })
}

fn parse_day_month_year(compact: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR.captures(compact)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year_digits = &caps[3];
    let mut year: i32 = year_digits.parse().ok()?;
    if year_digits.len() == 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_month_day_year(compact: &str) -> Option<NaiveDate> {
    let caps = MONTH_DAY_YEAR.captures(compact)?;
    let month: Month = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
}

pub(super) fn client_name(text: &str) -> Option<String> {
    CLIENT_NAME.iter().find_map(|re| {
        let name = re.captures(text)?.get(1)?.as_str().trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
