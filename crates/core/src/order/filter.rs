//! Order list filtering and calendar grouping.

use chrono::Datelike;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::types::Order;

text_enum! {
    /// Direction selector.
    pub enum Direction {
        /// Both directions.
        All => "all",
        /// Issue orders only.
        Incoming => "incoming",
        /// Redeem orders only.
        Outgoing => "outgoing",
    }
}

text_enum! {
    /// Payment rail selector.
    pub enum Rail {
        /// Any counterpart.
        All => "all",
        /// Bank accounts only.
        Iban => "iban",
        /// On-chain addresses only.
        Onchain => "onchain",
    }
}

/// Orders view filter. Defaults to outgoing bank payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Direction selector.
    pub direction: Direction,
    /// Payment rail selector.
    pub rail: Rail,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            direction: Direction::Outgoing,
            rail: Rail::Iban,
        }
    }
}

impl OrderFilter {
    /// Returns true when `order` passes both selectors.
    #[must_use]
    pub const fn matches(&self, order: &Order) -> bool {
        let incoming = order.is_incoming();
        let iban = order.counterpart.is_iban();

        let direction = match self.direction {
            Direction::All => true,
            Direction::Incoming => incoming,
            Direction::Outgoing => !incoming,
        };
        let rail = match self.rail {
            Rail::All => true,
            Rail::Iban => iban,
            Rail::Onchain => !iban,
        };

        direction && rail
    }
}

/// Orders of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMonthGroup {
    /// Month index, 0-11.
    pub month: u32,
    /// Orders, newest first.
    pub orders: Vec<Order>,
}

/// Orders of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderYearGroup {
    /// Calendar year.
    pub year: i32,
    /// Non-empty months, newest first.
    pub months: Vec<OrderMonthGroup>,
}

/// Filters orders and groups them by the year and month of their effective
/// date in `tz`. Years, months and orders are all sorted newest first.
#[must_use]
pub fn group_by_period(orders: &[Order], filter: OrderFilter, tz: Tz) -> Vec<OrderYearGroup> {
    let mut matching: Vec<&Order> = orders.iter().filter(|o| filter.matches(o)).collect();
    matching.sort_by(|a, b| b.effective_at().cmp(&a.effective_at()));

    let mut years: Vec<OrderYearGroup> = Vec::new();
    for order in matching {
        let local = order.effective_at().with_timezone(&tz);
        let (year, month) = (local.year(), local.month0());

        if years.last().is_none_or(|g| g.year != year) {
            years.push(OrderYearGroup {
                year,
                months: Vec::new(),
            });
        }
        let Some(year_group) = years.last_mut() else {
            continue;
        };

        if year_group.months.last().is_none_or(|m| m.month != month) {
            year_group.months.push(OrderMonthGroup {
                month,
                orders: Vec::new(),
            });
        }
        if let Some(month_group) = year_group.months.last_mut() {
            month_group.orders.push(order.clone());
        }
    }
    years
}
