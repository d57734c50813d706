use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::rounding::{quantize, MONEY_PLACES, UNIT_PRICE_PLACES};

/// Fallback home currency when the supplier does not name one.
pub const DEFAULT_LOCAL_CURRENCY: &str = "RON";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MalformedPrice;

/// A price per unit as written in the data file, e.g. `10.50 EUR`.
#[derive(Debug, PartialEq, Clone)]
pub struct Price {
    pub amount: Decimal,
    pub currency: String,
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

impl FromStr for Price {
    type Err = MalformedPrice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, currency) = s.split_once(' ').ok_or(MalformedPrice)?;
        if !is_currency_code(currency) {
            return Err(MalformedPrice);
        }
        let amount = Decimal::from_str(amount).map_err(|_| MalformedPrice)?;
        Ok(Self {
            amount,
            currency: currency.to_string(),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Amounts payable on one invoice.
#[derive(Debug, PartialEq, Clone)]
pub struct Valuation {
    /// Price per unit in the settlement currency.
    pub unit_price: Decimal,
    /// Invoice total in the settlement currency.
    pub total: Decimal,
    pub total_local: Decimal,
}

impl Valuation {
    /// `rate` converts one unit of the price currency into local currency.
    ///
    /// A local client is billed in local currency: the unit price is
    /// converted first and stored rounded to 2 then to 4 places. A foreign
    /// client is billed in the price currency and only the total is
    /// converted. `None` when an amount does not fit a `Decimal`.
    pub fn new(price: &Price, quantity: Decimal, rate: Decimal, local: bool) -> Option<Self> {
        if local {
            let unit_price = quantize(
                quantize(price.amount.checked_mul(rate)?, MONEY_PLACES),
                UNIT_PRICE_PLACES,
            );
            let total = quantize(unit_price.checked_mul(quantity)?, MONEY_PLACES);
            Some(Self {
                unit_price,
                total,
                total_local: total,
            })
        } else {
            let total = quantize(price.amount.checked_mul(quantity)?, MONEY_PLACES);
            Some(Self {
                unit_price: price.amount,
                total,
                total_local: quantize(total.checked_mul(rate)?, MONEY_PLACES),
            })
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Unit price: {}", self.unit_price)?;
        writeln!(f, "Total: {}", self.total)?;
        write!(f, "Total (local): {}", self.total_local)
    }
}
