//! Attribute lookup with fallback along the invoice → contract → client
//! chain.
//!
//! Every level of the chain carries the same optional-field record,
//! [`Attributes`]. A lookup takes the first level that sets the field and
//! falls back to the field's own default when none does.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use strum_macros::{Display, EnumString, VariantNames};

use crate::scalar;

#[derive(
    Display,
    EnumString,
    VariantNames,
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Number,
    Date,
    DueDays,
    Quantity,
    ExchangeRate,
    PricePerUnit,
    Account,
    Product,
    Unit,
    Local,
    Accounts,
    Name,
    Details,
    VatNumber,
    Address,
    Delegate,
    Bank,
}

static NO_RATES: BTreeMap<String, Decimal> = BTreeMap::new();
static NO_ACCOUNTS: BTreeMap<String, String> = BTreeMap::new();

impl Field {
    /// What a lookup yields when no level of the chain sets the field.
    pub fn default_value(self) -> Value<'static> {
        match self {
            Field::Local => Value::Flag(false),
            Field::Accounts => Value::Accounts(&NO_ACCOUNTS),
            Field::ExchangeRate => Value::Rates(&NO_RATES),
            Field::Details
            | Field::VatNumber
            | Field::Address
            | Field::Delegate
            | Field::Bank => Value::Text(""),
            Field::Number
            | Field::Date
            | Field::DueDays
            | Field::Quantity
            | Field::PricePerUnit
            | Field::Account
            | Field::Product
            | Field::Unit
            | Field::Name => Value::Unset,
        }
    }
}

/// A resolved field. `Unset` is a legitimate outcome, not an error.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Value<'a> {
    Unset,
    Text(&'a str),
    Date(NaiveDate),
    Days(i64),
    Decimal(Decimal),
    Flag(bool),
    Rates(&'a BTreeMap<String, Decimal>),
    Accounts(&'a BTreeMap<String, String>),
}

impl<'a> Value<'a> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn text(self) -> Option<&'a str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn days(self) -> Option<i64> {
        match self {
            Value::Days(days) => Some(days),
            _ => None,
        }
    }

    pub fn decimal(self) -> Option<Decimal> {
        match self {
            Value::Decimal(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn flag(self) -> Option<bool> {
        match self {
            Value::Flag(flag) => Some(flag),
            _ => None,
        }
    }

    pub fn rates(self) -> Option<&'a BTreeMap<String, Decimal>> {
        match self {
            Value::Rates(rates) => Some(rates),
            _ => None,
        }
    }

    pub fn accounts(self) -> Option<&'a BTreeMap<String, String>> {
        match self {
            Value::Accounts(accounts) => Some(accounts),
            _ => None,
        }
    }
}

/// Explicitly set fields of one entity, exactly as written in the data file.
#[derive(Deserialize, Debug, Default, PartialEq, Clone)]
pub struct Attributes {
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub number: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub due_days: Option<i64>,
    #[serde(default, deserialize_with = "scalar::opt_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "scalar::opt_rates")]
    pub exchange_rate: Option<BTreeMap<String, Decimal>>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub price_per_unit: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub account: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub unit: Option<String>,
    #[serde(default)]
    pub local: Option<bool>,
    #[serde(default, deserialize_with = "scalar::opt_accounts")]
    pub accounts: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub vat_number: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub delegate: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    pub bank: Option<String>,
}

impl Attributes {
    /// The field as set on this level alone, `Unset` when absent.
    pub fn get(&self, field: Field) -> Value<'_> {
        fn text(value: &Option<String>) -> Value<'_> {
            value.as_deref().map_or(Value::Unset, Value::Text)
        }

        match field {
            Field::Number => text(&self.number),
            Field::Date => self.date.map_or(Value::Unset, Value::Date),
            Field::DueDays => self.due_days.map_or(Value::Unset, Value::Days),
            Field::Quantity => self.quantity.map_or(Value::Unset, Value::Decimal),
            Field::ExchangeRate => {
                self.exchange_rate.as_ref().map_or(Value::Unset, Value::Rates)
            }
            Field::PricePerUnit => text(&self.price_per_unit),
            Field::Account => text(&self.account),
            Field::Product => text(&self.product),
            Field::Unit => text(&self.unit),
            Field::Local => self.local.map_or(Value::Unset, Value::Flag),
            Field::Accounts => {
                self.accounts.as_ref().map_or(Value::Unset, Value::Accounts)
            }
            Field::Name => text(&self.name),
            Field::Details => text(&self.details),
            Field::VatNumber => text(&self.vat_number),
            Field::Address => text(&self.address),
            Field::Delegate => text(&self.delegate),
            Field::Bank => text(&self.bank),
        }
    }
}

/// One level of the fallback chain.
pub trait Cascade {
    fn attributes(&self) -> &Attributes;

    fn parent(&self) -> Option<&dyn Cascade>;
}

/// Look `field` up on `entity`, then on each parent in turn, and finally
/// fall back to the field's default.
pub fn resolve<'a>(entity: &'a dyn Cascade, field: Field) -> Value<'a> {
    let mut level = Some(entity);
    while let Some(current) = level {
        let value = current.attributes().get(field);
        if !value.is_unset() {
            return value;
        }
        level = current.parent();
    }
    field.default_value()
}
