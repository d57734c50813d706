use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::billing::{Price, Valuation, DEFAULT_LOCAL_CURRENCY};
use crate::cascade::{resolve, Attributes, Cascade, Field, Value};
use crate::error::ModelError;

/// Contact and legal details of a supplier or client, resolved for display.
#[derive(Debug, PartialEq, Clone)]
pub struct Party<'a> {
    pub name: Option<&'a str>,
    pub details: &'a str,
    pub vat_number: &'a str,
    pub address: &'a str,
    pub delegate: &'a str,
    pub bank: &'a str,
}

impl<'a> Party<'a> {
    fn of(entity: &'a dyn Cascade) -> Self {
        let text = |field| resolve(entity, field).text().unwrap_or("");
        Self {
            name: resolve(entity, Field::Name).text(),
            details: text(Field::Details),
            vat_number: text(Field::VatNumber),
            address: text(Field::Address),
            delegate: text(Field::Delegate),
            bank: text(Field::Bank),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Supplier {
    attributes: Attributes,
    invoice_number_format: String,
    local_currency: String,
}

impl Supplier {
    pub fn new(
        attributes: Attributes,
        invoice_number_format: Option<String>,
        local_currency: Option<String>,
    ) -> Self {
        Self {
            attributes,
            invoice_number_format: invoice_number_format
                .unwrap_or_else(|| "{}".to_string()),
            local_currency: local_currency
                .unwrap_or_else(|| DEFAULT_LOCAL_CURRENCY.to_string()),
        }
    }

    pub fn party(&self) -> Party<'_> {
        Party::of(self)
    }

    pub fn local_currency(&self) -> &str {
        &self.local_currency
    }

    pub fn account_for(&self, currency: &str) -> Option<&str> {
        resolve(self, Field::Accounts)
            .accounts()
            .and_then(|accounts| accounts.get(currency))
            .map(String::as_str)
    }

    /// Fill the first `{}` of the numbering template with `number`.
    /// `{:0N}` pads the number with zeros to `N` digits.
    pub fn format_invoice_number(&self, number: &str) -> String {
        let template = self.invoice_number_format.as_str();
        let (open, close) = match (template.find('{'), template.find('}')) {
            (Some(open), Some(close)) if open < close => (open, close),
            _ => return template.to_string(),
        };
        let width = template[open + 1..close]
            .strip_prefix(":0")
            .and_then(|w| w.trim_end_matches('d').parse::<usize>().ok());
        let formatted = match width {
            Some(width) => format!("{:0>width$}", number),
            None => number.to_string(),
        };
        format!("{}{}{}", &template[..open], formatted, &template[close + 1..])
    }
}

impl Cascade for Supplier {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn parent(&self) -> Option<&dyn Cascade> {
        None
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Client {
    pub code: String,
    attributes: Attributes,
}

impl Client {
    pub fn new(code: &str, attributes: Attributes) -> Self {
        Self {
            code: code.to_string(),
            attributes,
        }
    }

    pub fn party(&self) -> Party<'_> {
        Party::of(self)
    }
}

impl Cascade for Client {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn parent(&self) -> Option<&dyn Cascade> {
        None
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.party().name {
            Some(name) => write!(f, "{} ({})", self.code, name),
            None => write!(f, "{}", self.code),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Contract {
    pub code: String,
    client: Arc<Client>,
    attributes: Attributes,
}

impl Contract {
    pub fn new(code: &str, client: Arc<Client>, attributes: Attributes) -> Self {
        Self {
            code: code.to_string(),
            client,
            attributes,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Cascade for Contract {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn parent(&self) -> Option<&dyn Cascade> {
        Some(&*self.client)
    }
}

/// Invoice level of the chain while the invoice itself is being built.
struct Entry<'a> {
    attributes: &'a Attributes,
    contract: &'a Contract,
}

impl Cascade for Entry<'_> {
    fn attributes(&self) -> &Attributes {
        self.attributes
    }

    fn parent(&self) -> Option<&dyn Cascade> {
        Some(self.contract)
    }
}

impl Entry<'_> {
    fn require<'s, T>(
        &'s self,
        invoice: &str,
        field: Field,
        pick: impl FnOnce(Value<'s>) -> Option<T>,
    ) -> Result<T, ModelError> {
        pick(resolve(self, field)).ok_or_else(|| ModelError::Unresolved {
            invoice: invoice.to_string(),
            field,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Invoice {
    /// Identity key, `{date}-{number}` with the raw number.
    pub code: String,
    /// Number as printed, formatted with the supplier's template.
    pub number: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub product: Option<String>,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub price: Price,
    pub exchange_rate: BTreeMap<String, Decimal>,
    pub local: bool,
    pub payment_currency: String,
    pub account: String,
    pub valuation: Valuation,
    contract: Arc<Contract>,
    attributes: Attributes,
}

impl Invoice {
    /// Resolve every field through the contract and client and value the
    /// invoice. `position` is the 1-based place in the data file, used to
    /// name the invoice until its date and number are known.
    pub fn new(
        position: usize,
        attributes: Attributes,
        supplier: &Supplier,
        contract: Arc<Contract>,
    ) -> Result<Self, ModelError> {
        let entry = Entry {
            attributes: &attributes,
            contract: &contract,
        };

        let label = format!("#{} under contract {}", position, contract.code);
        let date = entry.require(&label, Field::Date, Value::date)?;
        let raw_number = entry.require(&label, Field::Number, Value::text)?;
        let code = format!("{}-{}", date, raw_number);

        let days = entry.require(&code, Field::DueDays, Value::days)?;
        let offset = Days::new(days.unsigned_abs());
        let due_date = if days >= 0 {
            date.checked_add_days(offset)
        } else {
            date.checked_sub_days(offset)
        }
        .ok_or_else(|| ModelError::DueDate {
            invoice: code.clone(),
            date,
            days,
        })?;

        let quantity = entry.require(&code, Field::Quantity, Value::decimal)?;
        let price_text = entry.require(&code, Field::PricePerUnit, Value::text)?;
        let price: Price = price_text.parse().map_err(|_| ModelError::PriceFormat {
            invoice: code.clone(),
            price: price_text.to_string(),
        })?;

        let local = resolve(&entry, Field::Local).flag().unwrap_or(false);
        let exchange_rate = resolve(&entry, Field::ExchangeRate)
            .rates()
            .cloned()
            .unwrap_or_default();

        let local_currency = supplier.local_currency();
        let rate = if price.currency == local_currency {
            Decimal::ONE
        } else {
            exchange_rate.get(&price.currency).copied().ok_or_else(|| {
                ModelError::ExchangeRate {
                    invoice: code.clone(),
                    currency: price.currency.clone(),
                }
            })?
        };

        let payment_currency = if local {
            local_currency.to_string()
        } else {
            price.currency.clone()
        };

        let account = match resolve(&entry, Field::Account).text() {
            Some(account) if !account.is_empty() => account.to_string(),
            _ => supplier
                .account_for(&payment_currency)
                .ok_or_else(|| ModelError::NoAccount {
                    invoice: code.clone(),
                    currency: payment_currency.clone(),
                })?
                .to_string(),
        };

        let product = resolve(&entry, Field::Product).text().map(str::to_string);
        let unit = resolve(&entry, Field::Unit).text().map(str::to_string);
        let number = supplier.format_invoice_number(raw_number);
        let valuation = Valuation::new(&price, quantity, rate, local).ok_or_else(|| {
            ModelError::Overflow {
                invoice: code.clone(),
            }
        })?;

        Ok(Self {
            code,
            number,
            date,
            due_date,
            product,
            quantity,
            unit,
            price,
            exchange_rate,
            local,
            payment_currency,
            account,
            valuation,
            contract,
            attributes,
        })
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn client(&self) -> &Client {
        self.contract.client()
    }
}

impl Cascade for Invoice {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn parent(&self) -> Option<&dyn Cascade> {
        Some(&*self.contract)
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} #{} – {}", self.date, self.number, self.client().code)
    }
}

/// The whole entity graph of one data file. Read only once built.
#[derive(Debug, PartialEq, Clone)]
pub struct Model {
    supplier: Supplier,
    clients: BTreeMap<String, Arc<Client>>,
    contracts: BTreeMap<String, Arc<Contract>>,
    invoices: Vec<Invoice>,
}

impl Model {
    pub fn new(
        supplier: Supplier,
        clients: BTreeMap<String, Arc<Client>>,
        contracts: BTreeMap<String, Arc<Contract>>,
        invoices: Vec<Invoice>,
    ) -> Self {
        Self {
            supplier,
            clients,
            contracts,
            invoices,
        }
    }

    pub fn supplier(&self) -> &Supplier {
        &self.supplier
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values().map(Arc::as_ref)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values().map(Arc::as_ref)
    }

    /// Invoices in data file order.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoice(&self, code: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.code == code)
    }
}
