//! Data files shared by the tests.

use const_format::formatcp;

const SUPPLIER: &str = r#"supplier:
  name: Exemplu SRL
  invoice_number_format: "EX-{:04d}"
  details: "J40/1234/2010\nCapital social 200 RON"
  vat_number: RO1234567
  address: "Str. Lunga 1\nBucuresti"
  delegate: Ion Popescu
  bank: Banca Exemplu
  accounts:
    RON: RO49 AAAA 1B31 0075 9384 0000
    EUR: RO12 AAAA 1B31 0075 9384 0001
"#;

const CLIENTS: &str = r#"clients:
  local:
    name: Client Local SRL
    local: true
    unit: month
    vat_number: 7654321
    address: "Bd. Unirii 2\nBucuresti"
  foreign:
    name: Foreign GmbH
    vat_number: DE123456789
    address: "Hauptstrasse 3\nBerlin"
"#;

const CONTRACTS: &str = r#"contracts:
  foreign-dev:
    client: foreign
    due_days: 30
    unit: hour
    price_per_unit: 10.00 EUR
  local-dev:
    client: local
    due_days: 10
    unit: day
    price_per_unit: 10.00 EUR
  local-retainer:
    client: local
    due_days: 15
    price_per_unit: 1000.00 RON
"#;

const INVOICES: &str = r#"invoices:
  - contract: foreign-dev
    date: 2014-02-28
    number: 12
    product: Software development
    quantity: 3
    exchange_rate: {EUR: 4.97}
  - contract: local-dev
    date: 2014-01-31
    number: 11
    product: "Consulting\nJanuary"
    quantity: 3
    exchange_rate: {EUR: 4.97}
  - contract: local-dev
    date: 2014-03-31
    number: 13
    product: Consulting
    quantity: 2
    price_per_unit: 12.50 EUR
    exchange_rate: {EUR: 4.9}
  - contract: local-retainer
    date: 2014-03-31
    number: 14
    product: Support
    quantity: 1
"#;

pub const DATA: &str = formatcp!("{}{}{}{}", SUPPLIER, CLIENTS, CONTRACTS, INVOICES);

pub const UNKNOWN_CONTRACT: &str = formatcp!(
    "{}{}{}{}",
    SUPPLIER,
    CLIENTS,
    CONTRACTS,
    r#"invoices:
  - contract: nope
    date: 2014-04-30
    number: 15
    quantity: 1
"#
);

pub const UNKNOWN_CLIENT: &str = formatcp!(
    "{}{}{}",
    SUPPLIER,
    CLIENTS,
    r#"contracts:
  orphan:
    client: ghost
    due_days: 30
invoices: []
"#
);

pub const MISSING_RATE: &str = formatcp!(
    "{}{}{}{}",
    SUPPLIER,
    CLIENTS,
    CONTRACTS,
    r#"invoices:
  - contract: foreign-dev
    date: 2014-05-31
    number: 20
    quantity: 1
    price_per_unit: 10.00 USD
    exchange_rate: {EUR: 4.97}
"#
);

pub const DUPLICATE: &str = formatcp!(
    "{}{}{}{}{}",
    SUPPLIER,
    CLIENTS,
    CONTRACTS,
    INVOICES,
    r#"  - contract: local-dev
    date: 2014-01-31
    number: 11
    quantity: 1
    exchange_rate: {EUR: 4.97}
"#
);

pub const OVERFLOW: &str = formatcp!(
    "{}{}{}{}",
    SUPPLIER,
    CLIENTS,
    CONTRACTS,
    r#"invoices:
  - contract: foreign-dev
    date: 2014-06-30
    number: 21
    quantity: 10000000000000000000
    price_per_unit: 100000000000000 EUR
    exchange_rate: {EUR: 4.97}
"#
);

/// An invoice number that is not safe to put in a URL as is.
pub const ODD_NUMBER: &str = formatcp!(
    "{}{}{}{}",
    SUPPLIER,
    CLIENTS,
    CONTRACTS,
    r#"invoices:
  - contract: foreign-dev
    date: 2014-06-30
    number: "A/7 ?#"
    quantity: 1
    exchange_rate: {EUR: 4.97}
"#
);
