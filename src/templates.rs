use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use askama::Template;
use strum_macros::Display;

use crate::model::{Invoice, Model, Party};

#[derive(Display, Debug, PartialEq, Clone, Copy)]
#[strum(serialize_all = "lowercase")]
pub enum Lang {
    En,
    Ro,
}

impl Lang {
    /// Local clients get their invoices in Romanian.
    pub fn for_invoice(invoice: &Invoice) -> Self {
        if invoice.local {
            Lang::Ro
        } else {
            Lang::En
        }
    }

    pub fn pick<'t>(self, en: &'t str, ro: &'t str) -> &'t str {
        match self {
            Lang::En => en,
            Lang::Ro => ro,
        }
    }
}

/// Cache busting key of a static file: the last six hex digits of its
/// modification time in seconds.
pub fn cache_key(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
    let hex = format!("{:x}", secs);
    Some(hex[hex.len().saturating_sub(6)..].to_string())
}

pub struct Assets<'a> {
    dir: &'a Path,
}

impl<'a> Assets<'a> {
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    pub fn url(&self, filename: &str) -> String {
        match cache_key(&self.dir.join(filename)) {
            Some(key) => format!("/static/{}?t={}", filename, key),
            None => format!("/static/{}", filename),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage<'a> {
    invoices: &'a [Invoice],
    supplier: Party<'a>,
    local_currency: &'a str,
    assets: Assets<'a>,
}

#[derive(Template)]
#[template(path = "invoice_page.html")]
struct InvoicePage<'a> {
    invoice: &'a Invoice,
    supplier: Party<'a>,
    client: Party<'a>,
    local_currency: &'a str,
    copies: usize,
    lang: Lang,
    assets: Assets<'a>,
}

impl InvoicePage<'_> {
    fn tr<'t>(&self, en: &'t str, ro: &'t str) -> &'t str {
        self.lang.pick(en, ro)
    }
}

pub fn home(model: &Model, static_dir: &Path) -> askama::Result<String> {
    HomePage {
        invoices: model.invoices(),
        supplier: model.supplier().party(),
        local_currency: model.supplier().local_currency(),
        assets: Assets::new(static_dir),
    }
    .render()
}

/// Most copies of one invoice printed on a single page.
pub const MAX_COPIES: usize = 10;

/// Render `copies` copies of `invoice` on one printable page, at least one
/// and at most [`MAX_COPIES`].
pub fn invoice_page(
    model: &Model,
    invoice: &Invoice,
    copies: usize,
    static_dir: &Path,
) -> askama::Result<String> {
    InvoicePage {
        invoice,
        supplier: model.supplier().party(),
        client: invoice.client().party(),
        local_currency: model.supplier().local_currency(),
        copies: copies.clamp(1, MAX_COPIES),
        lang: Lang::for_invoice(invoice),
        assets: Assets::new(static_dir),
    }
    .render()
}

mod filters {
    use std::borrow::Borrow;
    use std::fmt;

    use askama_escape::{escape, Html};
    use chrono::NaiveDate;
    use num_format::{Locale, ToFormattedString};
    use rust_decimal::Decimal;

    use crate::rounding::{quantize, MONEY_PLACES};

    pub fn nl2br<T: fmt::Display>(text: T) -> askama::Result<String> {
        let escaped = escape(&text.to_string(), Html).to_string();
        Ok(escaped.replace('\n', "<br>\n"))
    }

    pub fn datefmt<D: Borrow<NaiveDate>>(date: D) -> askama::Result<String> {
        let date: &NaiveDate = date.borrow();
        Ok(date.format("%d.%m.%Y").to_string())
    }

    /// Two decimals with thousands grouped, `1,234.50`.
    pub fn money<A: Borrow<Decimal>>(amount: A) -> askama::Result<String> {
        let amount: &Decimal = amount.borrow();
        let text = quantize(amount.abs(), MONEY_PLACES).to_string();
        let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let units: u128 = units
            .parse()
            .map_err(|e| askama::Error::Custom(Box::new(e)))?;
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        Ok(format!(
            "{}{}.{}",
            sign,
            units.to_formatted_string(&Locale::en),
            cents
        ))
    }

}
