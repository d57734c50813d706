use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::cli::Command;
use crate::error::ModelError;
use crate::model::{Invoice, Model};
use crate::web;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("{source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Error rendering template: {source}")]
    Render {
        #[from]
        source: askama::Error,
    },

    #[error("No invoice found for: '{code}'")]
    NotFound { code: String },
}

pub fn find<'a>(model: &'a Model, code: &str) -> Result<&'a Invoice, RunError> {
    model.invoice(code).ok_or_else(|| RunError::NotFound {
        code: code.to_string(),
    })
}

pub fn run_cmd_with_path(cmd: Command, data_path: &Path) -> Result<(), RunError> {
    let stdout = io::stdout();
    run_cmd(cmd, data_path, &mut stdout.lock())
}

fn run_cmd(cmd: Command, data_path: &Path, out: &mut impl Write) -> Result<(), RunError> {
    match cmd {
        Command::Dump => dump(&Model::load(data_path)?, out),
        Command::List => list(&Model::load(data_path)?, out),
        Command::Show { code } => {
            let model = Model::load(data_path)?;
            show(find(&model, &code)?, &model, out)
        }
        Command::Serve { bind, static_dir } => {
            serve(bind, web::AppState::new(data_path, &static_dir))
        }
    }
}

fn serve(bind: SocketAddr, state: web::AppState) -> Result<(), RunError> {
    debug!(%bind, "starting runtime");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(web::serve(bind, state))?)
}

fn dump(model: &Model, out: &mut impl Write) -> Result<(), RunError> {
    for invoice in model.invoices() {
        writeln!(out, "{} {}", invoice.date, invoice.valuation.total_local)?;
    }
    Ok(())
}

fn list(model: &Model, out: &mut impl Write) -> Result<(), RunError> {
    for invoice in model.invoices() {
        writeln!(out, "{}", invoice)?;
    }
    Ok(())
}

fn show(invoice: &Invoice, model: &Model, out: &mut impl Write) -> Result<(), RunError> {
    writeln!(out, "Invoice: #{} ({})", invoice.number, invoice.code)?;
    writeln!(out, "Date: {}, due {}", invoice.date, invoice.due_date)?;
    writeln!(out, "Client: {}", invoice.client())?;
    writeln!(out, "Contract: {}", invoice.contract().code)?;
    if let Some(product) = &invoice.product {
        writeln!(out, "Product: {}", product)?;
    }
    writeln!(
        out,
        "Quantity: {} {} @ {}",
        invoice.quantity,
        invoice.unit.as_deref().unwrap_or(""),
        invoice.price
    )?;
    if invoice.price.currency != model.supplier().local_currency() {
        if let Some(rate) = invoice.exchange_rate.get(&invoice.price.currency) {
            writeln!(out, "Exchange rate: {} {}", invoice.price.currency, rate)?;
        }
    }
    writeln!(
        out,
        "Payable in {} to {}\n",
        invoice.payment_currency, invoice.account
    )?;
    writeln!(out, "{}", invoice.valuation)?;
    Ok(())
}
