/*
 * Supplier invoices from a YAML data file
 *
 * The data file describes:
 *  - the supplier, its bank accounts per currency and invoice numbering
 *  - clients, local (billed in RON) or foreign
 *  - contracts with default price, unit and due days
 *  - invoices, each overriding contract terms where needed
 *
 * Every command reads the file again and resolves each invoice:
 *  - invoice fields fall back to the contract, then to the client
 *  - local clients: unit price converted to RON, rounded to 2 then 4 places
 *  - foreign clients: total in the price currency, converted for the books
 *
 * Output:
 *  - dump: date and RON total per invoice
 *  - list / show: invoices on the terminal
 *  - serve: printable invoice pages
 */

mod billing;
mod cascade;
mod cli;
mod error;
#[cfg(test)]
mod fixtures;
mod loader;
mod model;
mod rounding;
mod run;
mod scalar;
mod templates;
mod web;

use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Opts;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let opts = Opts::parse();
    init_tracing();

    if let Err(error) = run::run_cmd_with_path(opts.subcommand, &opts.file) {
        eprintln!("{}", error);
        process::exit(1);
    }
}
