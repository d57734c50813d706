use clap::{Parser, Subcommand, ValueHint};
use std::net::SocketAddr;
use std::path::PathBuf;

/* Argument Stucture
 *
 * dump
 * list
 * show <code>
 * serve [--bind <addr>] [--static-dir <dir>]
 */

#[derive(Parser)]
#[clap(version, about = "Supplier invoices from a YAML data file")]
pub struct Opts {
    #[clap(short, long, env = "FACTURI_DATA", default_value = "facturi.yaml",
        value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    #[clap(subcommand)]
    pub subcommand: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the date and local currency total of every invoice
    Dump,

    /// List invoices with their number and client
    List,

    /// Show the computed fields of one invoice
    Show {
        /// Invoice code: <date>-<number>
        code: String,
    },

    /// Serve the invoices as printable web pages
    Serve {
        /// Address to listen on
        #[clap(short, long, env = "FACTURI_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
        /// Directory served under /static
        #[clap(long, env = "FACTURI_STATIC", default_value = "static",
            value_hint = ValueHint::DirPath)]
        static_dir: PathBuf,
    },
}
