use anyhow::{Context, Result};
use clap::Args;

use intlog_core::model::TransactionId;
use intlog_core::{LoggingServiceClient, TransactionApi};

use crate::output::format::format_transaction;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ShowArgs {
    /// Transaction id assigned by the service
    pub id: String,
}

pub fn run(client: &LoggingServiceClient, args: &ShowArgs, format: OutputFormat) -> Result<()> {
    let id = TransactionId::from(args.id.as_str());
    let tx = client
        .get_transaction(&id)
        .with_context(|| format!("Failed to fetch transaction '{id}'"))?;

    println!("{}", format_transaction(&tx, format));
    Ok(())
}
