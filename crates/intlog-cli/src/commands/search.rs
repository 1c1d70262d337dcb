use anyhow::{Context, Result};
use clap::Args;

use intlog_core::{LoggingServiceClient, TransactionApi};

use crate::output::format::format_transaction_list;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct SearchArgs {
    /// Only show tags starting with this prefix (e.g. a sync type)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Maximum number of entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

pub fn run(client: &LoggingServiceClient, args: &SearchArgs, format: OutputFormat) -> Result<()> {
    let mut transactions = client
        .search_transactions()
        .context("Failed to search transactions")?;

    if let Some(prefix) = &args.prefix {
        transactions.retain(|tx| {
            tx.tag
                .as_deref()
                .is_some_and(|tag| tag.starts_with(prefix.as_str()))
        });
    }
    if let Some(limit) = args.limit {
        transactions.truncate(limit);
    }

    print!("{}", format_transaction_list(&transactions, format));
    Ok(())
}
