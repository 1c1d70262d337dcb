use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use intlog_core::model::ExceptionRecord;
use intlog_core::{ClientError, LoggingServiceClient};
use intlog_sdk::{TransactionRecorder, TransactionUpdate};

use crate::output::format::format_recorded;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct RecordArgs {
    /// Kind of sync job (e.g. daily_sync)
    #[arg(long)]
    pub sync_type: String,

    /// Vendor the job syncs with
    #[arg(long)]
    pub vendor: String,

    /// Credential the job runs under
    #[arg(long)]
    pub credential_id: String,

    /// Meta entry; values that parse as JSON are sent as JSON (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta_pair)]
    pub meta: Vec<(String, Value)>,

    /// URL of the vendor response for this job
    #[arg(long)]
    pub response_url: Option<String>,

    /// Set the end time to now
    #[arg(long)]
    pub finish: bool,

    /// Exception message to attach (repeatable)
    #[arg(long = "exception", value_name = "MESSAGE")]
    pub exceptions: Vec<String>,
}

fn parse_meta_pair(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err("meta key must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn run(client: &LoggingServiceClient, args: &RecordArgs, format: OutputFormat) -> Result<()> {
    let failures = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&failures);

    let mut tx = TransactionRecorder::new(
        client,
        &args.sync_type,
        &args.vendor,
        &args.credential_id,
        None,
    )
    .with_failure_observer(move |e: &ClientError| {
        eprintln!("Logging service call failed: {e}");
        seen.fetch_add(1, Ordering::SeqCst);
    });

    for message in &args.exceptions {
        tx.push_exception(ExceptionRecord::new(message.as_str(), String::new()));
    }

    let mut update = TransactionUpdate::new();
    for (key, value) in &args.meta {
        update = update.meta_field(key.as_str(), value.clone());
    }
    if let Some(url) = &args.response_url {
        update = update.response_url(url.as_str());
    }
    if args.finish {
        update = update.finished();
    }

    tx.update(update);
    tx.flush_exceptions();

    let failed = failures.load(Ordering::SeqCst);
    if failed > 0 {
        anyhow::bail!(
            "{failed} call(s) to the logging service failed for {}",
            tx.tag()
        );
    }

    println!("{}", format_recorded(&tx, format));
    Ok(())
}
