use serde_json::json;

use intlog_core::model::Transaction;
use intlog_core::TransactionApi;
use intlog_sdk::TransactionRecorder;

use super::OutputFormat;

pub fn format_transaction_list(transactions: &[Transaction], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(transactions).unwrap_or_default(),
        OutputFormat::Text => format_transaction_list_text(transactions),
    }
}

fn format_transaction_list_text(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut out = String::new();
    for tx in transactions {
        let tag = tx.tag.as_deref().unwrap_or("(untagged)");
        let started = tx.start_time.as_deref().unwrap_or("-");
        let state = if tx.end_time.is_some() { "done" } else { "open" };
        let errors = tx
            .meta
            .get("error_count")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        out.push_str(&format!(
            "\u{25c6} {} {tag} [{state}] {errors} error(s)  {started}\n",
            tx.integration_transaction_id
        ));
    }
    out
}

pub fn format_transaction(tx: &Transaction, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(tx).unwrap_or_default(),
        OutputFormat::Text => format_transaction_text(tx),
    }
}

fn format_transaction_text(tx: &Transaction) -> String {
    let mut out = String::new();

    out.push_str(&format!("Transaction: {}\n", tx.integration_transaction_id));
    out.push_str(&format!(
        "Tag:         {}\n",
        tx.tag.as_deref().unwrap_or("(untagged)")
    ));
    out.push_str(&format!(
        "Started:     {}\n",
        tx.start_time.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Ended:       {}\n",
        tx.end_time.as_deref().unwrap_or("(still running)")
    ));
    if let Some(url) = &tx.response_url {
        out.push_str(&format!("Response:    {url}\n"));
    }

    if !tx.meta.is_empty() {
        out.push_str("\nMeta:\n");
        for (key, value) in &tx.meta {
            out.push_str(&format!("  {key}: {value}\n"));
        }
    }
    out
}

pub fn format_recorded<A: TransactionApi>(tx: &TransactionRecorder<A>, fmt: OutputFormat) -> String {
    let id = tx.remote_id().map(|id| id.as_str()).unwrap_or("-");
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "integration_transaction_id": id,
            "tag": tx.tag(),
            "start_time": tx.start_time(),
            "meta": tx.meta(),
        }))
        .unwrap_or_default(),
        OutputFormat::Text => format!("Recorded transaction {id} ({})", tx.tag()),
    }
}
