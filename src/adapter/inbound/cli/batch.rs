//! Rendering of composed batches and pipeline outcomes.

use serde_json::json;
use tabled::{Table, Tabled};

use super::output;
use crate::application::pipeline::{PipelineContext, PipelineOutcome};
use crate::domain::transaction::{Confirmation, TransactionStep};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Step")]
    kind: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Calldata")]
    calldata: String,
}

fn row(index: usize, step: &TransactionStep) -> StepRow {
    StepRow {
        index,
        kind: step.kind().to_string(),
        to: step.to().to_string(),
        value: step.value().map_or_else(|| "-".to_string(), |v| v.to_string()),
        calldata: format!("{} bytes", step.data().len()),
    }
}

/// Print the batch a dry run would submit.
pub fn show_plan(title: &str, ctx: &PipelineContext) {
    if output::is_json() {
        output::result(
            "plan",
            &json!({
                "pipeline": title,
                "steps": ctx.steps(),
                "options": ctx.options(),
            }),
        );
        return;
    }

    output::section(title);
    if ctx.steps().is_empty() {
        output::note("Nothing to submit");
        return;
    }
    let rows: Vec<StepRow> = ctx
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| row(index, step))
        .collect();
    output::lines(&Table::new(rows).to_string());

    let options = ctx.options();
    if let Some(value) = options.value {
        output::field("Batch value", value);
    }
    if let Some(gas) = options.gas {
        output::field("Gas limit", gas);
    }
    output::note("Dry run: nothing was submitted");
}

/// Print the result of a submitted pipeline.
pub fn show_outcome(outcome: &PipelineOutcome) {
    if output::is_json() {
        output::result("outcome", outcome);
        return;
    }

    match &outcome.confirmation {
        Confirmation::Confirmed(receipt) => {
            output::success("Transaction confirmed");
            output::field("Hash", output::highlight(receipt.transaction_hash));
            if let Some(block) = receipt.block_number {
                output::field("Block", block);
            }
        }
        Confirmation::PendingSignatures { safe_tx_hash } => {
            output::warning("Submitted; the Safe needs more signatures");
            if let Some(hash) = safe_tx_hash {
                output::field("Safe tx", output::highlight(hash));
            }
        }
    }
    if let Some(market_maker) = outcome.predicted_market_maker {
        output::field("Market maker", market_maker);
    }
    if let Some(condition_id) = outcome.condition_id {
        output::field("Condition", condition_id);
    }
}
