//! Handlers for the `proxy` command group.

use std::path::Path;

use serde_json::json;

use super::batch::{show_outcome, show_plan};
use super::command::TxArgs;
use super::{config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_service;

/// Execute `proxy status`.
pub async fn execute_status(path: &Path) -> Result<()> {
    let config = config::load(path)?;
    let service = build_service(&config)?;
    let proxy = &service.env().proxy;

    let (deployed, threshold, master_copy) =
        futures_util::try_join!(proxy.is_deployed(), proxy.threshold(), proxy.master_copy())?;
    let up_to_date = service.proxy_is_up_to_date().await?;

    if output::is_json() {
        output::result(
            "proxy",
            &json!({
                "address": proxy.address(),
                "deployed": deployed,
                "threshold": threshold,
                "master_copy": master_copy,
                "up_to_date": up_to_date,
            }),
        );
        return Ok(());
    }

    output::section("Proxy");
    output::field("Address", proxy.address());
    if !deployed {
        output::warning("Proxy is not deployed");
        return Ok(());
    }
    output::field("Threshold", threshold);
    output::field("Implementation", master_copy);
    if up_to_date {
        output::success("Implementation is current");
    } else {
        output::warning("Implementation is outdated; run `ctfpipe proxy upgrade`");
    }
    Ok(())
}

/// Execute `proxy upgrade`.
pub async fn execute_upgrade(args: &TxArgs) -> Result<()> {
    let config = config::load(&args.config)?;
    let service = build_service(&config)?;

    if service.proxy_is_up_to_date().await? {
        output::success("Implementation is already current");
        return Ok(());
    }
    if args.dry_run {
        show_plan("Upgrade Proxy", &service.plan_upgrade_proxy_implementation().await?);
        return Ok(());
    }
    output::section("Upgrade Proxy");
    let outcome = service.upgrade_proxy_implementation().await?;
    show_outcome(&outcome);
    Ok(())
}
