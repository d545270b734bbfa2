//! One-shot client commands: health, summarize, plan, rephrase, quote.

use anyhow::Result;
use console::style;

use lifeassist_core::prompt::TaskKind;

use super::client::ApiClient;

/// Display server health.
pub async fn health(client: &ApiClient, json: bool) -> Result<()> {
    let health = client.health().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    let key = if health.api_key_present {
        style("present").green()
    } else {
        style("missing").red()
    };

    println!();
    println!("  {} Server {}", style("⚡").bold(), style(&health.status).green().bold());
    println!("  Model:   {}", style(&health.model_name).cyan());
    println!("  API key: {key}");
    println!();
    Ok(())
}

/// Run a one-shot task and print the result.
///
/// Model failures arrive as `[Error from model: ...]` text with a 200 status
/// and are printed like any other answer.
pub async fn run_task(
    client: &ApiClient,
    kind: TaskKind,
    input: &str,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let text = client.task(kind, input).await?;

    if json {
        let mut value = serde_json::Map::new();
        value.insert(kind.output_field().to_string(), serde_json::Value::String(text));
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if !quiet {
        println!();
        println!("  {}", style(format!("── {kind} ──")).dim());
        println!();
    }
    println!("{text}");
    if !quiet {
        println!();
    }
    Ok(())
}
