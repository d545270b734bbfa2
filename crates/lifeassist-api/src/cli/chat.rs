//! Chat client commands: send a message, show a session's history.

use std::io::Write;

use anyhow::Result;
use console::style;
use futures_util::StreamExt;

use lifeassist_types::chat::{ChatTurn, TurnRole};

use super::client::ApiClient;

/// Send `message` in `session`, continuing the stored conversation.
///
/// The server treats the request's message list as the full history, so
/// the stored turns are fetched first and the new user turn is appended.
pub async fn send_message(
    client: &ApiClient,
    session: &str,
    message: String,
    stream: bool,
    json: bool,
) -> Result<()> {
    let mut turns = client.history(session).await?;
    turns.push(ChatTurn::user(message));
    tracing::debug!(session, turns = turns.len(), "Sending chat request");

    // JSON output needs the whole reply anyway.
    if !stream || json {
        let reply = client.chat(session, &turns).await?;
        if json {
            let value = serde_json::json!({ "session_id": session, "reply": reply });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{reply}");
        }
        return Ok(());
    }

    let mut chunks = Box::pin(client.chat_stream(session, &turns).await?);
    let mut stdout = std::io::stdout();
    while let Some(chunk) = chunks.next().await {
        stdout.write_all(&chunk?)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Print the stored turns of a session.
pub async fn show_history(client: &ApiClient, session: &str, json: bool) -> Result<()> {
    let turns = client.history(session).await?;

    if json {
        let value = serde_json::json!({ "session_id": session, "messages": turns });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!();
        println!("  {} No messages in session '{}'.", style("i").cyan().bold(), session);
        println!();
        return Ok(());
    }

    println!();
    for turn in &turns {
        let label = match turn.role {
            Some(TurnRole::User) => style("You").green().bold(),
            Some(TurnRole::Model) => style("Assistant").cyan().bold(),
            None => style("Unknown").dim(),
        };
        println!("  {label}");
        for line in turn.content.lines() {
            println!("    {line}");
        }
        println!();
    }
    println!("  {}", style(format!("{} messages", turns.len())).dim());
    Ok(())
}
