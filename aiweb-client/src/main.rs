//! aiweb – command-line client for the aiweb labs backend.

use std::time::Duration;

use aiweb_client::{Api, ClientConfig, Conversation, RetryPolicy};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

/// Command-line options for the aiweb client.
#[derive(Debug, Parser)]
#[command(name = "aiweb", version, about = "Talk to an aiweb-server instance")]
struct Cli {
    /// Backend base URL (default: $AIWEB_API_BASE, then http://localhost:8000)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the backend is up
    Health,
    /// Echo a message back
    Echo { msg: String },
    /// Echo through a backend told to fail the first N calls, retrying on failure
    FlakyEcho {
        msg: String,
        /// Calls the backend fails before succeeding
        #[arg(long, default_value_t = 1)]
        failures: u32,
        /// Retries after the first try
        #[arg(long, default_value_t = 2)]
        attempts: u32,
        /// Delay between tries in milliseconds
        #[arg(long, default_value_t = 400)]
        delay_ms: u64,
    },
    /// Generate a lesson outline for a topic
    Outline { topic: String },
    /// Generate a short lesson summary for a topic
    Summary { topic: String },
    /// Interactive multi-turn chat (`/clear` resets, `/quit` exits)
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::resolve(cli.api_base.as_deref())?;
    debug!(api_base = %config.api_base(), "client configured");
    let api = Api::new(config);

    match cli.command {
        Command::Health => {
            let health = api.health().await?;
            println!("{} (version {})", health.status, health.version);
        }
        Command::Echo { msg } => {
            println!("{}", api.echo(&msg).await?.msg);
        }
        Command::FlakyEcho {
            msg,
            failures,
            attempts,
            delay_ms,
        } => {
            let api = api.set_retry_policy(RetryPolicy::new(
                attempts,
                Duration::from_millis(delay_ms),
            ));
            match api.flaky_echo(&msg, failures).await {
                Ok(resp) => match resp.attempts {
                    Some(n) => println!("{} (succeeded on attempt {n})", resp.msg),
                    None => println!("{}", resp.msg),
                },
                Err(e) => {
                    debug!(error = ?e, "flaky echo gave up");
                    anyhow::bail!(e.user_message());
                }
            }
        }
        Command::Outline { topic } => print_outline(api.lesson_outline(&topic).await?),
        Command::Summary { topic } => print_outline(api.lesson_summary(&topic).await?),
        Command::Chat => chat_loop(&api).await?,
    }

    Ok(())
}

fn print_outline(resp: aiweb_client::types::LessonResponse) {
    println!("{}", resp.topic);
    for (i, line) in resp.outline.iter().enumerate() {
        println!("{:>3}. {line}", i + 1);
    }
}

async fn chat_loop(api: &Api) -> anyhow::Result<()> {
    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                conversation.clear()?;
                println!("(conversation cleared)");
                continue;
            }
            _ => {}
        }

        match conversation.send(api, &line).await {
            Ok(reply) => println!("assistant> {}\n", reply.content),
            Err(e) => {
                debug!(error = ?e, "chat send failed");
                if let Some(msg) = conversation.error() {
                    eprintln!("error: {msg}\n");
                } else {
                    eprintln!("error: {e}\n");
                }
            }
        }
    }

    Ok(())
}
