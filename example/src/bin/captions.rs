use anyhow::{Context, Result};
use clap::Parser;
use simple_captions::{CaptionConfig, Controller, EmittedEvents, InitArgs};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use example::*;

/// reads JSON events from stdin, one per line, and prints the caption box after every change.
///
/// {"type":"caption","streamId":"s1","caption":"hi","connection":{"connectionId":"c1","creationTime":1000000}}
/// {"type":"name","connectionId":"c1","name":"Ada"}
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file containing a CaptionConfig
    #[arg(long)]
    config: Option<String>,
    /// overrides max_captions
    #[arg(long)]
    max_captions: Option<usize>,
    /// overrides timeout_ms
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} [{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                chrono::Local::now().format("%H:%M:%S.%3f"),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Debug)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // used to receive events from the controller
    let (client_event_tx, client_event_rx) = mpsc::unbounded_channel::<EmittedEvents>();

    let mut controller = Controller::init(InitArgs {
        config,
        emitted_event_chan: client_event_tx,
    })?;

    let printer = tokio::spawn(print_captions(client_event_rx));

    tokio::select! {
        r = read_stdin(&controller) => {
            log::debug!("stdin closed: {:?}", r);
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
        }
    }

    controller.deinit().await?;
    // the printer exits once the controller drops its end of the channel
    printer.await?;

    Ok(())
}

fn load_config(cli: &Cli) -> Result<CaptionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path))?;
            CaptionConfig::from_json(&s)?
        }
        None => CaptionConfig::default(),
    };
    if let Some(max_captions) = cli.max_captions {
        config.max_captions = max_captions;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config)
}

async fn read_stdin(controller: &Controller) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Inbound::parse(&line) {
            Ok(inbound) => inbound.dispatch(controller)?,
            Err(e) => log::error!("ignoring malformed line: {}", e),
        }
    }
    Ok(())
}

async fn print_captions(mut rx: mpsc::UnboundedReceiver<EmittedEvents>) {
    while let Some(event) = rx.recv().await {
        match event {
            EmittedEvents::Captions { text } => {
                println!("----------");
                println!("{}", text);
            }
        }
    }
}
