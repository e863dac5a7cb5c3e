//! Terminal front-end for the data store dApp
//!
//! Connects a wallet, then saves and reads `(message, value)` pairs on the
//! data store contract while listening for `DataSaved` events.
//!
//! Usage examples:
//! ```shell
//! # Interactive session (default)
//! dapp --rpc-url http://localhost:8545
//!
//! # One-shot write and read
//! dapp save --message hi --value 5
//! dapp get
//!
//! # Follow DataSaved events
//! dapp watch
//! ```

use clap::{Parser, Subcommand};
use dapp_client::{AlloyWallet, Config, Dapp, DappError};
use dapp_lib::{ButtonTone, Element, OperationKind, OperationStatus};
use dotenv::dotenv;
use eyre::{eyre, Result};
use std::{collections::HashMap, env, str::FromStr, sync::Arc};
use termion::{color, style};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dapp")]
#[command(about = "Save and read data on the data store contract through your wallet")]
#[command(version)]
struct Cli {
    /// JSON-RPC endpoint of the node or wallet
    #[arg(long, env = "ETHEREUM_RPC_URL")]
    rpc_url: Option<String>,

    /// Data store contract address (empty string disables it)
    #[arg(long, env = "DATA_STORE_ADDRESS")]
    contract: Option<String>,

    /// Hex private key; without one the node's accounts are used
    #[arg(long, env = "ETHEREUM_WALLET_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Do not subscribe to DataSaved events
    #[arg(long)]
    no_events: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Interactive,
    /// Connect and show the account
    Connect,
    /// Save a message and value with setData
    Save {
        #[arg(short, long)]
        message: String,
        #[arg(short, long)]
        value: String,
    },
    /// Read the stored message and value with getData
    Get,
    /// Print DataSaved events until interrupted
    Watch,
}

/// One line typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Connect,
    Message(String),
    Value(String),
    Save,
    Get,
    Dismiss(OperationKind),
    Show,
    Disconnect,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "connect" => Ok(Self::Connect),
            "message" | "m" => Ok(Self::Message(rest.to_string())),
            "value" | "v" => Ok(Self::Value(rest.to_string())),
            "save" => Ok(Self::Save),
            "get" => Ok(Self::Get),
            "dismiss" => match rest {
                "save" => Ok(Self::Dismiss(OperationKind::Save)),
                "get" => Ok(Self::Dismiss(OperationKind::Get)),
                other => Err(format!("dismiss what? expected `save` or `get`, got `{other}`")),
            },
            "show" | "" => Ok(Self::Show),
            "disconnect" => Ok(Self::Disconnect),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`, try `help`")),
        }
    }
}

const HELP: &str = "\
commands:
  connect            connect the wallet
  message <text>     set the message input
  value <number>     set the value input
  save               save message and value to the contract
  get                read data from the contract
  dismiss save|get   acknowledge a finished operation
  show               redraw the screen
  disconnect         end the wallet session
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they do not interleave with the screen on stdout
    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or(LevelFilter::WARN);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    info!("Loaded configuration for network: {}", config.network.name);

    let wallet = AlloyWallet::new(&config)?;
    let dapp = Arc::new(
        Dapp::new(wallet, config.contract.data_store)
            .with_event_monitoring(config.events.enable_event_monitoring && !cli.no_events)
            .with_expected_chain_id(config.network.chain_id),
    );

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(dapp).await?,
        Commands::Connect => {
            dapp.connect().await?;
            print_screen(&dapp);
        }
        Commands::Save { message, value } => {
            dapp.connect().await?;
            dapp.set_message_input(message)?;
            dapp.set_value_input(value)?;
            let status = dapp.save().await?;
            print_screen(&dapp);
            ensure_success("saving", status)?;
        }
        Commands::Get => {
            dapp.connect().await?;
            let status = dapp.get().await?;
            ensure_success("getting", status)?;
            if let Some(data) = dapp.state().contract.data {
                println!("{}", serde_json::to_string_pretty(&data.to_json())?);
            }
        }
        Commands::Watch => run_watch(&dapp).await?,
    }

    Ok(())
}

/// CLI flags win over the environment; everything else comes from the
/// environment.
fn load_config(cli: &Cli) -> Result<Config> {
    let overrides: HashMap<&str, String> = [
        ("ETHEREUM_RPC_URL", cli.rpc_url.clone()),
        ("DATA_STORE_ADDRESS", cli.contract.clone()),
        ("ETHEREUM_WALLET_PRIVATE_KEY", cli.private_key.clone()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|value| (key, value)))
    .collect();

    let config = Config::from_source(|key| overrides.get(key).cloned().or_else(|| env::var(key).ok()))?;
    config.validate()?;
    Ok(config)
}

fn ensure_success(operation: &str, status: OperationStatus) -> Result<()> {
    match status {
        OperationStatus::Success => Ok(()),
        other => Err(eyre!("{operation} ended as {other:?}, see log for details")),
    }
}

async fn run_interactive(dapp: Arc<Dapp<AlloyWallet>>) -> Result<()> {
    println!("{HELP}\n");
    print_screen(&dapp);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut events = dapp.subscribe_events();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&dapp, command).await,
                    Err(message) => println!("{message}"),
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    info!(message = %event.message, "DataSaved event received");
                    print_screen(&dapp);
                }
                Err(RecvError::Lagged(count)) => warn!("Event stream lagged by {} events", count),
                Err(RecvError::Closed) => {
                    error!("Event stream closed");
                    break;
                }
            },
        }
    }

    dapp.disconnect()?;
    Ok(())
}

async fn execute(dapp: &Arc<Dapp<AlloyWallet>>, command: Command) {
    let result = match command {
        Command::Connect => dapp.connect().await.map(|_| ()),
        Command::Message(message) => dapp.set_message_input(message),
        Command::Value(value) => dapp.set_value_input(value),
        Command::Save | Command::Get => {
            spawn_operation(dapp, command);
            return;
        }
        Command::Dismiss(kind) => dapp.dismiss(kind),
        Command::Disconnect => dapp.disconnect(),
        Command::Help => {
            println!("{HELP}");
            return;
        }
        Command::Show | Command::Quit => Ok(()),
    };

    if let Err(e) = result {
        report(&e);
    }
    print_screen(dapp);
}

/// Runs save/get in the background so the prompt stays responsive while the
/// call is in flight.
fn spawn_operation(dapp: &Arc<Dapp<AlloyWallet>>, command: Command) {
    println!("⏳ {command:?} submitted");
    let dapp = Arc::clone(dapp);
    tokio::spawn(async move {
        let result = if command == Command::Save {
            dapp.save().await
        } else {
            dapp.get().await
        };

        if let Err(e) = result {
            report(&e);
        }
        print_screen(&dapp);
    });
}

/// Local errors are the user's to fix; anything else came back from the node.
fn report(e: &DappError) {
    if e.is_local() {
        println!("⚠️  {e}");
    } else {
        println!("❌ {e} (see log for details)");
    }
}

async fn run_watch(dapp: &Dapp<AlloyWallet>) -> Result<()> {
    dapp.connect().await?;
    if !dapp.is_listening() {
        return Err(eyre!("not subscribed to DataSaved events"));
    }

    let mut events = dapp.subscribe_events();
    println!("Listening for DataSaved events, press Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => println!(
                    "DataSaved Event with message: {} (value {}, block {})",
                    event.message,
                    event.value,
                    event.block_number.map_or_else(|| "pending".to_string(), |n| n.to_string()),
                ),
                Err(RecvError::Lagged(count)) => warn!("Event stream lagged by {} events", count),
                Err(RecvError::Closed) => break,
            },
        }
    }

    dapp.disconnect()?;
    Ok(())
}

fn print_screen(dapp: &Dapp<AlloyWallet>) {
    let colored = termion::is_tty(&std::io::stdout());
    println!("────────────────────────────────────────");
    for element in dapp.render() {
        if colored {
            print!("{}", paint(&element));
        } else {
            print!("{element}");
        }
    }
}

fn paint(element: &Element) -> String {
    let tone = match element {
        Element::ConnectButton => Some(ButtonTone::Primary),
        Element::SaveForm { button, .. } | Element::GetPanel { button, .. } => Some(button.tone),
        _ => None,
    };

    match tone {
        Some(ButtonTone::Primary) => {
            format!("{}{element}{}", color::Fg(color::Blue), style::Reset)
        }
        Some(ButtonTone::Secondary) => {
            format!("{}{element}{}", color::Fg(color::Red), style::Reset)
        }
        None => match element {
            Element::Identity { .. } | Element::Connected => {
                format!("{}{element}{}", color::Fg(color::Green), style::Reset)
            }
            _ => element.to_string(),
        },
    }
}
