use crate::loader::ListLoader;
use crate::runtime_config::{RuntimeConfig, StoreKind};
use crate::server::{AppService, HttpServer};
use crate::view::View;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io;
use tracing::info;

/// Command-line interface for yarukoto
#[derive(Parser)]
#[command(name = "yarukoto")]
#[command(about = "Todo list web service", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the todo page and JSON endpoints
    Serve {
        /// Address to listen on
        #[arg(long, env = "YARUKOTO_ADDR")]
        addr: Option<String>,

        #[command(flatten)]
        store: StoreArgs,
    },
    /// Print the current todo list as JSON and exit
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Store backend flags shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Store backend: `memory` or `rest` (`postgrest`, `supabase`)
    #[arg(long, env = "YARUKOTO_STORE", value_parser = str::parse::<StoreKind>)]
    pub store: Option<StoreKind>,

    /// PostgREST project URL
    #[arg(long, env = "YARUKOTO_STORE_URL")]
    pub store_url: Option<String>,

    /// PostgREST anon or service key
    #[arg(long, env = "YARUKOTO_STORE_KEY", hide_env_values = true)]
    pub store_key: Option<String>,

    /// Table holding the todos
    #[arg(long, env = "YARUKOTO_STORE_TABLE")]
    pub store_table: Option<String>,
}

impl StoreArgs {
    /// Overlay the flags that were given on `config`.
    pub fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(kind) = self.store {
            config.store = kind;
        }
        if let Some(url) = &self.store_url {
            config.store_url = Some(url.clone());
        }
        if let Some(key) = &self.store_key {
            config.store_key = Some(key.clone());
        }
        if let Some(table) = &self.store_table {
            config.store_table = table.clone();
        }
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Configuration, store and bind failures are returned with context.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let mut config = RuntimeConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Serve { addr, store } => {
            if let Some(addr) = addr {
                config.addr = addr;
            }
            store.apply(&mut config);
            serve(&config)
        }
        Commands::List { store } => {
            store.apply(&mut config);
            let loader = ListLoader::new(config.build_store()?);
            let list = loader.load().context("Failed to load todos")?;
            println!("{}", serde_json::to_string_pretty(&list)?);
            Ok(())
        }
    }
}

fn serve(config: &RuntimeConfig) -> anyhow::Result<()> {
    may::config().set_stack_size(config.stack_size);

    let store = config.build_store()?;
    let view = View::new().context("Failed to compile page templates")?;
    let service = AppService::new(store, view);

    let handle = HttpServer(service)
        .start(config.addr.as_str())
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!(
        addr = %handle.addr(),
        store = ?config.store,
        table = %config.store_table,
        "Todo service listening"
    );

    handle
        .join()
        .map_err(|e| io::Error::other(format!("Server failed: {e:?}")))?;
    Ok(())
}
