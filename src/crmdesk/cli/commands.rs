//! # CLI Layer
//!
//! This module is **one possible UI client** for crmdesk. It drives the same
//! [`ListPage`] facade a graphical client would.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Installs the `tracing` subscriber
//! - Picks a concrete gateway and owns the tokio runtime
//!
//! ## Structure
//!
//! - `run()`: parses arguments and dispatches (called by `main.rs`)
//! - `init_context()`: loads configuration and applies command-line overrides
//! - `handle_*()`: one handler per record command

use super::render::{TerminalNotifier, print_page, print_record, render_fields};
use super::setup::{Cli, Commands, RecordCommands};
use clap::Parser;
use crmdesk::api::ListPage;
use crmdesk::config::{CONFIG_KEYS, DeskConfig};
use crmdesk::error::Result;
use crmdesk::filter::StatusFilter;
use crmdesk::gateway::Gateway;
use crmdesk::gateway::http::HttpGateway;
use crmdesk::gateway::memory::InMemoryGateway;
use crmdesk::model::{Customer, Draft, Employee, Lead, Record, RecordId};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Page<R> = ListPage<R, dyn Gateway<R>>;

struct AppContext {
    config: DeskConfig,
    config_dir: PathBuf,
    offline: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Customers { action } => run_records::<Customer>(&ctx, action),
        Commands::Leads { action } => run_records::<Lead>(&ctx, action),
        Commands::Employees { action } => run_records::<Employee>(&ctx, action),
        Commands::Config { key, value } => handle_config(ctx, key, value),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "crmdesk=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = DeskConfig::default_dir()?;
    let mut config = DeskConfig::load(&config_dir)?;
    if let Some(url) = &cli.api_url {
        config.set("api-url", url)?;
    }
    debug!("using {} (offline: {})", config.api_base_url, cli.offline);

    Ok(AppContext {
        config,
        config_dir,
        offline: cli.offline,
    })
}

fn gateway<R: Record>(ctx: &AppContext) -> Result<Arc<dyn Gateway<R>>> {
    if ctx.offline {
        return Ok(Arc::new(InMemoryGateway::<R>::new()));
    }
    Ok(Arc::new(HttpGateway::from_config(&ctx.config)?))
}

fn run_records<R: Record>(ctx: &AppContext, action: RecordCommands) -> Result<()> {
    if let RecordCommands::Fields = action {
        print!("{}", render_fields(<R::Draft as Draft>::FIELDS));
        return Ok(());
    }

    let mut page: Page<R> =
        ListPage::new(gateway::<R>(ctx)?, Arc::new(TerminalNotifier)).with_page_size(ctx.config.page_size);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match action {
            RecordCommands::List {
                search,
                status,
                page: number,
            } => handle_list(&mut page, search, &status, number).await,
            RecordCommands::Show { id } => handle_show(&page, id).await,
            RecordCommands::Add { fields } => handle_add(&mut page, &fields).await,
            RecordCommands::Edit { id, fields } => handle_edit(&mut page, id, &fields).await,
            RecordCommands::Delete { id, yes } => handle_delete(&mut page, id, yes).await,
            RecordCommands::Fields => Ok(()),
        }
    })
}

async fn handle_list<R: Record>(
    page: &mut Page<R>,
    search: Option<String>,
    status: &str,
    number: usize,
) -> Result<()> {
    let status: StatusFilter<R::Status> = status.parse()?;
    page.open().await?;

    if let Some(search) = search {
        page.set_search(search);
    }
    page.set_status(status);
    page.set_page(number);

    print_page(&page.current_page());
    Ok(())
}

async fn handle_show<R: Record>(page: &Page<R>, id: String) -> Result<()> {
    page.open().await?;
    print_record(&page.record(&RecordId::new(id))?);
    Ok(())
}

async fn handle_add<R: Record>(page: &mut Page<R>, fields: &[(String, String)]) -> Result<()> {
    page.open_create();
    apply_fields(page, fields)?;
    let created = page.submit().await?;
    println!("{}", created.id());
    Ok(())
}

async fn handle_edit<R: Record>(
    page: &mut Page<R>,
    id: String,
    fields: &[(String, String)],
) -> Result<()> {
    page.open().await?;
    page.open_edit(&RecordId::new(id))?;
    apply_fields(page, fields)?;
    page.submit().await?;
    Ok(())
}

async fn handle_delete<R: Record>(page: &mut Page<R>, id: String, yes: bool) -> Result<()> {
    page.open().await?;
    let pending = page.request_delete(&RecordId::new(id))?;
    let prompt = format!("{} ({})", pending.prompt(), pending.target().label());

    if yes || ask(&prompt)? {
        page.confirm_delete().await?;
    } else {
        page.dismiss_delete();
        println!("Cancelled.");
    }
    Ok(())
}

fn apply_fields<R: Record>(page: &mut Page<R>, fields: &[(String, String)]) -> Result<()> {
    for (field, value) in fields {
        page.set_field(field, value)?;
    }
    Ok(())
}

fn ask(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn handle_config(ctx: AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, ctx.config.get(key)?);
            }
        }
        (Some(key), None) => println!("{}", ctx.config.get(&key)?),
        (Some(key), Some(value)) => {
            // Stored values only: env and flag overrides are not persisted.
            let mut stored = DeskConfig::load_file(&ctx.config_dir)?;
            stored.set(&key, &value)?;
            stored.save(&ctx.config_dir)?;
            println!("{} = {}", key, stored.get(&key)?);
        }
    }
    Ok(())
}
