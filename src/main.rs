//! Command-line front end.
//!
//! Every command loads the configuration, sets up tracing and builds a client
//! with [`shoplist::initialize`]. Commands that touch lists first check the
//! session; when it cannot be recovered the login address is printed and the
//! command fails.
//!
//! # Commands
//!
//! - `whoami`: Show the signed-in user
//! - `lists`, `new-list`, `show`, `rm-list`: Manage lists
//! - `add`, `qty`, `weight`, `done`, `undone`, `rm`: Manage items
//! - `toggle-all`, `clear`: Bulk item updates
//! - `suggest`: Run text through the suggestion field and print the rows
//! - `logout`: End the session and forget stored cookies
//!
//! Errors are printed as one line on stderr with a non-zero exit status.

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use shoplist::access::client::DEFAULT_PAGE_SIZE;
use shoplist::app::Event;
use shoplist::domain::{validation, CreateItemRequest, CreateListRequest, Measure, UpdateItemRequest};
use shoplist::observability::init_tracing;
use shoplist::ui::{self, ListViewModel};
use shoplist::{initialize, Config, Result, Shoplist};

#[derive(Parser)]
#[command(name = "shoplist")]
#[command(about = "Shopping lists from the terminal", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/shoplist/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable ANSI styling
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in user
    Whoami,
    /// List all shopping lists
    Lists,
    /// Create a list
    NewList { name: String },
    /// Show a list and one page of its items
    Show {
        list_id: String,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Delete a list
    RmList { list_id: String },
    /// Add an item
    Add {
        list_id: String,
        name: String,
        #[arg(long, conflicts_with = "weight")]
        qty: Option<String>,
        /// Weight value and unit (g, kg, ml, l)
        #[arg(long, num_args = 2, value_names = ["VALUE", "UNIT"])]
        weight: Option<Vec<String>>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Set an item's quantity (clears its weight)
    Qty {
        list_id: String,
        item_id: String,
        quantity: String,
    },
    /// Set an item's weight (clears its quantity)
    Weight {
        list_id: String,
        item_id: String,
        value: String,
        unit: String,
    },
    /// Mark an item purchased
    Done { list_id: String, item_id: String },
    /// Mark an item not purchased
    Undone { list_id: String, item_id: String },
    /// Mark all items purchased, or all unpurchased when none is left
    ToggleAll { list_id: String },
    /// Delete every item of a list
    Clear { list_id: String },
    /// Delete an item
    Rm { list_id: String, item_id: String },
    /// Show article suggestions for some text
    Suggest {
        text: String,
        /// Select the suggestion at this row (starting at 0)
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Sign out and forget stored cookies
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let ansi = !cli.no_color && std::io::stdout().is_terminal();
    let outcome = match initialize(&config) {
        Ok(client) => run(&client, cli.command, ansi).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &Shoplist, command: Commands, ansi: bool) -> Result<()> {
    match command {
        Commands::Whoami => {
            client.require_session().await?;
            println!("{}", ui::render_session(&client.session.snapshot()));
        }
        Commands::Logout => {
            client.auth.logout(&client.session)?;
        }
        Commands::Suggest { text, pick } => suggest(client, text, pick, ansi).await?,
        command => {
            client.require_session().await?;
            run_list_command(client, command, ansi).await?;
        }
    }
    Ok(())
}

async fn run_list_command(client: &Shoplist, command: Commands, ansi: bool) -> Result<()> {
    let api = &client.api;

    match command {
        Commands::Lists => print!("{}", ui::render_lists(&api.get_lists().await?)),
        Commands::NewList { name } => {
            let body = CreateListRequest {
                name: validation::list_name(&name)?,
            };
            let list = api.create_list(&body).await?;
            println!("created {} ({})", list.name, list.id);
        }
        Commands::Show {
            list_id,
            page,
            limit,
        } => {
            let list = api.get_list(&list_id).await?;
            let page = page.saturating_sub(1);
            let items = api
                .get_items(&list_id, limit, page.saturating_mul(limit))
                .await?;
            print!(
                "{}",
                ui::render_list(&ListViewModel::new(&list, &items, page, limit), ansi)
            );
        }
        Commands::RmList { list_id } => {
            api.delete_list(&list_id).await?;
            println!("deleted list {list_id}");
        }
        Commands::Add {
            list_id,
            name,
            qty,
            weight,
            notes,
        } => {
            let weight = weight
                .as_deref()
                .and_then(|parts| Some((parts.first()?.as_str(), parts.get(1)?.as_str())));
            let mut body = CreateItemRequest::new(validation::item_name(&name)?);
            if let Some(measure) = validation::measure(qty.as_deref(), weight)? {
                body = body.with_measure(measure);
            }
            if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
                body = body.with_notes(notes.trim());
            }
            let item = api.create_item(&list_id, &body).await?;
            println!("added {} {} ({})", item.name, item.amount_label(), item.id);
        }
        Commands::Qty {
            list_id,
            item_id,
            quantity,
        } => {
            let body = UpdateItemRequest::measure(Measure::Quantity(validation::quantity(&quantity)?));
            let item = api.update_item(&list_id, &item_id, &body).await?;
            println!("{} {}", item.name, item.amount_label());
        }
        Commands::Weight {
            list_id,
            item_id,
            value,
            unit,
        } => {
            let body = UpdateItemRequest::measure(Measure::Weight(validation::weight(&value, &unit)?));
            let item = api.update_item(&list_id, &item_id, &body).await?;
            println!("{} {}", item.name, item.amount_label());
        }
        Commands::Done { list_id, item_id } => {
            let item = api
                .update_item(&list_id, &item_id, &UpdateItemRequest::purchased(true))
                .await?;
            println!("{} purchased", item.name);
        }
        Commands::Undone { list_id, item_id } => {
            let item = api
                .update_item(&list_id, &item_id, &UpdateItemRequest::purchased(false))
                .await?;
            println!("{} not purchased", item.name);
        }
        Commands::ToggleAll { list_id } => {
            let list = api.get_list(&list_id).await?;
            let updated = api.toggle_all_purchased(&list_id, &list.items).await?;
            println!("updated {} item(s)", updated.len());
        }
        Commands::Clear { list_id } => {
            let list = api.get_list(&list_id).await?;
            let deleted = api.clear_items(&list_id, &list.items).await?;
            println!("deleted {deleted} item(s)");
        }
        Commands::Rm { list_id, item_id } => {
            api.delete_item(&list_id, &item_id).await?;
            println!("deleted item {item_id}");
        }
        Commands::Whoami | Commands::Logout | Commands::Suggest { .. } => {}
    }
    Ok(())
}

/// Types `text` into a fresh suggestion field, waits for the debounced
/// search and prints the suggestions. With `pick`, selects that row and
/// prints the resulting text.
async fn suggest(client: &Shoplist, text: String, pick: Option<usize>, ansi: bool) -> Result<()> {
    let mut field = client.suggestion_field().on_select(|article| {
        tracing::info!(article = %article.name, "suggestion selected");
    });

    field.dispatch(Event::Focus)?;
    field.dispatch(Event::Input(text))?;
    field.settle().await?;
    print!("{}", ui::render_suggestions(&field.viewmodel(), ansi));

    if let Some(index) = pick {
        if field.state().results.get(index).is_none() {
            return Err(shoplist::ShoplistError::validation(
                "pick",
                format!("No suggestion at row {index}"),
            ));
        }
        field.dispatch(Event::PointerSelect(index))?;
        field.settle().await?;
        println!("{}", field.state().text);
    }
    Ok(())
}
