//! erp CLI: operator interface to the workshop records.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rotten_erp::config::Config;
use rotten_erp::db::Db;
use rotten_erp::model::{Collection, OrderStatus, RecordId};
use rotten_erp::telemetry::{TelemetryConfig, init_telemetry};
use rotten_erp::view::order_form::{self, OrderForm, SelectOption};
use rotten_erp::view::{DeleteOutcome, Listing, SaveOutcome, TableView, dashboard};

#[derive(Parser)]
#[command(name = "erp", about = "Workshops, articles and production orders")]
struct Cli {
    /// TOML config file (environment variables still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Order counts and the latest orders
    Dashboard,
    /// List one collection
    List {
        /// workshops, articles, tasks, processes or production
        collection: Collection,
        /// Case-insensitive text filter
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one record as JSON
    Show { collection: Collection, id: String },
    /// Create a catalog record
    Add {
        collection: Collection,
        /// Field value as key=value (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Edit a record (orders: status only)
    Edit {
        collection: Collection,
        id: String,
        /// Field value as key=value (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Delete a record after confirmation
    Delete {
        collection: Collection,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Production order operations
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Print the stored aggregate as JSON
    Export,
    /// Replace all data with the seed dataset
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Create a production order
    New {
        #[arg(long)]
        workshop: String,
        #[arg(long)]
        article: String,
        #[arg(long, default_value = "")]
        task: String,
        #[arg(long, default_value = "")]
        process: String,
        #[arg(long)]
        quantity: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change an order's status
    Status {
        id: String,
        /// Pendiente, En Proceso, Completado, Cancelado (or English names)
        status: OrderStatus,
    },
    /// Show what the order form offers
    Options,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "rotten-erp".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let mut db = Db::open(&config)?;

    match cli.command {
        Command::Dashboard => cmd_dashboard(&db),
        Command::List { collection, search } => cmd_list(&db, collection, search),
        Command::Show { collection, id } => cmd_show(&db, collection, id),
        Command::Add { collection, fields } => cmd_add(&mut db, collection, fields),
        Command::Edit {
            collection,
            id,
            fields,
        } => cmd_edit(&mut db, collection, id, fields),
        Command::Delete {
            collection,
            id,
            yes,
        } => cmd_delete(&mut db, collection, id, yes),
        Command::Order { action } => match action {
            OrderAction::New {
                workshop,
                article,
                task,
                process,
                quantity,
                notes,
            } => {
                let form = OrderForm {
                    workshop_id: workshop,
                    article_id: article,
                    task_id: task,
                    process_id: process,
                    quantity,
                    notes,
                };
                cmd_order_new(&mut db, &config, form).await
            }
            OrderAction::Status { id, status } => {
                let order = db.set_order_status(&RecordId::from(id), status)?;
                println!("Order {}: {}", order.id, order.status);
                Ok(())
            }
            OrderAction::Options => cmd_order_options(&db),
        },
        Command::Export => {
            println!("{}", db.export_json()?);
            Ok(())
        }
        Command::Reset { yes } => {
            if !yes && !ask("Replace ALL data with the seed dataset?")? {
                println!("Cancelled.");
                return Ok(());
            }
            db.reset()?;
            println!("Store reset.");
            Ok(())
        }
    }
}

fn cmd_dashboard(db: &Db) -> anyhow::Result<()> {
    let stats = dashboard(db.snapshot());

    println!("RottenFuture ERP");
    println!("{}", "-".repeat(40));
    println!("Activas:      {}", stats.active_orders);
    println!("Completadas:  {}", stats.completed_orders);
    println!("Artículos:    {}", stats.article_count);
    println!("Talleres:     {}", stats.workshop_count);

    println!("\nEstado de Producción");
    for entry in &stats.by_status {
        println!("  {:<12} {:>4}  {}", entry.status, entry.count, "#".repeat(entry.count));
    }

    println!("\nÚltimas Ordenes");
    if stats.recent.is_empty() {
        println!("  Sin actividad reciente.");
    }
    for order in &stats.recent {
        println!(
            "  {:<12}  {:<28}  {:<20}  {}",
            order.id, order.article, order.workshop, order.status
        );
    }
    Ok(())
}

fn cmd_list(db: &Db, collection: Collection, search: Option<String>) -> anyhow::Result<()> {
    let mut view = TableView::new(collection);
    if let Some(term) = search {
        view.set_search(term);
    }
    print_listing(&view.listing(db.snapshot()));
    Ok(())
}

fn cmd_show(db: &Db, collection: Collection, id: String) -> anyhow::Result<()> {
    let id = RecordId::from(id);
    let Some(record) = db.snapshot().find(collection, &id) else {
        anyhow::bail!("no {collection} record with id '{id}'");
    };
    println!("{}", serde_json::to_string_pretty(&record.to_json())?);
    Ok(())
}

fn cmd_add(db: &mut Db, collection: Collection, fields: Vec<String>) -> anyhow::Result<()> {
    let mut view = TableView::new(collection);
    view.open_new()?;
    fill_form(&mut view, &fields)?;
    finish_save(db, &mut view)
}

fn cmd_edit(
    db: &mut Db,
    collection: Collection,
    id: String,
    fields: Vec<String>,
) -> anyhow::Result<()> {
    let mut view = TableView::new(collection);
    view.open_edit(db.snapshot(), &RecordId::from(id))?;
    fill_form(&mut view, &fields)?;
    finish_save(db, &mut view)
}

fn cmd_delete(db: &mut Db, collection: Collection, id: String, yes: bool) -> anyhow::Result<()> {
    let mut view = TableView::new(collection);
    let id = RecordId::from(id);
    let mut confirm = |prompt: &str| yes || ask(prompt).unwrap_or(false);

    match view.request_delete(db, &id, &mut confirm)? {
        DeleteOutcome::Declined => println!("Cancelled."),
        DeleteOutcome::Deleted(0) => println!("No {collection} record with id '{id}'."),
        DeleteOutcome::Deleted(n) => println!("Deleted {n} record(s)."),
    }
    Ok(())
}

async fn cmd_order_new(db: &mut Db, config: &Config, form: OrderForm) -> anyhow::Result<()> {
    println!("Guardando...");
    match form.submit(db, config.order_delay()).await? {
        Some(order) => {
            println!("Created: {} ({}, {} units)", order.id, order.status, order.quantity);
            Ok(())
        }
        None => anyhow::bail!("order not created: workshop, article and a quantity of at least 1 are required"),
    }
}

fn cmd_order_options(db: &Db) -> anyhow::Result<()> {
    let data = db.snapshot();
    print_options("Taller", &order_form::workshop_options(data));
    print_options("Artículo", &order_form::article_options(data));
    print_options("Proceso", &order_form::process_options(data));
    print_options("Tarea Principal", &order_form::task_options(data));
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fill_form(view: &mut TableView, fields: &[String]) -> anyhow::Result<()> {
    let Some(form) = view.form_mut() else {
        anyhow::bail!("editor is not open");
    };
    for pair in fields {
        let Some((key, value)) = pair.split_once('=') else {
            anyhow::bail!("expected FIELD=VALUE, got '{pair}'");
        };
        form.set(key.trim(), value)?;
    }
    Ok(())
}

fn finish_save(db: &mut Db, view: &mut TableView) -> anyhow::Result<()> {
    match view.save(db)? {
        SaveOutcome::Saved(record) => {
            println!("Saved: {} {}", record.collection(), record.id());
            Ok(())
        }
        SaveOutcome::Blocked => {
            let required: Vec<_> = view
                .config()
                .editable_fields()
                .filter(|f| f.required)
                .map(|f| f.key)
                .collect();
            anyhow::bail!("not saved: required fields are {}", required.join(", "))
        }
    }
}

fn print_listing(listing: &Listing) {
    println!("{}", listing.title);

    let mut widths: Vec<usize> = listing.columns.iter().map(|c| c.chars().count()).collect();
    for row in &listing.rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    // Orders carry their id as a column already.
    let id_column = listing.columns.first() != Some(&"ID");
    let prefix = |id: &str| {
        if id_column {
            format!("{id:<12}  ")
        } else {
            String::new()
        }
    };

    let header = pad_cells(listing.columns.iter().copied(), &widths);
    println!("{}{header}", prefix("ID"));
    println!("{}", "-".repeat(header.chars().count() + prefix("").len()));
    for row in &listing.rows {
        let cells = pad_cells(row.cells.iter().map(String::as_str), &widths);
        println!("{}{cells}", prefix(row.id.as_str()));
    }

    match listing.empty_message() {
        Some(msg) => println!("{msg}"),
        None => println!("\n{} record(s)", listing.rows.len()),
    }
}

fn pad_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

fn print_options(label: &str, options: &[SelectOption]) {
    println!("{label}:");
    for option in options {
        println!("  {:<12}  {}", option.value, option.label);
    }
}

fn ask(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    ))
}
