use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

use schedhub::analytics::ReportFilter;
use schedhub::api::ApiServer;
use schedhub::config::Config;
use schedhub::directory::Directory;
use schedhub::hub::EventHub;
use schedhub::import;
use schedhub::storage::{EventStore, MemoryStore, NewEvent, RestStore};

/// Track conference events and attendance rankings
#[derive(Parser)]
#[command(name = "schedhub")]
#[command(about = "Conference schedule and attendance tracking", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: schedhub.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (default: from configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List events, optionally only those covering a date
    List {
        /// Date to filter on (yyyy-mm-dd)
        #[arg(long)]
        date: Option<String>,
    },
    /// Register a new event
    Register {
        /// Product code (e.g. EGL, NOV)
        #[arg(long)]
        product: String,
        /// Event name
        #[arg(long)]
        name: String,
        /// Organizing society
        #[arg(long, default_value = "")]
        organizer: String,
        /// Venue
        #[arg(long, default_value = "")]
        location: String,
        /// Start date (yyyy-mm-dd)
        #[arg(long)]
        start: String,
        /// End date (yyyy-mm-dd, defaults to the start date)
        #[arg(long)]
        end: Option<String>,
        /// Whether the PM attends
        #[arg(long)]
        pm_attend: bool,
        /// Booth size
        #[arg(long, default_value = "1")]
        booth_size: u32,
    },
    /// Sign an attendee up for an event
    Join {
        /// Event id
        event_id: String,
        /// Attendee name
        name: String,
    },
    /// Remove an attendee from an event
    Leave {
        /// Event id
        event_id: String,
        /// Attendee name
        name: String,
    },
    /// Delete an event
    Remove {
        /// Event id
        event_id: String,
    },
    /// Bulk-import events from a CSV export of the scheduling spreadsheet
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Show the attendance ranking
    Ranking {
        /// Period: all, this-month, this-year, a month count, or custom
        #[arg(long)]
        period: Option<String>,
        /// Custom range start (yyyy-mm-dd, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// Custom range end (yyyy-mm-dd, inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Day type: all, weekday, or weekend
        #[arg(long)]
        day_type: Option<String>,
        /// Division filter
        #[arg(long)]
        affiliation: Option<String>,
        /// Group filter
        #[arg(long)]
        group: Option<String>,
        /// Product filter
        #[arg(long)]
        product: Option<String>,
    },
    /// Show the employee directory
    Directory,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,tower=debug", // -vvv shows everything including dependencies
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("schedhub started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let mut hub = build_hub(&config).await?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            ApiServer::new(hub, port).start().await?;
        }
        Commands::List { date } => {
            let events: Vec<_> = match date {
                Some(raw) => {
                    let date = chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                        .map_err(|_| anyhow::anyhow!("invalid date: {raw:?}"))?;
                    hub.events_on(date).into_iter().cloned().collect()
                }
                None => hub.events().to_vec(),
            };
            if events.is_empty() {
                println!("No events found.");
            } else {
                for ev in events {
                    println!(
                        "{}  {} ~ {}  [{}] {}  ({} attendees)",
                        ev.id,
                        ev.start_date,
                        ev.end_date,
                        ev.product,
                        ev.event_name,
                        ev.attendees.len()
                    );
                }
            }
        }
        Commands::Register {
            product,
            name,
            organizer,
            location,
            start,
            end,
            pm_attend,
            booth_size,
        } => {
            let created = hub
                .register(NewEvent {
                    product,
                    event_name: name,
                    organizer,
                    location,
                    start_date: start,
                    end_date: end,
                    pm_attend,
                    attendees: vec![],
                    booth_size,
                })
                .await?;
            println!("Registered event {} ({})", created.event_name, created.id);
        }
        Commands::Join { event_id, name } => {
            let updated = hub.add_attendee(&event_id, &name).await?;
            println!(
                "{} signed up for {} ({} attendees)",
                name.trim(),
                updated.event_name,
                updated.attendees.len()
            );
        }
        Commands::Leave { event_id, name } => {
            let updated = hub.remove_attendee(&event_id, &name).await?;
            println!(
                "{} removed from {} ({} attendees)",
                name.trim(),
                updated.event_name,
                updated.attendees.len()
            );
        }
        Commands::Remove { event_id } => {
            hub.delete_event(&event_id).await?;
            println!("Deleted event {event_id}");
        }
        Commands::Import { file } => {
            let reader = std::fs::File::open(&file)?;
            let batch = import::parse_csv(reader)?;
            let summary = hub.import(batch).await?;
            println!(
                "Imported {} events ({} rows skipped)",
                summary.imported, summary.skipped
            );
        }
        Commands::Ranking {
            period,
            from,
            to,
            day_type,
            affiliation,
            group,
            product,
        } => {
            let filter = ReportFilter::from_parts(
                period.as_deref(),
                from.as_deref(),
                to.as_deref(),
                day_type.as_deref(),
                affiliation.as_deref(),
                group.as_deref(),
                product.as_deref(),
            )
            .map_err(|e| anyhow::anyhow!(e))?;
            let rows = hub.ranking(&filter);
            if rows.is_empty() {
                println!("No employees match the filter.");
            } else {
                for (rank, row) in rows.iter().enumerate() {
                    println!(
                        "{:>3}. {:<10} {:<14} {:<10} {:>4}",
                        rank + 1,
                        row.name,
                        row.affiliation,
                        row.group,
                        row.count
                    );
                }
            }
        }
        Commands::Directory => {
            for emp in hub.directory().iter() {
                println!("{:<10} {:<14} {}", emp.name, emp.affiliation, emp.group);
            }
        }
    }

    Ok(())
}

async fn build_hub(config: &Config) -> anyhow::Result<EventHub> {
    let directory = match &config.roster {
        Some(path) => Directory::from_toml_file(path)?,
        None => Directory::default(),
    };

    let store: Arc<dyn EventStore> = if config.has_remote_store() {
        Arc::new(RestStore::new(
            &config.store.url,
            &config.store.key,
            &config.store.table,
        )?)
    } else {
        warn!("no remote store configured; using the in-memory backend (data is not persisted)");
        Arc::new(MemoryStore::new())
    };

    let mut hub = EventHub::new(store, directory);
    hub.refresh().await?;
    Ok(hub)
}
