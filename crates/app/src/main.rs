use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use tix_api::ApiClient;
use tix_checkin::UsePolicy;
use tix_config::Config;
use tix_models::{BearerToken, ConcertStatus, OrderStatus};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::OffsetTime;

mod check_in;
mod console;
mod prompt;
mod render;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_HASH: &str = env!("TIX_GIT_HASH");

fn version_string() -> String {
    format!("{VERSION} ({GIT_HASH})")
}

// --- CLI definition ---

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConcertStatusArg {
    Draft,
    Published,
    Ended,
}

impl From<ConcertStatusArg> for ConcertStatus {
    fn from(s: ConcertStatusArg) -> Self {
        match s {
            ConcertStatusArg::Draft => ConcertStatus::Draft,
            ConcertStatusArg::Published => ConcertStatus::Published,
            ConcertStatusArg::Ended => ConcertStatus::Ended,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderStatusArg {
    Pending,
    AwaitingPayment,
    Paid,
    Cancelled,
    Expired,
    Refunded,
}

impl From<OrderStatusArg> for OrderStatus {
    fn from(s: OrderStatusArg) -> Self {
        match s {
            OrderStatusArg::Pending => OrderStatus::Pending,
            OrderStatusArg::AwaitingPayment => OrderStatus::AwaitingPayment,
            OrderStatusArg::Paid => OrderStatus::Paid,
            OrderStatusArg::Cancelled => OrderStatus::Cancelled,
            OrderStatusArg::Expired => OrderStatus::Expired,
            OrderStatusArg::Refunded => OrderStatus::Refunded,
        }
    }
}

#[derive(Parser)]
#[command(name = "tix")]
#[command(about = "Concert ticketing admin console")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TIX_GIT_HASH"), ")"))]
struct Cli {
    /// Log level [default: from config, else info]
    #[arg(short, long, global = true)]
    log_level: Option<LogLevel>,

    /// Display log timestamps in UTC (default: local time)
    #[arg(long, global = true)]
    utc: bool,

    /// Console API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token for the console API
    #[arg(long, global = true)]
    token: Option<String>,

    /// IANA timezone for displayed dates (e.g. Asia/Jakarta)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// What to show after a check-in: optimistic or reconcile
    #[arg(long, global = true)]
    use_policy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive ticket check-in at the gate
    CheckIn {
        /// First code to look up
        code: Option<String>,
    },
    /// Look up a ticket code without changing it
    Validate {
        code: String,
    },
    /// Look up a ticket code and mark it used
    Use {
        code: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Dashboard totals and the most recent concerts
    Overview,
    /// Manage concerts
    #[command(subcommand)]
    Concerts(ConcertCommands),
    /// Manage a concert's ticket types
    #[command(subcommand)]
    TicketTypes(TicketTypeCommands),
    /// Browse orders
    #[command(subcommand)]
    Orders(OrderCommands),
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List orders
    List {
        /// Match order id, buyer name/email or concert title
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        status: Option<OrderStatusArg>,
    },
    /// Show one order with buyer, items, expiry and payment status
    Show {
        /// Order id or gateway order id (e.g. ORD-2025-0001)
        id: String,
    },
}

#[derive(Subcommand)]
enum ConcertCommands {
    /// List concerts
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        status: Option<ConcertStatusArg>,
    },
    /// Show a concert and its ticket types
    Show {
        id: String,
    },
    /// Create a concert
    Create {
        #[command(flatten)]
        fields: ConcertFields,
    },
    /// Replace a concert's fields
    Update {
        id: String,
        #[command(flatten)]
        fields: ConcertFields,
    },
    /// Publish a draft concert
    Publish {
        id: String,
    },
    /// Delete a concert
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
struct ConcertFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    venue: String,
    /// Start, e.g. 2025-07-12T19:00 (local to --timezone) or RFC 3339
    #[arg(long)]
    start_at: String,
    /// End, same formats as --start-at
    #[arg(long)]
    end_at: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_enum, default_value = "draft")]
    status: ConcertStatusArg,
    /// Poster image to upload
    #[arg(long)]
    image: Option<PathBuf>,
}

impl From<ConcertFields> for console::ConcertArgs {
    fn from(f: ConcertFields) -> Self {
        console::ConcertArgs {
            title: f.title,
            venue: f.venue,
            start_at: f.start_at,
            end_at: f.end_at,
            description: f.description,
            status: f.status.into(),
            image: f.image,
        }
    }
}

#[derive(Subcommand)]
enum TicketTypeCommands {
    /// Add a ticket type to a concert
    Add {
        concert_id: String,
        #[command(flatten)]
        fields: TicketTypeFields,
    },
    /// Replace a ticket type's fields
    Update {
        concert_id: String,
        ticket_type_id: String,
        #[command(flatten)]
        fields: TicketTypeFields,
    },
    /// Delete a ticket type
    Delete {
        concert_id: String,
        ticket_type_id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
struct TicketTypeFields {
    #[arg(long)]
    name: String,
    /// Price in rupiah
    #[arg(long)]
    price: f64,
    /// Total quota
    #[arg(long)]
    quota: u32,
    #[arg(long)]
    sales_start: String,
    #[arg(long)]
    sales_end: String,
}

impl From<TicketTypeFields> for console::TicketTypeArgs {
    fn from(f: TicketTypeFields) -> Self {
        console::TicketTypeArgs {
            name: f.name,
            price: f.price,
            quota: f.quota,
            sales_start: f.sales_start,
            sales_end: f.sales_end,
        }
    }
}

// --- Settings ---

/// Config file/env merged with CLI flags.
struct Settings {
    api_url: String,
    token: Option<String>,
    log_level: String,
    utc: bool,
    timezone: Tz,
    use_policy: UsePolicy,
}

impl Settings {
    fn resolve(cli: &Cli, config: Config) -> Result<Self> {
        let timezone_name = cli.timezone.clone().unwrap_or(config.timezone);
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow!("invalid timezone `{timezone_name}`: {e}"))?;
        let use_policy = cli
            .use_policy
            .clone()
            .unwrap_or(config.use_policy)
            .parse::<UsePolicy>()?;

        Ok(Self {
            api_url: cli.api_url.clone().unwrap_or(config.api_url),
            token: cli.token.clone().or(config.token),
            log_level: cli
                .log_level
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or(config.log_level),
            utc: cli.utc || config.utc,
            timezone,
            use_policy,
        })
    }

    fn token(&self) -> Result<BearerToken> {
        self.token.clone().map(BearerToken::new).ok_or_else(|| {
            anyhow!(
                "no API token: pass --token, set TIX_TOKEN, or add `token` to {}",
                Config::file_path().display()
            )
        })
    }
}

// --- Logging ---

fn init_logging(level: &str, utc: bool) {
    let filter = EnvFilter::new(level);

    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_timer(OffsetTime::new(
                time::UtcOffset::UTC,
                time::macros::format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                ),
            ))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_timer(LocalTimer)
            .init();
    }
}

struct LocalTimer;

impl tracing_subscriber::fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli, Config::load())?;
    init_logging(&settings.log_level, settings.utc);

    debug!("tix v{}", version_string());
    info!("Using console API at {}", settings.api_url);

    let client = ApiClient::new(&settings.api_url).context("building API client")?;
    let token = settings.token()?;
    let tz = settings.timezone;
    let policy = settings.use_policy;

    match cli.command {
        Commands::CheckIn { code } => {
            check_in::run_interactive(client, token, policy, tz, code).await?;
        }
        Commands::Validate { code } => {
            check_in::validate(client, token, policy, tz, &code).await?;
        }
        Commands::Use { code, yes } => {
            check_in::use_ticket(client, token, policy, tz, &code, yes).await?;
        }
        Commands::Overview => {
            console::overview(&client, &token, tz).await?;
        }
        Commands::Concerts(cmd) => match cmd {
            ConcertCommands::List { search, status } => {
                console::list_concerts(&client, &token, tz, search, status.map(Into::into)).await?;
            }
            ConcertCommands::Show { id } => {
                console::show_concert(&client, &token, tz, &id).await?;
            }
            ConcertCommands::Create { fields } => {
                console::save_concert(&client, &token, tz, None, fields.into()).await?;
            }
            ConcertCommands::Update { id, fields } => {
                console::save_concert(&client, &token, tz, Some(&id), fields.into()).await?;
            }
            ConcertCommands::Publish { id } => {
                console::publish_concert(&client, &token, &id).await?;
            }
            ConcertCommands::Delete { id, yes } => {
                console::delete_concert(&client, &token, &id, yes).await?;
            }
        },
        Commands::TicketTypes(cmd) => match cmd {
            TicketTypeCommands::Add { concert_id, fields } => {
                console::save_ticket_type(&client, &token, tz, &concert_id, None, fields.into()).await?;
            }
            TicketTypeCommands::Update { concert_id, ticket_type_id, fields } => {
                console::save_ticket_type(&client, &token, tz, &concert_id, Some(&ticket_type_id), fields.into())
                    .await?;
            }
            TicketTypeCommands::Delete { concert_id, ticket_type_id, yes } => {
                console::delete_ticket_type(&client, &token, &concert_id, &ticket_type_id, yes).await?;
            }
        },
        Commands::Orders(cmd) => match cmd {
            OrderCommands::List { search, status } => {
                console::list_orders(&client, &token, tz, search, status.map(Into::into)).await?;
            }
            OrderCommands::Show { id } => {
                console::show_order(&client, &token, tz, &id).await?;
            }
        },
    }

    Ok(())
}
