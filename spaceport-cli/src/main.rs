#![deny(missing_docs)]
//! Spaceport command-line interface.
//!
//! Lists, counts, inspects and edits ships through the Spaceport HTTP API.

mod client;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::ApiClient;
use spaceport_core::{PageRequest, Ship, ShipDraft, ShipFilter, ShipOrder, ShipType};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "spaceport", version, about = "Spaceport CLI")]
struct Cli {
    /// Base URL of the Spaceport server.
    #[arg(long, global = true, env = "SPACEPORT_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name (case-sensitive).
    #[arg(long)]
    name: Option<String>,
    /// Substring of the planet (case-sensitive).
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (MERCHANT, MILITARY, TRANSPORT).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Earliest production date, RFC 3339.
    #[arg(long)]
    after: Option<DateTime<Utc>>,
    /// Latest production date, RFC 3339.
    #[arg(long)]
    before: Option<DateTime<Utc>>,
    /// Usage flag.
    #[arg(long)]
    is_used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl From<FilterArgs> for ShipFilter {
    fn from(args: FilterArgs) -> Self {
        ShipFilter {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            after: args.after.map(|instant| instant.timestamp_millis()),
            before: args.before.map(|instant| instant.timestamp_millis()),
            is_used: args.is_used,
            min_speed: args.min_speed,
            max_speed: args.max_speed,
            min_crew_size: args.min_crew_size,
            max_crew_size: args.max_crew_size,
            min_rating: args.min_rating,
            max_rating: args.max_rating,
        }
    }
}

#[derive(Args, Clone, Debug)]
struct PageArgs {
    /// Sort key (ID, SPEED, CREW_SIZE, DATE, RATING).
    #[arg(long, default_value_t = ShipOrder::Id)]
    order: ShipOrder,
    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    page_number: u32,
    /// Ships per page.
    #[arg(long, default_value_t = PageRequest::DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            order: args.order,
            page_number: args.page_number,
            page_size: args.page_size,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipFieldArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (MERCHANT, MILITARY, TRANSPORT).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Production date, RFC 3339.
    #[arg(long)]
    prod_date: Option<DateTime<Utc>>,
    /// Whether the ship is second-hand.
    #[arg(long)]
    is_used: Option<bool>,
    /// Speed in [0.01, 0.99].
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size in [1, 9999].
    #[arg(long)]
    crew_size: Option<i32>,
}

impl From<ShipFieldArgs> for ShipDraft {
    fn from(args: ShipFieldArgs) -> Self {
        ShipDraft {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            prod_date: args.prod_date,
            is_used: args.is_used,
            speed: args.speed,
            crew_size: args.crew_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship identifier.
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// Create a ship.
    Create {
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Update the given fields of a ship.
    Update {
        /// Ship identifier.
        #[arg(allow_hyphen_values = true)]
        id: String,
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server_url)?;
    let output = run(&client, cli.command, cli.format).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

#[cfg(test)]
fn main() {}

#[cfg_attr(test, allow(dead_code))]
async fn run(client: &ApiClient, command: Commands, format: OutputFormat) -> CliResult<String> {
    match command {
        Commands::List { filter, page } => {
            let ships = client.list(&filter.into(), &page.into()).await?;
            render_ships(&ships, format)
        }
        Commands::Count { filter } => {
            let count = client.count(&filter.into()).await?;
            Ok(count.to_string())
        }
        Commands::Get { id } => {
            let ship = client.get(&id).await?;
            render_ship(&ship, format)
        }
        Commands::Create { fields } => {
            let ship = client.create(&fields.into()).await?;
            render_ship(&ship, format)
        }
        Commands::Update { id, fields } => {
            let ship = client.update(&id, &fields.into()).await?;
            render_ship(&ship, format)
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            Ok(format!("Deleted ship {id}."))
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
        OutputFormat::Text => Ok(ship_line(ship)),
    }
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ships)?),
        OutputFormat::Text => {
            if ships.is_empty() {
                return Ok("No ships found.".to_string());
            }
            let mut output = String::new();
            for ship in ships {
                writeln!(output, "{}", ship_line(ship))?;
            }
            Ok(output.trim_end().to_string())
        }
    }
}

fn ship_line(ship: &Ship) -> String {
    format!(
        "#{} {} [{}] from {} | built {} | speed {:.2} | crew {} | rating {:.2}{}",
        ship.id,
        ship.name,
        ship.ship_type,
        ship.planet,
        ship.prod_date.format("%Y-%m-%d"),
        ship.speed,
        ship.crew_size,
        ship.rating,
        if ship.is_used { " | used" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    fn ship() -> Ship {
        Ship {
            id: 4,
            name: "Nostromo".to_string(),
            planet: "Thedus".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(3002, 5, 1, 0, 0, 0).unwrap(),
            is_used: true,
            speed: 0.27,
            crew_size: 7,
            rating: 0.6,
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_filters_and_paging() {
        let cli = Cli::try_parse_from([
            "spaceport",
            "list",
            "--ship-type",
            "military",
            "--after",
            "2900-01-01T00:00:00Z",
            "--is-used",
            "false",
            "--order",
            "RATING",
            "--page-size",
            "10",
        ])
        .expect("parse");
        let Commands::List { filter, page } = cli.command else {
            panic!("expected list command");
        };
        let filter = ShipFilter::from(filter);
        let page = PageRequest::from(page);
        assert_eq!(filter.ship_type, Some(ShipType::Military));
        assert_eq!(filter.after, Some(29_348_006_400_000));
        assert_eq!(filter.is_used, Some(false));
        assert_eq!(page.order, ShipOrder::Rating);
        assert_eq!(page.page_number, 0);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn parses_update_fields_and_negative_ids() {
        let cli = Cli::try_parse_from(["spaceport", "update", "-5", "--speed", "0.4"])
            .expect("parse");
        let Commands::Update { id, fields } = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(id, "-5");
        let draft = ShipDraft::from(fields);
        assert_eq!(draft.speed, Some(0.4));
        assert_eq!(draft.name, None);
    }

    #[test]
    fn renders_text_line() {
        let line = ship_line(&ship());
        assert_eq!(
            line,
            "#4 Nostromo [TRANSPORT] from Thedus | built 3002-05-01 | speed 0.27 | crew 7 | rating 0.60 | used"
        );
    }

    #[test]
    fn renders_empty_listing() {
        let output = render_ships(&[], OutputFormat::Text).expect("render");
        assert_eq!(output, "No ships found.");
    }

    #[test]
    fn renders_json() {
        let output = render_ship(&ship(), OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["shipType"], "TRANSPORT");
        assert_eq!(value["crewSize"], 7);
    }
}
