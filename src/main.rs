use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use sumoapi::commands::{self, HistoryKind};
use sumoapi::config::VERSION;
use sumoapi::sumo::{
    KimariteMatchesQuery, KimariteQuery, KimariteSortField, Pagination, SortOrder,
};
use sumoapi::{ClientConfig, SumoApi, SumoClient};

/// sumo - query the sumo statistics API
///
/// Every command prints its result as pretty-printed JSON.
///
/// Examples:
///   sumo rikishi 1511                   # Profile of rikishi 1511
///   sumo banzuke 202305 Makuuchi        # Top-division banzuke of May 2023
///   sumo ranks --rikishi-id 1511        # Rank history, oldest first
#[derive(Parser, Debug)]
#[command(author, version = VERSION, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API root URL (defaults to https://sumo-api.com/api; also via SUMO_API_URL)
    #[arg(long = "base-url", env = "SUMO_API_URL", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Retries after the first attempt for transient failures
    #[arg(long = "max-retries", value_name = "N", global = true)]
    pub max_retries: Option<u32>,

    /// Connect and read timeout, in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(retries) = self.max_retries {
            config = config.with_max_retries(retries);
        }
        if let Some(secs) = self.timeout {
            config = config
                .with_connect_timeout(Duration::from_secs(secs))
                .with_read_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show a rikishi's profile
    Rikishi(RikishiArgs),

    /// Show a rikishi's career statistics
    Stats(RikishiArgs),

    /// List shikona changes
    Shikona(HistoryArgs),

    /// List height and weight measurements
    Measurements(HistoryArgs),

    /// List rank history
    Ranks(HistoryArgs),

    /// Show a basho with its yusho and special prize winners
    Basho(BashoArgs),

    /// Show the banzuke of one division
    Banzuke(BanzukeArgs),

    /// Show one day's bouts in one division
    Torikumi(TorikumiArgs),

    /// Show kimarite usage, or the bouts won by one kimarite
    Kimarite(KimariteArgs),
}

#[derive(clap::Args, Debug)]
pub struct RikishiArgs {
    #[arg(value_name = "RIKISHI_ID")]
    pub rikishi_id: u32,
}

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    #[arg(long = "rikishi-id", value_name = "ID")]
    pub rikishi_id: Option<u32>,

    /// Basho in YYYYMM format
    #[arg(long = "basho-id", value_name = "YYYYMM")]
    pub basho_id: Option<String>,

    /// Order by basho: asc or desc
    #[arg(long, value_name = "ORDER", default_value = "asc")]
    pub order: SortOrder,
}

#[derive(clap::Args, Debug)]
pub struct BashoArgs {
    #[arg(value_name = "YYYYMM")]
    pub basho_id: String,
}

#[derive(clap::Args, Debug)]
pub struct BanzukeArgs {
    #[arg(value_name = "YYYYMM")]
    pub basho_id: String,

    /// Makuuchi, Juryo, Makushita, Sandanme, Jonidan or Jonokuchi
    #[arg(value_name = "DIVISION")]
    pub division: String,
}

#[derive(clap::Args, Debug)]
pub struct TorikumiArgs {
    #[arg(value_name = "YYYYMM")]
    pub basho_id: String,

    #[arg(value_name = "DIVISION")]
    pub division: String,

    /// Day of the basho, 1 to 15
    #[arg(value_name = "DAY")]
    pub day: u32,
}

#[derive(clap::Args, Debug)]
pub struct KimariteArgs {
    /// List the bouts won with this kimarite instead of usage statistics
    #[arg(value_name = "KIMARITE")]
    pub name: Option<String>,

    /// count, kimarite or lastUsage (statistics only)
    #[arg(long = "sort-field", value_name = "FIELD")]
    pub sort_field: Option<KimariteSortField>,

    /// asc or desc
    #[arg(long = "sort-order", value_name = "ORDER", default_value = "asc")]
    pub sort_order: SortOrder,

    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,

    #[arg(long, value_name = "N", default_value_t = 0)]
    pub skip: u32,
}

async fn run<A: SumoApi + ?Sized>(api: &A, command: Commands) -> Result<String> {
    match command {
        Commands::Rikishi(args) => commands::rikishi(api, args.rikishi_id).await,
        Commands::Stats(args) => commands::stats(api, args.rikishi_id).await,
        Commands::Shikona(args) => history(api, HistoryKind::Shikona, args).await,
        Commands::Measurements(args) => history(api, HistoryKind::Measurements, args).await,
        Commands::Ranks(args) => history(api, HistoryKind::Ranks, args).await,
        Commands::Basho(args) => commands::basho(api, &args.basho_id).await,
        Commands::Banzuke(args) => commands::banzuke(api, &args.basho_id, &args.division).await,
        Commands::Torikumi(args) => {
            commands::torikumi(api, &args.basho_id, &args.division, args.day).await
        }
        Commands::Kimarite(args) => {
            let page = Pagination {
                limit: args.limit,
                skip: args.skip,
            };
            match args.name {
                Some(name) => {
                    let query = KimariteMatchesQuery {
                        sort_order: Some(args.sort_order),
                        page,
                    };
                    commands::kimarite_matches(api, &name, query).await
                }
                None => {
                    let query = KimariteQuery {
                        sort_field: args.sort_field,
                        sort_order: Some(args.sort_order),
                        page,
                    };
                    commands::kimarite(api, query).await
                }
            }
        }
    }
}

async fn history<A: SumoApi + ?Sized>(api: &A, kind: HistoryKind, args: HistoryArgs) -> Result<String> {
    commands::history(api, kind, args.rikishi_id, args.basho_id, args.order).await
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let client = SumoClient::new(cli.client_config())?;
    let output = run(&client, cli.command).await?;
    println!("{}", output);
    client.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_rikishi_parsing() {
        let cli = Cli::try_parse_from(["sumo", "rikishi", "1511"]).unwrap();
        match cli.command {
            Commands::Rikishi(args) => assert_eq!(args.rikishi_id, 1511),
            _ => panic!("Expected Rikishi command"),
        }
        assert_eq!(cli.max_retries, None);
    }

    #[test]
    fn test_cli_history_defaults_to_ascending() {
        let cli = Cli::try_parse_from(["sumo", "ranks", "--rikishi-id", "1511"]).unwrap();
        match cli.command {
            Commands::Ranks(args) => {
                assert_eq!(args.rikishi_id, Some(1511));
                assert_eq!(args.basho_id, None);
                assert_eq!(args.order, SortOrder::Asc);
            }
            _ => panic!("Expected Ranks command"),
        }
    }

    #[test]
    fn test_cli_history_order_is_validated() {
        let cli = Cli::try_parse_from([
            "sumo",
            "measurements",
            "--basho-id",
            "202305",
            "--order",
            "desc",
        ])
        .unwrap();
        match cli.command {
            Commands::Measurements(args) => assert_eq!(args.order, SortOrder::Desc),
            _ => panic!("Expected Measurements command"),
        }

        assert!(Cli::try_parse_from(["sumo", "shikona", "--order", "sideways"]).is_err());
    }

    #[test]
    fn test_cli_torikumi_parsing() {
        let cli = Cli::try_parse_from(["sumo", "torikumi", "202305", "Makuuchi", "15"]).unwrap();
        match cli.command {
            Commands::Torikumi(args) => {
                assert_eq!(args.basho_id, "202305");
                assert_eq!(args.division, "Makuuchi");
                assert_eq!(args.day, 15);
            }
            _ => panic!("Expected Torikumi command"),
        }
    }

    #[test]
    fn test_cli_kimarite_parsing() {
        let cli = Cli::try_parse_from([
            "sumo",
            "kimarite",
            "--sort-field",
            "lastUsage",
            "--limit",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Kimarite(args) => {
                assert_eq!(args.name, None);
                assert_eq!(args.sort_field, Some(KimariteSortField::LastUsage));
                assert_eq!(args.sort_order, SortOrder::Asc);
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.skip, 0);
            }
            _ => panic!("Expected Kimarite command"),
        }

        assert!(Cli::try_parse_from(["sumo", "kimarite", "--sort-field", "bogus"]).is_err());
    }

    #[test]
    fn test_cli_global_options_build_config() {
        let cli = Cli::try_parse_from([
            "sumo",
            "--base-url",
            "http://localhost:8080/api",
            "--max-retries",
            "0",
            "--timeout",
            "9",
            "basho",
            "202305",
        ])
        .unwrap();

        let config = cli.client_config();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.connect_timeout, Duration::from_secs(9));
        assert_eq!(config.read_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_cli_rejects_non_numeric_rikishi_id() {
        assert!(Cli::try_parse_from(["sumo", "stats", "terunofuji"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["sumo"]).is_err());
    }
}
