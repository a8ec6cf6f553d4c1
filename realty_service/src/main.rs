//! Realty listing reads
//!
//! Runs a single list operation against the configured store and prints the
//! result as JSON. Errors are printed as an error body.
//!
//! Usage:
//!   realty_service hotels --query '{"page": 2, "limit": 10, "sort": "-createdAt"}'
//!   realty_service filter-hotels --criteria '{"minRoomCount": 2, "currency": "USD", "maxPrice": 500}'

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use realty_query::error::ErrorBody;
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use realty_service::{
    config::AppConfig,
    context::{QueryContext, QueryManagers},
    error::{AppError, AppResult},
    feature::model::FeatureListParams,
    hotel::criteria::{HotelFilterCriteria, HotelListParams},
    tracing::tracer::Tracer,
};

#[derive(Parser, Debug)]
#[clap(name = "realty_service")]
#[clap(about = "Run listing queries against the configured store")]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Admin hotel list
    Hotels {
        #[clap(long, default_value = "{}")]
        query: String,
        #[clap(long, default_value = "{}")]
        params: String,
    },
    /// Hotels of one manager
    MyHotels {
        #[clap(long)]
        manager_id: String,
        #[clap(long, default_value = "{}")]
        query: String,
    },
    /// Published hotel by slug
    Hotel {
        #[clap(long)]
        slug: String,
    },
    /// Public hotel search
    FilterHotels {
        #[clap(long, default_value = "{}")]
        criteria: String,
    },
    Features {
        #[clap(long, default_value = "{}")]
        query: String,
        #[clap(long, default_value = "{}")]
        params: String,
    },
    QuickFilters {
        #[clap(long, default_value = "{}")]
        query: String,
        #[clap(long, default_value = "{}")]
        params: String,
    },
    GeneralFeatures,
    DistanceTypes {
        #[clap(long, default_value = "{}")]
        query: String,
    },
    Users {
        #[clap(long, default_value = "{}")]
        query: String,
    },
    SavedFilters {
        #[clap(long, default_value = "{}")]
        query: String,
    },
    /// Saved filters of one user
    UserFilters {
        #[clap(long)]
        user_id: String,
        /// Only filters with notifications enabled
        #[clap(long)]
        notifying: bool,
    },
    /// Messages about one hotel
    Messages {
        #[clap(long)]
        hotel_id: String,
        #[clap(long, default_value = "{}")]
        query: String,
    },
    /// Favorites of one user
    Favorites {
        #[clap(long)]
        user_id: String,
        #[clap(long, default_value = "{}")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match start(args.command).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = ErrorBody::from(err);
            match serde_json::to_string_pretty(&body) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("{}: {}", body.error_code, body.message),
            }
            ExitCode::FAILURE
        }
    }
}

async fn start(command: Command) -> AppResult<String> {
    let config = AppConfig::get()?;
    Tracer::install(config)?;
    info!(
        "Starting {} v{}",
        config.distribution.name,
        config.distribution.version.as_deref().unwrap_or("unknown"),
    );

    let context = QueryContext::connect(&config.database, &config.query).await?;
    run(&context.query_managers(), command).await
}

async fn run(managers: &QueryManagers, command: Command) -> AppResult<String> {
    match command {
        Command::Hotels { query, params } => {
            let params: HotelListParams = parse("params", &params)?;
            output(&managers.hotels.find_all(&parse("query", &query)?, &params).await?)
        }
        Command::MyHotels { manager_id, query } => {
            output(&managers.hotels.find_mine(&manager_id, &parse("query", &query)?).await?)
        }
        Command::Hotel { slug } => output(&managers.hotels.find_by_slug(&slug).await?),
        Command::FilterHotels { criteria } => {
            let criteria: HotelFilterCriteria = parse("criteria", &criteria)?;
            output(&managers.hotels.filter_hotels(&criteria).await?)
        }
        Command::Features { query, params } => {
            let params: FeatureListParams = parse("params", &params)?;
            output(&managers.features.find_all(&parse("query", &query)?, &params).await?)
        }
        Command::QuickFilters { query, params } => {
            let params: FeatureListParams = parse("params", &params)?;
            output(&managers.features.find_quick_filters(&parse("query", &query)?, &params).await?)
        }
        Command::GeneralFeatures => output(&managers.features.general_features().await?),
        Command::DistanceTypes { query } => {
            output(&managers.distance_types.find_all(&parse("query", &query)?).await?)
        }
        Command::Users { query } => output(&managers.users.find_all(&parse("query", &query)?).await?),
        Command::SavedFilters { query } => {
            output(&managers.saved_filters.find_all(&parse("query", &query)?).await?)
        }
        Command::UserFilters { user_id, notifying } => {
            let filters = if notifying {
                managers.saved_filters.find_with_notifications(&user_id).await?
            } else {
                managers.saved_filters.find_all_by_user(&user_id).await?
            };
            output(&filters)
        }
        Command::Messages { hotel_id, query } => output(
            &managers
                .hotel_messages
                .find_for_hotel(&hotel_id, &parse("query", &query)?)
                .await?,
        ),
        Command::Favorites { user_id, query } => {
            output(&managers.favorites.find_for_user(&user_id, &parse("query", &query)?).await?)
        }
    }
}

fn parse<T>(argument: &'static str, source: &str) -> AppResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(source).map_err(|err| AppError::invalid_argument(argument, err))
}

fn output<T>(value: &T) -> AppResult<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}
