#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line road safety dashboard.
//!
//! ```text
//! road_safety login --email analyst@example.com
//! road_safety signup --name "A. Analyst" --email analyst@example.com --agree-terms
//! road_safety predict --weather Rain --speed-limit 90 --alcohol
//! road_safety stats
//! road_safety hotspots [--limit 20]
//! road_safety admin
//! road_safety serve
//! ```
//!
//! Running `road_safety` with no subcommand enters interactive mode. The
//! session is kept under `ROAD_SAFETY_SESSION_DIR` between runs.

mod dashboard;
mod interactive;
mod render;

use clap::{Parser, Subcommand};
use dialoguer::Password;
use road_safety_accident_models::{
    DriverAge, JunctionControl, LightCondition, RoadSurface, RoadType, TimeOfDay, VehicleType,
    WeatherCondition,
};
use road_safety_api::config::{BackendKind, ClientConfig};
use road_safety_api_models::PredictionInput;
use road_safety_server::DEFAULT_HOTSPOT_LIMIT;
use road_safety_session::{FileStorage, SessionContext, SessionStore};
use road_safety_session_models::{ProfileUpdate, SignupForm};

use crate::dashboard::{CliError, Dashboard};

#[derive(Parser)]
#[command(name = "road_safety", about = "Road accident severity prediction dashboard")]
struct Cli {
    /// Data source: `mock` or `http` (overrides `ROAD_SAFETY_BACKEND`)
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Accept the terms and conditions
        #[arg(long)]
        agree_terms: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user and the pages available to them
    Whoami,
    /// Edit the signed-in user's profile. Pass an empty contact value to
    /// remove it.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    /// Predict the severity of an accident under the given conditions
    Predict(PredictArgs),
    /// Show dashboard statistics and the monthly severity trend
    Stats,
    /// List accident hotspots grouped by location
    Hotspots {
        /// Number of accident records to fetch
        #[arg(long, default_value_t = DEFAULT_HOTSPOT_LIMIT)]
        limit: u32,
    },
    /// Show system statistics and users (administrators only)
    Admin,
    /// Run the API server
    Serve,
}

#[derive(clap::Args)]
struct PredictArgs {
    #[arg(long, default_value_t)]
    weather: WeatherCondition,
    #[arg(long, default_value_t)]
    light: LightCondition,
    #[arg(long, default_value_t)]
    road_type: RoadType,
    #[arg(long, default_value_t = 60)]
    speed_limit: u16,
    #[arg(long, default_value_t)]
    vehicle: VehicleType,
    #[arg(long, default_value_t)]
    junction: JunctionControl,
    #[arg(long, default_value_t)]
    surface: RoadSurface,
    #[arg(long)]
    pedestrian: bool,
    #[arg(long)]
    alcohol: bool,
    #[arg(long, default_value_t)]
    driver_age: DriverAge,
    #[arg(long, default_value_t)]
    time_of_day: TimeOfDay,
}

impl From<PredictArgs> for PredictionInput {
    fn from(args: PredictArgs) -> Self {
        Self {
            weather_conditions: args.weather,
            light_conditions: args.light,
            road_type: args.road_type,
            speed_limit: args.speed_limit,
            vehicle_type: args.vehicle,
            junction_control: args.junction,
            road_surface: args.surface,
            pedestrian_involved: args.pedestrian,
            alcohol_involved: args.alcohol,
            driver_age: args.driver_age,
            time_of_day: args.time_of_day,
        }
    }
}

fn parse_backend(value: &str) -> Result<BackendKind, String> {
    value
        .parse()
        .map_err(|()| format!("unknown backend {value:?} (expected mock or http)"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let store = SessionStore::new(Box::new(FileStorage::new(config.session_dir.clone())));
    let api = road_safety_api::create_backend(&config)?;
    let mut dash = Dashboard::new(SessionContext::init(store), api);

    let Some(command) = cli.command else {
        interactive::run(&mut dash).await?;
        return Ok(());
    };

    if let Err(e) = execute(&mut dash, command).await {
        eprintln!("{e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn execute(dash: &mut Dashboard, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };
            let session = dash.login(&email, &password).await?;
            println!("Signed in as {}", render::session(session));
        }
        Commands::Signup {
            name,
            email,
            agree_terms,
        } => {
            let form = SignupForm {
                name,
                email,
                password: Password::new().with_prompt("Password").interact()?,
                confirm_password: Password::new().with_prompt("Confirm password").interact()?,
                agree_terms,
            };
            let session = dash.signup(form).await?;
            println!("Signed in as {}", render::session(session));
        }
        Commands::Logout => {
            dash.logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => match dash.session() {
            Some(session) => {
                println!("{}", render::session(session));
                let pages: Vec<&str> = dash.navigation().iter().map(|r| r.label()).collect();
                println!("Pages: {}", pages.join(", "));
            }
            None => println!("Not logged in."),
        },
        Commands::Profile {
            name,
            email,
            phone,
            address,
            city,
            country,
        } => {
            let session = dash.update_profile(ProfileUpdate {
                name,
                email,
                phone,
                address,
                city,
                country,
            })?;
            println!("Saved: {}", render::session(session));
        }
        Commands::Predict(args) => {
            let input = PredictionInput::from(args);
            if let Some(result) = dash.predict(&input).await? {
                println!("{}", render::prediction(result));
            }
        }
        Commands::Stats => {
            println!("{}", render::stats(&dash.stats().await?));
            println!("\n{}", render::monthly_trend(&dash.monthly_trend().await?));
        }
        Commands::Hotspots { limit } => {
            let (records, clusters) = dash.hotspots(limit).await?;
            println!("{}", render::hotspots(&records, &clusters));
        }
        Commands::Admin => {
            println!("{}", render::admin(&dash.admin_stats().await?));
            println!("\n{}", render::admin_users(&dash.admin_users().await?));
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(road_safety_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
