use anyhow::Result;
use clap::Parser;
use ecovia::commands::{self, Config};
use ecovia::runtime::RealRuntime;
use std::path::PathBuf;

/// ecovia - command-line client for the Ecovia sustainable travel API
///
/// Discover eco-rated accommodations, plan itineraries, register for
/// volunteer conservation events, and manage your profile and reviews.
///
/// Credentials are stored under ~/.ecovia (override with ECOVIA_HOME).
#[derive(Parser, Debug)]
#[command(author, version = env!("ECOVIA_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ecovia API base URL (origin plus versioned prefix)
    #[arg(
        long = "api-url",
        env = "ECOVIA_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,

    /// Directory for stored credentials (also via ECOVIA_HOME)
    #[arg(
        long = "data-dir",
        env = "ECOVIA_HOME",
        value_name = "PATH",
        global = true
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Sign in with email and password
    Login(LoginArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign out and clear stored credentials
    Logout,

    /// Browse eco-rated accommodations
    #[command(subcommand)]
    Accommodations(AccommodationsCommand),

    /// Plan and manage itineraries
    #[command(subcommand)]
    Itinerary(ItineraryCommand),

    /// Volunteer conservation events
    #[command(subcommand)]
    Events(EventsCommand),

    /// Your profile, points and badges
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Accommodation reviews
    #[command(subcommand)]
    Reviews(ReviewsCommand),
}

#[derive(clap::Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(clap::Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(clap::Subcommand, Debug)]
enum AccommodationsCommand {
    /// List accommodations
    List {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show one accommodation in detail
    Show { id: String },
}

#[derive(clap::Subcommand, Debug)]
enum ItineraryCommand {
    /// List your itineraries
    List,
    /// Generate an itinerary server-side
    Plan {
        #[arg(long)]
        destination: String,
        #[arg(long = "start", value_name = "DATE")]
        start_date: String,
        #[arg(long = "end", value_name = "DATE")]
        end_date: String,
        /// May be given multiple times
        #[arg(long = "interest", value_name = "TOPIC")]
        interests: Vec<String>,
    },
    /// Delete an itinerary
    Remove { id: String },
}

#[derive(clap::Subcommand, Debug)]
enum EventsCommand {
    /// List conservation events
    List {
        /// Only events you have joined
        #[arg(long)]
        joined: bool,
    },
    /// Register for an event
    Join { id: String },
    /// Cancel a registration
    Leave { id: String },
}

#[derive(clap::Subcommand, Debug)]
enum ProfileCommand {
    /// Show your profile and joined events
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ReviewsCommand {
    /// List reviews for an accommodation
    List { accommodation: String },
    /// Submit a review
    Add {
        accommodation: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(RealRuntime, cli.api_url, cli.data_dir)?;

    match cli.command {
        Commands::Login(args) => commands::auth::login(&config, &args.email, &args.password).await?,
        Commands::Register(args) => {
            commands::auth::register(&config, &args.name, &args.email, &args.password).await?
        }
        Commands::Logout => commands::auth::logout(&config).await?,
        Commands::Accommodations(command) => match command {
            AccommodationsCommand::List { location, page } => {
                commands::accommodations::list(&config, location, page).await?
            }
            AccommodationsCommand::Show { id } => {
                commands::accommodations::show(&config, &id).await?
            }
        },
        Commands::Itinerary(command) => match command {
            ItineraryCommand::List => commands::itinerary::list(&config).await?,
            ItineraryCommand::Plan {
                destination,
                start_date,
                end_date,
                interests,
            } => {
                commands::itinerary::plan(&config, destination, start_date, end_date, interests)
                    .await?
            }
            ItineraryCommand::Remove { id } => commands::itinerary::remove(&config, &id).await?,
        },
        Commands::Events(command) => match command {
            EventsCommand::List { joined } => commands::events::list(&config, joined).await?,
            EventsCommand::Join { id } => commands::events::join(&config, &id).await?,
            EventsCommand::Leave { id } => commands::events::leave(&config, &id).await?,
        },
        Commands::Profile(command) => match command {
            ProfileCommand::Show => commands::profile::show(&config).await?,
            ProfileCommand::Update { name, bio } => {
                commands::profile::update(&config, name, bio).await?
            }
        },
        Commands::Reviews(command) => match command {
            ReviewsCommand::List { accommodation } => {
                commands::reviews::list(&config, &accommodation).await?
            }
            ReviewsCommand::Add {
                accommodation,
                rating,
                comment,
            } => commands::reviews::add(&config, &accommodation, rating, comment).await?,
        },
    }
    Ok(())
}
