use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feature_sheet::api::{self, AppState};
use feature_sheet::config::{get_config_path, AppConfig};
use feature_sheet::outline::render_outline;
use feature_sheet::report;
use feature_sheet::sheet::{Session, Sheet};

#[derive(Parser)]
#[command(name = "fsheet")]
#[command(about = "Feature planning sheet with PDF report export")]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API with a fresh seeded sheet
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Export the seeded sheet as a PDF report
    Export {
        /// Directory to write the report into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the seeded sheet as a tree
    Outline,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "feature_sheet=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: &AppConfig, port: u16) -> anyhow::Result<()> {
    let session = Session::seeded(config.strict_indices());
    let app = api::create_router(AppState::new(session, config.export_options()));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Feature sheet listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(&config, port.unwrap_or(config.port)).await?;
        }
        Some(Commands::Export { out }) => {
            let path = report::write_document(&Sheet::seeded(), &config.export_options(), &out)?;
            println!("{}", path.display());
        }
        Some(Commands::Outline) => {
            print!("{}", render_outline(&Sheet::seeded()));
        }
        Some(Commands::InitConfig { force }) => {
            let path = match cli.config {
                Some(path) => path,
                None => get_config_path()?,
            };
            AppConfig::init_at(&path, force)?;
            println!("{}", path.display());
        }
        None => {
            serve(&config, config.port).await?;
        }
    }

    Ok(())
}
