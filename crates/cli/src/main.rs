//! Administrative CLI for the bookstore service.

use anyhow::Context;
use bookstore_app::modules::{authors::Authors, books::Books};
use bookstore_app::App;
use bookstore_db::{Database, Resource, ResourceStore};
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookstore-cli")]
#[command(about = "Administrative CLI for the bookstore service")]
#[command(version)]
struct Cli {
    /// Database URL (overrides configuration)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the authors and books tables if they do not exist
    InitDb,
    /// Check an existing database and print record counts; never creates or migrates
    CheckDb,
    /// Run the HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load bookstore settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Commands::InitDb => {
            let app = App::bootstrap(settings).await?;
            println!("Schema applied to {}", app.settings.database.url);
            app.db.close().await;
        }
        Commands::CheckDb => {
            let db = Database::connect_existing(&settings.database)
                .await
                .with_context(|| format!("failed to open database {}", settings.database.url))?;
            db.ping().await.context("database connection failed")?;
            println!("Database connection OK");
            let counted = print_all_counts(&db).await;
            db.close().await;
            counted?;
        }
        Commands::Serve => {
            App::bootstrap(settings).await?.serve().await?;
        }
    }

    Ok(())
}

async fn print_all_counts(db: &Database) -> anyhow::Result<()> {
    print_counts::<Authors>(db).await?;
    print_counts::<Books>(db).await
}

async fn print_counts<R: Resource>(db: &Database) -> anyhow::Result<()> {
    let counts = db
        .store::<R>()
        .counts()
        .await
        .with_context(|| format!("failed to count {}", R::TABLE))?;
    println!(
        "{}: {} active, {} deleted",
        R::TABLE,
        counts.active,
        counts.deleted
    );
    Ok(())
}
