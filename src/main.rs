use anyhow::{anyhow, Context, Result};
use clap::Parser;
use meal_import::db::PgRecipeStore;
use meal_import::import_config::ImportConfig;
use meal_import::importer::{add_missing_default_meal_types, read_document, MarkdownImporter};
use meal_import::localization::t_count_lang;
use meal_import::store::InMemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Import markdown recipes into a meal planning account
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Recipe document (.md, .markdown or .txt)
    file: PathBuf,
    /// Account that will own the imported recipes
    #[arg(long, env = "MEAL_IMPORT_ACCOUNT_ID", required_unless_present = "dry_run")]
    account: Option<i64>,
    /// Print the parsed recipes and import them into a throwaway in-memory store
    #[arg(long)]
    dry_run: bool,
    /// Create the standard meal types the account is missing before importing
    #[arg(long)]
    seed_meal_types: bool,
    /// Message language (pl or en)
    #[arg(long)]
    locale: Option<String>,
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,
    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // try_init also forwards `log` records from the parser modules
    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(err) = result {
        eprintln!("Failed to initialize logging: {err}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file before clap reads them
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut config = ImportConfig::from_env()?;
    if let Some(locale) = &cli.locale {
        config = config.with_locale(locale)?;
    }
    let locale = config.locale.clone();

    let markdown = read_document(&cli.file, &config)?;
    info!(file = %cli.file.display(), "Loaded recipe document");

    if cli.dry_run {
        let account_id = cli.account.unwrap_or(1);
        let mut importer =
            MarkdownImporter::with_config(InMemoryStore::new(), StdRng::from_entropy(), config);
        let recipes = importer.preview(&markdown);
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        eprintln!("{}", t_count_lang("preview-summary", recipes.len(), Some(&locale)));

        let summary = importer.import(&markdown, account_id).await?;
        eprintln!("{}", summary.render(&locale));
        return Ok(());
    }

    let account_id = cli
        .account
        .ok_or_else(|| anyhow!("--account is required unless --dry-run is given"))?;
    let database_url = cli
        .database_url
        .context("DATABASE_URL must be set")?;

    info!(account_id, "Connecting to database");
    let store = PgRecipeStore::connect(&database_url).await?;

    if cli.seed_meal_types {
        let meal_types = add_missing_default_meal_types(&store, account_id).await?;
        println!("{}", t_count_lang("meal-types-seeded", meal_types.len(), Some(&locale)));
    }

    let mut importer = MarkdownImporter::with_config(store, StdRng::from_entropy(), config);
    let summary = importer.import(&markdown, account_id).await?;
    println!("{}", summary.render(&locale));

    if !summary.is_complete() {
        std::process::exit(1);
    }
    Ok(())
}
