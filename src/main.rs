use crate::{
    analytics::CSV_FILE_NAME,
    commands::{expenses::ExpenseForm, parse_day, parse_timestamp, Context, DEFAULT_LIMIT},
    conf::Conf,
    controller::auth_token::TokenTtl,
    db::DbVersion,
    filter::ExpenseFilter,
    model::Id,
    repository::{AuthTokenRepository, ExpenseRepository, UserRepository},
};
use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rocket::{catchers, Build, Rocket};
use std::{path::PathBuf, process::exit};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod analytics;
mod chart;
mod client;
mod commands;
mod conf;
mod controller;
mod db;
mod filter;
mod model;
mod output;
mod repository;
mod service;

/// Personal expense tracker
#[derive(Parser)]
#[command(name = "expenses", version, about, long_about = None)]
struct Cli {
    /// Base URL of the expenses API
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,

    /// Manage the server database
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Create an account
    Register {
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and keep the session token
    Login {
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the session token
    Logout,

    /// Show the logged in user
    Whoami,

    /// List expenses
    List {
        #[arg(long)]
        category: Option<String>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Record a new expense
    Add(FormArgs),

    /// Change an existing expense
    Edit {
        id: Id,
        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete an expense
    Delete {
        id: Id,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show, set or clear the monthly budget
    Budget {
        amount: Option<String>,
        #[arg(long, conflicts_with = "amount")]
        clear: bool,
    },

    /// Spending charts
    Analytics {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        /// Export all expenses as CSV
        #[arg(long, num_args = 0..=1, default_missing_value = CSV_FILE_NAME)]
        export: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Migrate the schema, to the latest version by default
    Migrate { version: Option<i16> },
    /// Delete the database file
    Drop,
}

#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    amount: Option<f64>,
    /// RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD
    #[arg(long, value_parser = parse_timestamp)]
    date: Option<DateTime<Utc>>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

impl From<FormArgs> for ExpenseForm {
    fn from(args: FormArgs) -> ExpenseForm {
        ExpenseForm {
            title: args.title,
            amount: args.amount,
            date: args.date,
            description: args.description,
            category: args.category,
        }
    }
}

#[rocket::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve | Commands::Db { .. } => "info",
        _ => "warn",
    };
    init_tracing(default_level);

    if let Err(e) = run(cli).await {
        debug!(error = ?e, "Command failed");
        output::error(&e.to_string());
        exit(1);
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut conf = Conf::new()?;

    if let Some(api_url) = cli.api_url {
        conf.api_url = api_url;
    }

    match &cli.command {
        Commands::Serve => return serve(conf).await,
        Commands::Db { command } => return db_command(&conf, command),
        _ => {}
    }

    let mut ctx = Context::new(conf)?;

    match cli.command {
        Commands::Register { username, password } => {
            commands::auth::register(&ctx, &username, password).await
        }
        Commands::Login { username, password } => {
            commands::auth::login(&mut ctx, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&mut ctx),
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::List {
            category,
            from,
            to,
            skip,
            limit,
        } => {
            let filter = ExpenseFilter { category, from, to };
            commands::expenses::list(&mut ctx, filter, skip, limit).await
        }
        Commands::Add(form) => commands::expenses::add(&ctx, form.into()).await,
        Commands::Edit { id, form } => commands::expenses::edit(&ctx, &id, form.into()).await,
        Commands::Delete { id, yes } => commands::expenses::delete(&ctx, &id, yes).await,
        Commands::Budget { amount, clear } => commands::expenses::budget(&mut ctx, amount, clear),
        Commands::Analytics { limit, export } => {
            commands::analytics::run(&mut ctx, limit, export.as_deref()).await
        }
        Commands::Serve | Commands::Db { .. } => Ok(()),
    }
}

fn db_command(conf: &Conf, command: &DbCommands) -> Result<()> {
    match command {
        DbCommands::Migrate { version } => {
            let version = version.map(DbVersion::Specific).unwrap_or(DbVersion::Latest);
            let pool = db::pool(&conf.db_url)?;
            let mut conn = pool.get()?;
            db::migrate(&mut conn, &conf.migrations, version)
        }
        DbCommands::Drop => db::drop(conf),
    }
}

async fn serve(conf: Conf) -> Result<()> {
    let pool = db::pool(&conf.db_url)?;
    let mut conn = pool.get()?;
    db::migrate_to_latest(&mut conn, &conf.migrations)?;
    drop(conn);
    info!(db_url = %conf.db_url, "Starting server");
    prepare(rocket::build(), &conf, pool).launch().await?;
    Ok(())
}

pub fn prepare(
    rocket: Rocket<Build>,
    conf: &Conf,
    pool: Pool<SqliteConnectionManager>,
) -> Rocket<Build> {
    rocket
        .manage(UserRepository::new(&pool))
        .manage(AuthTokenRepository::new(&pool))
        .manage(ExpenseRepository::new(&pool))
        .manage(TokenTtl(Duration::minutes(conf.token_ttl_minutes)))
        .manage(pool)
        .mount("/", controller::routes())
        .register("/", catchers![controller::error])
}
