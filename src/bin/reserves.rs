//! Reserves CLI
//!
//! Command-line front end for the reserve register.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reserves::config::{self, Config};
use reserves::record::{format_date, parse_date, STATUS_CHOICES};
use reserves::session::{Session, StaticSecret};
use reserves::{Engine, Field, Filter, Record, RecordStore, ReserveError, Result, VERSION};
use tracing_subscriber::{fmt, EnvFilter};

/// Reserves CLI
#[derive(Parser, Debug)]
#[command(name = "reserves")]
#[command(about = "Manage the project reserve register")]
#[command(version)]
struct Args {
    /// Workbook holding the register
    #[arg(short, long, default_value = config::DEFAULT_WORKBOOK)]
    workbook: PathBuf,

    /// Password (prompted when omitted)
    #[arg(short, long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Filter controls shared by the view commands
#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Keep only this status ("Tous" for all)
    #[arg(long)]
    status: Option<String>,

    /// Keep only reserves created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty register
    Init,

    /// Print the filtered reserves
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the status filter choices
    Statuses,

    /// Add a new reserve
    Add {
        /// N° Réserve
        #[arg(long)]
        id: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Creation date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        created: Option<String>,

        /// Closure date (YYYY-MM-DD)
        #[arg(long)]
        closed: Option<String>,

        #[arg(long, default_value = "")]
        status: String,
    },

    /// Edit one field of a displayed reserve and save the displayed rows
    Set {
        /// N° Réserve of the row to edit
        id: String,

        /// id, description, created_at, closed_at or status
        field: String,

        value: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Export the filtered reserves as PDF
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,reserves=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("reserves v{}", VERSION);

    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder().workbook_path(&args.workbook).build();

    match args.command {
        Commands::Init => init(&config, args.password),
        command => {
            let mut engine = Engine::open(config);
            admit(|pw| engine.unlock(pw), args.password)?;
            execute(&mut engine, command)?;
            engine.close();
            Ok(())
        }
    }
}

/// Create an empty register, once the password is accepted
fn init(config: &Config, password: Option<String>) -> Result<()> {
    let mut session = Session::new(StaticSecret::new(config.password.clone()));
    admit(|pw| session.check(pw), password)?;
    RecordStore::create(&config.workbook_path, &config.sheet_name)?;
    println!("Registre créé : {}", config.workbook_path.display());
    Ok(())
}

fn execute(engine: &mut Engine, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            return Err(ReserveError::Validation(
                "init runs outside a session".to_string(),
            ))
        }
        Commands::List { view, json } => {
            engine.set_filter(view.to_filter()?)?;
            let rows = engine.view()?;
            if json {
                println!("{}", serde_json::to_string_pretty(rows)?);
            } else {
                print_table(rows);
            }
        }
        Commands::Statuses => {
            for status in engine.status_choices()? {
                println!("{}", status);
            }
        }
        Commands::Add {
            id,
            description,
            created,
            closed,
            status,
        } => {
            let created = match created {
                Some(date) => parse_date(&date)?,
                None => chrono::Local::now().date_naive(),
            };
            let closed = closed
                .map(|date| parse_date(&date).map(format_date))
                .transpose()?
                .unwrap_or_default();
            if !STATUS_CHOICES.contains(&status.as_str()) {
                tracing::warn!("Unusual status '{}'", status);
            }

            let record = Record::new(id, description, format_date(created), closed, status);
            let id = engine.add(record)?;
            println!("Réserve {} ajoutée avec succès !", id);
        }
        Commands::Set {
            id,
            field,
            value,
            view,
        } => {
            let field: Field = field.parse()?;
            engine.set_filter(view.to_filter()?)?;
            let row = engine
                .view()?
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| ReserveError::Validation(format!("reserve {} is not displayed", id)))?;

            engine.edit(row, field, value)?;
            engine.save()?;
            println!("Modifications enregistrées avec succès.");
        }
        Commands::Export { view, out } => {
            engine.set_filter(view.to_filter()?)?;
            let bytes = engine.export()?;
            let out = out.unwrap_or_else(|| engine.config().export_path.clone());
            fs::write(&out, bytes)?;
            println!("PDF écrit : {}", out.display());
        }
    }

    Ok(())
}

/// Check the password, prompting until it is accepted when none was given
///
/// An empty prompt answer gives up.
fn admit(mut check: impl FnMut(&str) -> Result<bool>, password: Option<String>) -> Result<()> {
    if let Some(password) = password {
        return match check(&password)? {
            true => Ok(()),
            false => Err(ReserveError::Auth),
        };
    }

    loop {
        let password = rpassword::prompt_password("Entrez le mot de passe : ")?;
        match check(&password) {
            Ok(true) => return Ok(()),
            Ok(false) => return Err(ReserveError::Auth),
            Err(ReserveError::Auth) => eprintln!("Mot de passe incorrect"),
            Err(e) => return Err(e),
        }
    }
}

impl ViewArgs {
    fn to_filter(&self) -> Result<Filter> {
        let mut filter = Filter::all();
        if let Some(status) = &self.status {
            filter = filter.with_status(status.clone());
        }
        if let Some(since) = &self.since {
            filter = filter.with_min_created(parse_date(since)?);
        }
        Ok(filter)
    }
}

fn print_table(rows: &[Record]) {
    println!(
        "{:<12} {:<35} {:<16} {:<14} {}",
        "N° Réserve", "Description", "Date de création", "Date de levée", "Statut"
    );
    for record in rows {
        let description: String = record.description.chars().take(35).collect();
        println!(
            "{:<12} {:<35} {:<16} {:<14} {}",
            record.id, description, record.created_at, record.closed_at, record.status
        );
    }
    println!("{} réserve(s)", rows.len());
}
