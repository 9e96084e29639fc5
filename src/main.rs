use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use sqlmapper::{ConnectionConfig, Executor, SqlExecutor, SqlMapping};
use tracing_subscriber::EnvFilter;

/// Creates the employee table, inserts a row and lists what is stored.
#[derive(Parser, Debug)]
#[command(name = "sqlmapper")]
struct Args {
    /// TOML file with driver, url, principal, credential
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database url, overrides the config file (e.g. jdbc:sqlite:employees.db)
    #[arg(short, long)]
    url: Option<String>,

    /// Employee name to insert
    #[arg(long, default_value = "sam")]
    name: String,

    /// Employee age to insert
    #[arg(long, default_value_t = 31)]
    age: i32,
}

#[derive(Debug, Default, SqlMapping)]
struct Employee {
    seq: i64,
    name: String,
    age: i32,
    reg_date: Option<NaiveDateTime>,
}

const CREATE_EMPLOYEE: &str = "CREATE TABLE IF NOT EXISTS employee (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50) NOT NULL,
    age INT NOT NULL,
    reg_date DATETIME NULL
)";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = ConnectionConfig::load_with_url(args.config.as_deref(), args.url.as_deref())?;
    tracing::info!(?config, "starting");

    let employees = SqlExecutor::<Employee>::from_config(config)?;
    employees.execute(CREATE_EMPLOYEE)?;

    let seq = employees.insert(
        "INSERT INTO employee (name, age, reg_date) VALUES (?, ?, CURRENT_TIMESTAMP)",
        &[&args.name, &args.age],
    )?;
    tracing::info!(?seq, "inserted employee");

    let total = employees.select_count("SELECT COUNT(*) FROM employee", &[])?;
    println!("{total} employee(s)");

    for employee in employees.select_list("SELECT * FROM employee ORDER BY seq", &[])? {
        println!(
            "#{} {} ({}) registered {}",
            employee.seq,
            employee.name,
            employee.age,
            employee
                .reg_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }

    Ok(())
}
