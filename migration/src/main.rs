use std::{env, fs, path::Path};
use util::config;

mod runner;

/// `migration [up|fresh|clean]`, defaulting to `up`.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = config::database_url();
    let file = config::database_file();

    match env::args().nth(1).as_deref() {
        None | Some("up") => migrate(&url, file.as_deref()).await,
        Some("fresh") => {
            remove_database(file.as_deref());
            migrate(&url, file.as_deref()).await;
        }
        Some("clean") => remove_database(file.as_deref()),
        Some(other) => {
            eprintln!("Unknown command `{other}`; expected up, fresh or clean");
            std::process::exit(2);
        }
    }
}

async fn migrate(url: &str, file: Option<&Path>) {
    if let Some(parent) = file.and_then(Path::parent) {
        fs::create_dir_all(parent).expect("Failed to create database directory");
    }
    runner::run_pending_migrations(url).await;
}

/// Deletes the SQLite file behind `DATABASE_PATH`. Other databases are left alone.
fn remove_database(file: Option<&Path>) {
    let Some(file) = file else {
        println!("DATABASE_PATH does not name a SQLite file; nothing removed");
        return;
    };

    if file.exists() {
        fs::remove_file(file).expect("Failed to delete database file");
        println!("Deleted database: {}", file.display());
    } else {
        println!("No database at {}", file.display());
    }
}
