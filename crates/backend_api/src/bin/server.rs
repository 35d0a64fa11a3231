use backend_api::{AppState, DatabaseFile, FileDocumentStore, run_server};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Parse environment variables (with sane defaults)
    let database_path_raw =
        env::var("DATABASE_PATH").unwrap_or_else(|_| "database/database.json".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let database_path = PathBuf::from(&database_path_raw);

    println!("Cost Manager API Server");
    println!("=======================");
    println!("Database path: {}", database_path.display());
    println!("Listening on: {}:{}", host, port);
    println!();

    // Pre-flight checks: fail fast if the store cannot be opened
    if !database_path.exists() {
        eprintln!(
            "[FATAL] database.json not found at: {}",
            database_path.display()
        );
        eprintln!("        Set the DATABASE_PATH env var to the store's location.");
        std::process::exit(1);
    }
    match std::fs::read_to_string(&database_path) {
        Ok(content) => {
            if let Err(err) = serde_json::from_str::<DatabaseFile>(&content) {
                eprintln!(
                    "[FATAL] database.json at {} is not a valid store document: {}",
                    database_path.display(),
                    err
                );
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!(
                "[FATAL] cannot read database.json at {}: {}",
                database_path.display(),
                err
            );
            std::process::exit(1);
        }
    }

    // Create the store and share it across the persistence ports
    let store = Arc::new(FileDocumentStore::new(&database_path));
    let state = AppState {
        costs: store.clone(),
        users: store.clone(),
        reports: store,
    };

    // Start the server
    run_server(state, &host, port).await?;

    Ok(())
}
