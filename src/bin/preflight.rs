use cafe_directory::{AppConfig, CafeRepository, SqliteCafeRepository};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars (or a .env file):\n\
           SECRET_KEY, DELETE_API_KEY\n\
         Optional:\n\
           DATABASE_URL, DATABASE_MAX_CONNECTIONS, BIND_ADDR, CSRF_TIME_LIMIT_SECS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if missing)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  DATABASE_URL={}", config.database_url);
    println!("  DATABASE_MAX_CONNECTIONS={}", config.database_max_connections);
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  CSRF_TIME_LIMIT_SECS={}", config.csrf_time_limit_secs);
    if config.secret_key == config.delete_key {
        eprintln!("  Warning: SECRET_KEY and DELETE_API_KEY are identical; use two different values.");
    }

    // Connectivity + schema
    let repo = SqliteCafeRepository::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", config.database_url, e))?;
    repo.ping().await?;
    println!("  Database reachable, `cafe` table present.");

    let count = repo.count().await?;
    println!("  Cafes stored: {}", count);
    if count == 0 {
        eprintln!("  Warning: the directory is empty; /random will report no cafes.");
    }

    // Bind address must be free
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot bind {}: {}", config.bind_addr, e))?;
    drop(listener);
    println!("  {} is free to bind.", config.bind_addr);

    println!("> Preflight OK.");
    Ok(())
}
