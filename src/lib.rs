pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;
pub mod standings;

use anyhow::Context;
use clap::Parser;
pub use config::Config;
use db::{NewMatch, Store};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = cli::Cli::parse();

    match cli.command {
        Some(cli::Commands::Serve) | None => run_server(config).await,

        Some(cli::Commands::Seed) => cmd_seed(&config).await,

        Some(cli::Commands::Init) => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists; leaving it alone.");
            }
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        "Ultimate Cup v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let port = config.server.port;
    let state = api::create_app_state_from_config(config).await?;
    let app = api::router(state).await;

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

/// Loads the sample tournament the original site shipped with: eight teams
/// in three groups, six fixtures, nine players, and the 2025 ratings.
async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    if !store.list_teams().await?.is_empty() {
        println!("Database already has teams; skipping seed.");
        println!("Remove the database file to reseed from scratch.");
        return Ok(());
    }

    let teams = [
        ("Lafia Stars FC", "Group A"),
        ("Kwandare United", "Group A"),
        ("Golden Boys FC", "Group A"),
        ("Bukan Sidi United", "Group B"),
        ("Doctor Academy Jr", "Group B"),
        ("Future Legends FC", "Group B"),
        ("Greater Tomorrow FC", "Group C"),
        ("Maria Assumpta FC", "Group C"),
    ];

    let mut team_ids = Vec::with_capacity(teams.len());
    for (name, group) in teams {
        let team = store.add_team(name, Some(group)).await?;
        team_ids.push(team.id);
    }

    // (team_a, team_b, score_a, score_b, date, venue, stage) with teams
    // addressed by seed position.
    let matches = [
        (0, 1, 3, 1, "2025-10-01", "Lafia City Stadium", "Group Stage"),
        (2, 0, 0, 2, "2025-10-02", "Kwandare Field", "Group Stage"),
        (3, 4, 2, 2, "2025-10-03", "Bukan Sidi Arena", "Group Stage"),
        (5, 6, 1, 0, "2025-10-05", "Youth Center Stadium", "Quarter Final"),
        (1, 5, 1, 1, "2025-10-07", "Lafia City Stadium", "Semi Final"),
        (0, 6, 2, 3, "2025-10-10", "NASPOLY Stadium", "Final"),
    ];

    for (a, b, score_a, score_b, date, venue, stage) in matches {
        store
            .add_match_with_scorers(
                NewMatch {
                    team_a: team_ids[a],
                    team_b: team_ids[b],
                    score_a,
                    score_b,
                    yellow_a: 0,
                    yellow_b: 0,
                    red_a: 0,
                    red_b: 0,
                    venue: Some(venue.to_string()),
                    date: Some(date.to_string()),
                    stage: Some(stage.to_string()),
                    year: None,
                },
                &[],
            )
            .await?;
    }

    // (name, team index, goals, yellows, reds)
    let players = [
        ("John Musa", 0, 4, 1, 0),
        ("Aliyu Yakubu", 0, 2, 0, 0),
        ("Suleiman Ibrahim", 1, 1, 1, 0),
        ("Emmanuel Tega", 2, 0, 1, 0),
        ("Titus Monday", 3, 3, 0, 1),
        ("Joshua Peter", 4, 2, 0, 0),
        ("Henry Samson", 5, 3, 2, 0),
        ("Umar Danladi", 6, 1, 0, 0),
        ("Victor Kado", 7, 2, 0, 0),
    ];

    for (name, team, goals, yellows, reds) in players {
        store
            .add_player(name, team_ids[team], goals, yellows, reds)
            .await?;
    }

    let ratings = [
        ("Lafia Stars FC", 4.5),
        ("Kwandare United", 4.0),
        ("Golden Boys FC", 3.5),
        ("Doctor Academy Jr", 3.0),
        ("Bukan Sidi United", 2.75),
        ("Future Legends FC", 2.5),
        ("Greater Tomorrow FC", 2.25),
        ("Maria Assumpta FC", 1.5),
    ];

    for (name, points) in ratings {
        store.upsert_rating(name, 2025, points).await?;
    }

    println!("✓ Sample data loaded:");
    println!("  Teams:   {}", teams.len());
    println!("  Matches: {}", matches.len());
    println!("  Players: {}", players.len());
    println!("  Ratings: {} (2025)", ratings.len());
    println!();
    println!("Log in with the seeded admin account and rotate its password.");

    Ok(())
}
