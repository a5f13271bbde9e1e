use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use studyhall_backend_runtime::{telemetry, BackendServices};
use studyhall_config::load as load_config;
use studyhall_database::{
    CommunityRepository, CreateCommunityRequest, CreateUserRequest, UserRepository,
};
use studyhall_gateway::{create_router, GatewayState};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "studyhall-backend")]
#[command(about = "Studyhall realtime community backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the WebSocket gateway (default)
    Serve,
    /// Seed the database with demo users and a community
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Studyhall backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = Arc::new(GatewayState::new(services.db_pool.clone()));
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(studyhall_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with demo data");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let communities = CommunityRepository::new(services.db_pool.clone());

    let mut seeded = Vec::new();
    for (username, email) in [
        ("ada", "ada@example.com"),
        ("lin", "lin@example.com"),
        ("mei", "mei@example.com"),
    ] {
        let user = match users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                users
                    .create(&CreateUserRequest {
                        username: username.to_string(),
                        email: Some(email.to_string()),
                    })
                    .await
                    .with_context(|| format!("failed to seed user {username}"))?
            }
        };
        seeded.push(user);
    }

    let community = match communities.find_by_slug("study-group").await? {
        Some(community) => community,
        None => communities
            .create(&CreateCommunityRequest {
                slug: "study-group".to_string(),
                name: "Study Group".to_string(),
                description: Some("General study hall for everyone".to_string()),
                max_participants: 50,
            })
            .await
            .context("failed to seed community")?,
    };

    for user in &seeded {
        if !communities.is_member(community.id, user.id).await? {
            communities
                .add_member(community.id, user.id)
                .await
                .with_context(|| format!("failed to add {} to {}", user.username, community.slug))?;
        }
    }

    println!("Database seeded:");
    println!("- {} users (ada, lin, mei)", seeded.len());
    println!("- community '{}' with {} members", community.slug, seeded.len());
    println!(
        "Connect a chat client to ws://{}:{}/ws/community/{}",
        config.http.address, config.http.port, community.slug
    );

    Ok(())
}
