mod config_cmd;
mod events_cmd;
mod login_cmd;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "klife", about = "k-life CLI - browse Seoul events and manage your session")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the event catalog and print the filtered listing
    Events(events_cmd::EventsArgs),

    /// Log in against the auth service and print the session cookie
    Login(login_cmd::LoginArgs),

    /// Clear the session through a running k-life server
    Logout(login_cmd::LogoutArgs),

    /// Show or initialize `klife.toml`
    Config(config_cmd::ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Events(args) => events_cmd::run(args).await,
        Commands::Login(args) => login_cmd::run_login(args).await,
        Commands::Logout(args) => login_cmd::run_logout(args).await,
        Commands::Config(args) => config_cmd::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
