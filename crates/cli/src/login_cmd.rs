use anyhow::{bail, Context, Result};
use clap::Args;

use klife_api::SessionCodec;
use klife_api_client::{ApiClient, AuthClient, LoginFlow, LoginState};
use klife_runtime_config::AppConfig;

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    /// Page to return to after login
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct LogoutArgs {
    /// Base URL of the k-life server (default: built from the configured port)
    #[arg(long)]
    pub server: Option<String>,
}

pub async fn run_login(args: LoginArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let auth = AuthClient::new(&config.upstream.auth_url, config.upstream.timeout())
        .context("failed to build HTTP client")?;
    let codec = SessionCodec::from_secret(config.session.secret.as_deref());
    let mut flow = LoginFlow::new(auth, codec);

    match flow.submit(&args.username, &args.password, args.from.as_deref()).await {
        LoginState::Succeeded(ok) => {
            let name = ok.user.name.as_deref().unwrap_or(&ok.user.username);
            println!("Logged in as {name}");
            println!("Set-Cookie: {}", ok.set_cookie);
            println!("Next: {}", ok.redirect_to);
            Ok(())
        }
        LoginState::Failed(e) => bail!("{e}"),
        LoginState::Idle | LoginState::Submitting => bail!("login did not complete"),
    }
}

pub async fn run_logout(args: LogoutArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let base_url = args
        .server
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", config.server.port));
    let client = ApiClient::new(&base_url, config.upstream.timeout())
        .context("failed to build HTTP client")?;

    let next = client
        .logout()
        .await
        .with_context(|| format!("logout via {base_url} failed"))?;
    println!("Logged out. Next: {next}");
    Ok(())
}
