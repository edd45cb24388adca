use clap::Parser;
use dotenv::dotenv;
use std::process::ExitCode;

use tasklet::auth::{IssueClaims, TokenCodec};
use tasklet::config::{token_ttl_from_seconds, AppEnv, AuthConfig};

/// Mints a bearer token signed with the server's configured secret.
///
/// Stands in for the external identity provider when running locally.
#[derive(Parser)]
#[command(name = "mint_token")]
#[command(about = "Issue a bearer token for the tasklet API", long_about = None)]
struct Cli {
    /// Subject (user) id to put in the token
    #[arg(short = 's', long)]
    subject: String,

    /// Email address claim
    #[arg(short = 'e', long)]
    email: Option<String>,

    /// Token lifetime in seconds (defaults to ACCESS_TOKEN_TTL_SECONDS or 7 days)
    #[arg(short = 't', long)]
    ttl_seconds: Option<i64>,
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let auth = match AuthConfig::from_env(AppEnv::from_env()) {
        Ok(auth) => auth,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ttl = match cli.ttl_seconds {
        Some(seconds) => match token_ttl_from_seconds(seconds) {
            Some(ttl) => Some(ttl),
            None => {
                eprintln!("error: --ttl-seconds must be a positive, representable lifetime");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let codec = TokenCodec::from_config(&auth);

    match codec.issue(IssueClaims::new(cli.subject, cli.email), ttl) {
        Ok(token) => {
            println!("{}", token);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
