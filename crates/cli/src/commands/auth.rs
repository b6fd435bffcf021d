//! Authentication commands.

use clap::Subcommand;
use secrecy::SecretString;

use farmstall_client::AppError;

use super::Context;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and sign in
    Signup {
        /// Display name
        #[arg(short = 'u', long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign in with an existing account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the resolved session
    Whoami,
}

pub async fn run(ctx: &Context, action: AuthAction) -> Result<(), AppError> {
    match action {
        AuthAction::Signup {
            username,
            email,
            password,
        } => {
            let password = SecretString::from(password);
            ctx.api.signup(&username, &email, &password).await?;
            announce(ctx).await;
        }
        AuthAction::Login { email, password } => {
            let password = SecretString::from(password);
            ctx.api.login(&email, &password).await?;
            announce(ctx).await;
        }
        AuthAction::Logout => {
            ctx.store.clear()?;
            tracing::info!("Signed out");
        }
        AuthAction::Whoami => match ctx.session().await {
            Some(session) => {
                tracing::info!(
                    "Signed in as {} ({}, vendor approved: {})",
                    session.user_id,
                    session.role,
                    session.vendor_approved
                );
            }
            None => tracing::info!("Anonymous"),
        },
    }
    Ok(())
}

/// Report who the freshly saved token resolves to.
async fn announce(ctx: &Context) {
    match ctx.session().await {
        Some(session) => tracing::info!("Signed in as {} ({})", session.user_id, session.role),
        // Token saved but undecodable; the resolver has already cleared it.
        None => tracing::warn!("Store issued a token that did not resolve to a session"),
    }
}
