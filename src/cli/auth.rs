//! Sign-in commands
//!
//! The local session file stands in for the hosted sign-in flow: `login`
//! simply records which user's records the other commands operate on.

use clap::Subcommand;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::UserId;
use crate::session::Session;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in as a user
    Login {
        /// User handle
        user: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

pub fn handle_auth_command(paths: &LedgerPaths, cmd: AuthCommands) -> LedgerResult<()> {
    match cmd {
        AuthCommands::Login { user } => {
            let user = user.trim();
            if user.is_empty() {
                return Err(LedgerError::Validation("User handle cannot be empty".into()));
            }
            Session::signed_in(UserId::new(user)).save(paths)?;
            tracing::debug!(user, "signed in");
            println!("Signed in as {}", user);
        }

        AuthCommands::Logout => {
            let session = Session::load(paths)?;
            Session::clear(paths)?;
            match session.user() {
                Some(user) => println!("Signed out {}", user),
                None => println!("Not signed in"),
            }
        }

        AuthCommands::Whoami => match Session::load(paths)?.user() {
            Some(user) => println!("{}", user),
            None => return Err(LedgerError::NotSignedIn),
        },
    }

    Ok(())
}
