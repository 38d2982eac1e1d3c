//! A command line tool for resetting a user's password.
//!
//! Houselist does not send password reset emails, so whoever hosts the
//! server runs this tool against the database file instead.

use std::process::ExitCode;

use clap::Parser;
use rusqlite::Connection;

use houselist_rs::{Error, PasswordHash, get_user_by_email, set_user_password};

/// Reset the password of a Houselist user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address of the user whose password should be reset.
    #[arg(long)]
    email: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            eprintln!("Could not open database file {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    match get_user_by_email(&args.email, &connection) {
        Ok(_) => {}
        Err(Error::NotFound) => {
            eprintln!("No user is registered with the email {}.", args.email);
            return ExitCode::FAILURE;
        }
        Err(error) => {
            eprintln!("Could not look up user: {error}");
            return ExitCode::FAILURE;
        }
    }

    let password = match rpassword::prompt_password("New password: ") {
        Ok(password) => password,
        Err(error) => {
            eprintln!("Could not read password: {error}");
            return ExitCode::FAILURE;
        }
    };

    let confirmation = match rpassword::prompt_password("Confirm new password: ") {
        Ok(confirmation) => confirmation,
        Err(error) => {
            eprintln!("Could not read password: {error}");
            return ExitCode::FAILURE;
        }
    };

    if password != confirmation {
        eprintln!("The passwords do not match.");
        return ExitCode::FAILURE;
    }

    let password_hash = match PasswordHash::from_raw_password(&password, PasswordHash::DEFAULT_COST)
    {
        Ok(password_hash) => password_hash,
        Err(Error::TooWeak(feedback)) => {
            eprintln!("The password is too easy to guess. {feedback}");
            return ExitCode::FAILURE;
        }
        Err(error) => {
            eprintln!("Could not hash password: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = set_user_password(&args.email, password_hash, &connection) {
        eprintln!("Could not update password: {error}");
        return ExitCode::FAILURE;
    }

    println!("Password updated for {}.", args.email);
    ExitCode::SUCCESS
}
