//! kdict CLI Client
//!
//! Command-line interface and end-to-end checker for a kdict server.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kdict::network::Client;
use kdict::KdictError;
use tracing_subscriber::{fmt, EnvFilter};

/// kdict CLI
#[derive(Parser, Debug)]
#[command(name = "kdict-cli")]
#[command(about = "CLI for the kdict key-value dictionary")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Run the reference SET/GET scenarios against the server
    Selftest,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Commands::Get { key } => client.get(key.as_bytes()).map(|value| {
            println!("{}", String::from_utf8_lossy(&value));
        }),
        Commands::Set { key, value } => client.set(key.as_bytes(), value.as_bytes()).map(|()| {
            println!("OK");
        }),
        Commands::Selftest => selftest(&mut client),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {} (errno {})", e, e.errno());
            ExitCode::FAILURE
        }
    }
}

/// The four reference scenarios; stops at the first mismatch
fn selftest(client: &mut Client) -> kdict::Result<()> {
    check_set_get(client, b"foo", b"bar")?;
    println!("[1] SET foo=bar, GET foo -> bar: ok");

    match client.get(b"missing") {
        Err(KdictError::NotFound) => println!("[2] GET missing -> not found: ok"),
        Ok(value) => {
            return Err(mismatch("missing", "not found", &value));
        }
        Err(e) => return Err(e),
    }

    check_set_get(client, b"foo", b"baz")?;
    println!("[3] SET foo=baz, GET foo -> baz: ok");

    client.set(b"a", b"1")?;
    client.set(b"b", b"2")?;
    expect_value(client, b"a", b"1")?;
    expect_value(client, b"b", b"2")?;
    println!("[4] SET a=1, SET b=2, GET a -> 1, GET b -> 2: ok");

    println!("All checks passed");
    Ok(())
}

fn check_set_get(client: &mut Client, key: &[u8], value: &[u8]) -> kdict::Result<()> {
    client.set(key, value)?;
    expect_value(client, key, value)
}

fn expect_value(client: &mut Client, key: &[u8], expected: &[u8]) -> kdict::Result<()> {
    let value = client.get(key)?;
    if value != expected {
        return Err(mismatch(
            &String::from_utf8_lossy(key),
            &String::from_utf8_lossy(expected),
            &value,
        ));
    }
    Ok(())
}

fn mismatch(key: &str, expected: &str, got: &[u8]) -> KdictError {
    KdictError::Protocol(format!(
        "GET {}: expected {}, got {:?}",
        key,
        expected,
        String::from_utf8_lossy(got)
    ))
}
