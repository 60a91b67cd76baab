//! tokendock client entry point.
//!
//! A minimal line-oriented front-end standing in for a richer UI: it loads
//! the TOML config, finds the device (fixed port or detection probe across
//! all enumerated ports), prompts for the PIN on stdin, authenticates, and
//! prints the device's current token set.
//!
//! ```text
//! main()
//!  └─ ClientConfig::load_or_default()
//!  └─ list_ports() / detect()        -- pick the device port
//!  └─ Session::connect()
//!  └─ Session::authenticate()        -- PIN from stdin
//!  └─ Session::get_data()            -- print token names + Base32 secrets
//!  └─ Session::disconnect()
//! ```

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tokendock_client::application::{detect, Session};
use tokendock_client::infrastructure::storage::config::ClientConfig;
use tokendock_client::infrastructure::transport::serial::{list_ports, SerialTransportFactory};

const CONFIG_PATH: &str = "tokendock.toml";

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("tokendock client starting");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = ClientConfig::load_or_default(Path::new(&config_path))
        .with_context(|| format!("loading config from {config_path}"))?;

    let factory = SerialTransportFactory::new();

    // ── Port selection ────────────────────────────────────────────────────────
    let port = match config.serial.port.clone() {
        Some(port) => port,
        None if config.serial.probe_on_startup => {
            let candidates = list_ports();
            info!("probing {} serial port(s)", candidates.len());
            match detect(&factory, &candidates) {
                Some(port) => port,
                None => bail!("no token dock found on any serial port"),
            }
        }
        None => bail!("no port configured and probing disabled; set serial.port in {config_path}"),
    };

    // ── Session ───────────────────────────────────────────────────────────────
    let mut session = Session::new(Box::new(factory));
    session.connect(&port, config.serial.baud)?;

    let pin = prompt_pin()?;
    session.authenticate(&pin)?;
    println!("authenticated against {port}");

    let tokens = session.get_data()?;
    if tokens.is_empty() {
        println!("no tokens stored on the device");
    } else {
        for token in tokens {
            println!("{}\t{}", token.name, token.secret_base32());
        }
    }

    session.disconnect();
    Ok(())
}

/// Reads the PIN from stdin. Plain line input; this stand-in front-end has
/// no keypad.
fn prompt_pin() -> anyhow::Result<String> {
    print!("PIN: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading PIN from stdin")?;
    Ok(line.trim().to_string())
}
