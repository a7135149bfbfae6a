//! Upgrade example: flash one lab device by model name
//!
//! Looks the model up in the registry and runs its upgrade path. Console
//! models need the bridge address and port; SNMP models need the modem's
//! own address.
//!
//! # Usage
//!
//! Console upgrade through a bridge:
//! ```bash
//! cargo run --example upgrade -- --model F5685 --host 10.55.69.106 --port 9001 \
//!     --firmware F5685_2.40.3a-2210.4_2023-03-24T14-32-30.pkgtb
//! ```
//!
//! SNMP upgrade:
//! ```bash
//! cargo run --example upgrade -- --model TG3492 --host 10.11.142.122 --firmware TG3492.p7b
//! ```

use std::env;
use std::process::ExitCode;

use cmflash::{UpgradeMethod, UpgradeRequest, platform, upgrade_model};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let method = match platform::method_for(&args.model) {
        Ok(method) => method,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let request = match method {
        UpgradeMethod::Console => match args.port {
            Some(port) => UpgradeRequest::console(&args.host, port, &args.firmware),
            None => {
                eprintln!("Error: {} upgrades through the console, --port is required", args.model);
                return ExitCode::FAILURE;
            }
        },
        UpgradeMethod::Snmp => UpgradeRequest::snmp(&args.host, &args.firmware),
    };

    println!("Upgrading {} at {} via {}...", args.model, args.host, method);

    match upgrade_model(&args.model, &request).await {
        Ok(outcome) if outcome.is_success() => {
            println!("Upgrade {}", outcome);
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            eprintln!("Upgrade {}, see log for details", outcome);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    model: String,
    host: String,
    port: Option<u16>,
    firmware: String,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut model = String::new();
        let mut host = String::new();
        let mut port = None;
        let mut firmware = String::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--model" | "-m" => {
                    i += 1;
                    if i < args.len() {
                        model = args[i].clone();
                    }
                }
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().ok();
                    }
                }
                "--firmware" | "-f" => {
                    i += 1;
                    if i < args.len() {
                        firmware = args[i].clone();
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        if model.is_empty() || host.is_empty() || firmware.is_empty() {
            Self::print_help();
            std::process::exit(1);
        }

        Self {
            model,
            host,
            port,
            firmware,
        }
    }

    fn print_help() {
        println!(
            r#"cmflash upgrade example

USAGE:
    cargo run --example upgrade -- [OPTIONS]

OPTIONS:
    -m, --model <MODEL>      Device model, e.g. F5685 or TG3492
    -h, --host <HOST>        Console bridge address, or the modem address for SNMP
    -p, --port <PORT>        Console bridge port (console models only)
    -f, --firmware <FILE>    Firmware file name on the download server
    --help                   Print this help message
"#
        );
    }
}
