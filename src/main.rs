// SPDX-License-Identifier: MIT

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fritzbox_exporter::{Config, FritzClient, LineEmitter, assemble, collect};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        print_usage_hint();
        return ExitCode::FAILURE;
    }

    tracing::info!(
        "Connecting to FritzBox at {}:{} as {}",
        config.address,
        config.port,
        config.username
    );

    // Connection failure is the only fatal error; everything past this
    // point degrades to partial data.
    let mut client = match FritzClient::connect(&config).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Cannot connect to FritzBox: {}", e);
            print_usage_hint();
            return ExitCode::FAILURE;
        }
    };

    let firmware = client.system_version().map(str::to_string);
    let snapshot = collect(&mut client, &config, firmware.as_deref()).await;

    let stdout = std::io::stdout();
    let mut emitter = LineEmitter::new(stdout.lock(), &config.measurement, &snapshot.host_tag);
    for record in &snapshot.records {
        if let Err(e) = emitter.emit(&record.category, &assemble(&record.fields)) {
            tracing::error!("Failed to write output: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn print_usage_hint() {
    eprintln!();
    eprintln!("Environment variables:");
    eprintln!("  FRITZ_IP_ADDRESS   IP address of the FritzBox (default 169.254.1.1)");
    eprintln!("  FRITZ_TCP_PORT     TR-064 port of the FritzBox (default 49000)");
    eprintln!("  FRITZ_USERNAME     Authentication username (default admin)");
    eprintln!("  FRITZ_PASSWORD     Authentication password (required)");
    eprintln!();
    eprintln!("Hint: if this exporter is not working, often IP or password is missing");
}

fn setup_tracing() {
    // Logs go to stderr: stdout carries the line-protocol records.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
