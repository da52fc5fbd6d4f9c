//! polo CLI — publish, unpublish, and query services on the local polod daemon.

use std::collections::BTreeSet;

use clap::{Parser, Subcommand};
use polo_client::{PoloClient, PoloConfig};

#[derive(Parser)]
#[command(
    name = "polo",
    about = "Register services with the local multicast discovery daemon",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Use the TLS-wrapped transport instead of the plain one.
    #[arg(long, global = true)]
    secure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advertise a service over multicast discovery.
    Publish {
        /// Service identifier.
        service: String,

        /// Multicast group to announce on (repeatable). Empty means the
        /// daemon's configured defaults.
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Keep the registration across daemon restarts.
        #[arg(long)]
        permanent: bool,

        /// Register as a root (system) service.
        #[arg(long)]
        root: bool,
    },

    /// Withdraw a previously published service.
    Unpublish {
        /// Service identifier.
        service: String,

        /// Multicast group to withdraw from (repeatable).
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Also remove the daemon-side service file.
        #[arg(long)]
        delete_file: bool,
    },

    /// Show the daemon's record for a service.
    Info {
        /// Service identifier.
        service: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PoloConfig::load(path)?,
        None => PoloConfig::default(),
    };
    if cli.secure {
        config.secure = true;
    }

    let mut client = PoloClient::connect(config).await?;

    match cli.command {
        Commands::Publish {
            service,
            groups,
            permanent,
            root,
        } => {
            let groups: BTreeSet<String> = groups.into_iter().collect();
            tracing::info!(service = %service, "publishing service");
            let value = client
                .publish_service(&service, &groups, permanent, root)
                .await?;
            println!("{value}");
        }
        Commands::Unpublish {
            service,
            groups,
            delete_file,
        } => {
            let groups: BTreeSet<String> = groups.into_iter().collect();
            tracing::info!(service = %service, "unpublishing service");
            let value = client
                .unpublish_service(&service, &groups, delete_file)
                .await?;
            println!("{value}");
        }
        Commands::Info { service } => {
            let value = client.service_info(&service).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
