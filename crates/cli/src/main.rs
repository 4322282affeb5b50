use std::path::PathBuf;

use {
    chatterbox_auto_reply::ReplySelector,
    chatterbox_config::ChatterboxConfig,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "chatterbox", about = "Chatterbox website chat widget backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Only look for chatterbox.{toml,yaml,yml,json} in this directory.
    #[arg(long, global = true, env = "CHATTERBOX_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Gateway {
        /// Address to bind (overrides `server.bind`).
        #[arg(long, env = "CHATTERBOX_BIND")]
        bind: Option<String>,
        /// Port to listen on (overrides `server.port`).
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Print the canned reply for a message.
    Reply {
        #[arg(short, long)]
        message: String,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn apply_overrides(config: &mut ChatterboxConfig, bind: Option<String>, port: Option<u16>) {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

fn reply_for(config: &ChatterboxConfig, message: &str) -> String {
    ReplySelector::from_config(&config.auto_reply)
        .select_reply(message)
        .to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "chatterbox starting");

    if let Some(dir) = cli.config_dir.clone() {
        chatterbox_config::set_config_dir(dir);
    }
    let mut config = chatterbox_config::discover_and_load();

    match cli.command {
        Commands::Gateway { bind, port } => {
            apply_overrides(&mut config, bind, port);
            chatterbox_gateway::server::start_gateway(config).await
        },
        Commands::Reply { message } => {
            println!("{}", reply_for(&config, &message));
            Ok(())
        },
    }
}
