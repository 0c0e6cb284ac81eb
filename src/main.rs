use anyhow::Result;
use clap::Parser;
use cmdtree_core::commands::{self, builtin, usage, ArgumentRegistry, CommandManager, DeclareCommands};
use cmdtree_core::config::ServerConfig;
use cmdtree_core::permissions::{PermissionsCache, Requester};
use itertools::Itertools;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Shows the command tree a player would receive
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file. Missing keys are filled in.
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,

    /// Name of the player to build the tree for.
    #[arg(long, default_value = "Player")]
    player: String,

    /// Build the tree for the server console instead of a player.
    #[arg(long)]
    console: bool,

    /// Extra permission node for the player. Prefix with '-' to deny.
    #[arg(short = 'p', long = "permission", allow_hyphen_values = true)]
    permissions: Vec<String>,

    /// Print the framed packet (length, id and body) as hex.
    #[arg(long)]
    hex: bool,
}

fn requester(args: &Args, config: &ServerConfig) -> Requester {
    if args.console {
        return Requester::console();
    }
    let permissions: PermissionsCache = args
        .permissions
        .iter()
        .chain(&config.default_permissions)
        .map(String::as_str)
        .collect();
    Requester::player(args.player.clone(), permissions)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(&args.config)?;

    // Setup logging
    let logfile = tracing_appender::rolling::daily(&config.log_directory, "cmdtree.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("CMDTREE_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let mut manager = CommandManager::new(ArgumentRegistry::with_defaults());
    builtin::register_commands(&mut manager)?;
    let manager = commands::install(manager)?;

    let requester = requester(&args, &config);
    let packet = DeclareCommands::new();
    let tree = packet.build_tree(manager, &requester)?;
    info!("Commands available to {}:", requester.name());
    for line in usage::list_commands(&tree) {
        println!("{}", line);
    }

    let encoded = packet.finish(manager, &requester, &config.encode_options()?)?;
    info!(
        "Declare commands packet 0x{:02x}, {} bytes",
        encoded.packet_id(),
        encoded.body().len()
    );
    if args.hex {
        let mut framed = Vec::new();
        encoded.write_uncompressed(&mut framed)?;
        let hex = framed
            .chunks(16)
            .map(|line| line.iter().map(|byte| format!("{:02x}", byte)).join(" "))
            .join("\n");
        println!("{}", hex);
    }

    Ok(())
}
