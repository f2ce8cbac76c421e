use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "storage-gateway",
    about = "HTTP gateway routing objects to storage nodes by consistent hashing",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway until interrupted
    Serve(ServeArgs),
    /// Show which node owns each key
    Locate(LocateArgs),
    /// Parse the configuration and print the effective values
    CheckConfig(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Override `api.bind_addr`
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct LocateArgs {
    #[arg(required = true)]
    pub keys: Vec<String>,
    #[command(flatten)]
    pub config: ConfigArgs,
}
