use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vitrine_clash::ScanStrategy;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Cross-model collision checks for BIM scenes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Lists objects of one model whose boxes overlap other models.
    Scan(ScanArgs),
    /// Runs a scan and isolates one of its entries.
    Isolate(IsolateArgs),
    /// Lists loaded models with live and original placement.
    Models(SceneArgs),
}

#[derive(Args)]
pub struct SceneArgs {
    #[arg(long)]
    pub scene: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Model placement, `ID=x,y,z` or `ID=x,y,z@rotY`. Repeatable.
    #[arg(long = "place")]
    pub placements: Vec<String>,
}

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub scene: SceneArgs,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub strategy: Option<ScanStrategy>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct IsolateArgs {
    #[command(flatten)]
    pub scene: SceneArgs,
    #[arg(long)]
    pub model: String,
    /// Entry number as printed by `scan`, starting at 1.
    #[arg(long)]
    pub entry: usize,
}
