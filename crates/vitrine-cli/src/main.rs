use anyhow::{Context, Result, bail};
use clap::Parser;
use vitrine_base::ModelId;
use vitrine_clash::store::entry_label;
use vitrine_clash::{ScanStrategy, ViewerSession};
use vitrine_scene::{FlightTarget, MemoryScene, ScenePort};

mod cli;
mod loader;

use cli::{Cli, Command, IsolateArgs, ScanArgs, SceneArgs};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan(args) => run_scan(args),
        Command::Isolate(args) => run_isolate(args),
        Command::Models(args) => list_models(args),
    }
}

fn prepare(
    args: &SceneArgs,
    strategy: Option<ScanStrategy>,
) -> Result<ViewerSession<MemoryScene>> {
    let placements = args
        .placements
        .iter()
        .map(|text| loader::parse_place(text))
        .collect::<Result<Vec<_>>>()?;

    let description = loader::read_scene(&args.scene)?;
    let mut config = loader::read_config(args.config.as_deref(), &description)?;
    if let Some(strategy) = strategy {
        config.scan_strategy = strategy;
    }

    let mut session = loader::open_session(&description, config)?;
    loader::apply_placements(&mut session, &placements)?;
    Ok(session)
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let mut session = prepare(&args.scene, args.strategy)?;
    let model = ModelId::from(args.model);
    session.run_scan(Some(&model))?;

    let results = session.results();
    if args.json {
        let report = results.report().context("scan produced no report")?;
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", results.summary());
    if !results.is_empty() {
        for line in results.lines() {
            println!("  {line}");
        }
    }
    Ok(())
}

fn run_isolate(args: IsolateArgs) -> Result<()> {
    if args.entry == 0 {
        bail!("--entry starts at 1");
    }
    let mut session = prepare(&args.scene, None)?;
    let model = ModelId::from(args.model);
    let report = session.run_scan(Some(&model))?;
    if report.is_empty() {
        bail!("{}", session.results().summary());
    }

    let index = args.entry - 1;
    session
        .isolate_entry(index)
        .with_context(|| format!("cannot isolate entry {}", args.entry))?;

    let results = session.results();
    if let Some(entry) = results.entry(index) {
        println!("{}", entry_label(index, entry));
    }

    let scene = session.scene();
    let highlighted = scene.highlighted_object_ids();
    println!(
        "highlighted: {}",
        highlighted
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("x-rayed: {} object(s)", scene.xrayed_object_ids().len());
    match scene.last_flight().map(|flight| &flight.target) {
        Some(FlightTarget::Aabb(aabb)) => println!("camera framing {aabb}"),
        _ => println!("camera unchanged"),
    }
    Ok(())
}

fn list_models(args: SceneArgs) -> Result<()> {
    let session = prepare(&args, None)?;
    let scene = session.scene();
    for model in session.transforms().models() {
        let Some(handle) = scene.model(model) else {
            continue;
        };
        let live = handle.transform;
        println!(
            "{model}: {} object(s), position {}, rotation {}",
            handle.object_ids.len(),
            live.position,
            live.rotation
        );
        if let Some(original) = session.transforms().original(model) {
            if original != live {
                println!(
                    "  original position {}, rotation {}",
                    original.position, original.rotation
                );
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
