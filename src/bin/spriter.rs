use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spriter", version)]
struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List entities, animations and character maps of a rig.
    Info(InfoArgs),
    /// Play an animation and dump resolved world poses as JSON.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input rig JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input rig JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Entity index or name.
    #[arg(long, default_value = "0")]
    entity: String,

    /// Animation name (defaults to the entity's first animation).
    #[arg(long)]
    animation: Option<String>,

    /// Milliseconds between samples.
    #[arg(long, default_value_t = 16)]
    step_ms: i64,

    /// Number of samples.
    #[arg(long, default_value_t = 10)]
    frames: u32,

    /// Character map to enable (repeatable, applied in order).
    #[arg(long = "char-map")]
    char_maps: Vec<String>,

    /// Player options JSON; command-line flags override its animation and maps.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Output path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct FrameDump {
    time: i64,
    key: usize,
    parts: Vec<PartDump>,
}

#[derive(serde::Serialize)]
struct PartDump {
    timeline: usize,
    name: String,
    world: spriter::Pose,
    /// Packed asset index after character maps.
    asset: Option<spriter::AssetIndex>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn read_rig(path: &std::path::Path) -> anyhow::Result<spriter::Rig> {
    spriter::Rig::from_path(path).with_context(|| format!("load rig '{}'", path.display()))
}

fn pick_entity(rig: &spriter::Rig, key: &str) -> anyhow::Result<Arc<spriter::Entity>> {
    let found = match key.parse::<usize>() {
        Ok(i) => rig.entity(i),
        Err(_) => rig.entity_by_name(key),
    };
    found
        .cloned()
        .with_context(|| format!("rig has no entity '{key}'"))
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let rig = read_rig(&args.in_path)?;
    let mut out = std::io::stdout().lock();
    for entity in rig.entities() {
        writeln!(
            out,
            "entity {} '{}' ({} timelines max)",
            entity.id(),
            entity.name(),
            entity.max_timelines()
        )?;
        for anim in entity.animations() {
            writeln!(
                out,
                "  animation {} '{}' length={}ms looping={} keys={}",
                anim.id().0,
                anim.name(),
                anim.length(),
                anim.looping(),
                anim.mainline().len()
            )?;
        }
        for map in entity.character_maps() {
            writeln!(out, "  character map '{}' ({} entries)", map.name, map.map.len())?;
        }
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let rig = read_rig(&args.in_path)?;
    let entity = pick_entity(&rig, &args.entity)?;

    let mut opts = match &args.opts {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("open player options '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f)).with_context(|| "parse player options")?
        }
        None => spriter::PlayerOpts::default(),
    };
    if args.animation.is_some() {
        opts.animation = args.animation.clone();
    }
    opts.character_maps.extend(args.char_maps.iter().cloned());

    let mut player = spriter::Player::with_opts(entity, &opts)?;
    let mut frames = Vec::with_capacity(args.frames as usize);
    for _ in 0..args.frames {
        let time = player.time();
        player.update(args.step_ms);
        frames.push(dump_frame(&player, time));
    }

    match &args.out {
        Some(path) => {
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &frames)?;
            w.flush()?;
        }
        None => {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &frames)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn dump_frame(player: &spriter::Player, time: i64) -> FrameDump {
    let key = player.current_key();
    let parts = key
        .bones
        .iter()
        .chain(&key.objects)
        .filter_map(|b| {
            let world = *player.world_pose(b.timeline)?;
            let name = player
                .part_info(b.timeline)
                .map(|i| i.name.clone())
                .unwrap_or_default();
            Some(PartDump {
                timeline: b.timeline,
                name,
                world,
                asset: player.asset_index_for(&world),
            })
        })
        .collect();
    FrameDump {
        time,
        key: player.current_key_index(),
        parts,
    }
}
