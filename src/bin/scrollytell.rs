use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scrollytell::{
    Canvas, FrameDriver, MapperConfig, PreviewTarget, RenderTarget as _, StoryTable, input,
};

#[derive(Parser, Debug)]
#[command(name = "scrollytell", version)]
struct Cli {
    /// Log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a story table.
    Validate(StoryArgs),
    /// Print the render state for one scroll fraction as JSON.
    Eval(EvalArgs),
    /// Print one summary row per step of a 0..1 sweep.
    Sweep(SweepArgs),
    /// Render a single preview frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct StoryArgs {
    /// Story table JSON. Defaults to the bundled table.
    #[arg(long)]
    story: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DriverArgs {
    #[command(flatten)]
    story: StoryArgs,

    /// Mapper configuration JSON. Defaults to the built-in constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the glitch trigger.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Scroll fraction in [0, 1].
    #[arg(long)]
    at: f64,

    /// Frames to run at the same fraction before printing (lets the color settle).
    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[command(flatten)]
    driver: DriverArgs,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Number of intervals; prints `steps + 1` rows.
    #[arg(long, default_value_t = 20)]
    steps: u32,

    /// Frames per step; more frames let the smoothed color catch up.
    #[arg(long, default_value_t = 1)]
    frames_per_step: u32,

    #[command(flatten)]
    driver: DriverArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Scroll fraction in [0, 1].
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Frames to run before rasterizing.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    #[command(flatten)]
    driver: DriverArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_story(path: Option<&Path>) -> anyhow::Result<StoryTable> {
    match path {
        Some(p) => {
            StoryTable::from_path(p).with_context(|| format!("load story '{}'", p.display()))
        }
        None => StoryTable::builtin().context("load bundled story"),
    }
}

fn make_driver(args: &DriverArgs) -> anyhow::Result<FrameDriver> {
    let story = load_story(args.story.story.as_deref())?;
    let config = match &args.config {
        Some(p) => MapperConfig::from_path(p)
            .with_context(|| format!("load mapper config '{}'", p.display()))?,
        None => MapperConfig::default(),
    };
    Ok(FrameDriver::new(config, Arc::new(story), args.seed)?)
}

fn check_fraction(at: f64) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&at) {
        anyhow::bail!("--at must be within [0, 1], got {at}");
    }
    Ok(())
}

fn cmd_validate(args: StoryArgs) -> anyhow::Result<()> {
    let story = load_story(args.story.as_deref())?;
    for seg in &story {
        println!(
            "{:>2} {:<12} {:.3}..{:.3} {}",
            seg.index,
            seg.scene_tag.as_str(),
            seg.scroll_start,
            seg.scroll_end,
            seg.title
        );
    }
    eprintln!("ok: {} segments", story.len());
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    check_fraction(args.at)?;
    let mut driver = make_driver(&args.driver)?;
    let mut state = driver.update(args.at);
    for _ in 1..args.frames {
        state = driver.update(args.at);
    }
    let json = serde_json::to_string_pretty(&state).context("serialize render state")?;
    println!("{json}");
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let mut driver = make_driver(&args.driver)?;
    let frames = args.frames_per_step.max(1);
    println!("fraction\tactive\tdominant\tvisible\tbackground\tglitch");
    for f in input::sweep(args.steps) {
        let mut state = driver.update(f);
        for _ in 1..frames {
            state = driver.update(f);
        }
        println!(
            "{:.4}\t{}\t{}\t{}\t{}\t{:.3}",
            f,
            state.scroll.active_index,
            state.scroll.dominant_index(),
            state.scroll.visible_count(),
            state.background.to_hex(),
            state.signals.glitch_intensity
        );
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    check_fraction(args.at)?;
    let canvas = Canvas::new(args.width, args.height)?;
    let mut driver = make_driver(&args.driver)?;
    let mut state = driver.update(args.at);
    for _ in 1..args.frames {
        state = driver.update(args.at);
    }

    let scenes = driver.story().iter().map(|s| s.scene_tag).collect();
    let mut target = PreviewTarget::new(canvas, scenes);
    target.apply(&state)?;
    let frame = target
        .into_frame()
        .context("preview target produced no frame (bug)")?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
