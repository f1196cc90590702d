use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use snackmix_core::{Difficulty, Quiz, SynthConfig, Synthesizer};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "snackmix", version, about = "Render ratio images from two sprites")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one image for a given class A ratio.
    Generate(GenerateArgs),
    /// Draw a multiple-choice quiz, render its answer and print it as JSON.
    Quiz(QuizArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Class A sprite (image with alpha channel).
    #[arg(long)]
    sprite_a: PathBuf,

    /// Class B sprite (image with alpha channel).
    #[arg(long)]
    sprite_b: PathBuf,

    /// Seed for reproducible output. Omit for an OS-seeded generator.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Fraction of class A copies, in [0, 1].
    #[arg(long)]
    ratio: f64,

    #[command(flatten)]
    render: RenderArgs,

    /// Enable the shadow stage.
    #[arg(long)]
    shadow: bool,

    /// Number of layering passes.
    #[arg(long)]
    passes: Option<u32>,
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// beginner, intermediate or advanced. Unknown names mean intermediate.
    #[arg(long, default_value = "intermediate")]
    difficulty: String,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Serialize, Debug)]
struct QuizReport<'a> {
    difficulty: Difficulty,
    choices: [String; 3],
    answer: String,
    ratio: f64,
    image: &'a Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Quiz(args) => cmd_quiz(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SynthConfig> {
    match path {
        Some(path) => {
            SynthConfig::load(path).with_context(|| format!("load config '{}'", path.display()))
        }
        None => Ok(SynthConfig::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn render_to_file(
    config: SynthConfig,
    ratio: f64,
    args: &RenderArgs,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    Synthesizer::new(config)
        .generate_with_rng(ratio, &args.out, &args.sprite_a, &args.sprite_b, rng)
        .with_context(|| format!("generate '{}'", args.out.display()))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.render.config.as_deref())?;
    if args.shadow {
        config.shadow = true;
    }
    if let Some(passes) = args.passes {
        config.passes = passes;
    }
    config.validate()?;

    let mut rng = make_rng(args.render.seed);
    render_to_file(config, args.ratio, &args.render, &mut rng)?;
    Ok(())
}

fn cmd_quiz(args: QuizArgs) -> anyhow::Result<()> {
    let config = load_config(args.render.config.as_deref())?;
    let difficulty = Difficulty::from_label(&args.difficulty);

    let mut rng = make_rng(args.render.seed);
    let quiz = Quiz::new(difficulty, &mut rng)?;
    tracing::info!(%difficulty, answer = quiz.answer, "drew quiz");

    render_to_file(config, quiz.ratio(), &args.render, &mut rng)?;

    let report = QuizReport {
        difficulty,
        choices: quiz.labels(),
        answer: quiz.answer_label(),
        ratio: quiz.ratio(),
        image: &args.render.out,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize quiz")?
    );
    Ok(())
}
