use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "layerdeck", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a layered SVG into a PDF presentation (requires `inkscape` and `gs` on PATH).
    Build(BuildArgs),
    /// Print the page plan as JSON without rendering anything.
    Plan(PlanArgs),
    /// Render every page as a PNG preview (no external tools needed).
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct DeckArgs {
    /// Input SVG drawing with Inkscape layers.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// JSON options file; flags given on the command line override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label of the always-visible background layer.
    #[arg(long)]
    background: Option<String>,

    /// Label of the always-visible foreground layer.
    #[arg(long)]
    foreground: Option<String>,

    /// Presentation title.
    #[arg(long)]
    title: Option<String>,

    /// Author name.
    #[arg(long)]
    author: Option<String>,

    /// Subject.
    #[arg(long)]
    subject: Option<String>,

    /// Keywords (separated by ',').
    #[arg(long)]
    keywords: Option<String>,
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Directory where to save the output.
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Presentation file name (`.pdf` is appended when missing).
    #[arg(long)]
    output: Option<String>,

    /// Keep the temporary working directory.
    #[arg(long)]
    keep_temps: bool,

    /// Also store the pdfmarks next to the output as `<output>.marks`.
    #[arg(long)]
    export_marks: bool,

    /// Inkscape export resolution.
    #[arg(long)]
    dpi: Option<u32>,

    /// Ghostscript paper size.
    #[arg(long)]
    paper_size: Option<String>,

    /// Use the Inkscape 0.92 command line.
    #[arg(long)]
    inkscape_legacy: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    deck: DeckArgs,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Directory receiving `<name>-NNN.png` pages.
    #[arg(long)]
    out_dir: PathBuf,

    /// Pixels per SVG user unit.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Paint pages over an opaque white backdrop.
    #[arg(long)]
    opaque: bool,

    /// Also write the pdfmarks next to the pages.
    #[arg(long)]
    export_marks: bool,
}

impl DeckArgs {
    fn options(&self) -> anyhow::Result<layerdeck::DeckOptions> {
        let mut opts = match &self.config {
            Some(path) => layerdeck::DeckOptions::from_path(path)?,
            None => layerdeck::DeckOptions::default(),
        };
        for (value, slot) in [
            (&self.background, &mut opts.roles.background),
            (&self.foreground, &mut opts.roles.foreground),
            (&self.title, &mut opts.info.title),
            (&self.author, &mut opts.info.author),
            (&self.subject, &mut opts.info.subject),
            (&self.keywords, &mut opts.info.keywords),
        ] {
            if let Some(v) = value {
                slot.clone_from(v);
            }
        }
        Ok(opts)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("layerdeck={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let mut opts = args.deck.options()?;
    if let Some(dir) = args.directory {
        opts.directory = dir;
    }
    if let Some(output) = args.output {
        opts.output = output;
    }
    if let Some(dpi) = args.dpi {
        opts.dpi = dpi;
    }
    if let Some(paper) = args.paper_size {
        opts.paper_size = paper;
    }
    opts.keep_temps |= args.keep_temps;
    opts.export_marks |= args.export_marks;
    opts.inkscape_legacy_cli |= args.inkscape_legacy;

    let report = layerdeck::compile_deck(&args.deck.in_path, &opts)
        .with_context(|| format!("compile '{}'", args.deck.in_path.display()))?;

    if let Some(dir) = &report.kept_workdir {
        eprintln!("temporary files stored in {}", dir.display());
    }
    eprintln!("wrote {} ({} pages)", report.output.display(), report.pages);
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let opts = args.deck.options()?;
    let (doc, plan) = layerdeck::plan_deck(&args.deck.in_path, &opts)?;
    let report = layerdeck::PlanReport::new(&doc, &plan);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize page plan")?
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut opts = args.deck.options()?;
    opts.export_marks |= args.export_marks;
    let raster = layerdeck::RasterOpts {
        scale: args.scale,
        backdrop: args.opaque.then_some([255, 255, 255, 255]),
    };

    let pages = layerdeck::preview_deck(&args.deck.in_path, &opts, &args.out_dir, raster)?;
    eprintln!("wrote {} pages to {}", pages.len(), args.out_dir.display());
    Ok(())
}
