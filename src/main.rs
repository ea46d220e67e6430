//! tama CLI: builds filtration pairs for kernel/image/cokernel persistence.
//!
//! Usage:
//! ```text
//! tama pair --points 100 --seed 3 --complex rips --max-radius 2.5
//! tama pair --input cloud.json --complex alpha2d --validate --output pair.json
//! tama diagram dgm0.json dgm1.json
//! tama diagram ker.json im.json coker.json --label kernel --label image --label cokernel
//! tama --license
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use tama::diagram::{summarize, summarize_labeled, PersistenceDiagram};
use tama::export::{PairExport, ReductionParams};
use tama::geometry::{random_cloud, read_points_json};
use tama::info::{INTRO, LICENSE_NOTICE};
use tama::operations::complex::{AlphaComplex2D, RipsComplex, RipsParams};
use tama::operations::pair::BuildFiltrationPair;
use tama::topology::VertexMembership;

#[derive(Parser)]
#[command(name = "tama", version, about = "Topological amorphous material analysis")]
struct Cli {
    /// Print the license notice and exit.
    #[arg(long)]
    license: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sub-complex and full filtrations of a point cloud.
    Pair(PairArgs),

    /// Prepare persistence diagrams for plotting.
    Diagram {
        /// JSON files, each a list of [birth, death] pairs (null death = infinity).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Name for each diagram, in file order; indices if omitted.
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Output path (stdout if omitted).
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ComplexKind {
    /// Vietoris-Rips complex in 3D.
    Rips,
    /// Alpha complex of the xy projection.
    Alpha2d,
}

#[derive(clap::Args)]
#[allow(clippy::struct_excessive_bools)]
struct PairArgs {
    /// JSON file with a list of [x, y, z] points; random points if omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Number of random points.
    #[arg(long, default_value = "100")]
    points: usize,

    /// Seed for the random points.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Points with z below this value belong to the sub-complex.
    #[arg(long, default_value = "1.0")]
    z_lower: f64,

    /// Points with z above this value belong to the sub-complex.
    #[arg(long, default_value = "9.0")]
    z_upper: f64,

    #[arg(long, value_enum, default_value = "rips")]
    complex: ComplexKind,

    /// Longest Rips edge.
    #[arg(long, default_value = "2.0")]
    max_radius: f64,

    /// Highest Rips simplex dimension.
    #[arg(long, default_value = "2")]
    max_dim: usize,

    /// Largest squared alpha radius kept.
    #[arg(long)]
    max_alpha_sq: Option<f64>,

    /// Check the filtration order before splitting it.
    #[arg(long)]
    validate: bool,

    /// Threads for the external reduction.
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Ask the external reduction for progress output.
    #[arg(long)]
    verbose_reduction: bool,

    #[arg(long)]
    no_kernel: bool,

    #[arg(long)]
    no_image: bool,

    #[arg(long)]
    no_cokernel: bool,

    /// Output path (stdout if omitted).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for tama. Override with RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("tama=info".parse().into_diagnostic()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.license {
        println!("{LICENSE_NOTICE}");
        return Ok(());
    }
    eprintln!("{INTRO}");

    match cli.command {
        Some(Commands::Pair(args)) => run_pair(&args),
        Some(Commands::Diagram {
            files,
            labels,
            output,
        }) => run_diagram(&files, &labels, output.as_deref()),
        None => Err(miette::miette!("no command given, see `tama --help`")),
    }
}

fn run_pair(args: &PairArgs) -> Result<()> {
    let points = match &args.input {
        Some(path) => read_points_json(BufReader::new(File::open(path).into_diagnostic()?))
            .into_diagnostic()?,
        None => random_cloud(args.points, 10.0, args.seed),
    };
    let membership = VertexMembership::outside_z_band(&points, args.z_lower, args.z_upper);
    tracing::info!(
        points = points.len(),
        members = membership.member_count(),
        "selected sub-complex vertices"
    );

    let filtration = match args.complex {
        ComplexKind::Rips => RipsComplex::new(RipsParams {
            max_radius: args.max_radius,
            max_dim: args.max_dim,
        })
        .execute(&points),
        ComplexKind::Alpha2d => {
            let op = AlphaComplex2D::new();
            match args.max_alpha_sq {
                Some(max) => op.with_max_alpha_sq(max).execute(&points),
                None => op.execute(&points),
            }
        }
    }
    .into_diagnostic()?;

    let (simplices, weights) = filtration.into_parts();
    let pair = BuildFiltrationPair::new(&simplices, &weights)
        .with_validation(args.validate)
        .execute(&membership)
        .into_diagnostic()?;
    tracing::info!(l = pair.l.len(), k = pair.k.len(), "built filtration pair");

    let params = ReductionParams {
        n_threads: args.threads,
        verbose: args.verbose_reduction,
        kernel: !args.no_kernel,
        image: !args.no_image,
        cokernel: !args.no_cokernel,
    };
    let export = PairExport::new(pair, params);
    export.write_json(open_output(args.output.as_deref())?).into_diagnostic()
}

fn run_diagram(files: &[PathBuf], labels: &[String], output: Option<&Path>) -> Result<()> {
    let mut diagrams = Vec::with_capacity(files.len());
    for path in files {
        let reader = BufReader::new(File::open(path).into_diagnostic()?);
        let diagram: PersistenceDiagram = serde_json::from_reader(reader).into_diagnostic()?;
        tracing::info!(path = %path.display(), points = diagram.len(), "read diagram");
        diagrams.push(diagram);
    }

    let summary = if labels.is_empty() {
        summarize(&diagrams)
    } else {
        summarize_labeled(&diagrams, labels).into_diagnostic()?
    };
    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &summary).into_diagnostic()?;
    writeln!(writer).into_diagnostic()
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path).into_diagnostic()?)),
        None => Box::new(io::stdout().lock()),
    })
}
