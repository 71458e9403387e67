use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filmwarp", version, about = "Remap video through coordinate expressions")]
struct Cli {
    /// Source video or still image.
    source: PathBuf,

    /// Destination file; the container is chosen from the extension.
    dest: PathBuf,

    /// Coordinate triplet, e.g. `[w-1-x;y;t]`.
    expr: String,

    /// Output size triplet `[width;height;frames]`, evaluated against the source constants.
    #[arg(short = 's', long = "size")]
    size: Option<String>,

    /// Output frames produced per planning batch.
    #[arg(long, default_value_t = 24)]
    batch_size: usize,

    /// Resident source frame budget (defaults to the source frame count).
    #[arg(long)]
    max_frames: Option<usize>,

    /// Print run statistics as JSON on stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Log planning details (`debug` level) unless `RUST_LOG` is set.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = filmwarp::WarpOpts {
        batch_size: cli.batch_size,
        max_frames: cli.max_frames,
    };
    opts.validate()?;

    let stats = filmwarp::warp_file(
        &cli.source,
        &cli.dest,
        &cli.expr,
        cli.size.as_deref(),
        opts,
    )
    .with_context(|| {
        format!(
            "warp '{}' -> '{}'",
            cli.source.display(),
            cli.dest.display()
        )
    })?;

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    eprintln!("wrote {}", cli.dest.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
