use clap::Parser;
use miette::Result;
use mkmk_driver::{Driver, DriverConfig, DEFAULT_SCRIPT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mkmk")]
#[command(author, version, about = "Turns build scripts into a Makefile and a dependency graph")]
struct Cli {
    /// Root build script
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    config: PathBuf,

    /// Output folder for build products
    #[arg(long, env = "MKMK_BINDIR", default_value = "out")]
    bindir: PathBuf,

    /// Write the dependency graph in dot format to this file
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write the build recipe as a Makefile to this file
    #[arg(long)]
    makefile: Option<PathBuf>,

    /// Compiler family for generated commands
    #[arg(long, env = "MKMK_TOOLCHAIN", default_value = "gcc")]
    toolchain: String,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// `MKMK_LOG` wins over `-v` when set.
fn init_logging(verbose: bool) {
    let filter = match std::env::var("MKMK_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("info"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.dot.is_none() && cli.makefile.is_none() {
        tracing::warn!("neither --dot nor --makefile given, only checking the scripts");
    }

    let mut config = DriverConfig::new(cli.config, cli.bindir).toolchain(cli.toolchain);
    if let Some(dot) = cli.dot {
        config = config.dot(dot);
    }
    if let Some(makefile) = cli.makefile {
        config = config.makefile(makefile);
    }

    let registry = Driver::new(config).run()?;
    println!("Loaded {} nodes", registry.len());
    Ok(())
}
