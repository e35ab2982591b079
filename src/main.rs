use clap::Parser;
use miette::Result;
use pmc::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(global.verbose);

    match cli.command {
        Commands::Init(args) => pmc::cli::commands::init::run(args),
        Commands::Asset(cmd) => pmc::cli::commands::asset::run(cmd, &global),
        Commands::Generate(args) => pmc::cli::commands::generate::run(args, &global),
        Commands::Catalog(args) => pmc::cli::commands::catalog::run(args, &global),
        Commands::Validate(args) => pmc::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => pmc::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `PMC_LOG` overrides the level, `-v` raises the default to debug
fn init_tracing(verbose: bool) {
    let default = if verbose { "pmc=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_env("PMC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
