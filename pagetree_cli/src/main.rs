use std::path::Path;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use pagetree_cli::Commands;
use pagetree_cli::GenerateArgs;
use pagetree_cli::OutputFormat;
use pagetree_cli::PagetreeCli;
use pagetree_cli::render_markdown;
use pagetree_cli::render_outline;
use pagetree_core::PageConfig;
use pagetree_core::PageError;
use pagetree_core::PageResult;
use pagetree_core::SourceSetRegistry;
use pagetree_core::generate;
use pagetree_core::load_module;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = PagetreeCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Generate(generate_args)) => run_generate(generate_args),
		None => {
			eprintln!(
				"{} no subcommand specified. Run `pagetree --help` for usage.",
				colored!("error:", red)
			);
			process::exit(2);
		}
	};

	if let Err(error) = result {
		let code = if matches!(error, PageError::GenerationFailed { .. }) {
			1
		} else {
			2
		};
		let report: miette::Report = error.into();
		eprintln!("{report:?}");
		process::exit(code);
	}
}

/// Log events go to stderr. `--verbose` shows everything down to `debug`,
/// otherwise `RUST_LOG` decides and falls back to warnings and errors.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

/// The explicit config file, else the first one discovered in the working
/// directory, else the defaults. Flags are applied last.
fn resolve_config(args: &GenerateArgs) -> PageResult<PageConfig> {
	let config = match &args.config {
		Some(path) => PageConfig::load_file(path)?,
		None => {
			let root = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
			PageConfig::load(&root)?.unwrap_or_default()
		}
	};

	Ok(args.apply_to(config))
}

fn run_generate(args: &GenerateArgs) -> PageResult<()> {
	let config = resolve_config(args)?;
	tracing::debug!(?config, "resolved page config");

	let module = load_module(&args.input)?;
	let output = generate(&module, config)?;

	let rendered = match args.format {
		OutputFormat::Outline => render_outline(&output.root),
		OutputFormat::Markdown => {
			render_markdown(&output.root, &SourceSetRegistry::new(&module.source_sets))
		}
	};
	print!("{rendered}");

	let report = output.report;
	let pages = output.root.page_count();
	if report.is_clean() {
		eprintln!(
			"{} {pages} page(s) for module `{}`",
			colored!("Generated", green),
			module.name
		);
	} else {
		eprintln!(
			"{} {pages} page(s) for module `{}` with {} error(s) and {} warning(s)",
			colored!("Generated", yellow),
			module.name,
			report.errors,
			report.warnings
		);
	}

	if args.fail_on_errors && report.has_errors() {
		return Err(PageError::GenerationFailed {
			name: module.name,
			reason: format!("{} error(s) logged", report.errors),
		});
	}

	Ok(())
}
