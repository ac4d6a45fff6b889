use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use pagetree_core::PageConfig;

pub use render::*;

mod render;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn a merged multiplatform declaration model into documentation pages.",
	long_about = "pagetree reads a declaration model in which every declaration carries its \
	              per-platform variants and turns it into a tree of documentation pages with \
	              format-agnostic content.\n\nClashing names are renamed or merged, per-platform \
	              variants are grouped into divergent rows and every page runs through the \
	              standard transformers.\n\nQuick start:\n  pagetree generate --input \
	              module.json\n  pagetree generate --input module.json --format markdown"
)]
pub struct PagetreeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Enable verbose output. Raises the log level to `debug`.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate the page tree for a module and print it.
	///
	/// Reads a JSON encoded module, builds one page per module, package,
	/// classlike and member, runs the page transformers and prints the
	/// result. Problems found along the way are logged to stderr and
	/// counted in the closing summary.
	///
	/// Options are read from the first of `pagetree.toml`,
	/// `.pagetree.toml` and `.config/pagetree.toml` in the working
	/// directory unless `--config` names a file. Flags override the file.
	Generate(GenerateArgs),
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateArgs {
	/// Path to the JSON encoded module.
	#[arg(long, short)]
	pub input: PathBuf,

	/// Path to a config file. Disables config discovery.
	#[arg(long, short)]
	pub config: Option<PathBuf>,

	/// How the page tree is printed.
	#[arg(long, value_enum, default_value_t = OutputFormat::Outline)]
	pub format: OutputFormat,

	/// Merge clashing declarations into one page with divergent content
	/// instead of renaming them.
	#[arg(long, default_value_t = false)]
	pub merge_implicit_expect_actual: bool,

	/// Give inherited members their own sections.
	#[arg(long, default_value_t = false)]
	pub separate_inherited_members: bool,

	/// Add an "All Types" page under the module.
	#[arg(long, default_value_t = false)]
	pub all_types: bool,

	/// Exit with status 1 when any error was logged during generation.
	#[arg(long, default_value_t = false)]
	pub fail_on_errors: bool,
}

impl GenerateArgs {
	/// Apply the flags on top of `config`. Flags can only switch options
	/// on.
	pub fn apply_to(&self, mut config: PageConfig) -> PageConfig {
		config.merge_implicit_expect_actual_declarations |= self.merge_implicit_expect_actual;
		config.separate_inherited_members |= self.separate_inherited_members;
		config.display_all_types_page |= self.all_types;
		config
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// The page hierarchy, one page per line.
	Outline,
	/// Every page as a GitHub flavored markdown section.
	Markdown,
}
