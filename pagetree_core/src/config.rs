use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::PageError;
use crate::PageResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["pagetree.toml", ".pagetree.toml", ".config/pagetree.toml"];

/// Options that change the shape of the generated page tree.
///
/// ```toml
/// merge_implicit_expect_actual_declarations = true
/// separate_inherited_members = true
/// display_all_types_page = false
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
	/// Sibling declarations sharing a DRI become a single page with divergent
	/// content instead of separately named pages.
	pub merge_implicit_expect_actual_declarations: bool,
	/// Inherited members get their own "Inherited ..." sections.
	pub separate_inherited_members: bool,
	/// Add an "All Types" page under the module.
	pub display_all_types_page: bool,
}

impl PageConfig {
	/// Returns the first config file found in `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no file exists.
	pub fn load(root: &Path) -> PageResult<Option<PageConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit path.
	pub fn load_file(path: &Path) -> PageResult<PageConfig> {
		let content = std::fs::read_to_string(path)?;
		Self::parse(&content)
	}

	pub fn parse(content: &str) -> PageResult<PageConfig> {
		toml::from_str(content).map_err(|e| PageError::ConfigParse(e.to_string()))
	}
}
