use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PageError {
	#[error(transparent)]
	#[diagnostic(code(pagetree::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(pagetree::config_parse),
		help(
			"check that pagetree.toml is valid TOML with boolean \
			 `merge_implicit_expect_actual_declarations`, `separate_inherited_members` and \
			 `display_all_types_page` keys"
		)
	)]
	ConfigParse(String),

	#[error("failed to parse declaration model `{path}`: {reason}")]
	#[diagnostic(
		code(pagetree::input_parse),
		help("the input must be a JSON encoded module produced by the merge stage")
	)]
	InputParse { path: String, reason: String },

	#[error("expected only {expected}, found {found} `{dri}`")]
	#[diagnostic(
		code(pagetree::unexpected_documentable),
		help("this is a bug in the caller that assembled the documentable list")
	)]
	UnexpectedDocumentable {
		expected: String,
		found: String,
		dri: String,
	},

	#[error("cannot merge extra `{key}`: both sides define it and the key forbids merging")]
	#[diagnostic(code(pagetree::extra_merge_conflict))]
	ExtraMergeConflict { key: String },

	#[error("page generation failed for `{name}`: {reason}")]
	#[diagnostic(code(pagetree::generation_failed))]
	GenerationFailed { name: String, reason: String },
}

pub type PageResult<T> = Result<T, PageError>;
