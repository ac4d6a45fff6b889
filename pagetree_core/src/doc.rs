use serde::Deserialize;
use serde::Serialize;

use crate::Dri;

/// A node of a parsed documentation comment.
///
/// The markdown/KDoc front-end that produces these trees is an external
/// collaborator; this crate only consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum DocTag {
	Text {
		body: String,
	},
	Paragraph {
		#[serde(default)]
		children: Vec<DocTag>,
	},
	Bold {
		#[serde(default)]
		children: Vec<DocTag>,
	},
	Italic {
		#[serde(default)]
		children: Vec<DocTag>,
	},
	CodeInline {
		#[serde(default)]
		children: Vec<DocTag>,
	},
	CodeBlock {
		#[serde(default)]
		language: Option<String>,
		#[serde(default)]
		children: Vec<DocTag>,
	},
	DocumentationLink {
		dri: Dri,
		#[serde(default)]
		children: Vec<DocTag>,
	},
	ExternalLink {
		href: String,
		#[serde(default)]
		children: Vec<DocTag>,
	},
	UnorderedList {
		#[serde(default)]
		children: Vec<DocTag>,
	},
	ListItem {
		#[serde(default)]
		children: Vec<DocTag>,
	},
	Br,
	/// A generic root wrapping several top-level blocks.
	CustomDocTag {
		#[serde(default)]
		children: Vec<DocTag>,
	},
}

impl DocTag {
	pub fn text(body: impl Into<String>) -> Self {
		Self::Text { body: body.into() }
	}

	pub fn paragraph(children: Vec<DocTag>) -> Self {
		Self::Paragraph { children }
	}

	pub fn children(&self) -> &[DocTag] {
		match self {
			Self::Text { .. } | Self::Br => &[],
			Self::Paragraph { children }
			| Self::Bold { children }
			| Self::Italic { children }
			| Self::CodeInline { children }
			| Self::CodeBlock { children, .. }
			| Self::DocumentationLink { children, .. }
			| Self::ExternalLink { children, .. }
			| Self::UnorderedList { children }
			| Self::ListItem { children }
			| Self::CustomDocTag { children } => children,
		}
	}

	/// Concatenated text of the whole subtree.
	pub fn plain_text(&self) -> String {
		match self {
			Self::Text { body } => body.clone(),
			Self::Br => "\n".to_string(),
			_ => self.children().iter().map(DocTag::plain_text).collect(),
		}
	}

	/// The first block-level element, used for brief descriptions.
	#[must_use]
	pub fn first_paragraph(&self) -> DocTag {
		match self {
			Self::CustomDocTag { children } => {
				children
					.iter()
					.find(|child| !matches!(child, Self::Text { body } if body.trim().is_empty()))
					.cloned()
					.unwrap_or_else(|| self.clone())
			}
			_ => self.clone(),
		}
	}

	/// The first sentence of the first paragraph, used by Java-style briefs.
	#[must_use]
	pub fn first_sentence(&self) -> DocTag {
		let text = self.first_paragraph().plain_text();
		let sentence = text
			.find(". ")
			.map_or(text.as_str(), |end| &text[..=end])
			.trim()
			.to_string();
		Self::paragraph(vec![Self::text(sentence)])
	}
}

/// A top-level section of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "wrapper", rename_all = "snake_case")]
pub enum TagWrapper {
	Description {
		root: DocTag,
	},
	Param {
		name: String,
		root: DocTag,
	},
	Return {
		root: DocTag,
	},
	Throws {
		name: String,
		#[serde(default)]
		exception: Option<Dri>,
		root: DocTag,
	},
	See {
		name: String,
		#[serde(default)]
		address: Option<Dri>,
		root: DocTag,
	},
	Sample {
		name: String,
		root: DocTag,
	},
	Since {
		root: DocTag,
	},
	Author {
		root: DocTag,
	},
	Deprecated {
		root: DocTag,
	},
	Property {
		name: String,
		root: DocTag,
	},
	CustomTag {
		name: String,
		root: DocTag,
	},
}

impl TagWrapper {
	pub fn root(&self) -> &DocTag {
		match self {
			Self::Description { root }
			| Self::Param { root, .. }
			| Self::Return { root }
			| Self::Throws { root, .. }
			| Self::See { root, .. }
			| Self::Sample { root, .. }
			| Self::Since { root }
			| Self::Author { root }
			| Self::Deprecated { root }
			| Self::Property { root, .. }
			| Self::CustomTag { root, .. } => root,
		}
	}

	/// Section heading for tags rendered as a plain titled paragraph.
	pub fn header(&self) -> &'static str {
		match self {
			Self::Description { .. } => "Description",
			Self::Param { .. } => "Parameters",
			Self::Return { .. } => "Return",
			Self::Throws { .. } => "Throws",
			Self::See { .. } => "See also",
			Self::Sample { .. } => "Samples",
			Self::Since { .. } => "Since",
			Self::Author { .. } => "Author",
			Self::Deprecated { .. } => "Deprecated",
			Self::Property { .. } => "Property",
			Self::CustomTag { .. } => "Custom",
		}
	}
}

/// The parsed documentation of one declaration in one source set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationNode {
	#[serde(default)]
	pub children: Vec<TagWrapper>,
}

impl DocumentationNode {
	pub fn new(children: Vec<TagWrapper>) -> Self {
		Self { children }
	}

	/// A node holding only a one-paragraph description.
	pub fn description(text: impl Into<String>) -> Self {
		Self::new(vec![TagWrapper::Description {
			root: DocTag::CustomDocTag {
				children: vec![DocTag::paragraph(vec![DocTag::text(text)])],
			},
		}])
	}

	pub fn description_tag(&self) -> Option<&TagWrapper> {
		self.children
			.iter()
			.find(|tag| matches!(tag, TagWrapper::Description { .. }))
	}

	pub fn property_tag(&self) -> Option<&TagWrapper> {
		self.children
			.iter()
			.find(|tag| matches!(tag, TagWrapper::Property { .. }))
	}
}
