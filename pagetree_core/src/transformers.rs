use std::sync::Arc;

use crate::ContentKind;
use crate::ContentNode;
use crate::LinkTarget;
use crate::NodeKind;
use crate::PageLogger;
use crate::PageNode;
use crate::Style;

/// A whole-tree rewrite run after page creation.
///
/// Transformers take ownership of the tree and return the new one. Shapes
/// a transformer does not care about are passed through unchanged.
pub trait PageTransformer: Send + Sync {
	fn name(&self) -> &'static str;
	fn transform(&self, root: PageNode) -> PageNode;
}

/// Runs transformers in the order they were added.
#[derive(Default)]
pub struct PageTransformerPipeline {
	transformers: Vec<Arc<dyn PageTransformer>>,
}

impl PageTransformerPipeline {
	pub fn new() -> Self {
		Self::default()
	}

	/// The stock pipeline: brief comment styling, root path substitution and
	/// a source set coverage check reporting to `logger`.
	pub fn standard(logger: Arc<PageLogger>) -> Self {
		Self::new()
			.with(Arc::new(BriefCommentPreprocessor))
			.with(Arc::new(PathToRootSubstitution::default()))
			.with(Arc::new(SourceSetCoverageCheck::new(logger)))
	}

	#[must_use]
	pub fn with(mut self, transformer: Arc<dyn PageTransformer>) -> Self {
		self.transformers.push(transformer);
		self
	}

	pub fn names(&self) -> Vec<&'static str> {
		self.transformers.iter().map(|transformer| transformer.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.transformers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transformers.is_empty()
	}

	pub fn run(&self, root: PageNode) -> PageNode {
		self.transformers.iter().fold(root, |root, transformer| {
			tracing::debug!(transformer = transformer.name(), "running page transformer");
			transformer.transform(root)
		})
	}
}

/// Brief comments are rendered as blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BriefCommentPreprocessor;

impl PageTransformer for BriefCommentPreprocessor {
	fn name(&self) -> &'static str {
		"brief-comment-preprocessor"
	}

	fn transform(&self, root: PageNode) -> PageNode {
		root.map_content(&mut |content| {
			content.map_groups(&mut |mut group| {
				if group.meta.dci.kind == ContentKind::BriefComment {
					group.meta.style.insert(Style::Block);
				}
				group
			})
		})
	}
}

/// Replaces a placeholder in texts and URL links with the relative path
/// from each page to the root page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathToRootSubstitution {
	pub pattern: String,
	/// Path used on the root page itself.
	pub default: String,
}

impl Default for PathToRootSubstitution {
	fn default() -> Self {
		Self {
			pattern: "###".to_string(),
			default: ".".to_string(),
		}
	}
}

impl PathToRootSubstitution {
	/// `.` at the root, `..` one level down, `../..` two levels down.
	pub fn path_to_root(&self, depth: usize) -> String {
		if depth == 0 {
			return self.default.clone();
		}
		vec![".."; depth].join("/")
	}

	fn substitute(&self, node: ContentNode, path: &str) -> ContentNode {
		match node {
			ContentNode::Text(mut text) => {
				if text.text.contains(&self.pattern) {
					text.text = text.text.replace(&self.pattern, path);
				}
				ContentNode::Text(text)
			}
			ContentNode::Link(mut link) => {
				if let LinkTarget::Url(url) = &link.target {
					if url.contains(&self.pattern) {
						link.target = LinkTarget::Url(url.replace(&self.pattern, path));
					}
				}
				ContentNode::Link(link)
			}
			other => other,
		}
	}
}

impl PageTransformer for PathToRootSubstitution {
	fn name(&self) -> &'static str {
		"path-to-root-substitution"
	}

	fn transform(&self, root: PageNode) -> PageNode {
		root.map_pages_with_depth(0, &mut |mut page, depth| {
			let path = self.path_to_root(depth);
			page.content = page.content.map_all(&mut |node| {
				match node.node_kind() {
					NodeKind::Text | NodeKind::Link => self.substitute(node, &path),
					_ => node,
				}
			});
			page
		})
	}
}

/// Warns about composite nodes that claim source sets none of their
/// children support. The tree is returned unchanged.
pub struct SourceSetCoverageCheck {
	logger: Arc<PageLogger>,
}

impl SourceSetCoverageCheck {
	pub fn new(logger: Arc<PageLogger>) -> Self {
		Self { logger }
	}
}

impl PageTransformer for SourceSetCoverageCheck {
	fn name(&self) -> &'static str {
		"source-set-coverage-check"
	}

	fn transform(&self, root: PageNode) -> PageNode {
		root.walk(&mut |page, _| {
			for violation in page.content.uncovered_source_sets() {
				let uncovered = violation
					.uncovered
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join(", ");
				self.logger.warn(&format!(
					"{:?} node of kind {:?} on page `{}` claims source sets [{uncovered}] that no child \
					 supports",
					violation.node, violation.kind, page.name
				));
			}
		});
		root
	}
}
