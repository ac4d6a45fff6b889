use std::collections::BTreeSet;

use crate::ContentNode;
use crate::Documentable;
use crate::Dri;

/// Package name of the synthetic DRI that identifies the "All Types" page.
pub const ALL_TYPES_PACKAGE: &str = ".alltypes";

pub fn all_types_dri() -> Dri {
	Dri::package(ALL_TYPES_PACKAGE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
	Module,
	Package,
	Classlike,
	Member,
	AllTypes,
}

impl PageKind {
	pub fn label(self) -> &'static str {
		match self {
			Self::Module => "module",
			Self::Package => "package",
			Self::Classlike => "classlike",
			Self::Member => "member",
			Self::AllTypes => "all types",
		}
	}
}

/// One page of the output tree.
///
/// Pages own their children. Rewrites consume the tree and return a new one,
/// moving every subtree they do not change.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
	pub kind: PageKind,
	pub name: String,
	/// Root content group of the page.
	pub content: ContentNode,
	pub dri: BTreeSet<Dri>,
	/// The declarations this page documents, one per source set variant.
	pub documentables: Vec<Documentable>,
	pub children: Vec<PageNode>,
}

impl PageNode {
	pub fn new(
		kind: PageKind,
		name: impl Into<String>,
		content: ContentNode,
		dri: BTreeSet<Dri>,
		documentables: Vec<Documentable>,
		children: Vec<PageNode>,
	) -> Self {
		Self {
			kind,
			name: name.into(),
			content,
			dri,
			documentables,
			children,
		}
	}

	#[must_use]
	pub fn with_content(mut self, content: ContentNode) -> Self {
		self.content = content;
		self
	}

	#[must_use]
	pub fn with_children(mut self, children: Vec<PageNode>) -> Self {
		self.children = children;
		self
	}

	/// Rewrite the content of this page and every descendant.
	#[must_use]
	pub fn map_content(self, f: &mut impl FnMut(ContentNode) -> ContentNode) -> Self {
		self.map_pages_with_depth(0, &mut |page, _| {
			let PageNode {
				kind,
				name,
				content,
				dri,
				documentables,
				children,
			} = page;
			PageNode {
				kind,
				name,
				content: f(content),
				dri,
				documentables,
				children,
			}
		})
	}

	/// Rewrite pages top-down. `f` receives each page with its depth below
	/// the page this is called on, before its children are visited.
	#[must_use]
	pub fn map_pages_with_depth(self, depth: usize, f: &mut impl FnMut(PageNode, usize) -> PageNode) -> Self {
		let mut page = f(self, depth);
		let children = std::mem::take(&mut page.children);
		page.children = children
			.into_iter()
			.map(|child| child.map_pages_with_depth(depth + 1, f))
			.collect();
		page
	}

	/// Visit every page in pre-order with its depth.
	pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a PageNode, usize)) {
		self.walk_at(0, visit);
	}

	fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a PageNode, usize)) {
		visit(self, depth);
		for child in &self.children {
			child.walk_at(depth + 1, visit);
		}
	}

	pub fn child(&self, name: &str) -> Option<&PageNode> {
		self.children.iter().find(|child| child.name == name)
	}

	/// Follow a path of page names from this page.
	pub fn find_path(&self, path: &[&str]) -> Option<&PageNode> {
		path.iter()
			.try_fold(self, |page, name| page.child(name))
	}

	/// Number of pages in the tree including this one.
	pub fn page_count(&self) -> usize {
		let mut count = 0;
		self.walk(&mut |_, _| count += 1);
		count
	}
}
