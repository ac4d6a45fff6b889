use std::collections::BTreeSet;
use std::fmt::Display;

use crate::Dri;
use crate::ExtraKey;
use crate::MergeStrategy;
use crate::PropertyContainer;
use crate::SourceSets;

/// Semantic role of a piece of content. Renderers and transformers select
/// nodes by kind instead of by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
	Comment,
	Constructors,
	Functions,
	Parameters,
	Properties,
	Classlikes,
	Packages,
	Symbol,
	Sample,
	Main,
	BriefComment,
	Empty,
	TypeAliases,
	Cover,
	Inheritors,
	SourceSetDependentHint,
	Extensions,
	Annotations,
	Deprecation,
	AllTypes,
}

/// Display hints attached to content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
	Bold,
	Italic,
	Strong,
	Strikethrough,
	Paragraph,
	Block,
	Span,
	Monospace,
	Indented,
	Cover,
	UnderCoverText,
	RowTitle,
	TabbedContent,
	Caption,
	Wrapped,
	InDocumentationAnchor,
	KDocTag,
}

/// Content identifier: the declarations a node originates from and its
/// semantic kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dci {
	pub dri: BTreeSet<Dri>,
	pub kind: ContentKind,
}

impl Dci {
	pub fn new(dri: BTreeSet<Dri>, kind: ContentKind) -> Self {
		Self { dri, kind }
	}
}

/// Metadata shared by every content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMeta {
	pub dci: Dci,
	/// Source sets this content is relevant for.
	pub source_sets: SourceSets,
	pub style: BTreeSet<Style>,
	pub extra: PropertyContainer,
}

impl ContentMeta {
	pub fn new(dci: Dci, source_sets: SourceSets) -> Self {
		Self {
			dci,
			source_sets,
			style: BTreeSet::new(),
			extra: PropertyContainer::empty(),
		}
	}

	#[must_use]
	pub fn with_style(mut self, style: BTreeSet<Style>) -> Self {
		self.style = style;
		self
	}

	#[must_use]
	pub fn with_extra(mut self, extra: PropertyContainer) -> Self {
		self.extra = extra;
		self
	}
}

/// Identifies a divergent group across the rows of one page section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub String);

impl Display for GroupId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Where a link points to. DRI targets are resolved into paths by the
/// renderer's location provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
	Dri(Dri),
	Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentText {
	pub text: String,
	pub meta: ContentMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBreakLine {
	pub meta: ContentMeta,
}

/// The universal ordered container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGroup {
	pub children: Vec<ContentNode>,
	pub meta: ContentMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHeader {
	/// 1-based heading level.
	pub level: usize,
	pub children: Vec<ContentNode>,
	pub meta: ContentMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCode {
	pub children: Vec<ContentNode>,
	pub language: String,
	/// Block code as opposed to inline code.
	pub block: bool,
	pub meta: ContentMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLink {
	pub children: Vec<ContentNode>,
	pub target: LinkTarget,
	pub meta: ContentMeta,
}

/// Rows are groups; `header` holds the column titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTable {
	pub header: Vec<ContentNode>,
	pub caption: Option<Box<ContentNode>>,
	pub children: Vec<ContentNode>,
	pub meta: ContentMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentList {
	pub children: Vec<ContentNode>,
	pub ordered: bool,
	pub meta: ContentMeta,
}

/// Per source set variants of one row. Every child is a
/// [`ContentNode::DivergentInstance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDivergentGroup {
	pub children: Vec<ContentNode>,
	pub group_id: GroupId,
	/// Whether the renderer should add platform hints on its own.
	pub implicitly_source_set_hinted: bool,
	pub meta: ContentMeta,
}

impl ContentDivergentGroup {
	pub fn instances(&self) -> impl Iterator<Item = &ContentDivergentInstance> {
		self.children.iter().filter_map(|child| {
			match child {
				ContentNode::DivergentInstance(instance) => Some(instance),
				_ => None,
			}
		})
	}
}

/// One variant of a divergent row. `before` and `after` are rendered around
/// the platform specific `divergent` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDivergentInstance {
	pub before: Option<Box<ContentNode>>,
	pub divergent: Option<Box<ContentNode>>,
	pub after: Option<Box<ContentNode>>,
	pub meta: ContentMeta,
}

/// Content wrapped with an explicit list of platforms it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformHintedContent {
	pub inner: Box<ContentNode>,
	pub meta: ContentMeta,
}

/// A node of the format-agnostic content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
	Text(ContentText),
	Break(ContentBreakLine),
	Group(ContentGroup),
	Header(ContentHeader),
	Code(ContentCode),
	Link(ContentLink),
	Table(ContentTable),
	List(ContentList),
	DivergentGroup(ContentDivergentGroup),
	DivergentInstance(ContentDivergentInstance),
	PlatformHinted(PlatformHintedContent),
}

/// Discriminant of [`ContentNode`], used to select nodes for rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Text,
	Break,
	Group,
	Header,
	Code,
	Link,
	Table,
	List,
	DivergentGroup,
	DivergentInstance,
	PlatformHinted,
}

/// A composite node claiming source sets none of its children support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetCoverageViolation {
	pub node: NodeKind,
	pub kind: ContentKind,
	pub dri: BTreeSet<Dri>,
	pub uncovered: SourceSets,
}

impl From<ContentGroup> for ContentNode {
	fn from(value: ContentGroup) -> Self {
		Self::Group(value)
	}
}

impl ContentNode {
	pub fn meta(&self) -> &ContentMeta {
		match self {
			Self::Text(node) => &node.meta,
			Self::Break(node) => &node.meta,
			Self::Group(node) => &node.meta,
			Self::Header(node) => &node.meta,
			Self::Code(node) => &node.meta,
			Self::Link(node) => &node.meta,
			Self::Table(node) => &node.meta,
			Self::List(node) => &node.meta,
			Self::DivergentGroup(node) => &node.meta,
			Self::DivergentInstance(node) => &node.meta,
			Self::PlatformHinted(node) => &node.meta,
		}
	}

	pub fn meta_mut(&mut self) -> &mut ContentMeta {
		match self {
			Self::Text(node) => &mut node.meta,
			Self::Break(node) => &mut node.meta,
			Self::Group(node) => &mut node.meta,
			Self::Header(node) => &mut node.meta,
			Self::Code(node) => &mut node.meta,
			Self::Link(node) => &mut node.meta,
			Self::Table(node) => &mut node.meta,
			Self::List(node) => &mut node.meta,
			Self::DivergentGroup(node) => &mut node.meta,
			Self::DivergentInstance(node) => &mut node.meta,
			Self::PlatformHinted(node) => &mut node.meta,
		}
	}

	pub fn node_kind(&self) -> NodeKind {
		match self {
			Self::Text(_) => NodeKind::Text,
			Self::Break(_) => NodeKind::Break,
			Self::Group(_) => NodeKind::Group,
			Self::Header(_) => NodeKind::Header,
			Self::Code(_) => NodeKind::Code,
			Self::Link(_) => NodeKind::Link,
			Self::Table(_) => NodeKind::Table,
			Self::List(_) => NodeKind::List,
			Self::DivergentGroup(_) => NodeKind::DivergentGroup,
			Self::DivergentInstance(_) => NodeKind::DivergentInstance,
			Self::PlatformHinted(_) => NodeKind::PlatformHinted,
		}
	}

	pub fn content_kind(&self) -> ContentKind {
		self.meta().dci.kind
	}

	pub fn source_sets(&self) -> &SourceSets {
		&self.meta().source_sets
	}

	pub fn has_style(&self, style: Style) -> bool {
		self.meta().style.contains(&style)
	}

	/// Direct children in render order.
	pub fn children(&self) -> Vec<&ContentNode> {
		match self {
			Self::Text(_) | Self::Break(_) => Vec::new(),
			Self::Group(ContentGroup { children, .. })
			| Self::Header(ContentHeader { children, .. })
			| Self::Code(ContentCode { children, .. })
			| Self::Link(ContentLink { children, .. })
			| Self::List(ContentList { children, .. })
			| Self::DivergentGroup(ContentDivergentGroup { children, .. }) => children.iter().collect(),
			Self::Table(table) => {
				table
					.caption
					.iter()
					.map(AsRef::as_ref)
					.chain(table.header.iter())
					.chain(table.children.iter())
					.collect()
			}
			Self::DivergentInstance(instance) => {
				[&instance.before, &instance.divergent, &instance.after]
					.into_iter()
					.filter_map(|part| part.as_deref())
					.collect()
			}
			Self::PlatformHinted(hinted) => vec![hinted.inner.as_ref()],
		}
	}

	/// Visit this node and every descendant in pre-order.
	pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ContentNode)) {
		visit(self);
		for child in self.children() {
			child.walk(visit);
		}
	}

	/// Whether the subtree contains any visible text.
	pub fn has_any_content(&self) -> bool {
		match self {
			Self::Text(text) => !text.text.trim().is_empty(),
			Self::Break(_) => false,
			_ => self.children().iter().any(|child| child.has_any_content()),
		}
	}

	/// Concatenated text of the subtree in render order.
	pub fn text_content(&self) -> String {
		let mut text = String::new();
		self.walk(&mut |node| {
			if let Self::Text(node) = node {
				text.push_str(&node.text);
			}
		});
		text
	}

	#[must_use]
	pub fn with_meta(mut self, meta: ContentMeta) -> Self {
		*self.meta_mut() = meta;
		self
	}

	#[must_use]
	pub fn with_style(mut self, style: BTreeSet<Style>) -> Self {
		self.meta_mut().style = style;
		self
	}

	#[must_use]
	pub fn with_added_style(mut self, style: Style) -> Self {
		self.meta_mut().style.insert(style);
		self
	}

	#[must_use]
	pub fn with_source_sets(mut self, source_sets: SourceSets) -> Self {
		self.meta_mut().source_sets = source_sets;
		self
	}

	#[must_use]
	pub fn with_kind(mut self, kind: ContentKind) -> Self {
		self.meta_mut().dci.kind = kind;
		self
	}

	#[must_use]
	pub fn with_extra(mut self, extra: PropertyContainer) -> Self {
		self.meta_mut().extra = extra;
		self
	}

	/// Rebuild this node with every direct child passed through `f`.
	#[must_use]
	pub fn map_children(self, f: &mut impl FnMut(ContentNode) -> ContentNode) -> Self {
		fn map_all(
			children: Vec<ContentNode>,
			f: &mut impl FnMut(ContentNode) -> ContentNode,
		) -> Vec<ContentNode> {
			children.into_iter().map(&mut *f).collect()
		}

		fn map_part(
			part: Option<Box<ContentNode>>,
			f: &mut impl FnMut(ContentNode) -> ContentNode,
		) -> Option<Box<ContentNode>> {
			part.map(|node| Box::new(f(*node)))
		}

		match self {
			Self::Text(_) | Self::Break(_) => self,
			Self::Group(mut node) => {
				node.children = map_all(node.children, f);
				Self::Group(node)
			}
			Self::Header(mut node) => {
				node.children = map_all(node.children, f);
				Self::Header(node)
			}
			Self::Code(mut node) => {
				node.children = map_all(node.children, f);
				Self::Code(node)
			}
			Self::Link(mut node) => {
				node.children = map_all(node.children, f);
				Self::Link(node)
			}
			Self::List(mut node) => {
				node.children = map_all(node.children, f);
				Self::List(node)
			}
			Self::DivergentGroup(mut node) => {
				node.children = map_all(node.children, f);
				Self::DivergentGroup(node)
			}
			Self::Table(mut node) => {
				node.caption = map_part(node.caption, f);
				node.header = map_all(node.header, f);
				node.children = map_all(node.children, f);
				Self::Table(node)
			}
			Self::DivergentInstance(mut node) => {
				node.before = map_part(node.before, f);
				node.divergent = map_part(node.divergent, f);
				node.after = map_part(node.after, f);
				Self::DivergentInstance(node)
			}
			Self::PlatformHinted(mut node) => {
				node.inner = Box::new(f(*node.inner));
				Self::PlatformHinted(node)
			}
		}
	}

	/// Rewrite every node of `kind` bottom-up, leaving all other nodes as
	/// they are. Runs in a single pass over the tree.
	#[must_use]
	pub fn map_kind(self, kind: NodeKind, f: &mut impl FnMut(ContentNode) -> ContentNode) -> Self {
		let node = self.map_children(&mut |child| child.map_kind(kind, &mut *f));
		if node.node_kind() == kind { f(node) } else { node }
	}

	/// Rewrite every node bottom-up.
	#[must_use]
	pub fn map_all(self, f: &mut impl FnMut(ContentNode) -> ContentNode) -> Self {
		let node = self.map_children(&mut |child| child.map_all(&mut *f));
		f(node)
	}

	/// Rewrite every [`ContentGroup`] bottom-up.
	#[must_use]
	pub fn map_groups(self, f: &mut impl FnMut(ContentGroup) -> ContentGroup) -> Self {
		self.map_kind(NodeKind::Group, &mut |node| {
			match node {
				Self::Group(group) => Self::Group(f(group)),
				other => other,
			}
		})
	}

	/// The same tree with all source set information removed. Used to
	/// compare variants that only differ in where they apply.
	#[must_use]
	pub fn without_source_sets(&self) -> Self {
		self.clone().map_all(&mut |mut node| {
			node.meta_mut().source_sets.clear();
			node
		})
	}

	/// Composite nodes whose source sets are not covered by the union of
	/// their children's source sets.
	pub fn uncovered_source_sets(&self) -> Vec<SourceSetCoverageViolation> {
		let mut violations = Vec::new();
		self.walk(&mut |node| {
			let children = node.children();
			if children.is_empty() {
				return;
			}

			let covered: SourceSets = children
				.iter()
				.flat_map(|child| child.source_sets().iter().cloned())
				.collect();
			let uncovered: SourceSets = node.source_sets().difference(&covered).cloned().collect();

			if !uncovered.is_empty() {
				violations.push(SourceSetCoverageViolation {
					node: node.node_kind(),
					kind: node.content_kind(),
					dri: node.meta().dci.dri.clone(),
					uncovered,
				});
			}
		});
		violations
	}
}

impl ContentGroup {
	pub fn new(children: Vec<ContentNode>, meta: ContentMeta) -> Self {
		Self { children, meta }
	}

	pub fn into_node(self) -> ContentNode {
		ContentNode::Group(self)
	}
}

/// Which tab a piece of content belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabbedContentType {
	Constructor,
	Function,
	Property,
	Entry,
	Type,
	ExtensionFunction,
	ExtensionProperty,
}

pub struct TabbedContentTypeExtra;

impl ExtraKey for TabbedContentTypeExtra {
	type Value = TabbedContentType;

	const NAME: &'static str = "TabbedContentTypeExtra";

	fn merge(_left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		MergeStrategy::Replace(*right)
	}
}

/// Anchor the renderer should emit for a symbol row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAnchor {
	pub anchor_name: String,
	pub content_kind: ContentKind,
}

pub struct SymbolAnchorHint;

impl ExtraKey for SymbolAnchorHint {
	type Value = SymbolAnchor;

	const NAME: &'static str = "SymbolAnchorHint";

	fn merge(_left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		MergeStrategy::Replace(right.clone())
	}
}
