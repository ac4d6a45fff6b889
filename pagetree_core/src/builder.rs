use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use dashmap::DashMap;

use crate::CommentsToContentConverter;
use crate::ContentBreakLine;
use crate::ContentDivergentGroup;
use crate::ContentDivergentInstance;
use crate::ContentGroup;
use crate::ContentHeader;
use crate::ContentKind;
use crate::ContentLink;
use crate::ContentMeta;
use crate::ContentNode;
use crate::ContentTable;
use crate::ContentText;
use crate::DPackage;
use crate::Dci;
use crate::DocTag;
use crate::Documentable;
use crate::Dri;
use crate::GroupId;
use crate::LinkTarget;
use crate::PageLogger;
use crate::PlatformHintedContent;
use crate::PropertyContainer;
use crate::SignatureProvider;
use crate::SourceSets;
use crate::Style;
use crate::SymbolAnchor;
use crate::SymbolAnchorHint;
use crate::TypeRef;
use crate::canonical_alphabetical_order;

/// Overrides for a nested scope. Unset fields are inherited from the
/// enclosing builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOptions {
	pub dri: Option<BTreeSet<Dri>>,
	pub source_sets: Option<SourceSets>,
	pub kind: Option<ContentKind>,
	pub styles: Option<BTreeSet<Style>>,
	pub extra: Option<PropertyContainer>,
}

impl GroupOptions {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn dri(mut self, dri: BTreeSet<Dri>) -> Self {
		self.dri = Some(dri);
		self
	}

	#[must_use]
	pub fn source_sets(mut self, source_sets: SourceSets) -> Self {
		self.source_sets = Some(source_sets);
		self
	}

	#[must_use]
	pub fn kind(mut self, kind: ContentKind) -> Self {
		self.kind = Some(kind);
		self
	}

	#[must_use]
	pub fn styles(mut self, styles: BTreeSet<Style>) -> Self {
		self.styles = Some(styles);
		self
	}

	#[must_use]
	pub fn extra(mut self, extra: PropertyContainer) -> Self {
		self.extra = Some(extra);
		self
	}

	/// Use `kind` unless a kind was already chosen.
	#[must_use]
	pub fn or_kind(mut self, kind: ContentKind) -> Self {
		self.kind.get_or_insert(kind);
		self
	}
}

/// Table level settings for [`DocumentableContentBuilder::block`] and
/// [`DocumentableContentBuilder::multi_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOptions {
	pub source_sets: SourceSets,
	pub extra: PropertyContainer,
	/// Order rows by name instead of input order.
	pub needs_sorting: bool,
	/// Attach a [`SymbolAnchorHint`] to every named row.
	pub needs_anchors: bool,
}

impl BlockOptions {
	pub fn new(source_sets: SourceSets) -> Self {
		Self {
			source_sets,
			extra: PropertyContainer::empty(),
			needs_sorting: true,
			needs_anchors: false,
		}
	}

	#[must_use]
	pub fn extra(mut self, extra: PropertyContainer) -> Self {
		self.extra = extra;
		self
	}

	#[must_use]
	pub fn sorted(mut self, needs_sorting: bool) -> Self {
		self.needs_sorting = needs_sorting;
		self
	}

	#[must_use]
	pub fn anchored(mut self, needs_anchors: bool) -> Self {
		self.needs_anchors = needs_anchors;
		self
	}

	fn row_extra(&self, name: Option<String>, kind: ContentKind) -> PropertyContainer {
		match name {
			Some(anchor_name) if self.needs_anchors => {
				self.extra.clone().with::<SymbolAnchorHint>(SymbolAnchor {
					anchor_name,
					content_kind: kind,
				})
			}
			_ => self.extra.clone(),
		}
	}
}

/// Something that can be listed as a row of a block table.
pub trait BlockElement {
	fn element_dri(&self) -> Dri;
	fn element_source_sets(&self) -> SourceSets;
	fn element_name(&self) -> Option<String>;
}

impl BlockElement for Documentable {
	fn element_dri(&self) -> Dri {
		self.dri()
	}

	fn element_source_sets(&self) -> SourceSets {
		self.source_sets()
	}

	fn element_name(&self) -> Option<String> {
		self.name().map(ToString::to_string)
	}
}

impl BlockElement for DPackage {
	fn element_dri(&self) -> Dri {
		self.common.dri.clone()
	}

	fn element_source_sets(&self) -> SourceSets {
		self.common.source_sets.clone()
	}

	fn element_name(&self) -> Option<String> {
		self.common.name.clone()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FragmentKey {
	dri: Dri,
	source_sets: SourceSets,
	kind: &'static str,
}

/// Run scoped memo of rendered fragments keyed by declaration.
///
/// Signatures are requested several times per declaration (its own page and
/// every table listing it). The cache lives as long as the builder that owns
/// it, so nothing is shared between generation runs.
#[derive(Debug, Default)]
pub struct FragmentCache {
	entries: DashMap<FragmentKey, Vec<ContentNode>>,
	hits: AtomicUsize,
	misses: AtomicUsize,
}

impl FragmentCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// The cached nodes for `documentable`, building them on a miss.
	///
	/// `build` runs without holding a shard lock so that it may request
	/// other fragments. Two workers missing on the same key both build and
	/// the first insert wins.
	fn get_or_insert_with(
		&self,
		documentable: &Documentable,
		build: impl FnOnce() -> Vec<ContentNode>,
	) -> Vec<ContentNode> {
		let key = FragmentKey {
			dri: documentable.dri(),
			source_sets: documentable.source_sets(),
			kind: documentable.kind_name(),
		};

		let cached = self.entries.get(&key).map(|entry| entry.value().clone());
		if let Some(nodes) = cached {
			self.hits.fetch_add(1, Ordering::Relaxed);
			return nodes;
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		let nodes = build();
		self.entries.entry(key).or_insert(nodes).value().clone()
	}

	pub fn hits(&self) -> usize {
		self.hits.load(Ordering::Relaxed)
	}

	pub fn misses(&self) -> usize {
		self.misses.load(Ordering::Relaxed)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Shared entry point for building content. Owns the collaborators and is
/// safe to use from several threads at once; the per call state lives in
/// [`DocumentableContentBuilder`].
pub struct PageContentBuilder {
	comments_converter: Arc<dyn CommentsToContentConverter>,
	signature_provider: Arc<dyn SignatureProvider>,
	logger: Arc<PageLogger>,
	signatures: FragmentCache,
}

impl PageContentBuilder {
	pub fn new(
		comments_converter: Arc<dyn CommentsToContentConverter>,
		signature_provider: Arc<dyn SignatureProvider>,
		logger: Arc<PageLogger>,
	) -> Self {
		Self {
			comments_converter,
			signature_provider,
			logger,
			signatures: FragmentCache::new(),
		}
	}

	pub fn logger(&self) -> &PageLogger {
		&self.logger
	}

	pub fn fragment_cache(&self) -> &FragmentCache {
		&self.signatures
	}

	/// Build a group with explicit metadata.
	pub fn content_with_meta(
		&self,
		meta: ContentMeta,
		block: impl FnOnce(&mut DocumentableContentBuilder<'_>),
	) -> ContentGroup {
		let mut builder = DocumentableContentBuilder {
			builder: self,
			meta,
			contents: Vec::new(),
		};
		block(&mut builder);
		builder.build()
	}

	/// Build a [`ContentKind::Main`] group for the given declarations.
	pub fn content_for(
		&self,
		dri: BTreeSet<Dri>,
		source_sets: SourceSets,
		block: impl FnOnce(&mut DocumentableContentBuilder<'_>),
	) -> ContentGroup {
		self.content_with_meta(ContentMeta::new(Dci::new(dri, ContentKind::Main), source_sets), block)
	}

	pub fn content_for_documentable(
		&self,
		documentable: &Documentable,
		block: impl FnOnce(&mut DocumentableContentBuilder<'_>),
	) -> ContentGroup {
		self.content_for(
			BTreeSet::from([documentable.dri()]),
			documentable.source_sets(),
			block,
		)
	}

	/// The signature nodes of `documentable`, one group per source set.
	pub fn build_signature(&self, documentable: &Documentable) -> Vec<ContentNode> {
		self.signatures.get_or_insert_with(documentable, || {
			self.signature_provider.signature(documentable, self)
		})
	}
}

/// Accumulates the children of one content group.
///
/// Every nested scope starts from this builder's metadata and overrides
/// only what its [`GroupOptions`] set. Children appear in the order they
/// are added; nothing here sorts.
pub struct DocumentableContentBuilder<'a> {
	builder: &'a PageContentBuilder,
	meta: ContentMeta,
	contents: Vec<ContentNode>,
}

impl<'a> DocumentableContentBuilder<'a> {
	pub fn main_dri(&self) -> &BTreeSet<Dri> {
		&self.meta.dci.dri
	}

	pub fn main_source_sets(&self) -> &SourceSets {
		&self.meta.source_sets
	}

	pub fn main_kind(&self) -> ContentKind {
		self.meta.dci.kind
	}

	pub fn main_styles(&self) -> &BTreeSet<Style> {
		&self.meta.style
	}

	pub fn main_extra(&self) -> &PropertyContainer {
		&self.meta.extra
	}

	pub fn logger(&self) -> &PageLogger {
		self.builder.logger()
	}

	pub fn contents(&self) -> &[ContentNode] {
		&self.contents
	}

	pub fn build(self) -> ContentGroup {
		ContentGroup {
			children: self.contents,
			meta: self.meta,
		}
	}

	fn child(&self, options: GroupOptions) -> Self {
		let GroupOptions {
			dri,
			source_sets,
			kind,
			styles,
			extra,
		} = options;

		Self {
			builder: self.builder,
			meta: ContentMeta {
				dci: Dci::new(
					dri.unwrap_or_else(|| self.meta.dci.dri.clone()),
					kind.unwrap_or(self.meta.dci.kind),
				),
				source_sets: source_sets.unwrap_or_else(|| self.meta.source_sets.clone()),
				style: styles.unwrap_or_else(|| self.meta.style.clone()),
				extra: extra.unwrap_or_else(|| self.meta.extra.clone()),
			},
			contents: Vec::new(),
		}
	}

	fn meta_of_kind(&self, kind: ContentKind) -> ContentMeta {
		let mut meta = self.meta.clone();
		meta.dci.kind = kind;
		meta
	}

	pub fn push(&mut self, node: ContentNode) {
		self.contents.push(node);
	}

	pub fn extend(&mut self, nodes: impl IntoIterator<Item = ContentNode>) {
		self.contents.extend(nodes);
	}

	pub fn text(&mut self, text: impl Into<String>, kind: ContentKind) {
		let node = ContentText {
			text: text.into(),
			meta: self.meta_of_kind(kind),
		};
		self.contents.push(ContentNode::Text(node));
	}

	pub fn styled_text(&mut self, text: impl Into<String>, kind: ContentKind, styles: BTreeSet<Style>) {
		let node = ContentText {
			text: text.into(),
			meta: self.meta_of_kind(kind).with_style(styles),
		};
		self.contents.push(ContentNode::Text(node));
	}

	pub fn break_line(&mut self) {
		let meta = self.meta.clone();
		self.contents.push(ContentNode::Break(ContentBreakLine { meta }));
	}

	/// A 1-based heading whose first child is `title`.
	pub fn header(
		&mut self,
		level: usize,
		title: &str,
		kind: ContentKind,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) {
		self.header_with(level, title, GroupOptions::new().kind(kind), block);
	}

	pub fn header_with(
		&mut self,
		level: usize,
		title: &str,
		options: GroupOptions,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) {
		let mut inner = self.child(options);
		let kind = inner.main_kind();
		inner.text(title, kind);
		block(&mut inner);
		let ContentGroup { children, meta } = inner.build();
		self.contents.push(ContentNode::Header(ContentHeader {
			level,
			children,
			meta,
		}));
	}

	/// The level-1 title of a page.
	pub fn cover(&mut self, text: &str) {
		let mut styles = self.meta.style.clone();
		styles.insert(Style::Cover);
		self.header_with(
			1,
			text,
			GroupOptions::new().kind(ContentKind::Cover).styles(styles),
			|_| {},
		);
	}

	/// A link to a declaration. The target is resolved by the renderer.
	pub fn link(&mut self, text: &str, dri: Dri, kind: ContentKind) {
		self.link_with(dri, GroupOptions::new().kind(kind), |link| {
			let kind = link.main_kind();
			link.text(text, kind);
		});
	}

	pub fn link_with(
		&mut self,
		dri: Dri,
		options: GroupOptions,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) {
		let mut inner = self.child(options);
		block(&mut inner);
		let ContentGroup { children, meta } = inner.build();
		self.contents.push(ContentNode::Link(ContentLink {
			children,
			target: LinkTarget::Dri(dri),
			meta,
		}));
	}

	pub fn link_url(&mut self, text: &str, url: &str, kind: ContentKind) {
		let mut inner = self.child(GroupOptions::new().kind(kind));
		inner.text(text, kind);
		let ContentGroup { children, meta } = inner.build();
		self.contents.push(ContentNode::Link(ContentLink {
			children,
			target: LinkTarget::Url(url.to_string()),
			meta,
		}));
	}

	/// Emit `operation` for every element with `separator` in between.
	/// `prefix` and `suffix` are only written for a non-empty input.
	pub fn list<T>(
		&mut self,
		elements: &[T],
		prefix: &str,
		suffix: &str,
		separator: &str,
		mut operation: impl FnMut(&mut Self, &T),
	) {
		let Some((last, init)) = elements.split_last() else {
			return;
		};

		if !prefix.is_empty() {
			self.text(prefix, ContentKind::Symbol);
		}
		for element in init {
			operation(self, element);
			if !separator.is_empty() {
				self.text(separator, ContentKind::Symbol);
			}
		}
		operation(self, last);
		if !suffix.is_empty() {
			self.text(suffix, ContentKind::Symbol);
		}
	}

	pub fn signature(&mut self, documentable: &Documentable) {
		let nodes = self.builder.build_signature(documentable);
		self.contents.extend(nodes);
	}

	/// Render a type reference. Types without a name are logged and shown
	/// as `???` so that one broken reference never fails a page.
	pub fn type_ref(&mut self, type_ref: &TypeRef) {
		if type_ref.is_function_type() {
			self.function_type(type_ref);
			return;
		}

		match (&type_ref.dri, type_ref.simple_name()) {
			(Some(dri), Some(name)) => self.link(name, dri.clone(), ContentKind::Symbol),
			(None, Some(_)) => self.text(type_ref.qualified_name(), ContentKind::Symbol),
			(_, None) => {
				self.logger()
					.error(&format!("type {type_ref:?} cannot be resolved"));
				self.text("???", ContentKind::Symbol);
			}
		}

		self.list(&type_ref.arguments, "<", ">", ", ", |builder, argument| {
			builder.type_ref(argument);
		});
		if type_ref.nullable {
			self.text("?", ContentKind::Symbol);
		}
	}

	fn function_type(&mut self, type_ref: &TypeRef) {
		let has_receiver = type_ref
			.function
			.is_some_and(|function| function.has_receiver);
		if type_ref.nullable {
			self.text("(", ContentKind::Symbol);
		}

		let arguments = match type_ref.arguments.split_first() {
			Some((receiver, rest)) if has_receiver => {
				self.type_ref(receiver);
				self.text(".", ContentKind::Symbol);
				rest
			}
			_ => type_ref.arguments.as_slice(),
		};

		if let Some((returns, parameters)) = arguments.split_last() {
			self.text("(", ContentKind::Symbol);
			self.list(parameters, "", "", ", ", |builder, parameter| {
				builder.type_ref(parameter);
			});
			self.text(") -> ", ContentKind::Symbol);
			self.type_ref(returns);
		} else {
			self.logger()
				.error(&format!("function type {type_ref:?} has no return type"));
			self.text("???", ContentKind::Symbol);
		}

		if type_ref.nullable {
			self.text(")?", ContentKind::Symbol);
		}
	}

	/// Convert a documentation comment into a [`ContentKind::Comment`] group.
	pub fn comment(&mut self, doc_tag: &DocTag) {
		self.comment_with(doc_tag, GroupOptions::new().kind(ContentKind::Comment));
	}

	pub fn comment_with(&mut self, doc_tag: &DocTag, options: GroupOptions) {
		let inner = self.child(options);
		let children = inner.builder.comments_converter.build_content(
			doc_tag,
			&inner.meta.dci,
			&inner.meta.source_sets,
			&inner.meta.style,
			&inner.meta.extra,
		);
		self.contents.push(ContentNode::Group(ContentGroup {
			children,
			meta: inner.meta,
		}));
	}

	pub fn first_paragraph_comment(&mut self, doc_tag: &DocTag) {
		self.comment(&doc_tag.first_paragraph());
	}

	pub fn first_sentence_comment(&mut self, doc_tag: &DocTag) {
		self.comment(&doc_tag.first_sentence());
	}

	/// Build a nested group without adding it.
	pub fn build_group(
		&self,
		options: GroupOptions,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) -> ContentGroup {
		let mut inner = self.child(options);
		block(&mut inner);
		inner.build()
	}

	pub fn group(&mut self, options: GroupOptions, block: impl FnOnce(&mut DocumentableContentBuilder<'a>)) {
		let group = self.build_group(options, block);
		self.contents.push(ContentNode::Group(group));
	}

	/// Wrap a group in a node that lists the platforms it applies to.
	pub fn source_set_dependent_hint(
		&mut self,
		options: GroupOptions,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) {
		let group = self.build_group(options.or_kind(ContentKind::SourceSetDependentHint), block);
		let meta = group.meta.clone();
		self.contents.push(ContentNode::PlatformHinted(PlatformHintedContent {
			inner: Box::new(ContentNode::Group(group)),
			meta,
		}));
	}

	/// Per source set variants of one row. The group covers exactly the
	/// source sets of its instances.
	pub fn divergent_group(
		&mut self,
		group_id: GroupId,
		options: GroupOptions,
		implicitly_source_set_hinted: bool,
		block: impl FnOnce(&mut DivergentBuilder<'a>),
	) {
		let mut divergent = DivergentBuilder {
			template: self.child(options),
			instances: Vec::new(),
		};
		block(&mut divergent);

		let DivergentBuilder {
			template,
			instances,
		} = divergent;
		let mut meta = template.meta;
		meta.source_sets = instances
			.iter()
			.flat_map(|instance| instance.source_sets().iter().cloned())
			.collect();

		self.contents.push(ContentNode::DivergentGroup(ContentDivergentGroup {
			children: instances,
			group_id,
			implicitly_source_set_hinted,
			meta,
		}));
	}

	pub fn table(&mut self, options: GroupOptions, block: impl FnOnce(&mut TableBuilder<'a>)) {
		let mut table = TableBuilder {
			template: self.child(options),
			header: Vec::new(),
			caption: None,
			rows: Vec::new(),
		};
		block(&mut table);

		let TableBuilder {
			template,
			header,
			caption,
			rows,
		} = table;
		self.contents.push(ContentNode::Table(ContentTable {
			header,
			caption,
			children: rows,
			meta: template.meta,
		}));
	}

	/// A heading followed by a table with one row per element. Nothing is
	/// emitted for an empty input.
	pub fn block<T: BlockElement>(
		&mut self,
		name: &str,
		level: usize,
		kind: ContentKind,
		elements: &[T],
		options: &BlockOptions,
		mut operation: impl FnMut(&mut Self, &T),
	) {
		if elements.is_empty() {
			return;
		}

		let mut ordered: Vec<&T> = elements.iter().collect();
		if options.needs_sorting {
			ordered.sort_by(|left, right| {
				compare_names_nulls_last(left.element_name().as_deref(), right.element_name().as_deref())
			});
		}

		self.header(level, name, kind, |_| {});
		self.table(
			GroupOptions::new()
				.kind(kind)
				.source_sets(options.source_sets.clone())
				.extra(options.extra.clone()),
			|table| {
				for element in ordered {
					let row = GroupOptions::new()
						.dri(BTreeSet::from([element.element_dri()]))
						.source_sets(element.element_source_sets())
						.kind(kind)
						.extra(options.row_extra(element.element_name(), kind));
					table.row(row, |row| operation(row, element));
				}
			},
		);
	}

	/// Like [`Self::block`] but with one row per named group of elements.
	pub fn multi_block<T: BlockElement>(
		&mut self,
		name: &str,
		level: usize,
		kind: ContentKind,
		groups: &[(String, Vec<T>)],
		options: &BlockOptions,
		mut operation: impl FnMut(&mut Self, &str, &[T]),
	) {
		if groups.is_empty() {
			return;
		}

		let mut ordered: Vec<&(String, Vec<T>)> = groups.iter().collect();
		if options.needs_sorting {
			ordered.sort_by(|left, right| canonical_alphabetical_order(&left.0, &right.0));
		}

		self.header(level, name, kind, |_| {});
		self.table(
			GroupOptions::new()
				.kind(kind)
				.source_sets(options.source_sets.clone())
				.extra(options.extra.clone()),
			|table| {
				for (key, elements) in ordered {
					let row = GroupOptions::new()
						.dri(elements.iter().map(BlockElement::element_dri).collect())
						.source_sets(
							elements
								.iter()
								.flat_map(BlockElement::element_source_sets)
								.collect(),
						)
						.kind(kind)
						.extra(options.row_extra(Some(key.clone()), kind));
					table.row(row, |row| operation(row, key.as_str(), elements.as_slice()));
				}
			},
		);
	}
}

fn compare_names_nulls_last(left: Option<&str>, right: Option<&str>) -> std::cmp::Ordering {
	match (left, right) {
		(Some(left), Some(right)) => canonical_alphabetical_order(left, right),
		(Some(_), None) => std::cmp::Ordering::Less,
		(None, Some(_)) => std::cmp::Ordering::Greater,
		(None, None) => std::cmp::Ordering::Equal,
	}
}

/// Collects the rows of a [`ContentTable`].
pub struct TableBuilder<'a> {
	template: DocumentableContentBuilder<'a>,
	header: Vec<ContentNode>,
	caption: Option<Box<ContentNode>>,
	rows: Vec<ContentNode>,
}

impl<'a> TableBuilder<'a> {
	/// Add a header cell group.
	pub fn header(&mut self, block: impl FnOnce(&mut DocumentableContentBuilder<'a>)) {
		let group = self.template.build_group(GroupOptions::new(), block);
		self.header.push(ContentNode::Group(group));
	}

	pub fn caption(&mut self, block: impl FnOnce(&mut DocumentableContentBuilder<'a>)) {
		let group = self
			.template
			.build_group(GroupOptions::new().styles(BTreeSet::from([Style::Caption])), block);
		self.caption = Some(Box::new(ContentNode::Group(group)));
	}

	pub fn row(&mut self, options: GroupOptions, block: impl FnOnce(&mut DocumentableContentBuilder<'a>)) {
		let group = self.template.build_group(options, block);
		self.rows.push(ContentNode::Group(group));
	}
}

/// Collects the instances of a [`ContentDivergentGroup`].
pub struct DivergentBuilder<'a> {
	template: DocumentableContentBuilder<'a>,
	instances: Vec<ContentNode>,
}

impl<'a> DivergentBuilder<'a> {
	pub fn instance(
		&mut self,
		dri: BTreeSet<Dri>,
		source_sets: SourceSets,
		extra: PropertyContainer,
		block: impl FnOnce(&mut DivergentInstanceBuilder<'a>),
	) {
		let mut instance = DivergentInstanceBuilder {
			template: self
				.template
				.child(GroupOptions::new().dri(dri).source_sets(source_sets).extra(extra)),
			before: None,
			divergent: None,
			after: None,
		};
		block(&mut instance);

		let DivergentInstanceBuilder {
			template,
			before,
			divergent,
			after,
		} = instance;
		self.instances.push(ContentNode::DivergentInstance(ContentDivergentInstance {
			before,
			divergent,
			after,
			meta: template.meta,
		}));
	}
}

/// Builds the three parts of one divergent instance.
pub struct DivergentInstanceBuilder<'a> {
	template: DocumentableContentBuilder<'a>,
	before: Option<Box<ContentNode>>,
	divergent: Option<Box<ContentNode>>,
	after: Option<Box<ContentNode>>,
}

impl<'a> DivergentInstanceBuilder<'a> {
	fn part(
		&self,
		options: GroupOptions,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) -> Option<Box<ContentNode>> {
		let group = self.template.build_group(options, block);
		Some(Box::new(ContentNode::Group(group)))
	}

	pub fn before(&mut self, options: GroupOptions, block: impl FnOnce(&mut DocumentableContentBuilder<'a>)) {
		self.before = self.part(options, block);
	}

	/// The platform specific part of the instance.
	pub fn divergent(
		&mut self,
		options: GroupOptions,
		block: impl FnOnce(&mut DocumentableContentBuilder<'a>),
	) {
		self.divergent = self.part(options, block);
	}

	pub fn after(&mut self, options: GroupOptions, block: impl FnOnce(&mut DocumentableContentBuilder<'a>)) {
		self.after = self.part(options, block);
	}
}
