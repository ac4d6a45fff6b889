use std::collections::BTreeSet;

use crate::ContentBreakLine;
use crate::ContentCode;
use crate::ContentGroup;
use crate::ContentLink;
use crate::ContentList;
use crate::ContentMeta;
use crate::ContentNode;
use crate::ContentText;
use crate::Dci;
use crate::DocTag;
use crate::LinkTarget;
use crate::PropertyContainer;
use crate::SourceSets;
use crate::Style;

/// Turns parsed documentation comments into content nodes.
pub trait CommentsToContentConverter: Send + Sync {
	fn build_content(
		&self,
		doc_tag: &DocTag,
		dci: &Dci,
		source_sets: &SourceSets,
		styles: &BTreeSet<Style>,
		extra: &PropertyContainer,
	) -> Vec<ContentNode>;
}

/// Maps every [`DocTag`] variant onto the matching content node.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocTagToContentConverter;

struct Scope<'a> {
	dci: &'a Dci,
	source_sets: &'a SourceSets,
	extra: &'a PropertyContainer,
}

impl Scope<'_> {
	fn meta(&self, styles: &BTreeSet<Style>) -> ContentMeta {
		ContentMeta::new(self.dci.clone(), self.source_sets.clone())
			.with_style(styles.clone())
			.with_extra(self.extra.clone())
	}
}

fn with_style(styles: &BTreeSet<Style>, style: Style) -> BTreeSet<Style> {
	let mut styles = styles.clone();
	styles.insert(style);
	styles
}

impl DocTagToContentConverter {
	fn children(&self, tags: &[DocTag], scope: &Scope<'_>, styles: &BTreeSet<Style>) -> Vec<ContentNode> {
		tags.iter()
			.flat_map(|tag| self.convert(tag, scope, styles))
			.collect()
	}

	fn convert(&self, tag: &DocTag, scope: &Scope<'_>, styles: &BTreeSet<Style>) -> Vec<ContentNode> {
		match tag {
			DocTag::Text { body } => {
				vec![ContentNode::Text(ContentText {
					text: body.clone(),
					meta: scope.meta(styles),
				})]
			}
			DocTag::Br => vec![ContentNode::Break(ContentBreakLine { meta: scope.meta(styles) })],
			DocTag::Paragraph { children } => {
				let paragraph = with_style(styles, Style::Paragraph);
				vec![ContentNode::Group(ContentGroup {
					children: self.children(children, scope, styles),
					meta: scope.meta(&paragraph),
				})]
			}
			DocTag::Bold { children } => self.children(children, scope, &with_style(styles, Style::Bold)),
			DocTag::Italic { children } => {
				self.children(children, scope, &with_style(styles, Style::Italic))
			}
			DocTag::CodeInline { children } => {
				vec![ContentNode::Code(ContentCode {
					children: self.children(children, scope, styles),
					language: String::new(),
					block: false,
					meta: scope.meta(styles),
				})]
			}
			DocTag::CodeBlock { language, children } => {
				vec![ContentNode::Code(ContentCode {
					children: self.children(children, scope, styles),
					language: language.clone().unwrap_or_default(),
					block: true,
					meta: scope.meta(styles),
				})]
			}
			DocTag::DocumentationLink { dri, children } => {
				vec![ContentNode::Link(ContentLink {
					children: self.children(children, scope, styles),
					target: LinkTarget::Dri(dri.clone()),
					meta: scope.meta(styles),
				})]
			}
			DocTag::ExternalLink { href, children } => {
				vec![ContentNode::Link(ContentLink {
					children: self.children(children, scope, styles),
					target: LinkTarget::Url(href.clone()),
					meta: scope.meta(styles),
				})]
			}
			DocTag::UnorderedList { children } => {
				vec![ContentNode::List(ContentList {
					children: self.children(children, scope, styles),
					ordered: false,
					meta: scope.meta(styles),
				})]
			}
			DocTag::ListItem { children } => {
				vec![ContentNode::Group(ContentGroup {
					children: self.children(children, scope, styles),
					meta: scope.meta(styles),
				})]
			}
			DocTag::CustomDocTag { children } => self.children(children, scope, styles),
		}
	}
}

impl CommentsToContentConverter for DocTagToContentConverter {
	fn build_content(
		&self,
		doc_tag: &DocTag,
		dci: &Dci,
		source_sets: &SourceSets,
		styles: &BTreeSet<Style>,
		extra: &PropertyContainer,
	) -> Vec<ContentNode> {
		let scope = Scope {
			dci,
			source_sets,
			extra,
		};
		self.convert(doc_tag, &scope, styles)
	}
}
