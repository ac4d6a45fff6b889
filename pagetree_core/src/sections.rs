use std::collections::BTreeSet;
use std::sync::Arc;

use crate::ContentKind;
use crate::DocTag;
use crate::DocumentationNode;
use crate::Documentable;
use crate::DocumentableContentBuilder;
use crate::Dri;
use crate::GroupOptions;
use crate::SourceSetId;
use crate::SourceSets;
use crate::Style;
use crate::TagWrapper;

/// Renders custom documentation tags such as `@sinceKotlin`.
pub trait CustomTagContentProvider: Send + Sync {
	fn is_applicable(&self, tag_name: &str) -> bool;

	/// Content shown in the description of the declaration's own page.
	fn content_for_description(
		&self,
		builder: &mut DocumentableContentBuilder<'_>,
		source_set: &SourceSetId,
		tag_name: &str,
		root: &DocTag,
	);

	/// Content shown next to the declaration in tables. Nothing by default.
	fn content_for_brief(
		&self,
		_builder: &mut DocumentableContentBuilder<'_>,
		_source_set: &SourceSetId,
		_tag_name: &str,
		_root: &DocTag,
	) {
	}
}

/// Handles the `Since Kotlin` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinceKotlinTagContentProvider;

impl SinceKotlinTagContentProvider {
	pub const TAG_NAME: &'static str = "Since Kotlin";
}

impl CustomTagContentProvider for SinceKotlinTagContentProvider {
	fn is_applicable(&self, tag_name: &str) -> bool {
		tag_name == Self::TAG_NAME
	}

	fn content_for_description(
		&self,
		builder: &mut DocumentableContentBuilder<'_>,
		source_set: &SourceSetId,
		tag_name: &str,
		root: &DocTag,
	) {
		builder.group(
			GroupOptions::new()
				.source_sets(BTreeSet::from([source_set.clone()]))
				.kind(ContentKind::Comment),
			|b| {
				b.header(4, tag_name, ContentKind::Comment, |_| {});
				b.comment(root);
			},
		);
	}

	fn content_for_brief(
		&self,
		builder: &mut DocumentableContentBuilder<'_>,
		source_set: &SourceSetId,
		tag_name: &str,
		root: &DocTag,
	) {
		builder.group(
			GroupOptions::new()
				.source_sets(BTreeSet::from([source_set.clone()]))
				.kind(ContentKind::Comment)
				.styles(BTreeSet::from([Style::UnderCoverText])),
			|b| {
				b.text(format!("{tag_name} "), ContentKind::Comment);
				b.comment(root);
			},
		);
	}
}

/// Every tag of a declaration paired with its source set, in source set
/// order then tag order.
fn tags_of(documentable: &Documentable) -> Vec<(&SourceSetId, &TagWrapper)> {
	documentable
		.documentation()
		.into_iter()
		.flat_map(|documentation| documentation.iter())
		.flat_map(|(source_set, node)| node.children.iter().map(move |tag| (source_set, tag)))
		.collect()
}

/// Properties may be documented through a `@property` tag on their owner.
fn property_tag<'d>(documentable: &Documentable, node: &'d DocumentationNode) -> Option<&'d TagWrapper> {
	match documentable {
		Documentable::Property(_) => node.property_tag(),
		_ => None,
	}
}

fn single(source_set: &SourceSetId) -> SourceSets {
	BTreeSet::from([source_set.clone()])
}

/// The description sections of a declaration's own page: deprecation,
/// description, custom tags, `@return`/`@since`/`@author`, parameters,
/// see also, throws and samples.
pub(crate) fn description_sections(
	b: &mut DocumentableContentBuilder<'_>,
	documentable: &Documentable,
	providers: &[Arc<dyn CustomTagContentProvider>],
) {
	let tags = tags_of(documentable);

	deprecated_section(b, &tags);
	description_section(b, documentable);
	custom_tag_section(b, &tags, providers);
	unnamed_tag_section(b, &tags);
	params_section(b, &tags);
	see_also_section(b, &tags);
	throws_section(b, &tags);
	samples_section(b, &tags);
}

fn deprecated_section(b: &mut DocumentableContentBuilder<'_>, tags: &[(&SourceSetId, &TagWrapper)]) {
	for (source_set, tag) in tags {
		if let TagWrapper::Deprecated { root } = tag {
			b.group(
				GroupOptions::new()
					.source_sets(single(source_set))
					.kind(ContentKind::Deprecation),
				|b| {
					b.header(3, tag.header(), ContentKind::Deprecation, |_| {});
					b.comment(root);
				},
			);
		}
	}
}

fn description_section(b: &mut DocumentableContentBuilder<'_>, documentable: &Documentable) {
	let Some(documentation) = documentable.documentation() else {
		return;
	};

	for (source_set, node) in documentation {
		let tag = node
			.description_tag()
			.or_else(|| property_tag(documentable, node));
		if let Some(tag) = tag {
			b.group(GroupOptions::new().source_sets(single(source_set)), |b| {
				b.comment(tag.root());
			});
		}
	}
}

fn custom_tag_section(
	b: &mut DocumentableContentBuilder<'_>,
	tags: &[(&SourceSetId, &TagWrapper)],
	providers: &[Arc<dyn CustomTagContentProvider>],
) {
	for (source_set, tag) in tags {
		if let TagWrapper::CustomTag { name, root } = tag {
			for provider in providers.iter().filter(|provider| provider.is_applicable(name)) {
				provider.content_for_description(b, source_set, name, root);
			}
		}
	}
}

fn unnamed_tag_section(b: &mut DocumentableContentBuilder<'_>, tags: &[(&SourceSetId, &TagWrapper)]) {
	let sections: [fn(&TagWrapper) -> bool; 3] = [
		|tag| matches!(tag, TagWrapper::Return { .. }),
		|tag| matches!(tag, TagWrapper::Since { .. }),
		|tag| matches!(tag, TagWrapper::Author { .. }),
	];

	for is_section in sections {
		let matching: Vec<_> = tags.iter().filter(|(_, tag)| is_section(tag)).collect();
		let Some((_, first)) = matching.first() else {
			continue;
		};

		b.header(4, first.header(), ContentKind::Comment, |_| {});
		for (source_set, tag) in matching {
			b.group(
				GroupOptions::new()
					.source_sets(single(source_set))
					.kind(ContentKind::Comment),
				|b| b.comment(tag.root()),
			);
		}
	}
}

fn named_rows<'t>(
	tags: &[(&'t SourceSetId, &'t TagWrapper)],
	select: impl Fn(&'t TagWrapper) -> Option<(&'t str, Option<&'t Dri>)>,
) -> Vec<(&'t SourceSetId, &'t str, Option<&'t Dri>, &'t DocTag)> {
	tags.iter()
		.filter_map(|&(source_set, tag)| {
			select(tag).map(|(name, address)| (source_set, name, address, tag.root()))
		})
		.collect()
}

fn named_table(
	b: &mut DocumentableContentBuilder<'_>,
	title: &str,
	kind: ContentKind,
	rows: &[(&SourceSetId, &str, Option<&Dri>, &DocTag)],
) {
	if rows.is_empty() {
		return;
	}

	let source_sets: SourceSets = rows.iter().map(|(source_set, ..)| (*source_set).clone()).collect();
	b.header(4, title, kind, |_| {});
	b.table(GroupOptions::new().kind(kind).source_sets(source_sets), |table| {
		for (source_set, name, address, root) in rows {
			table.row(
				GroupOptions::new().source_sets(single(source_set)).kind(kind),
				|row| {
					match address {
						Some(dri) => {
							row.link_with(
								(*dri).clone(),
								GroupOptions::new().styles(BTreeSet::from([Style::RowTitle])),
								|link| link.text(*name, kind),
							);
						}
						None => row.styled_text(*name, kind, BTreeSet::from([Style::RowTitle])),
					}
					row.comment(root);
				},
			);
		}
	});
}

fn params_section(b: &mut DocumentableContentBuilder<'_>, tags: &[(&SourceSetId, &TagWrapper)]) {
	let rows = named_rows(tags, |tag| {
		match tag {
			TagWrapper::Param { name, .. } => Some((name.as_str(), None)),
			_ => None,
		}
	});
	named_table(b, "Parameters", ContentKind::Parameters, &rows);
}

fn see_also_section(b: &mut DocumentableContentBuilder<'_>, tags: &[(&SourceSetId, &TagWrapper)]) {
	let rows = named_rows(tags, |tag| {
		match tag {
			TagWrapper::See { name, address, .. } => Some((name.as_str(), address.as_ref())),
			_ => None,
		}
	});
	named_table(b, "See also", ContentKind::Comment, &rows);
}

fn throws_section(b: &mut DocumentableContentBuilder<'_>, tags: &[(&SourceSetId, &TagWrapper)]) {
	let rows = named_rows(tags, |tag| {
		match tag {
			TagWrapper::Throws {
				name, exception, ..
			} => Some((name.as_str(), exception.as_ref())),
			_ => None,
		}
	});
	named_table(b, "Throws", ContentKind::Comment, &rows);
}

fn samples_section(b: &mut DocumentableContentBuilder<'_>, tags: &[(&SourceSetId, &TagWrapper)]) {
	let samples: Vec<_> = tags
		.iter()
		.filter_map(|(source_set, tag)| {
			match tag {
				TagWrapper::Sample { name, .. } => Some((*source_set, name.as_str())),
				_ => None,
			}
		})
		.collect();
	if samples.is_empty() {
		return;
	}

	b.header(4, "Samples", ContentKind::Sample, |_| {});
	for (source_set, name) in samples {
		b.group(
			GroupOptions::new()
				.source_sets(single(source_set))
				.kind(ContentKind::Sample)
				.styles(BTreeSet::from([Style::Monospace])),
			|b| b.text(name, ContentKind::Sample),
		);
	}
}

/// The first paragraph of the description of every source set, as shown in
/// tables.
pub(crate) fn brief(b: &mut DocumentableContentBuilder<'_>, documentable: &Documentable) {
	let Some(documentation) = documentable.documentation() else {
		return;
	};

	for source_set in documentable.source_sets() {
		let Some(node) = documentation.get(&source_set) else {
			continue;
		};
		let tag = node
			.description_tag()
			.or_else(|| property_tag(documentable, node));
		if let Some(tag) = tag {
			b.group(
				GroupOptions::new()
					.source_sets(single(&source_set))
					.kind(ContentKind::BriefComment),
				|b| b.first_paragraph_comment(tag.root()),
			);
		}
	}
}

pub(crate) fn custom_tags_brief(
	b: &mut DocumentableContentBuilder<'_>,
	documentable: &Documentable,
	providers: &[Arc<dyn CustomTagContentProvider>],
) {
	for (source_set, tag) in tags_of(documentable) {
		if let TagWrapper::CustomTag { name, root } = tag {
			for provider in providers.iter().filter(|provider| provider.is_applicable(name)) {
				provider.content_for_brief(b, source_set, name, root);
			}
		}
	}
}
