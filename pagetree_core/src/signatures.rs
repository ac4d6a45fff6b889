use std::collections::BTreeSet;

use crate::AdditionalModifiers;
use crate::Annotations;
use crate::ContentKind;
use crate::ContentMeta;
use crate::ContentNode;
use crate::DClasslike;
use crate::DFunction;
use crate::DProperty;
use crate::DTypeAlias;
use crate::Dci;
use crate::Documentable;
use crate::DocumentableContentBuilder;
use crate::PageContentBuilder;
use crate::PropertyContainer;
use crate::SourceSetDependent;
use crate::SourceSetId;
use crate::Style;
use crate::Visibility;

/// Renders the declaration line of a documentable.
pub trait SignatureProvider: Send + Sync {
	fn signature(&self, documentable: &Documentable, builder: &PageContentBuilder) -> Vec<ContentNode>;
}

/// Kotlin flavoured signatures, one [`ContentKind::Symbol`] group per
/// source set so that platform specific visibility and modifiers survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinSignatureProvider;

impl SignatureProvider for KotlinSignatureProvider {
	fn signature(&self, documentable: &Documentable, builder: &PageContentBuilder) -> Vec<ContentNode> {
		if matches!(documentable, Documentable::Module(_) | Documentable::Package(_)) {
			return Vec::new();
		}

		let dri = BTreeSet::from([documentable.dri()]);
		let extra = documentable.extra().cloned().unwrap_or_default();

		documentable
			.source_sets()
			.into_iter()
			.map(|source_set| {
				let meta = ContentMeta::new(
					Dci::new(dri.clone(), ContentKind::Symbol),
					BTreeSet::from([source_set.clone()]),
				)
				.with_style(BTreeSet::from([Style::Monospace]));

				builder
					.content_with_meta(meta, |b| {
						annotations(b, &extra);
						match documentable {
							Documentable::Classlike(classlike) => classlike_signature(b, classlike, &source_set),
							Documentable::Function(function) => function_signature(b, function, &source_set),
							Documentable::Property(property) => property_signature(b, property, &source_set),
							Documentable::TypeAlias(alias) => type_alias_signature(b, alias, &source_set),
							Documentable::EnumEntry(entry) => {
								b.link(
									entry.common.name.as_deref().unwrap_or_default(),
									entry.common.dri.clone(),
									ContentKind::Main,
								);
							}
							Documentable::Module(_) | Documentable::Package(_) => {}
						}
					})
					.into_node()
			})
			.collect()
	}
}

fn annotations(b: &mut DocumentableContentBuilder<'_>, extra: &PropertyContainer) {
	let Some(annotations) = extra.get::<Annotations>() else {
		return;
	};

	for annotation in annotations {
		let name = annotation
			.dri
			.class_names
			.as_deref()
			.unwrap_or_default()
			.rsplit('.')
			.next()
			.unwrap_or_default();
		b.link(&format!("@{name}"), annotation.dri.clone(), ContentKind::Annotations);
		b.text(" ", ContentKind::Symbol);
	}
}

fn modifiers(
	b: &mut DocumentableContentBuilder<'_>,
	visibility: &SourceSetDependent<Visibility>,
	extra: &PropertyContainer,
	source_set: &SourceSetId,
) {
	let visibility = visibility.get(source_set).copied().unwrap_or_default();
	b.text(format!("{} ", visibility.keyword()), ContentKind::Symbol);

	let modifiers = extra
		.get::<AdditionalModifiers>()
		.and_then(|modifiers| modifiers.get(source_set));
	for modifier in modifiers.into_iter().flatten() {
		b.text(format!("{} ", modifier.keyword()), ContentKind::Symbol);
	}
}

fn classlike_signature(b: &mut DocumentableContentBuilder<'_>, classlike: &DClasslike, source_set: &SourceSetId) {
	modifiers(b, &classlike.visibility, &classlike.common.extra, source_set);
	b.text(format!("{} ", classlike.kind.keyword()), ContentKind::Symbol);
	b.link(
		classlike.common.name.as_deref().unwrap_or_default(),
		classlike.common.dri.clone(),
		ContentKind::Main,
	);
	b.list(&classlike.supertypes, " : ", "", ", ", |b, supertype| b.type_ref(supertype));
}

fn function_signature(b: &mut DocumentableContentBuilder<'_>, function: &DFunction, source_set: &SourceSetId) {
	modifiers(b, &function.visibility, &function.common.extra, source_set);
	if function.is_constructor {
		b.link("constructor", function.common.dri.clone(), ContentKind::Main);
	} else {
		b.text("fun ", ContentKind::Symbol);
		if let Some(receiver) = &function.receiver {
			b.type_ref(&receiver.type_ref);
			b.text(".", ContentKind::Symbol);
		}
		b.link(
			function.common.name.as_deref().unwrap_or_default(),
			function.common.dri.clone(),
			ContentKind::Main,
		);
	}

	b.text("(", ContentKind::Symbol);
	b.list(&function.parameters, "", "", ", ", |b, parameter| {
		b.text(
			format!("{}: ", parameter.name.as_deref().unwrap_or_default()),
			ContentKind::Parameters,
		);
		b.type_ref(&parameter.type_ref);
	});
	b.text(")", ContentKind::Symbol);

	match &function.return_type {
		Some(returns) if !function.is_constructor && !returns.is_unit() => {
			b.text(": ", ContentKind::Symbol);
			b.type_ref(returns);
		}
		_ => {}
	}
}

fn property_signature(b: &mut DocumentableContentBuilder<'_>, property: &DProperty, source_set: &SourceSetId) {
	modifiers(b, &property.visibility, &property.common.extra, source_set);
	b.text(if property.is_var { "var " } else { "val " }, ContentKind::Symbol);
	if let Some(receiver) = &property.receiver {
		b.type_ref(&receiver.type_ref);
		b.text(".", ContentKind::Symbol);
	}
	b.link(
		property.common.name.as_deref().unwrap_or_default(),
		property.common.dri.clone(),
		ContentKind::Main,
	);
	b.text(": ", ContentKind::Symbol);
	b.type_ref(&property.type_ref);
}

fn type_alias_signature(b: &mut DocumentableContentBuilder<'_>, alias: &DTypeAlias, source_set: &SourceSetId) {
	modifiers(b, &alias.visibility, &alias.common.extra, source_set);
	b.text("typealias ", ContentKind::Symbol);
	b.link(
		alias.common.name.as_deref().unwrap_or_default(),
		alias.common.dri.clone(),
		ContentKind::Main,
	);
	if let Some(underlying) = alias.underlying_type.get(source_set) {
		b.text(" = ", ContentKind::Symbol);
		b.type_ref(underlying);
	}
}
