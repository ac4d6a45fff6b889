use std::collections::BTreeSet;
use std::sync::Arc;

use crate::*;

pub const PACKAGE: &str = "org.example";

pub fn common() -> SourceSetId {
	SourceSetId::new("app", "commonMain")
}

pub fn jvm() -> SourceSetId {
	SourceSetId::new("app", "jvmMain")
}

pub fn js() -> SourceSetId {
	SourceSetId::new("app", "jsMain")
}

pub fn all_source_sets() -> Vec<SourceSet> {
	vec![
		SourceSet::new(common(), "Common", Platform::Common),
		SourceSet::new(jvm(), "JVM", Platform::Jvm),
		SourceSet::new(js(), "JS", Platform::Js),
	]
}

pub fn registry() -> SourceSetRegistry {
	SourceSetRegistry::new(&all_source_sets())
}

pub fn sets(ids: &[SourceSetId]) -> SourceSets {
	ids.iter().cloned().collect()
}

pub fn markers(names: &[&str]) -> indexmap::IndexSet<String> {
	names.iter().map(ToString::to_string).collect()
}

pub fn kotlin_type(name: &str) -> TypeRef {
	TypeRef::resolved(Dri::new("kotlin", name), &format!("kotlin.{name}"))
}

pub fn class_dri(name: &str) -> Dri {
	Dri::new(PACKAGE, name)
}

pub fn member_dri(owner: Option<&str>, name: &str, params: &[&str]) -> Dri {
	let callable = Callable::new(
		name,
		params
			.iter()
			.map(|param| TypeReference::constructor(format!("kotlin.{param}")))
			.collect(),
	);
	let dri = Dri::package(PACKAGE).with_callable(callable);
	match owner {
		Some(owner) => dri.with_class_names(owner),
		None => dri,
	}
}

pub fn common_fields(dri: Dri, name: &str, source_sets: &SourceSets) -> DocumentableCommon {
	DocumentableCommon::new(dri, Some(name), source_sets)
}

/// `fun name(p0: T0, ..): String`, with parameter types named by `params`.
pub fn function(owner: Option<&str>, name: &str, params: &[&str], source_sets: &SourceSets) -> DFunction {
	let dri = member_dri(owner, name, params);
	DFunction {
		parameters: params
			.iter()
			.enumerate()
			.map(|(index, param)| DParameter::new(dri.clone(), format!("p{index}"), kotlin_type(param)))
			.collect(),
		common: common_fields(dri, name, source_sets),
		is_constructor: false,
		receiver: None,
		return_type: Some(kotlin_type("String")),
		visibility: SourceSetDependent::uniform(source_sets, Visibility::Public),
	}
}

pub fn extension_function(receiver: &str, name: &str, source_sets: &SourceSets) -> DFunction {
	let mut extension = function(None, name, &[], source_sets);
	extension.common.dri = Dri::package(PACKAGE).with_callable(
		Callable::new(name, Vec::new()).with_receiver(TypeReference::constructor(format!("{PACKAGE}.{receiver}"))),
	);
	extension.receiver = Some(DParameter::receiver(
		extension.common.dri.clone(),
		TypeRef::resolved(class_dri(receiver), &format!("{PACKAGE}.{receiver}")),
	));
	extension
}

/// An extension `fun Foo.name()` declared in `package` (top level when
/// `None`) and optionally inside the `owner` class chain.
pub fn scoped_extension(
	package: Option<&str>,
	owner: Option<&str>,
	name: &str,
	source_sets: &SourceSets,
) -> DFunction {
	let mut extension = extension_function("Foo", name, source_sets);
	extension.common.dri.package_name = package.map(ToString::to_string);
	extension.common.dri.class_names = owner.map(ToString::to_string);
	if let Some(receiver) = &mut extension.receiver {
		receiver.dri = extension.common.dri.clone();
	}
	extension
}

pub fn constructor(owner: &str, source_sets: &SourceSets) -> DFunction {
	let mut constructor = function(Some(owner), owner, &[], source_sets);
	constructor.is_constructor = true;
	constructor.return_type = None;
	constructor
}

pub fn property(owner: Option<&str>, name: &str, source_sets: &SourceSets) -> DProperty {
	let dri = member_dri(owner, name, &[]);
	DProperty {
		common: common_fields(dri, name, source_sets),
		receiver: None,
		type_ref: kotlin_type("Int"),
		is_var: false,
		visibility: SourceSetDependent::uniform(source_sets, Visibility::Public),
	}
}

pub fn class(name: &str, kind: ClasslikeKind, source_sets: &SourceSets) -> DClasslike {
	DClasslike {
		common: common_fields(class_dri(name), name, source_sets),
		kind,
		visibility: SourceSetDependent::uniform(source_sets, Visibility::Public),
		constructors: Vec::new(),
		functions: Vec::new(),
		properties: Vec::new(),
		classlikes: Vec::new(),
		entries: Vec::new(),
		supertypes: Vec::new(),
		expect_present_in_set: None,
	}
}

pub fn enum_entry(owner: &str, name: &str, source_sets: &SourceSets) -> DEnumEntry {
	DEnumEntry {
		common: common_fields(class_dri(owner).nested(name), name, source_sets),
		functions: Vec::new(),
		properties: Vec::new(),
		classlikes: Vec::new(),
	}
}

pub fn type_alias(name: &str, underlying: &str, source_sets: &SourceSets) -> DTypeAlias {
	DTypeAlias {
		common: common_fields(class_dri(name), name, source_sets),
		underlying_type: SourceSetDependent::uniform(source_sets, kotlin_type(underlying)),
		visibility: SourceSetDependent::uniform(source_sets, Visibility::Public),
	}
}

pub fn package(name: &str, source_sets: &SourceSets) -> DPackage {
	DPackage {
		common: common_fields(Dri::package(name), name, source_sets),
		classlikes: Vec::new(),
		typealiases: Vec::new(),
		functions: Vec::new(),
		properties: Vec::new(),
	}
}

pub fn module(packages: Vec<DPackage>) -> DModule {
	DModule {
		name: "sample".to_string(),
		packages,
		source_sets: all_source_sets(),
		documentation: SourceSetDependent::default(),
	}
}

/// `class Foo { constructor(); fun bar(p0: Int): String; val baz: Int }`
/// plus a top level `fun topLevel()` in [`PACKAGE`].
pub fn sample_module() -> DModule {
	let source_sets = sets(&[common()]);
	let mut foo = class("Foo", ClasslikeKind::Class, &source_sets);
	foo.common.documentation = SourceSetDependent::default().with(common(), DocumentationNode::description("A foo."));
	foo.constructors.push(constructor("Foo", &source_sets));
	foo.functions.push(function(Some("Foo"), "bar", &["Int"], &source_sets));
	foo.properties.push(property(Some("Foo"), "baz", &source_sets));

	let mut package = package(PACKAGE, &source_sets);
	package.classlikes.push(foo);
	package.functions.push(function(None, "topLevel", &[], &source_sets));

	let mut module = module(vec![package]);
	module.source_sets = vec![SourceSet::new(common(), "Common", Platform::Common)];
	module
}

/// `enum class Letters { E1, .., En }`.
pub fn enum_class(entries: usize) -> DClasslike {
	let source_sets = sets(&[common()]);
	let mut letters = class("Letters", ClasslikeKind::Enum, &source_sets);
	letters.entries = (1..=entries)
		.map(|index| enum_entry("Letters", &format!("E{index}"), &source_sets))
		.collect();
	letters
}

pub fn content_builder() -> (PageContentBuilder, Arc<PageLogger>) {
	let logger = Arc::new(PageLogger::new());
	let builder = PageContentBuilder::new(
		Arc::new(DocTagToContentConverter),
		Arc::new(KotlinSignatureProvider),
		Arc::clone(&logger),
	);
	(builder, logger)
}

pub fn page_creator(config: PageConfig) -> (DefaultPageCreator, Arc<PageLogger>) {
	let (builder, logger) = content_builder();
	let creator = DefaultPageCreator::new(
		config,
		registry(),
		builder,
		vec![Arc::new(SinceKotlinTagContentProvider)],
	);
	(creator, logger)
}

/// Render `block` into a detached group.
pub fn build(block: impl FnOnce(&mut DocumentableContentBuilder<'_>)) -> (ContentGroup, Arc<PageLogger>) {
	let (builder, logger) = content_builder();
	let group = builder.content_for(BTreeSet::from([class_dri("Foo")]), sets(&[common()]), block);
	(group, logger)
}

pub fn child_names(page: &PageNode) -> Vec<String> {
	page.children.iter().map(|child| child.name.clone()).collect()
}

/// Names in the first column of the table that follows the header titled
/// `title`.
pub fn section_rows(content: &ContentNode, title: &str) -> Vec<String> {
	let mut rows = Vec::new();
	content.walk(&mut |node| {
		let children = node.children();
		for pair in children.windows(2) {
			let (ContentNode::Header(header), ContentNode::Table(table)) = (pair[0], pair[1]) else {
				continue;
			};
			let header_text: String = header
				.children
				.iter()
				.map(ContentNode::text_content)
				.collect();
			if header_text != title {
				continue;
			}
			for row in &table.children {
				if let Some(first) = row.children().first() {
					rows.push(first.text_content());
				}
			}
		}
	});
	rows
}
