use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::Just;
use proptest::prelude::Strategy;
use proptest::prop_assert_eq;
use proptest::proptest;
use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;

#[test]
fn enum_entries_keep_declaration_order() -> PageResult<()> {
	let (creator, _) = page_creator(PageConfig::default());
	let expected: Vec<String> = (1..=10).map(|index| format!("E{index}")).collect();

	let page = creator.page_for_classlikes(vec![enum_class(10).into()])?;
	let Documentable::Classlike(letters) = &page.documentables[0] else {
		panic!("expected the enum class");
	};
	let entry_names: Vec<String> = letters
		.entries
		.iter()
		.filter_map(|entry| entry.common.name.clone())
		.collect();

	assert_eq!(entry_names, expected);
	assert_eq!(child_names(&page), expected);
	assert_eq!(section_rows(&page.content, "Entries"), expected);

	Ok(())
}

fn divergent_collection() -> Vec<Documentable> {
	let jvm_only = sets(&[jvm()]);
	let both = sets(&[jvm(), js()]);
	vec![
		function(Some("Foo"), "foo", &[], &both).into(),
		function(Some("Foo"), "foo", &["String"], &jvm_only).into(),
		function(Some("Foo"), "foo", &["Int"], &both).into(),
		function(Some("Foo"), "bar", &[], &both).into(),
		function(Some("Foo"), "Bar", &[], &both).into(),
		extension_function("Foo", "foo", &both).into(),
		property(Some("Foo"), "count", &jvm_only).into(),
	]
}

#[test]
fn divergence_grouping_orders_rows_and_variants() {
	let groups = group_and_sort_divergent_collection(&divergent_collection());

	let keys: Vec<(String, bool)> = groups
		.iter()
		.map(|(key, _)| (key.name.clone().unwrap_or_default(), key.is_extension))
		.collect();
	assert_eq!(
		keys,
		vec![
			("Bar".to_string(), false),
			("bar".to_string(), false),
			("count".to_string(), false),
			("foo".to_string(), false),
			("foo".to_string(), true),
		]
	);

	let foo_params: Vec<String> = groups[3]
		.1
		.iter()
		.map(|element| {
			element
				.dri()
				.callable
				.map(|callable| callable.signature())
				.unwrap_or_default()
		})
		.collect();
	let expected: Vec<String> = [&[][..], &["Int"][..], &["String"][..]]
		.iter()
		.map(|params| {
			member_dri(Some("Foo"), "foo", params)
				.callable
				.map(|callable| callable.signature())
				.unwrap_or_default()
		})
		.collect();
	assert_eq!(foo_params, expected);
}

fn cross_scope_extensions() -> Vec<Documentable> {
	let source_sets = sets(&[common()]);
	vec![
		scoped_extension(Some("b"), None, "ext", &source_sets).into(),
		scoped_extension(Some("a"), Some("A.Companion"), "ext", &source_sets).into(),
		scoped_extension(Some("a"), None, "ext", &source_sets).into(),
		scoped_extension(None, None, "ext", &source_sets).into(),
	]
}

fn scopes(elements: &[Documentable]) -> Vec<(Option<String>, Option<String>)> {
	elements
		.iter()
		.map(|element| {
			let dri = element.dri();
			(dri.package_name, dri.class_names)
		})
		.collect()
}

proptest! {
	#[test]
	fn divergence_grouping_ignores_input_order(
		collection in Just(divergent_collection()).prop_shuffle()
	) {
		let expected = group_and_sort_divergent_collection(&divergent_collection());
		let actual = group_and_sort_divergent_collection(&collection);

		prop_assert_eq!(actual, expected);
	}

	#[test]
	fn extension_variants_order_by_package_then_class_chain(
		collection in Just(cross_scope_extensions()).prop_shuffle()
	) {
		let groups = group_and_sort_divergent_collection(&collection);

		prop_assert_eq!(groups.len(), 1);
		let (key, elements) = &groups[0];
		prop_assert_eq!(key, &NameAndIsExtension { name: Some("ext".to_string()), is_extension: true });
		let expected: Vec<(Option<String>, Option<String>)> = vec![
			(Some("a".to_string()), None),
			(Some("a".to_string()), Some("A.Companion".to_string())),
			(Some("b".to_string()), None),
			(None, None),
		];
		prop_assert_eq!(scopes(elements), expected);
	}
}

/// Variants of one declaration that only differ in their source sets tie on
/// every sort key and keep their input order.
#[rstest]
#[case::jvm_first(vec![jvm(), js()])]
#[case::js_first(vec![js(), jvm()])]
fn tied_variants_keep_input_order(#[case] order: Vec<SourceSetId>) {
	let collection: Vec<Documentable> = order
		.iter()
		.map(|id| Documentable::from(function(None, "foo", &[], &sets(&[id.clone()]))))
		.collect();

	let groups = group_and_sort_divergent_collection(&collection);
	let variant_source_sets: Vec<SourceSets> = groups[0].1.iter().map(Documentable::source_sets).collect();

	assert_eq!(variant_source_sets, order.into_iter().map(|id| sets(&[id])).collect::<Vec<_>>());
}

#[test]
fn divergence_grouping_drops_duplicates_and_shadowed_type_aliases() {
	let source_sets = sets(&[common()]);
	let foo: Documentable = class("Foo", ClasslikeKind::Class, &source_sets).into();
	let collection = vec![
		foo.clone(),
		type_alias("Foo", "Int", &sets(&[jvm()])).into(),
		foo,
		type_alias("Alias", "Int", &source_sets).into(),
	];

	let groups = group_and_sort_divergent_collection(&collection);
	let sizes: Vec<(Option<String>, usize)> = groups
		.iter()
		.map(|(key, elements)| (key.name.clone(), elements.len()))
		.collect();

	assert_eq!(sizes, vec![(Some("Alias".to_string()), 1), (Some("Foo".to_string()), 1)]);
	assert!(matches!(groups[1].1[0], Documentable::Classlike(_)));
}

#[test]
fn sort_divergent_elements_places_missing_callables_last() {
	let source_sets = sets(&[common()]);
	let elements: Vec<Documentable> = vec![
		function(None, "foo", &["Int"], &source_sets).into(),
		class("Foo", ClasslikeKind::Class, &source_sets).into(),
		function(None, "foo", &[], &source_sets).into(),
	];

	let sorted = sort_divergent_elements_deterministically(elements);
	let kinds: Vec<&str> = sorted.iter().map(Documentable::kind_name).collect();

	// Package-level callables have no class chain, so they sort first.
	assert_eq!(kinds, vec!["function", "function", "classlike"]);
	assert_eq!(sorted[0].dri(), member_dri(None, "foo", &[]));
}

#[rstest]
#[case::letters_before_case("a", "B", std::cmp::Ordering::Less)]
#[case::case_insensitive("B", "b", std::cmp::Ordering::Less)]
#[case::equal("foo", "foo", std::cmp::Ordering::Equal)]
#[case::longer_after("foo", "foobar", std::cmp::Ordering::Less)]
fn canonical_order(#[case] left: &str, #[case] right: &str, #[case] expected: std::cmp::Ordering) {
	assert_eq!(canonical_alphabetical_order(left, right), expected);
}

#[test]
fn clash_resolution_keeps_unique_declarations() {
	let source_sets = sets(&[common()]);
	let input: Vec<Documentable> = vec![
		function(None, "foo", &[], &source_sets).into(),
		function(None, "bar", &[], &source_sets).into(),
	];

	let output = rename_clashing_documentables(input.clone(), &registry());

	assert_eq!(output, input);
}

#[test]
fn clash_resolution_renames_colliding_declarations() {
	let on_jvm: Documentable = {
		let mut foo = function(None, "foo", &[], &sets(&[jvm()]));
		foo.common.dri = foo.common.dri.with_extra("jvm");
		foo.into()
	};
	let on_js: Documentable = {
		let mut foo = function(None, "foo", &[], &sets(&[js()]));
		foo.common.dri = foo.common.dri.with_extra("js");
		foo.into()
	};
	let bar: Documentable = function(None, "bar", &[], &sets(&[common()])).into();

	let output = rename_clashing_documentables(vec![on_jvm, bar, on_js], &registry());
	let names: Vec<String> = output.iter().map(Documentable::name_after_clash).collect();

	assert_eq!(names, vec!["[JVM]foo", "[JS]foo", "bar"]);
	assert_eq!(output[0].name(), Some("foo"));
}

#[test]
fn clash_name_prefers_explicit_markers() {
	let mut foo = function(None, "foo", &[], &sets(&[jvm()]));
	foo.common
		.extra
		.insert::<ClashingDriIdentifier>(markers(&["jvm", "android", "jvm"]));

	assert_eq!(clashed_name(&foo.into(), &registry()), "[jvm, android]foo");
}

#[test]
fn grouping_keeps_first_seen_order() {
	let groups = group_by_first_seen_keyed(vec!["b1", "a1", "b2", "c1", "a2"], |item| {
		item.chars().next().unwrap_or_default()
	});

	let keys: Vec<char> = groups.keys().copied().collect();
	assert_eq!(keys, vec!['b', 'a', 'c']);
	assert_eq!(groups[&'a'], vec!["a1", "a2"]);
	assert_eq!(
		group_by_first_seen(vec![3, 1, 4, 1, 5], |number| number % 2),
		vec![vec![3, 1, 1, 5], vec![4]]
	);
}

#[test]
fn merge_clashing_groups_variants_by_dri() {
	let jvm_foo: Documentable = class("Foo", ClasslikeKind::Class, &sets(&[jvm()])).into();
	let js_foo: Documentable = class("Foo", ClasslikeKind::Class, &sets(&[js()])).into();
	let bar: Documentable = class("Bar", ClasslikeKind::Class, &sets(&[jvm()])).into();

	let groups = merge_clashing_documentables(vec![jvm_foo.clone(), bar.clone(), js_foo.clone()]);

	assert_eq!(groups, vec![vec![jvm_foo, js_foo], vec![bar]]);
}

fn block_rows(needs_sorting: bool) -> Vec<String> {
	let source_sets = sets(&[common()]);
	let elements: Vec<Documentable> = ["zeta", "Alpha", "beta"]
		.iter()
		.map(|name| Documentable::from(function(Some("Foo"), *name, &[], &source_sets)))
		.collect();
	let options = BlockOptions::new(source_sets.clone()).sorted(needs_sorting);

	let (group, _) = build(|b| {
		b.block("Functions", 2, ContentKind::Functions, &elements, &options, |row, element| {
			row.text(element.name().unwrap_or_default(), ContentKind::Main);
		});
	});
	section_rows(&group.into_node(), "Functions")
}

#[rstest]
#[case::sorted_by_default(true, vec!["Alpha", "beta", "zeta"])]
#[case::input_order(false, vec!["zeta", "Alpha", "beta"])]
fn block_orders_rows_by_name_unless_opted_out(#[case] needs_sorting: bool, #[case] expected: Vec<&str>) {
	let rows = block_rows(needs_sorting);

	assert_eq!(rows.iter().map(String::as_str).collect::<Vec<_>>(), expected);
	assert!(BlockOptions::new(SourceSets::new()).needs_sorting);
}

#[test]
fn list_of_nothing_emits_nothing() {
	let (group, _) = build(|b| {
		b.list(&Vec::<TypeRef>::new(), "<", ">", ", ", |b, argument| b.type_ref(argument));
	});

	assert!(group.children.is_empty());
}

#[test]
fn list_wraps_elements_with_prefix_and_suffix() {
	let (group, _) = build(|b| {
		b.list(
			&[TypeRef::unresolved("A"), TypeRef::unresolved("B")],
			"<",
			">",
			", ",
			|b, argument| b.type_ref(argument),
		);
	});

	assert_eq!(group.into_node().text_content(), "<A, B>");
}

#[rstest]
#[case::plain(
	TypeRef::function(vec![TypeRef::unresolved("A"), TypeRef::unresolved("B")], TypeRef::unresolved("C")),
	"(A, B) -> C"
)]
#[case::no_parameters(TypeRef::function(vec![], TypeRef::unresolved("C")), "() -> C")]
#[case::nullable(
	TypeRef::function(vec![TypeRef::unresolved("A")], TypeRef::unresolved("C")).nullable(),
	"((A) -> C)?"
)]
#[case::with_receiver(
	TypeRef {
		function: Some(FunctionType { has_receiver: true }),
		..TypeRef::function(vec![TypeRef::unresolved("R"), TypeRef::unresolved("A")], TypeRef::unresolved("C"))
	},
	"R.(A) -> C"
)]
#[case::generic(
	TypeRef::unresolved("kotlin.collections.List").with_arguments(vec![TypeRef::unresolved("A").nullable()]),
	"kotlin.collections.List<A?>"
)]
fn type_references_render(#[case] type_ref: TypeRef, #[case] expected: &str) {
	let (group, logger) = build(|b| b.type_ref(&type_ref));

	assert_eq!(group.into_node().text_content(), expected);
	assert_eq!(logger.error_count(), 0);
}

#[test]
fn resolved_types_render_as_links() {
	let (group, _) = build(|b| b.type_ref(&kotlin_type("Int")));

	let ContentNode::Link(link) = &group.children[0] else {
		panic!("expected a link, found {:?}", group.children[0]);
	};
	assert_eq!(link.target, LinkTarget::Dri(Dri::new("kotlin", "Int")));
}

#[test]
#[traced_test]
fn unresolvable_type_renders_placeholder_and_logs_once() {
	let (group, logger) = build(|b| b.type_ref(&TypeRef::default()));

	assert_eq!(group.into_node().text_content(), "???");
	assert_eq!(logger.error_count(), 1);
	assert!(logs_contain("cannot be resolved"));
}

#[test]
fn nested_scopes_inherit_and_override_metadata() {
	let (group, _) = build(|b| {
		b.group(
			GroupOptions::new()
				.kind(ContentKind::Comment)
				.source_sets(sets(&[jvm()])),
			|b| {
				b.group(GroupOptions::new().styles(BTreeSet::from([Style::Block])), |b| {
					b.text("inner", ContentKind::Symbol);
				});
			},
		);
	});

	let outer = &group.children[0];
	let inner = outer.children()[0];
	let text = inner.children()[0];
	assert_eq!(outer.content_kind(), ContentKind::Comment);
	assert_eq!(inner.content_kind(), ContentKind::Comment);
	assert_eq!(inner.source_sets(), &sets(&[jvm()]));
	assert!(inner.has_style(Style::Block));
	assert_eq!(text.content_kind(), ContentKind::Symbol);
	assert_eq!(text.meta().dci.dri, BTreeSet::from([class_dri("Foo")]));
}

#[test]
fn divergent_group_covers_its_instances() {
	let (group, _) = build(|b| {
		b.divergent_group(GroupId("foo".into()), GroupOptions::new(), true, |group| {
			group.instance(
				BTreeSet::from([class_dri("Foo")]),
				sets(&[jvm()]),
				PropertyContainer::empty(),
				|instance| instance.divergent(GroupOptions::new(), |b| b.text("jvm", ContentKind::Main)),
			);
			group.instance(
				BTreeSet::from([class_dri("Foo")]),
				sets(&[js()]),
				PropertyContainer::empty(),
				|instance| instance.divergent(GroupOptions::new(), |b| b.text("js", ContentKind::Main)),
			);
		});
	});

	let node = &group.children[0];
	let ContentNode::DivergentGroup(divergent) = node else {
		panic!("expected a divergent group");
	};
	assert_eq!(node.source_sets(), &sets(&[jvm(), js()]));
	assert_eq!(divergent.instances().count(), 2);
	assert!(node.uncovered_source_sets().is_empty());
}

#[test]
fn signatures_are_cached_per_run() {
	let (builder, _) = content_builder();
	let foo: Documentable = function(None, "foo", &["Int"], &sets(&[common()])).into();

	let first = builder.build_signature(&foo);
	let second = builder.build_signature(&foo);

	assert_eq!(first, second);
	assert_eq!(builder.fragment_cache().misses(), 1);
	assert_eq!(builder.fragment_cache().hits(), 1);
	assert_eq!(builder.fragment_cache().len(), 1);
}

#[test]
fn signature_cache_is_shared_between_workers() {
	use rayon::prelude::*;

	let (builder, _) = content_builder();
	let functions: Vec<Documentable> = ["Int", "String", "Long", "Boolean"]
		.iter()
		.map(|param| Documentable::from(function(None, "foo", &[*param], &sets(&[common()]))))
		.collect();
	let requests: Vec<&Documentable> = functions.iter().cycle().take(64).collect();

	let signatures: Vec<Vec<ContentNode>> = requests
		.par_iter()
		.map(|documentable| builder.build_signature(documentable))
		.collect();

	let cache = builder.fragment_cache();
	assert_eq!(cache.len(), functions.len());
	assert_eq!(cache.hits() + cache.misses(), requests.len());
	for (documentable, signature) in requests.iter().zip(&signatures) {
		assert_eq!(signature, &KotlinSignatureProvider.signature(documentable, &builder));
	}
}

#[rstest]
#[case::function(
	function(None, "foo", &["Int"], &sets(&[common()])).into(),
	"public fun foo(p0: Int): String"
)]
#[case::constructor(constructor("Foo", &sets(&[common()])).into(), "public constructor()")]
#[case::property(property(None, "count", &sets(&[common()])).into(), "public val count: Int")]
#[case::extension(extension_function("Foo", "ext", &sets(&[common()])).into(), "public fun Foo.ext(): String")]
#[case::type_alias(type_alias("Name", "String", &sets(&[common()])).into(), "public typealias Name = String")]
#[case::enum_class(class("Letters", ClasslikeKind::Enum, &sets(&[common()])).into(), "public enum class Letters")]
fn signatures_render(#[case] documentable: Documentable, #[case] expected: &str) {
	let (builder, logger) = content_builder();

	let nodes = builder.build_signature(&documentable);

	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].text_content(), expected);
	assert!(nodes[0].has_style(Style::Monospace));
	assert_eq!(logger.error_count(), 0);
}

#[test]
fn signatures_include_modifiers_and_supertypes() {
	let source_sets = sets(&[jvm(), js()]);
	let mut foo = class("Foo", ClasslikeKind::Class, &source_sets);
	foo.supertypes = vec![kotlin_type("Any"), TypeRef::unresolved("Comparable")];
	foo.common.extra.insert::<AdditionalModifiers>(
		SourceSetDependent::default().with(jvm(), BTreeSet::from([ExtraModifier::Data])),
	);
	foo.visibility.insert(js(), Visibility::Internal);
	let (builder, _) = content_builder();

	let nodes = builder.build_signature(&foo.into());
	let texts: Vec<String> = nodes.iter().map(ContentNode::text_content).collect();

	// Source sets iterate in id order: jsMain before jvmMain.
	assert_eq!(
		texts,
		vec![
			"internal class Foo : Any, Comparable",
			"public data class Foo : Any, Comparable"
		]
	);
}

#[test]
fn description_sections_render_tags() {
	let source_sets = sets(&[common()]);
	let mut foo = function(None, "foo", &["Int"], &source_sets);
	foo.common.documentation = SourceSetDependent::default().with(
		common(),
		DocumentationNode::new(vec![
			TagWrapper::Description {
				root: DocTag::paragraph(vec![DocTag::text("Does foo.")]),
			},
			TagWrapper::Param {
				name: "p0".into(),
				root: DocTag::text("the input"),
			},
			TagWrapper::Return {
				root: DocTag::text("a string"),
			},
			TagWrapper::CustomTag {
				name: SinceKotlinTagContentProvider::TAG_NAME.into(),
				root: DocTag::text("1.9"),
			},
		]),
	);
	let (creator, _) = page_creator(PageConfig::default());

	let page = creator.page_for_functions(vec![foo.into()]);
	let text = page.content.text_content();

	assert!(text.contains("Does foo."), "{text}");
	assert!(text.contains("Since Kotlin1.9"), "{text}");
	assert!(text.contains("Returna string"), "{text}");
	assert_eq!(section_rows(&page.content, "Parameters"), vec!["p0"]);
}

#[test]
fn member_pages_with_several_dris_log_an_error() {
	let source_sets = sets(&[common()]);
	let (creator, logger) = page_creator(PageConfig::default());

	let page = creator.page_for_functions(vec![
		function(None, "first", &[], &source_sets).into(),
		function(None, "second", &[], &source_sets).into(),
	]);

	assert_eq!(page.name, "first");
	assert_eq!(page.dri.len(), 2);
	assert_eq!(logger.error_count(), 1);
}

#[test]
fn end_to_end_page_names() -> PageResult<()> {
	let output = generate(&sample_module(), PageConfig::default())?;
	let root = &output.root;

	assert_eq!(root.kind, PageKind::Module);
	assert_eq!(root.name, "sample");
	assert_eq!(child_names(root), vec![PACKAGE]);

	let package = root.child(PACKAGE).map(child_names);
	assert_eq!(package, Some(vec!["Foo".to_string(), "topLevel".to_string()]));

	let foo = root.find_path(&[PACKAGE, "Foo"]).map(child_names);
	assert_eq!(
		foo,
		Some(vec!["Foo".to_string(), "bar".to_string(), "baz".to_string()])
	);

	let bar = root
		.find_path(&[PACKAGE, "Foo", "bar"])
		.map(|page| page.content.text_content())
		.unwrap_or_default();
	assert!(bar.contains("public fun bar(p0: Int): String"), "{bar}");
	assert_eq!(output.report.errors, 0);
	assert_eq!(root.page_count(), 7);

	Ok(())
}

#[test]
fn class_page_lists_sections() -> PageResult<()> {
	let output = generate(&sample_module(), PageConfig::default())?;
	let Some(foo) = output.root.find_path(&[PACKAGE, "Foo"]) else {
		panic!("missing class page");
	};

	assert_eq!(section_rows(&foo.content, "Constructors"), vec!["Foo"]);
	assert_eq!(section_rows(&foo.content, "Functions"), vec!["bar"]);
	assert_eq!(section_rows(&foo.content, "Properties"), vec!["baz"]);
	assert!(foo.content.text_content().contains("A foo."));

	let Some(package) = output.root.child(PACKAGE) else {
		panic!("missing package page");
	};
	assert_eq!(section_rows(&package.content, "Types"), vec!["Foo"]);
	assert_eq!(section_rows(&package.content, "Functions"), vec!["topLevel"]);
	assert_eq!(section_rows(&output.root.content, "Packages"), vec![PACKAGE]);

	Ok(())
}

fn expect_actual_module() -> DModule {
	let mut package = package(PACKAGE, &sets(&[jvm(), js()]));
	package.classlikes = vec![
		class("Foo", ClasslikeKind::Class, &sets(&[jvm()])),
		class("Foo", ClasslikeKind::Class, &sets(&[js()])),
	];
	module(vec![package])
}

#[test]
fn merged_mode_builds_one_page_per_dri() -> PageResult<()> {
	let config = PageConfig {
		merge_implicit_expect_actual_declarations: true,
		..PageConfig::default()
	};

	let output = generate(&expect_actual_module(), config)?;
	let Some(package) = output.root.child(PACKAGE) else {
		panic!("missing package page");
	};

	assert_eq!(child_names(package), vec!["Foo"]);
	assert_eq!(package.children[0].documentables.len(), 2);

	Ok(())
}

#[test]
fn rename_mode_builds_one_page_per_variant() -> PageResult<()> {
	let output = generate(&expect_actual_module(), PageConfig::default())?;
	let Some(package) = output.root.child(PACKAGE) else {
		panic!("missing package page");
	};

	assert_eq!(child_names(package), vec!["[JVM]Foo", "[JS]Foo"]);

	Ok(())
}

fn class_with_inherited_members() -> DClasslike {
	let source_sets = sets(&[common()]);
	let mut inherited = function(Some("Foo"), "inherited", &[], &source_sets);
	inherited.common.extra.insert::<InheritedMember>(SourceSetDependent::uniform(
		&source_sets,
		Some(class_dri("Base")),
	));
	let mut foo = class("Foo", ClasslikeKind::Class, &source_sets);
	foo.functions = vec![function(Some("Foo"), "own", &[], &source_sets), inherited];
	foo.common.extra.insert::<CallableExtensions>(vec![
		extension_function("Foo", "onFoo", &source_sets).into(),
		extension_function("Base", "onBase", &source_sets).into(),
	]);
	foo
}

#[test]
fn inherited_members_get_no_page() -> PageResult<()> {
	let (creator, _) = page_creator(PageConfig::default());

	let page = creator.page_for_classlikes(vec![class_with_inherited_members().into()])?;

	assert_eq!(child_names(&page), vec!["own"]);
	assert_eq!(
		section_rows(&page.content, "Functions"),
		vec!["inherited", "onBase", "onFoo", "own"]
	);

	Ok(())
}

#[test]
fn inherited_members_can_be_separated() -> PageResult<()> {
	let config = PageConfig {
		separate_inherited_members: true,
		..PageConfig::default()
	};
	let (creator, _) = page_creator(config);

	let page = creator.page_for_classlikes(vec![class_with_inherited_members().into()])?;

	assert_eq!(section_rows(&page.content, "Functions"), vec!["onFoo", "own"]);
	assert_eq!(
		section_rows(&page.content, "Inherited functions"),
		vec!["inherited", "onBase"]
	);

	Ok(())
}

#[test]
fn non_callable_extensions_fail_the_page() {
	let source_sets = sets(&[common()]);
	let mut foo = class("Foo", ClasslikeKind::Class, &source_sets);
	foo.common
		.extra
		.insert::<CallableExtensions>(vec![class("Bar", ClasslikeKind::Class, &source_sets).into()]);
	let (creator, _) = page_creator(PageConfig::default());

	let result = creator.page_for_classlikes(vec![foo.into()]);

	assert!(matches!(result, Err(PageError::UnexpectedDocumentable { .. })));
}

#[test]
fn annotation_classes_have_no_constructor_pages() -> PageResult<()> {
	let source_sets = sets(&[common()]);
	let mut marker = class("Marker", ClasslikeKind::Annotation, &source_sets);
	marker.constructors.push(constructor("Marker", &source_sets));
	let (creator, _) = page_creator(PageConfig::default());

	let page = creator.page_for_classlikes(vec![marker.into()])?;

	assert!(page.children.is_empty());
	assert!(section_rows(&page.content, "Constructors").is_empty());

	Ok(())
}

#[test]
fn actual_type_aliases_fold_into_expect_class() -> PageResult<()> {
	let mut expect = class("Foo", ClasslikeKind::Class, &sets(&[common()]));
	expect.expect_present_in_set = Some(common());
	let mut package = package(PACKAGE, &sets(&[common(), jvm()]));
	package.classlikes.push(expect);
	package.typealiases.push(type_alias("Foo", "Int", &sets(&[jvm()])));
	let (creator, _) = page_creator(PageConfig::default());

	let page = creator.page_for_package(&package)?;

	assert_eq!(child_names(&page), vec!["Foo"]);
	let kinds: Vec<&str> = page.children[0]
		.documentables
		.iter()
		.map(Documentable::kind_name)
		.collect();
	assert_eq!(kinds, vec!["classlike", "type alias"]);
	assert_eq!(section_rows(&page.content, "Types"), vec!["Foo"]);

	Ok(())
}

#[test]
fn all_types_page_is_optional() -> PageResult<()> {
	let without = generate(&sample_module(), PageConfig::default())?;
	assert!(without.root.child("All Types").is_none());

	let config = PageConfig {
		display_all_types_page: true,
		..PageConfig::default()
	};
	let with = generate(&sample_module(), config)?;
	let Some(all_types) = with.root.children.last() else {
		panic!("missing all types page");
	};

	assert_eq!(all_types.kind, PageKind::AllTypes);
	assert_eq!(all_types.dri, BTreeSet::from([all_types_dri()]));
	assert_eq!(
		section_rows(&all_types.content, "All Types"),
		vec![format!("{PACKAGE}.Foo")]
	);

	Ok(())
}

#[test]
fn unnamed_module_uses_root_page_name() -> PageResult<()> {
	let mut module = sample_module();
	module.name = String::new();

	let output = generate(&module, PageConfig::default())?;

	assert_eq!(output.root.name, ROOT_PAGE_NAME);

	Ok(())
}

#[test]
fn generation_is_repeatable() -> PageResult<()> {
	let module = sample_module();
	let generator = Generator::new(PageConfig::default());

	let first = generator.generate(&module)?;
	let second = generator.generate(&module)?;

	assert_eq!(first.root, second.root);
	assert_eq!(first.report, second.report);

	Ok(())
}

#[test]
fn extras_merge_with_key_strategies() -> PageResult<()> {
	let left = PropertyContainer::of::<ClashingDriIdentifier>(markers(&["jvm"]))
		.with::<DriClashAwareName>("[JVM]foo".to_string());
	let right = PropertyContainer::of::<ClashingDriIdentifier>(markers(&["js", "jvm"]));

	let merged = left.merge(&right)?;

	let merged_markers: Vec<&str> = merged
		.get::<ClashingDriIdentifier>()
		.map(|markers| markers.iter().map(String::as_str).collect())
		.unwrap_or_default();
	assert_eq!(merged_markers, vec!["jvm", "js"]);
	assert_eq!(merged.get::<DriClashAwareName>().map(String::as_str), Some("[JVM]foo"));
	assert_eq!(merged.names(), vec!["ClashingDriIdentifier", "DriClashAwareName"]);

	Ok(())
}

#[test]
fn extras_without_merge_strategy_conflict() {
	let left = PropertyContainer::of::<DriClashAwareName>("[JVM]foo".to_string());
	let right = PropertyContainer::of::<DriClashAwareName>("[JS]foo".to_string());

	let result = left.merge(&right);

	assert!(matches!(
		result,
		Err(PageError::ExtraMergeConflict { key }) if key == "DriClashAwareName"
	));
}

#[rstest]
#[case::empty("", PageConfig::default())]
#[case::merge(
	"merge_implicit_expect_actual_declarations = true",
	PageConfig { merge_implicit_expect_actual_declarations: true, ..PageConfig::default() }
)]
#[case::all(
	"merge_implicit_expect_actual_declarations = true\nseparate_inherited_members = true\ndisplay_all_types_page = true",
	PageConfig {
		merge_implicit_expect_actual_declarations: true,
		separate_inherited_members: true,
		display_all_types_page: true,
	}
)]
fn config_parses(#[case] content: &str, #[case] expected: PageConfig) -> PageResult<()> {
	assert_eq!(PageConfig::parse(content)?, expected);

	Ok(())
}

#[rstest]
#[case::unknown_key("render_everything = true")]
#[case::wrong_type("separate_inherited_members = \"yes\"")]
fn config_rejects_invalid_content(#[case] content: &str) {
	assert!(matches!(PageConfig::parse(content), Err(PageError::ConfigParse(_))));
}

#[test]
fn config_is_discovered_in_candidate_locations() -> PageResult<()> {
	let directory = tempfile::tempdir()?;
	assert_eq!(PageConfig::load(directory.path())?, None);

	std::fs::create_dir_all(directory.path().join(".config"))?;
	std::fs::write(
		directory.path().join(".config/pagetree.toml"),
		"display_all_types_page = true\n",
	)?;
	let config = PageConfig::load(directory.path())?;
	assert_eq!(
		config,
		Some(PageConfig {
			display_all_types_page: true,
			..PageConfig::default()
		})
	);

	std::fs::write(directory.path().join("pagetree.toml"), "")?;
	assert_eq!(PageConfig::load(directory.path())?, Some(PageConfig::default()));

	Ok(())
}

const MODULE_JSON: &str = r#"{
	"name": "sample",
	"source_sets": [{ "id": "app/commonMain", "display_name": "Common", "analysis_platform": "common" }],
	"packages": [{
		"dri": { "package_name": "org.example" },
		"name": "org.example",
		"source_sets": ["app/commonMain"],
		"classlikes": [{
			"dri": { "package_name": "org.example", "class_names": "Foo" },
			"name": "Foo",
			"kind": "enum",
			"source_sets": ["app/commonMain"],
			"extra": [{ "kind": "clashing_dri_identifier", "markers": ["common"] }],
			"entries": [
				{ "dri": { "package_name": "org.example", "class_names": "Foo.A" }, "name": "A", "source_sets": ["app/commonMain"] },
				{ "dri": { "package_name": "org.example", "class_names": "Foo.B" }, "name": "B", "source_sets": ["app/commonMain"] }
			]
		}]
	}]
}"#;

#[test]
fn modules_parse_from_json() -> PageResult<()> {
	let module = parse_module(MODULE_JSON, "module.json")?;

	assert_eq!(module.name, "sample");
	assert_eq!(module.source_set_ids(), sets(&[common()]));
	let foo = &module.packages[0].classlikes[0];
	assert_eq!(foo.kind, ClasslikeKind::Enum);
	assert_eq!(foo.entries.len(), 2);
	assert_eq!(
		foo.common.extra.get::<ClashingDriIdentifier>(),
		Some(&markers(&["common"]))
	);

	Ok(())
}

#[test]
fn invalid_modules_report_their_origin() {
	let result = parse_module("{ \"packages\": 1 }", "broken.json");

	assert!(matches!(
		result,
		Err(PageError::InputParse { path, .. }) if path == "broken.json"
	));
}

fn page_with(content: ContentNode, children: Vec<PageNode>) -> PageNode {
	PageNode::new(
		PageKind::Package,
		"page",
		content,
		BTreeSet::new(),
		Vec::new(),
		children,
	)
}

fn text_with_link(text: &str) -> ContentNode {
	let (group, _) = build(|b| {
		b.text(text, ContentKind::Main);
		b.link_url("styles", text, ContentKind::Main);
	});
	group.into_node()
}

#[test]
fn brief_comments_become_blocks() {
	let (group, _) = build(|b| {
		b.group(GroupOptions::new().kind(ContentKind::BriefComment), |b| {
			b.text("brief", ContentKind::Comment);
		});
		b.group(GroupOptions::new().kind(ContentKind::Comment), |b| {
			b.text("full", ContentKind::Comment);
		});
	});
	let page = page_with(group.into_node(), Vec::new());

	let page = BriefCommentPreprocessor.transform(page);
	let children = page.content.children();

	assert!(children[0].has_style(Style::Block));
	assert!(!children[1].has_style(Style::Block));
}

#[test]
fn path_to_root_follows_page_depth() {
	let leaf = page_with(text_with_link("###/styles.css"), Vec::new());
	let middle = page_with(text_with_link("###/styles.css"), vec![leaf]);
	let root = page_with(text_with_link("###/styles.css"), vec![middle]);

	let root = PathToRootSubstitution::default().transform(root);

	let mut found = Vec::new();
	root.walk(&mut |page, _| {
		let content = page.content.children();
		let ContentNode::Link(link) = content[1] else {
			panic!("expected a link");
		};
		found.push((content[0].text_content(), link.target.clone()));
	});
	assert_eq!(
		found,
		vec![
			("./styles.css".to_string(), LinkTarget::Url("./styles.css".into())),
			("../styles.css".to_string(), LinkTarget::Url("../styles.css".into())),
			("../../styles.css".to_string(), LinkTarget::Url("../../styles.css".into())),
		]
	);
}

#[test]
#[traced_test]
fn coverage_check_warns_without_changing_the_tree() {
	let (group, _) = build(|b| {
		b.group(GroupOptions::new().source_sets(sets(&[jvm(), js()])), |b| {
			b.group(GroupOptions::new().source_sets(sets(&[jvm()])), |b| {
				b.text("jvm only", ContentKind::Main);
			});
		});
	});
	let page = page_with(group.into_node(), Vec::new());
	let logger = Arc::new(PageLogger::new());

	let checked = SourceSetCoverageCheck::new(Arc::clone(&logger)).transform(page.clone());

	assert_eq!(checked, page);
	// The root group claims commonMain and the inner group jsMain.
	assert_eq!(logger.warning_count(), 2);
	assert!(logs_contain("claims source sets"));
}

#[test]
fn pipeline_runs_in_order() {
	let logger = Arc::new(PageLogger::new());
	let pipeline = PageTransformerPipeline::standard(logger);

	assert_eq!(
		pipeline.names(),
		vec![
			"brief-comment-preprocessor",
			"path-to-root-substitution",
			"source-set-coverage-check"
		]
	);
}

#[test]
fn map_kind_only_touches_selected_nodes() {
	let (group, _) = build(|b| {
		b.text("a", ContentKind::Main);
		b.group(GroupOptions::new(), |b| b.text("b", ContentKind::Main));
		b.break_line();
	});

	let node = group.into_node().map_kind(NodeKind::Text, &mut |node| {
		match node {
			ContentNode::Text(mut text) => {
				text.text = text.text.to_uppercase();
				ContentNode::Text(text)
			}
			other => other,
		}
	});

	assert_eq!(node.text_content(), "AB");
	assert_eq!(node.children()[2].node_kind(), NodeKind::Break);
}
