use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;

use crate::BlockOptions;
use crate::CallableExtensions;
use crate::ClasslikeKind;
use crate::ContentGroup;
use crate::ContentKind;
use crate::ContentNode;
use crate::CustomTagContentProvider;
use crate::DClasslike;
use crate::DModule;
use crate::DPackage;
use crate::DocTag;
use crate::Documentable;
use crate::DocumentableContentBuilder;
use crate::Dri;
use crate::GroupId;
use crate::GroupOptions;
use crate::PageConfig;
use crate::PageContentBuilder;
use crate::PageError;
use crate::PageKind;
use crate::PageLogger;
use crate::PageNode;
use crate::PageResult;
use crate::Platform;
use crate::PropertyContainer;
use crate::SourceSetId;
use crate::SourceSetRegistry;
use crate::SourceSets;
use crate::Style;
use crate::SymbolAnchor;
use crate::SymbolAnchorHint;
use crate::TabbedContentType;
use crate::TabbedContentTypeExtra;
use crate::TagWrapper;
use crate::all_types_dri;
use crate::dris_of;
use crate::group_and_sort_divergent_collection;
use crate::group_by_first_seen;
use crate::merge_clashing_documentables;
use crate::rename_clashing_documentables;
use crate::sections::brief;
use crate::sections::custom_tags_brief;
use crate::sections::description_sections;
use crate::source_sets_of;

/// Name of the module page when the module itself is unnamed.
pub const ROOT_PAGE_NAME: &str = "<root>";

/// Declarations listed in one scope (package, classlike or enum entry).
#[derive(Debug, Default)]
struct ScopeMembers {
	types: Vec<Documentable>,
	functions: Vec<Documentable>,
	properties: Vec<Documentable>,
	extensions: Vec<Documentable>,
}

/// Builds the page tree of a module.
///
/// One creator serves one generation run: its content builder owns the
/// run's fragment cache. Packages and classlikes are built on the rayon pool
/// and collected in input order.
pub struct DefaultPageCreator {
	config: PageConfig,
	source_sets: SourceSetRegistry,
	content_builder: PageContentBuilder,
	custom_tag_providers: Vec<Arc<dyn CustomTagContentProvider>>,
}

impl DefaultPageCreator {
	pub fn new(
		config: PageConfig,
		source_sets: SourceSetRegistry,
		content_builder: PageContentBuilder,
		custom_tag_providers: Vec<Arc<dyn CustomTagContentProvider>>,
	) -> Self {
		Self {
			config,
			source_sets,
			content_builder,
			custom_tag_providers,
		}
	}

	pub fn content_builder(&self) -> &PageContentBuilder {
		&self.content_builder
	}

	fn logger(&self) -> &PageLogger {
		self.content_builder.logger()
	}

	pub fn page_for_module(&self, module: &DModule) -> PageResult<PageNode> {
		let mut children = module
			.packages
			.par_iter()
			.map(|package| self.page_for_package(package))
			.collect::<PageResult<Vec<_>>>()?;

		if self.needs_all_types_page(module) {
			children.push(self.page_for_all_types(module));
		}

		let shallow = Documentable::Module(DModule {
			name: module.name.clone(),
			packages: Vec::new(),
			source_sets: module.source_sets.clone(),
			documentation: module.documentation.clone(),
		});
		let name = if module.name.is_empty() {
			ROOT_PAGE_NAME
		} else {
			module.name.as_str()
		};

		Ok(PageNode::new(
			PageKind::Module,
			name,
			self.content_for_module(module, &shallow).into_node(),
			BTreeSet::from([Dri::top_level()]),
			vec![shallow],
			children,
		))
	}

	fn needs_all_types_page(&self, module: &DModule) -> bool {
		self.config.display_all_types_page
			&& module
				.packages
				.iter()
				.any(|package| !package.classlikes.is_empty() || !package.typealiases.is_empty())
	}

	pub fn page_for_all_types(&self, module: &DModule) -> PageNode {
		PageNode::new(
			PageKind::AllTypes,
			"All Types",
			self.content_for_all_types(module).into_node(),
			BTreeSet::from([all_types_dri()]),
			Vec::new(),
			Vec::new(),
		)
	}

	pub fn page_for_package(&self, package: &DPackage) -> PageResult<PageNode> {
		let types = package
			.classlikes
			.iter()
			.cloned()
			.map(Documentable::from)
			.chain(package.typealiases.iter().cloned().map(Documentable::from))
			.collect();
		let (types, actual_aliases) = split_actual_type_aliases(types);
		let functions: Vec<Documentable> = package.functions.iter().cloned().map(Documentable::from).collect();
		let properties: Vec<Documentable> = package.properties.iter().cloned().map(Documentable::from).collect();

		let type_groups = fold_actual_type_aliases(self.type_groups(types), actual_aliases);
		let mut children = type_groups
			.into_par_iter()
			.map(|group| self.page_for_classlikes(group))
			.collect::<PageResult<Vec<_>>>()?;
		children.extend(self.member_pages(functions));
		children.extend(self.member_pages(properties));

		let documentable = Documentable::Package(package.clone());
		let content = self.content_for_package(package, &documentable)?;

		Ok(PageNode::new(
			PageKind::Package,
			package.common.name.as_deref().unwrap_or_default(),
			content.into_node(),
			BTreeSet::from([package.common.dri.clone()]),
			vec![documentable],
			children,
		))
	}

	/// One group per classlike page. Merged mode groups variants by DRI;
	/// otherwise every declaration gets its own page and clashing names are
	/// disambiguated.
	fn type_groups(&self, types: Vec<Documentable>) -> Vec<Vec<Documentable>> {
		if self.config.merge_implicit_expect_actual_declarations {
			merge_clashing_documentables(types)
		} else {
			rename_clashing_documentables(types, &self.source_sets)
				.into_iter()
				.map(|documentable| vec![documentable])
				.collect()
		}
	}

	fn member_pages(&self, members: Vec<Documentable>) -> Vec<PageNode> {
		let members: Vec<Documentable> = members
			.into_iter()
			.filter(|member| !member.is_inherited())
			.collect();
		self.type_groups(members)
			.into_iter()
			.map(|group| self.page_for_members(group))
			.collect()
	}

	/// The page of one classlike, with all of its source set variants.
	pub fn page_for_classlikes(&self, documentables: Vec<Documentable>) -> PageResult<PageNode> {
		let dri = self.check_single_dri(&documentables, "Documentable");
		let classlikes: Vec<&DClasslike> = documentables.iter().filter_map(as_classlike).collect();

		let constructors: Vec<Documentable> = if should_document_constructors(&documentables) {
			classlikes
				.iter()
				.flat_map(|classlike| classlike.constructors.iter().cloned().map(Documentable::from))
				.collect()
		} else {
			Vec::new()
		};
		let nested = classlikes
			.iter()
			.flat_map(|classlike| classlike.classlikes.iter().cloned().map(Documentable::from))
			.collect();
		let functions = classlikes
			.iter()
			.flat_map(|classlike| classlike.functions.iter().cloned().map(Documentable::from))
			.collect();
		let properties = classlikes
			.iter()
			.flat_map(|classlike| classlike.properties.iter().cloned().map(Documentable::from))
			.collect();
		let entries: Vec<Documentable> = classlikes
			.iter()
			.flat_map(|classlike| classlike.entries.iter().cloned().map(Documentable::from))
			.collect();

		let mut children: Vec<PageNode> = constructors
			.into_iter()
			.map(|constructor| self.page_for_members(vec![constructor]))
			.collect();
		children.extend(self.scope_pages(nested, functions, properties)?);
		for group in self.type_groups(entries) {
			children.push(self.page_for_enum_entries(group)?);
		}

		let content = self.content_for_classlikes_and_entries(&documentables)?;
		let name = page_name(&documentables);

		Ok(PageNode::new(
			PageKind::Classlike,
			name,
			content.into_node(),
			dri,
			documentables,
			children,
		))
	}

	/// The page of an enum entry, which may declare its own members.
	pub fn page_for_enum_entries(&self, documentables: Vec<Documentable>) -> PageResult<PageNode> {
		let dri = self.check_single_dri(&documentables, "Enum entry");

		let mut nested = Vec::new();
		let mut functions = Vec::new();
		let mut properties = Vec::new();
		for documentable in &documentables {
			if let Documentable::EnumEntry(entry) = documentable {
				nested.extend(entry.classlikes.iter().cloned().map(Documentable::from));
				functions.extend(entry.functions.iter().cloned().map(Documentable::from));
				properties.extend(entry.properties.iter().cloned().map(Documentable::from));
			}
		}

		let children = self.scope_pages(nested, functions, properties)?;
		let content = self.content_for_classlikes_and_entries(&documentables)?;
		let name = page_name(&documentables);

		Ok(PageNode::new(
			PageKind::Classlike,
			name,
			content.into_node(),
			dri,
			documentables,
			children,
		))
	}

	fn scope_pages(
		&self,
		nested: Vec<Documentable>,
		functions: Vec<Documentable>,
		properties: Vec<Documentable>,
	) -> PageResult<Vec<PageNode>> {
		let mut children = self
			.type_groups(nested)
			.into_par_iter()
			.map(|group| self.page_for_classlikes(group))
			.collect::<PageResult<Vec<_>>>()?;
		children.extend(self.member_pages(functions));
		children.extend(self.member_pages(properties));
		Ok(children)
	}

	pub fn page_for_functions(&self, functions: Vec<Documentable>) -> PageNode {
		self.page_for_members(functions)
	}

	pub fn page_for_properties(&self, properties: Vec<Documentable>) -> PageNode {
		self.page_for_members(properties)
	}

	fn page_for_members(&self, documentables: Vec<Documentable>) -> PageNode {
		let dri = self.check_single_dri(&documentables, "Member");
		let content = self.content_for_members(&documentables);
		let name = page_name(&documentables);
		PageNode::new(PageKind::Member, name, content.into_node(), dri, documentables, Vec::new())
	}

	/// Every variant on one page should share a DRI. A mismatch is logged and
	/// the page keeps all of them.
	fn check_single_dri(&self, documentables: &[Documentable], what: &str) -> BTreeSet<Dri> {
		let dri = dris_of(documentables);
		if dri.len() > 1 {
			let first = documentables
				.first()
				.map(Documentable::dri)
				.unwrap_or_default();
			self.logger().error(&format!(
				"{what} dri should have the same one {first} inside the one page, found {}",
				dri.len()
			));
		}
		dri
	}

	fn content_for_description(&self, documentable: &Documentable) -> Vec<ContentNode> {
		self.content_builder
			.content_for_documentable(documentable, |b| {
				description_sections(b, documentable, &self.custom_tag_providers);
			})
			.children
	}

	pub fn content_for_module(&self, module: &DModule, documentable: &Documentable) -> ContentGroup {
		let source_sets = module.source_set_ids();
		let description = self.content_for_description(documentable);

		self.content_builder.content_for(
			BTreeSet::from([Dri::top_level()]),
			source_sets.clone(),
			|b| {
				b.group(GroupOptions::new().kind(ContentKind::Cover), |b| {
					b.cover(&module.name);
					if !description.is_empty() {
						b.source_set_dependent_hint(
							GroupOptions::new().styles(BTreeSet::from([Style::UnderCoverText])),
							|b| b.extend(description),
						);
					}
				});

				b.block(
					"Packages",
					2,
					ContentKind::Packages,
					&module.packages,
					&BlockOptions::new(source_sets.clone()).anchored(true),
					|b, package| {
						b.link(
							package.common.name.as_deref().unwrap_or_default(),
							package.common.dri.clone(),
							ContentKind::Main,
						);
						if let Some(root) = shared_package_description(package) {
							b.group(
								GroupOptions::new()
									.source_sets(package.common.source_sets.clone())
									.kind(ContentKind::BriefComment),
								|b| b.first_paragraph_comment(root),
							);
						}
					},
				);

				if self.needs_all_types_page(module) {
					b.header(2, "Index", ContentKind::Cover, |_| {});
					b.link("All Types", all_types_dri(), ContentKind::Main);
				}
			},
		)
	}

	pub fn content_for_all_types(&self, module: &DModule) -> ContentGroup {
		let source_sets = module.source_set_ids();
		let types = module
			.packages
			.iter()
			.flat_map(|package| {
				package
					.classlikes
					.iter()
					.cloned()
					.map(Documentable::from)
					.chain(package.typealiases.iter().cloned().map(Documentable::from))
			})
			.collect();
		let (types, _) = split_actual_type_aliases(types);

		self.content_builder.content_for(
			BTreeSet::from([Dri::top_level()]),
			source_sets.clone(),
			|b| {
				b.group(GroupOptions::new().kind(ContentKind::Cover), |b| {
					b.cover(&module.name);
				});

				b.block(
					"All Types",
					2,
					ContentKind::AllTypes,
					&types,
					&BlockOptions::new(source_sets.clone()).anchored(true),
					|b, typelike| {
						b.link(
							&typelike.qualified_name().unwrap_or_default(),
							typelike.dri(),
							ContentKind::Main,
						);
						self.best_brief(b, typelike);
					},
				);
			},
		)
	}

	/// One summary per type on the All Types page: the most representative
	/// description, then custom tag briefs picked the same way.
	fn best_brief(&self, b: &mut DocumentableContentBuilder<'_>, documentable: &Documentable) {
		let Some(documentation) = documentable.documentation() else {
			return;
		};

		let descriptions: Vec<(&SourceSetId, &DocTag)> = documentation
			.iter()
			.filter_map(|(source_set, node)| node.description_tag().map(|tag| (source_set, tag.root())))
			.collect();
		if let Some((source_set, root)) = self.select_best_variant(descriptions) {
			b.group(
				GroupOptions::new()
					.source_sets(BTreeSet::from([source_set.clone()]))
					.kind(ContentKind::BriefComment),
				|b| b.first_paragraph_comment(root),
			);
		}

		let tag_names: BTreeSet<&str> = documentation
			.values()
			.flat_map(|node| node.children.iter())
			.filter_map(|tag| {
				match tag {
					TagWrapper::CustomTag { name, .. } => Some(name.as_str()),
					_ => None,
				}
			})
			.collect();
		for tag_name in tag_names {
			let variants: Vec<(&SourceSetId, &DocTag)> = documentation
				.iter()
				.filter_map(|(source_set, node)| {
					node.children.iter().find_map(|tag| {
						match tag {
							TagWrapper::CustomTag { name, root } if name == tag_name => Some((source_set, root)),
							_ => None,
						}
					})
				})
				.collect();
			if let Some((source_set, root)) = self.select_best_variant(variants) {
				for provider in self
					.custom_tag_providers
					.iter()
					.filter(|provider| provider.is_applicable(tag_name))
				{
					provider.content_for_brief(b, source_set, tag_name, root);
				}
			}
		}
	}

	/// Pick the variant to show when only one may be shown: the only distinct
	/// one, else the common one, else the JVM one, else the first.
	fn select_best_variant<'d>(
		&self,
		variants: Vec<(&'d SourceSetId, &'d DocTag)>,
	) -> Option<(&'d SourceSetId, &'d DocTag)> {
		let mut distinct: Vec<(&SourceSetId, &DocTag)> = Vec::with_capacity(variants.len());
		for (source_set, root) in variants {
			if !distinct.iter().any(|(_, seen)| *seen == root) {
				distinct.push((source_set, root));
			}
		}
		if distinct.len() <= 1 {
			return distinct.pop();
		}

		let on_platform = |platform: Platform| {
			distinct
				.iter()
				.find(|(source_set, _)| self.source_sets.platform(source_set) == platform)
				.copied()
		};
		on_platform(Platform::Common)
			.or_else(|| on_platform(Platform::Jvm))
			.or_else(|| distinct.first().copied())
	}

	pub fn content_for_package(&self, package: &DPackage, documentable: &Documentable) -> PageResult<ContentGroup> {
		let dri = BTreeSet::from([package.common.dri.clone()]);
		let source_sets = package.common.source_sets.clone();
		let members = ScopeMembers {
			types: package
				.classlikes
				.iter()
				.cloned()
				.map(Documentable::from)
				.chain(package.typealiases.iter().cloned().map(Documentable::from))
				.collect(),
			functions: package.functions.iter().cloned().map(Documentable::from).collect(),
			properties: package.properties.iter().cloned().map(Documentable::from).collect(),
			extensions: Vec::new(),
		};
		let scope = self.content_for_scope(&dri, &source_sets, &members)?;
		let description = self.content_for_description(documentable);

		Ok(self.content_builder.content_for(dri.clone(), source_sets.clone(), |b| {
			b.group(GroupOptions::new().kind(ContentKind::Cover), |b| {
				b.cover("Package-level declarations");
				if !description.is_empty() {
					b.source_set_dependent_hint(
						GroupOptions::new()
							.dri(dri)
							.source_sets(source_sets)
							.styles(BTreeSet::from([Style::UnderCoverText])),
						|b| b.extend(description),
					);
				}
			});

			let extra = b.main_extra().clone();
			b.group(
				GroupOptions::new()
					.styles(BTreeSet::from([Style::TabbedContent]))
					.extra(extra),
				|b| b.push(scope.into_node()),
			);
		}))
	}

	fn content_for_scope(
		&self,
		dri: &BTreeSet<Dri>,
		source_sets: &SourceSets,
		members: &ScopeMembers,
	) -> PageResult<ContentGroup> {
		let (extension_properties, extension_functions) = split_properties_and_functions(&members.extensions)?;

		Ok(self.content_builder.content_for(dri.clone(), source_sets.clone(), |b| {
			self.divergent_block(b, "Types", &members.types, ContentKind::Classlikes);

			if self.config.separate_inherited_members {
				let (inherited_properties, properties) = partition_inherited(&members.properties);
				let (inherited_functions, functions) = partition_inherited(&members.functions);
				let (inherited_extension_properties, extension_properties) =
					partition_foreign_receivers(extension_properties, dri);
				let (inherited_extension_functions, extension_functions) =
					partition_foreign_receivers(extension_functions, dri);

				self.divergent_block(
					b,
					"Properties",
					&concat(properties, extension_properties),
					ContentKind::Properties,
				);
				self.divergent_block(
					b,
					"Inherited properties",
					&concat(inherited_properties, inherited_extension_properties),
					ContentKind::Properties,
				);
				self.divergent_block(
					b,
					"Functions",
					&concat(functions, extension_functions),
					ContentKind::Functions,
				);
				self.divergent_block(
					b,
					"Inherited functions",
					&concat(inherited_functions, inherited_extension_functions),
					ContentKind::Functions,
				);
			} else {
				self.divergent_block(
					b,
					"Properties",
					&concat(members.properties.clone(), extension_properties),
					ContentKind::Properties,
				);
				self.divergent_block(
					b,
					"Functions",
					&concat(members.functions.clone(), extension_functions),
					ContentKind::Functions,
				);
			}
		}))
	}

	/// Content of a classlike or enum entry page: cover with signatures and
	/// descriptions, then the tabbed member sections.
	pub fn content_for_classlikes_and_entries(&self, documentables: &[Documentable]) -> PageResult<ContentGroup> {
		let dri = dris_of(documentables);
		let source_sets = source_sets_of(documentables);
		let classlikes: Vec<&DClasslike> = documentables.iter().filter_map(as_classlike).collect();

		let merged_extra = classlikes
			.iter()
			.try_fold(PropertyContainer::empty(), |merged, classlike| {
				merged.merge(&classlike.common.extra)
			})?;
		let extensions = distinct_variants(
			merged_extra
				.get::<CallableExtensions>()
				.cloned()
				.unwrap_or_default(),
		);
		let cover_source_sets: SourceSets = source_sets
			.iter()
			.cloned()
			.chain(source_sets_of(&extensions))
			.collect();

		let mut members = ScopeMembers {
			extensions,
			..ScopeMembers::default()
		};
		for documentable in documentables {
			match documentable {
				Documentable::Classlike(classlike) => {
					members.types.extend(classlike.classlikes.iter().cloned().map(Documentable::from));
					members.functions.extend(classlike.functions.iter().cloned().map(Documentable::from));
					members.properties.extend(classlike.properties.iter().cloned().map(Documentable::from));
				}
				Documentable::EnumEntry(entry) => {
					members.types.extend(entry.classlikes.iter().cloned().map(Documentable::from));
					members.functions.extend(entry.functions.iter().cloned().map(Documentable::from));
					members.properties.extend(entry.properties.iter().cloned().map(Documentable::from));
				}
				_ => {}
			}
		}
		let scope = self.content_for_scope(&dri, &source_sets, &members)?;

		let constructors: Vec<Documentable> = if should_document_constructors(documentables) {
			classlikes
				.iter()
				.flat_map(|classlike| classlike.constructors.iter().cloned().map(Documentable::from))
				.collect()
		} else {
			Vec::new()
		};
		let constructors = (!constructors.is_empty()).then(|| self.content_for_constructors(&constructors));

		let entries: Vec<Documentable> = classlikes
			.iter()
			.filter(|classlike| classlike.kind == ClasslikeKind::Enum)
			.flat_map(|classlike| classlike.entries.iter().cloned().map(Documentable::from))
			.collect();
		let entries = (!entries.is_empty()).then(|| self.content_for_entries(&entries));

		let descriptions: Vec<Vec<ContentNode>> = documentables
			.iter()
			.map(|documentable| self.content_for_description(documentable))
			.collect();
		let title = page_name(documentables);

		Ok(self.content_builder.content_for(dri.clone(), source_sets.clone(), |b| {
			b.group(
				GroupOptions::new()
					.kind(ContentKind::Cover)
					.source_sets(cover_source_sets.clone()),
				|b| {
					b.cover(&title);
					b.source_set_dependent_hint(
						GroupOptions::new().dri(dri).source_sets(source_sets),
						|b| {
							for (documentable, description) in documentables.iter().zip(descriptions) {
								b.signature(documentable);
								b.extend(description);
							}
						},
					);
				},
			);

			let extra = b.main_extra().clone();
			b.group(
				GroupOptions::new()
					.styles(BTreeSet::from([Style::TabbedContent]))
					.source_sets(cover_source_sets)
					.extra(extra),
				|b| {
					if let Some(constructors) = constructors {
						b.push(constructors.into_node());
					}
					if let Some(entries) = entries {
						b.push(entries.into_node());
					}
					b.push(scope.into_node());
				},
			);
		}))
	}

	pub fn content_for_constructors(&self, constructors: &[Documentable]) -> ContentGroup {
		let groups = named_groups(constructors);
		let options = BlockOptions::new(source_sets_of(constructors))
			.anchored(true)
			.extra(PropertyContainer::of::<TabbedContentTypeExtra>(TabbedContentType::Constructor));

		self.content_builder
			.content_for(dris_of(constructors), source_sets_of(constructors), |b| {
				b.multi_block(
					"Constructors",
					2,
					ContentKind::Constructors,
					&groups,
					&options,
					|b, key, group| {
						let Some(first) = group.first() else {
							return;
						};
						b.link_with(
							first.dri(),
							GroupOptions::new()
								.kind(ContentKind::Main)
								.styles(BTreeSet::from([Style::RowTitle])),
							|link| link.text(key, ContentKind::Main),
						);
						b.source_set_dependent_hint(
							GroupOptions::new()
								.dri(dris_of(group))
								.source_sets(source_sets_of(group))
								.styles(BTreeSet::new())
								.extra(PropertyContainer::empty()),
							|b| {
								for constructor in group {
									b.signature(constructor);
									brief(b, constructor);
								}
							},
						);
					},
				);
			})
	}

	/// Enum entries in declaration order.
	pub fn content_for_entries(&self, entries: &[Documentable]) -> ContentGroup {
		let groups = named_groups(entries);
		let options = BlockOptions::new(source_sets_of(entries))
			.sorted(false)
			.anchored(true)
			.extra(PropertyContainer::of::<TabbedContentTypeExtra>(TabbedContentType::Entry));

		self.content_builder
			.content_for(dris_of(entries), source_sets_of(entries), |b| {
				b.multi_block(
					"Entries",
					2,
					ContentKind::Classlikes,
					&groups,
					&options,
					|b, key, group| {
						let Some(first) = group.first() else {
							return;
						};
						b.link(key, first.dri(), ContentKind::Main);
						b.source_set_dependent_hint(
							GroupOptions::new()
								.dri(dris_of(group))
								.source_sets(source_sets_of(group))
								.styles(BTreeSet::new())
								.extra(PropertyContainer::empty()),
							|b| {
								for entry in group {
									b.signature(entry);
									brief(b, entry);
								}
							},
						);
					},
				);
			})
	}

	/// Content of a function or property page: one divergent instance per
	/// variant with its signature and full description.
	pub fn content_for_members(&self, documentables: &[Documentable]) -> ContentGroup {
		let descriptions: Vec<Vec<ContentNode>> = documentables
			.iter()
			.map(|documentable| self.content_for_description(documentable))
			.collect();
		let title = page_name(documentables);

		self.content_builder
			.content_for(dris_of(documentables), source_sets_of(documentables), |b| {
				b.group(GroupOptions::new().kind(ContentKind::Cover), |b| b.cover(&title));
				b.divergent_group(
					GroupId("member".to_string()),
					GroupOptions::new(),
					true,
					|group| {
						for (documentable, description) in documentables.iter().zip(descriptions) {
							group.instance(
								BTreeSet::from([documentable.dri()]),
								documentable.source_sets(),
								PropertyContainer::empty(),
								|instance| {
									instance.divergent(GroupOptions::new(), |b| b.signature(documentable));
									instance.after(GroupOptions::new(), |b| b.extend(description));
								},
							);
						}
					},
				);
			})
	}

	/// A titled table with one divergent row per `(name, is_extension)`
	/// group. Nothing is emitted for an empty collection.
	fn divergent_block(
		&self,
		b: &mut DocumentableContentBuilder<'_>,
		name: &str,
		collection: &[Documentable],
		kind: ContentKind,
	) {
		if collection.is_empty() {
			return;
		}

		let only_extensions = collection.iter().all(Documentable::is_extension);
		let has_functions = collection
			.iter()
			.any(|documentable| matches!(documentable, Documentable::Function(_)));
		let extra = b.main_extra().clone();
		let section_extra = match (kind, only_extensions) {
			(ContentKind::Functions, true) => {
				extra
					.clone()
					.with::<TabbedContentTypeExtra>(TabbedContentType::ExtensionFunction)
			}
			(ContentKind::Functions, false) => {
				extra.clone().with::<TabbedContentTypeExtra>(TabbedContentType::Function)
			}
			(ContentKind::Properties, true) => {
				extra
					.clone()
					.with::<TabbedContentTypeExtra>(TabbedContentType::ExtensionProperty)
			}
			(ContentKind::Properties, false) => {
				extra.clone().with::<TabbedContentTypeExtra>(TabbedContentType::Property)
			}
			(ContentKind::Classlikes, _) => extra.clone().with::<TabbedContentTypeExtra>(TabbedContentType::Type),
			_ => extra.clone(),
		};

		b.group(GroupOptions::new().extra(section_extra), |b| {
			b.header_with(
				2,
				name,
				GroupOptions::new().kind(kind).extra(extra.clone()),
				|_| {},
			);
			b.table(
				GroupOptions::new()
					.kind(kind)
					.styles(BTreeSet::new())
					.extra(extra.clone()),
				|table| {
					table.header(|header| {
						header.group(GroupOptions::new(), |cell| cell.text("Name", ContentKind::Main));
						header.group(GroupOptions::new(), |cell| cell.text("Summary", ContentKind::Main));
					});

					for (key, elements) in group_and_sort_divergent_collection(collection) {
						let Some(first) = elements.first() else {
							continue;
						};
						let row_kind = if key.is_extension {
							ContentKind::Extensions
						} else {
							kind
						};
						let mut row_extra = if key.is_extension {
							let tab = if has_functions {
								TabbedContentType::ExtensionFunction
							} else {
								TabbedContentType::ExtensionProperty
							};
							extra.clone().with::<TabbedContentTypeExtra>(tab)
						} else {
							extra.clone()
						};
						if let Some(anchor_name) = &key.name {
							row_extra = row_extra.with::<SymbolAnchorHint>(SymbolAnchor {
								anchor_name: anchor_name.clone(),
								content_kind: kind,
							});
						}

						let row_name = key.name.clone().unwrap_or_default();
						let row_dri = dris_of(&elements);
						let row_source_sets = source_sets_of(&elements);
						table.row(
							GroupOptions::new()
								.dri(row_dri.clone())
								.source_sets(row_source_sets.clone())
								.kind(row_kind)
								.styles(BTreeSet::new())
								.extra(row_extra),
							|row| {
								row.link_with(
									first.dri(),
									GroupOptions::new()
										.kind(row_kind)
										.styles(BTreeSet::from([Style::RowTitle]))
										.source_sets(row_source_sets)
										.extra(extra.clone()),
									|link| link.text(row_name.as_str(), row_kind),
								);
								row.divergent_group(
									GroupId(row_name.clone()),
									GroupOptions::new()
										.dri(row_dri)
										.kind(row_kind)
										.extra(extra.clone()),
									true,
									|group| {
										for element in &elements {
											let anchor = SymbolAnchor {
												anchor_name: element.name().unwrap_or_default().to_string(),
												content_kind: row_kind,
											};
											group.instance(
												BTreeSet::from([element.dri()]),
												element.source_sets(),
												PropertyContainer::of::<SymbolAnchorHint>(anchor),
												|instance| {
													instance.divergent(
														GroupOptions::new().extra(PropertyContainer::empty()),
														|b| {
															b.group(GroupOptions::new(), |b| b.signature(element));
														},
													);
													instance.after(
														GroupOptions::new().extra(PropertyContainer::empty()),
														|b| {
															brief(b, element);
															custom_tags_brief(b, element, &self.custom_tag_providers);
														},
													);
												},
											);
										}
									},
								);
							},
						);
					}
				},
			);
		});
	}
}

fn as_classlike(documentable: &Documentable) -> Option<&DClasslike> {
	match documentable {
		Documentable::Classlike(classlike) => Some(classlike),
		_ => None,
	}
}

fn page_name(documentables: &[Documentable]) -> String {
	documentables
		.first()
		.map(Documentable::name_after_clash)
		.unwrap_or_default()
}

/// Annotation classes have no constructors worth documenting.
fn should_document_constructors(documentables: &[Documentable]) -> bool {
	!documentables.iter().any(|documentable| {
		matches!(
			documentable,
			Documentable::Classlike(DClasslike {
				kind: ClasslikeKind::Annotation,
				..
			})
		)
	})
}

/// Separate `actual typealias` declarations that implement an `expect`
/// class from the other types. Returns `(types, actual_aliases)`.
fn split_actual_type_aliases(types: Vec<Documentable>) -> (Vec<Documentable>, Vec<Documentable>) {
	let expect_classes: BTreeSet<Dri> = types
		.iter()
		.filter_map(|documentable| {
			match documentable {
				Documentable::Classlike(classlike) if classlike.expect_present_in_set.is_some() => {
					Some(classlike.common.dri.clone())
				}
				_ => None,
			}
		})
		.collect();

	types.into_iter().partition(|documentable| {
		!(matches!(documentable, Documentable::TypeAlias(_)) && expect_classes.contains(&documentable.dri()))
	})
}

/// Add every actual type alias to the page group of the class it
/// implements.
fn fold_actual_type_aliases(
	mut groups: Vec<Vec<Documentable>>,
	aliases: Vec<Documentable>,
) -> Vec<Vec<Documentable>> {
	for alias in aliases {
		let dri = alias.dri();
		let target = groups.iter_mut().find(|group| {
			group.iter().any(|documentable| {
				matches!(documentable, Documentable::Classlike(_)) && documentable.dri() == dri
			})
		});
		match target {
			Some(group) => group.push(alias),
			None => groups.push(vec![alias]),
		}
	}
	groups
}

/// The description shown in the package table when every source set agrees
/// or there is only one.
fn shared_package_description(package: &DPackage) -> Option<&DocTag> {
	let descriptions: Vec<Option<&DocTag>> = package
		.common
		.source_sets
		.iter()
		.map(|source_set| {
			package
				.common
				.documentation
				.get(source_set)
				.and_then(|node| node.description_tag())
				.map(TagWrapper::root)
		})
		.collect();

	let first = descriptions.first().copied().flatten()?;
	let all_same = descriptions
		.iter()
		.all(|description| description.is_some_and(|root| root == first));
	(descriptions.len() == 1 || all_same).then_some(first)
}

fn split_properties_and_functions(
	extensions: &[Documentable],
) -> PageResult<(Vec<Documentable>, Vec<Documentable>)> {
	let mut properties = Vec::new();
	let mut functions = Vec::new();
	for extension in extensions {
		match extension {
			Documentable::Property(_) => properties.push(extension.clone()),
			Documentable::Function(_) => functions.push(extension.clone()),
			other => {
				return Err(PageError::UnexpectedDocumentable {
					expected: "properties or functions".to_string(),
					found: other.kind_name().to_string(),
					dri: other.dri().to_string(),
				});
			}
		}
	}
	Ok((properties, functions))
}

/// Returns `(inherited, declared)`.
fn partition_inherited(members: &[Documentable]) -> (Vec<Documentable>, Vec<Documentable>) {
	members.iter().cloned().partition(Documentable::is_inherited)
}

/// Extensions on a type outside `scope` count as inherited. Returns
/// `(inherited, declared)`.
fn partition_foreign_receivers(
	extensions: Vec<Documentable>,
	scope: &BTreeSet<Dri>,
) -> (Vec<Documentable>, Vec<Documentable>) {
	extensions.into_iter().partition(|extension| {
		let receiver = extension
			.receiver()
			.and_then(|receiver| receiver.type_ref.dri.as_ref());
		!receiver.is_some_and(|dri| scope.contains(dri))
	})
}

/// Drop repeated `(dri, source sets)` variants, keeping the first.
fn distinct_variants(documentables: Vec<Documentable>) -> Vec<Documentable> {
	let mut distinct: Vec<Documentable> = Vec::with_capacity(documentables.len());
	for documentable in documentables {
		let seen = distinct.iter().any(|existing| {
			existing.dri() == documentable.dri() && existing.source_sets() == documentable.source_sets()
		});
		if !seen {
			distinct.push(documentable);
		}
	}
	distinct
}

/// Constructors and entries grouped by name for a multi block.
fn named_groups(documentables: &[Documentable]) -> Vec<(String, Vec<Documentable>)> {
	group_by_first_seen(documentables.to_vec(), |documentable| {
		documentable.name().map(ToString::to_string)
	})
	.into_iter()
	.filter_map(|group| {
		let name = group.first()?.name_after_clash();
		Some((name, group))
	})
	.collect()
}

fn concat(mut left: Vec<Documentable>, right: Vec<Documentable>) -> Vec<Documentable> {
	left.extend(right);
	left
}
