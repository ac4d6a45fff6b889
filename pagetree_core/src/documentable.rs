use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Display;

use indexmap::IndexSet;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::Dri;
use crate::DocumentationNode;
use crate::ExtraKey;
use crate::MergeStrategy;
use crate::PropertyContainer;
use crate::SourceSet;
use crate::SourceSetDependent;
use crate::SourceSetId;
use crate::SourceSets;

/// Declaration visibility as written in source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
	#[default]
	Public,
	Protected,
	Internal,
	Private,
}

impl Visibility {
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Protected => "protected",
			Self::Internal => "internal",
			Self::Private => "private",
		}
	}
}

/// A type occurrence in a signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
	/// Where the type is declared, if it could be resolved.
	#[serde(default)]
	pub dri: Option<Dri>,
	/// Fully qualified name split on `.`, e.g. `["kotlin", "String"]`.
	#[serde(default)]
	pub path_segments: Vec<String>,
	#[serde(default)]
	pub arguments: Vec<TypeRef>,
	#[serde(default)]
	pub nullable: bool,
	#[serde(default)]
	pub function: Option<FunctionType>,
}

/// Marks a [`TypeRef`] as a function type. The last type argument is the
/// return type; when `has_receiver` is set the first argument is the
/// receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
	#[serde(default)]
	pub has_receiver: bool,
}

impl TypeRef {
	/// A resolved type with a link target.
	pub fn resolved(dri: Dri, qualified_name: &str) -> Self {
		Self {
			dri: Some(dri),
			path_segments: qualified_name.split('.').map(ToString::to_string).collect(),
			..Self::default()
		}
	}

	/// A type whose name is known but whose declaration could not be found.
	pub fn unresolved(qualified_name: &str) -> Self {
		Self {
			path_segments: qualified_name.split('.').map(ToString::to_string).collect(),
			..Self::default()
		}
	}

	/// `kotlin.Unit`.
	pub fn unit() -> Self {
		Self::resolved(Dri::new("kotlin", "Unit"), "kotlin.Unit")
	}

	/// A function type `(arguments) -> returns`.
	pub fn function(mut arguments: Vec<TypeRef>, returns: TypeRef) -> Self {
		arguments.push(returns);
		Self {
			dri: Some(Dri::new("kotlin", format!("Function{}", arguments.len() - 1))),
			path_segments: vec!["kotlin".into(), format!("Function{}", arguments.len() - 1)],
			arguments,
			nullable: false,
			function: Some(FunctionType::default()),
		}
	}

	#[must_use]
	pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
		self.arguments = arguments;
		self
	}

	#[must_use]
	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	/// The simple name, e.g. `String` for `kotlin.String`.
	pub fn simple_name(&self) -> Option<&str> {
		self.path_segments.last().map(String::as_str)
	}

	pub fn qualified_name(&self) -> String {
		self.path_segments.join(".")
	}

	pub fn is_function_type(&self) -> bool {
		self.function.is_some() && !self.arguments.is_empty()
	}

	/// Unit and void return types are omitted from signatures.
	pub fn is_unit(&self) -> bool {
		!self.nullable && matches!(self.qualified_name().as_str(), "kotlin.Unit" | "void")
	}
}

impl Display for TypeRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.qualified_name())?;
		if !self.arguments.is_empty() {
			let arguments = self
				.arguments
				.iter()
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", ");
			write!(f, "<{arguments}>")?;
		}
		if self.nullable {
			write!(f, "?")?;
		}
		Ok(())
	}
}

/// A function parameter or receiver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DParameter {
	pub dri: Dri,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub type_ref: TypeRef,
}

impl DParameter {
	pub fn new(dri: Dri, name: impl Into<String>, type_ref: TypeRef) -> Self {
		Self {
			dri,
			name: Some(name.into()),
			type_ref,
		}
	}

	/// A receiver parameter has no name.
	pub fn receiver(dri: Dri, type_ref: TypeRef) -> Self {
		Self {
			dri,
			name: None,
			type_ref,
		}
	}
}

/// Fields shared by every documentable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentableCommon {
	pub dri: Dri,
	#[serde(default)]
	pub name: Option<String>,
	/// Source sets this declaration is defined in.
	#[serde(default)]
	pub source_sets: SourceSets,
	#[serde(default)]
	pub documentation: SourceSetDependent<DocumentationNode>,
	#[serde(default)]
	pub extra: PropertyContainer,
}

impl DocumentableCommon {
	pub fn new(dri: Dri, name: Option<&str>, source_sets: &SourceSets) -> Self {
		Self {
			dri,
			name: name.map(ToString::to_string),
			source_sets: source_sets.clone(),
			documentation: SourceSetDependent::default(),
			extra: PropertyContainer::empty(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DModule {
	pub name: String,
	#[serde(default)]
	pub packages: Vec<DPackage>,
	/// Every source set of the module with its display name and platform.
	#[serde(default)]
	pub source_sets: Vec<SourceSet>,
	#[serde(default)]
	pub documentation: SourceSetDependent<DocumentationNode>,
}

impl DModule {
	pub fn source_set_ids(&self) -> SourceSets {
		self.source_sets.iter().map(|source_set| source_set.id.clone()).collect()
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DPackage {
	#[serde(flatten)]
	pub common: DocumentableCommon,
	#[serde(default)]
	pub classlikes: Vec<DClasslike>,
	#[serde(default)]
	pub typealiases: Vec<DTypeAlias>,
	#[serde(default)]
	pub functions: Vec<DFunction>,
	#[serde(default)]
	pub properties: Vec<DProperty>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClasslikeKind {
	#[default]
	Class,
	Interface,
	Object,
	Enum,
	Annotation,
}

impl ClasslikeKind {
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Class => "class",
			Self::Interface => "interface",
			Self::Object => "object",
			Self::Enum => "enum class",
			Self::Annotation => "annotation class",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DClasslike {
	#[serde(flatten)]
	pub common: DocumentableCommon,
	#[serde(default)]
	pub kind: ClasslikeKind,
	#[serde(default)]
	pub visibility: SourceSetDependent<Visibility>,
	#[serde(default)]
	pub constructors: Vec<DFunction>,
	#[serde(default)]
	pub functions: Vec<DFunction>,
	#[serde(default)]
	pub properties: Vec<DProperty>,
	#[serde(default)]
	pub classlikes: Vec<DClasslike>,
	/// Only populated for [`ClasslikeKind::Enum`], in declaration order.
	#[serde(default)]
	pub entries: Vec<DEnumEntry>,
	#[serde(default)]
	pub supertypes: Vec<TypeRef>,
	/// The source set holding the `expect` declaration, if any.
	#[serde(default)]
	pub expect_present_in_set: Option<SourceSetId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DEnumEntry {
	#[serde(flatten)]
	pub common: DocumentableCommon,
	#[serde(default)]
	pub functions: Vec<DFunction>,
	#[serde(default)]
	pub properties: Vec<DProperty>,
	#[serde(default)]
	pub classlikes: Vec<DClasslike>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DFunction {
	#[serde(flatten)]
	pub common: DocumentableCommon,
	#[serde(default)]
	pub is_constructor: bool,
	#[serde(default)]
	pub parameters: Vec<DParameter>,
	#[serde(default)]
	pub receiver: Option<DParameter>,
	#[serde(default)]
	pub return_type: Option<TypeRef>,
	#[serde(default)]
	pub visibility: SourceSetDependent<Visibility>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DProperty {
	#[serde(flatten)]
	pub common: DocumentableCommon,
	#[serde(default)]
	pub receiver: Option<DParameter>,
	#[serde(rename = "type")]
	pub type_ref: TypeRef,
	#[serde(default)]
	pub is_var: bool,
	#[serde(default)]
	pub visibility: SourceSetDependent<Visibility>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DTypeAlias {
	#[serde(flatten)]
	pub common: DocumentableCommon,
	#[serde(default)]
	pub underlying_type: SourceSetDependent<TypeRef>,
	#[serde(default)]
	pub visibility: SourceSetDependent<Visibility>,
}

/// Any node of the declaration hierarchy.
///
/// Page building matches exhaustively on this enum so that adding a kind is
/// a compile error everywhere it needs handling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "documentable", rename_all = "snake_case")]
pub enum Documentable {
	Module(DModule),
	Package(DPackage),
	Classlike(DClasslike),
	TypeAlias(DTypeAlias),
	Function(DFunction),
	Property(DProperty),
	EnumEntry(DEnumEntry),
}

impl Documentable {
	/// The shared fields. Modules have none and return `None`.
	pub fn common(&self) -> Option<&DocumentableCommon> {
		match self {
			Self::Module(_) => None,
			Self::Package(p) => Some(&p.common),
			Self::Classlike(c) => Some(&c.common),
			Self::TypeAlias(t) => Some(&t.common),
			Self::Function(f) => Some(&f.common),
			Self::Property(p) => Some(&p.common),
			Self::EnumEntry(e) => Some(&e.common),
		}
	}

	fn common_mut(&mut self) -> Option<&mut DocumentableCommon> {
		match self {
			Self::Module(_) => None,
			Self::Package(p) => Some(&mut p.common),
			Self::Classlike(c) => Some(&mut c.common),
			Self::TypeAlias(t) => Some(&mut t.common),
			Self::Function(f) => Some(&mut f.common),
			Self::Property(p) => Some(&mut p.common),
			Self::EnumEntry(e) => Some(&mut e.common),
		}
	}

	pub fn dri(&self) -> Dri {
		self.common()
			.map_or_else(Dri::top_level, |common| common.dri.clone())
	}

	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Module(m) => Some(m.name.as_str()),
			_ => self.common().and_then(|common| common.name.as_deref()),
		}
	}

	pub fn source_sets(&self) -> SourceSets {
		match self {
			Self::Module(m) => m.source_set_ids(),
			_ => self
				.common()
				.map(|common| common.source_sets.clone())
				.unwrap_or_default(),
		}
	}

	pub fn documentation(&self) -> Option<&SourceSetDependent<DocumentationNode>> {
		match self {
			Self::Module(m) => Some(&m.documentation),
			_ => self.common().map(|common| &common.documentation),
		}
	}

	pub fn extra(&self) -> Option<&PropertyContainer> {
		self.common().map(|common| &common.extra)
	}

	/// Attach an extra, replacing any previous value for `K`.
	#[must_use]
	pub fn with_extra<K: ExtraKey>(mut self, value: K::Value) -> Self {
		if let Some(common) = self.common_mut() {
			common.extra.insert::<K>(value);
		}
		self
	}

	pub fn receiver(&self) -> Option<&DParameter> {
		match self {
			Self::Function(f) => f.receiver.as_ref(),
			Self::Property(p) => p.receiver.as_ref(),
			_ => None,
		}
	}

	/// Extension functions and properties have a receiver.
	pub fn is_extension(&self) -> bool {
		self.receiver().is_some()
	}

	/// Inherited from a supertype in every source set it is defined in.
	pub fn is_inherited(&self) -> bool {
		let Some(inherited) = self.extra().and_then(PropertyContainer::get::<InheritedMember>) else {
			return false;
		};
		let source_sets = self.source_sets();
		!source_sets.is_empty()
			&& source_sets
				.iter()
				.all(|source_set| matches!(inherited.get(source_set), Some(Some(_))))
	}

	/// The name shown on the page, including any clash disambiguation.
	pub fn name_after_clash(&self) -> String {
		self.extra()
			.and_then(PropertyContainer::get::<DriClashAwareName>)
			.cloned()
			.or_else(|| self.name().map(ToString::to_string))
			.unwrap_or_default()
	}

	/// `package.Class` when the declaration has a class chain, otherwise the
	/// plain name.
	pub fn qualified_name(&self) -> Option<String> {
		let dri = self.dri();
		let class_name = dri
			.class_names
			.clone()
			.filter(|names| !names.trim().is_empty())
			.or_else(|| self.name().map(ToString::to_string))?;
		match dri.package_name.filter(|name| !name.trim().is_empty()) {
			Some(package) => Some(format!("{package}.{class_name}")),
			None => Some(class_name),
		}
	}

	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Module(_) => "module",
			Self::Package(_) => "package",
			Self::Classlike(_) => "classlike",
			Self::TypeAlias(_) => "type alias",
			Self::Function(_) => "function",
			Self::Property(_) => "property",
			Self::EnumEntry(_) => "enum entry",
		}
	}
}

impl From<DPackage> for Documentable {
	fn from(value: DPackage) -> Self {
		Self::Package(value)
	}
}

impl From<DClasslike> for Documentable {
	fn from(value: DClasslike) -> Self {
		Self::Classlike(value)
	}
}

impl From<DTypeAlias> for Documentable {
	fn from(value: DTypeAlias) -> Self {
		Self::TypeAlias(value)
	}
}

impl From<DFunction> for Documentable {
	fn from(value: DFunction) -> Self {
		Self::Function(value)
	}
}

impl From<DProperty> for Documentable {
	fn from(value: DProperty) -> Self {
		Self::Property(value)
	}
}

impl From<DEnumEntry> for Documentable {
	fn from(value: DEnumEntry) -> Self {
		Self::EnumEntry(value)
	}
}

/// The set of distinct DRIs of a documentable list.
pub fn dris_of<'a>(documentables: impl IntoIterator<Item = &'a Documentable>) -> BTreeSet<Dri> {
	documentables.into_iter().map(Documentable::dri).collect()
}

/// The union of source sets of a documentable list.
pub fn source_sets_of<'a>(documentables: impl IntoIterator<Item = &'a Documentable>) -> SourceSets {
	documentables
		.into_iter()
		.flat_map(Documentable::source_sets)
		.collect()
}

/// Name computed by clash resolution. Never merged: two variants carrying
/// different disambiguated names indicate a broken merge.
pub struct DriClashAwareName;

impl ExtraKey for DriClashAwareName {
	type Value = String;

	const NAME: &'static str = "DriClashAwareName";
}

/// Context markers that tell clashing declarations apart, e.g. the display
/// names of the source sets they are declared in. Markers keep the order
/// they were declared in and appear once.
pub struct ClashingDriIdentifier;

impl ExtraKey for ClashingDriIdentifier {
	type Value = IndexSet<String>;

	const NAME: &'static str = "ClashingDriIdentifier";

	fn merge(left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		MergeStrategy::Replace(left.union(right).cloned().collect())
	}
}

/// Per source set, the supertype a member was inherited from. `None` means
/// the member is declared directly in that source set.
pub struct InheritedMember;

impl ExtraKey for InheritedMember {
	type Value = SourceSetDependent<Option<Dri>>;

	const NAME: &'static str = "InheritedMember";

	fn merge(left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		let mut merged = left.clone();
		for (source_set, from) in right {
			merged.insert(source_set.clone(), from.clone());
		}
		MergeStrategy::Replace(merged)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraModifier {
	Abstract,
	Open,
	Sealed,
	Data,
	Value,
	Inline,
	Suspend,
	Operator,
	Infix,
	Override,
	External,
	Const,
	Lateinit,
}

impl ExtraModifier {
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Abstract => "abstract",
			Self::Open => "open",
			Self::Sealed => "sealed",
			Self::Data => "data",
			Self::Value => "value",
			Self::Inline => "inline",
			Self::Suspend => "suspend",
			Self::Operator => "operator",
			Self::Infix => "infix",
			Self::Override => "override",
			Self::External => "external",
			Self::Const => "const",
			Self::Lateinit => "lateinit",
		}
	}
}

/// Modifiers beyond visibility. Unioned on merge.
pub struct AdditionalModifiers;

impl ExtraKey for AdditionalModifiers {
	type Value = SourceSetDependent<BTreeSet<ExtraModifier>>;

	const NAME: &'static str = "AdditionalModifiers";

	fn merge(left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		let mut merged = left.clone();
		for (source_set, modifiers) in right {
			merged
				.entry(source_set.clone())
				.or_default()
				.extend(modifiers.iter().copied());
		}
		MergeStrategy::Replace(merged)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
	pub dri: Dri,
	#[serde(default)]
	pub params: BTreeMap<String, String>,
}

/// Annotations applied to a declaration. Concatenated on merge, keeping the
/// first occurrence of each annotation class.
pub struct Annotations;

impl ExtraKey for Annotations {
	type Value = Vec<Annotation>;

	const NAME: &'static str = "Annotations";

	fn merge(left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		let mut merged = left.clone();
		for annotation in right {
			if !merged.iter().any(|existing| existing.dri == annotation.dri) {
				merged.push(annotation.clone());
			}
		}
		MergeStrategy::Replace(merged)
	}
}

/// Extension functions and properties whose receiver is a classlike, shown
/// on that classlike's page.
pub struct CallableExtensions;

impl ExtraKey for CallableExtensions {
	type Value = Vec<Documentable>;

	const NAME: &'static str = "CallableExtensions";

	fn merge(left: &Self::Value, right: &Self::Value) -> MergeStrategy<Self::Value> {
		MergeStrategy::Replace(left.iter().chain(right).cloned().collect())
	}
}

/// The known extras that can appear in serialized input.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum DocumentableExtra {
	ClashingDriIdentifier { markers: IndexSet<String> },
	InheritedMember { inherited_from: SourceSetDependent<Option<Dri>> },
	AdditionalModifiers { modifiers: SourceSetDependent<BTreeSet<ExtraModifier>> },
	Annotations { annotations: Vec<Annotation> },
	CallableExtensions { extensions: Vec<Documentable> },
}

impl DocumentableExtra {
	fn attach(self, container: &mut PropertyContainer) {
		match self {
			Self::ClashingDriIdentifier { markers } => {
				container.insert::<ClashingDriIdentifier>(markers);
			}
			Self::InheritedMember { inherited_from } => {
				container.insert::<InheritedMember>(inherited_from);
			}
			Self::AdditionalModifiers { modifiers } => {
				container.insert::<AdditionalModifiers>(modifiers);
			}
			Self::Annotations { annotations } => container.insert::<Annotations>(annotations),
			Self::CallableExtensions { extensions } => {
				container.insert::<CallableExtensions>(extensions);
			}
		}
	}
}

impl<'de> Deserialize<'de> for PropertyContainer {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let extras = Vec::<DocumentableExtra>::deserialize(deserializer)?;
		let mut container = PropertyContainer::empty();
		for extra in extras {
			extra.attach(&mut container);
		}
		Ok(container)
	}
}
