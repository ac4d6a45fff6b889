use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Display;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

/// Identifies one compilation target, e.g. `jvmMain` in module `app`.
///
/// Serialized as `"scope/name"` so it can be used as a JSON object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceSetId {
	pub scope_id: String,
	pub source_set_name: String,
}

impl SourceSetId {
	pub fn new(scope_id: impl Into<String>, source_set_name: impl Into<String>) -> Self {
		Self {
			scope_id: scope_id.into(),
			source_set_name: source_set_name.into(),
		}
	}
}

impl Display for SourceSetId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.scope_id, self.source_set_name)
	}
}

impl From<SourceSetId> for String {
	fn from(id: SourceSetId) -> Self {
		id.to_string()
	}
}

impl TryFrom<String> for SourceSetId {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		match value.split_once('/') {
			Some((scope_id, name)) if !scope_id.is_empty() && !name.is_empty() => {
				Ok(Self::new(scope_id, name))
			}
			_ => Err(format!("source set id `{value}` must look like `scope/name`")),
		}
	}
}

/// The analysis platform a source set is compiled for.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
	#[default]
	Common,
	Jvm,
	Js,
	Wasm,
	Native,
}

impl Platform {
	pub fn key(self) -> &'static str {
		match self {
			Self::Common => "common",
			Self::Jvm => "jvm",
			Self::Js => "js",
			Self::Wasm => "wasm",
			Self::Native => "native",
		}
	}
}

/// A platform variant that may contribute its own version of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSet {
	pub id: SourceSetId,
	/// Human readable name shown in platform hints, e.g. `JVM`.
	pub display_name: String,
	#[serde(default)]
	pub analysis_platform: Platform,
}

impl SourceSet {
	pub fn new(id: SourceSetId, display_name: impl Into<String>, platform: Platform) -> Self {
		Self {
			id,
			display_name: display_name.into(),
			analysis_platform: platform,
		}
	}
}

/// Set of source set identifiers. Ordered so that every iteration is stable.
pub type SourceSets = BTreeSet<SourceSetId>;

/// A value that differs per source set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, DerefMut, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceSetDependent<T>(
	#[deref]
	#[deref_mut]
	BTreeMap<SourceSetId, T>,
);

impl<T> Default for SourceSetDependent<T> {
	fn default() -> Self {
		Self(BTreeMap::new())
	}
}

impl<T> SourceSetDependent<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// The same value for every source set in `source_sets`.
	pub fn uniform<'a>(source_sets: impl IntoIterator<Item = &'a SourceSetId>, value: T) -> Self
	where
		T: Clone,
	{
		Self(
			source_sets
				.into_iter()
				.map(|id| (id.clone(), value.clone()))
				.collect(),
		)
	}

	#[must_use]
	pub fn with(mut self, id: SourceSetId, value: T) -> Self {
		self.0.insert(id, value);
		self
	}

	pub fn into_inner(self) -> BTreeMap<SourceSetId, T> {
		self.0
	}
}

impl<T> FromIterator<(SourceSetId, T)> for SourceSetDependent<T> {
	fn from_iter<I: IntoIterator<Item = (SourceSetId, T)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<T> IntoIterator for SourceSetDependent<T> {
	type IntoIter = std::collections::btree_map::IntoIter<SourceSetId, T>;
	type Item = (SourceSetId, T);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a SourceSetDependent<T> {
	type IntoIter = std::collections::btree_map::Iter<'a, SourceSetId, T>;
	type Item = (&'a SourceSetId, &'a T);

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// Lookup of source set details by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSetRegistry(BTreeMap<SourceSetId, SourceSet>);

impl SourceSetRegistry {
	pub fn new<'a>(source_sets: impl IntoIterator<Item = &'a SourceSet>) -> Self {
		Self(
			source_sets
				.into_iter()
				.map(|source_set| (source_set.id.clone(), source_set.clone()))
				.collect(),
		)
	}

	pub fn get(&self, id: &SourceSetId) -> Option<&SourceSet> {
		self.0.get(id)
	}

	/// The display name, or the bare source set name for unknown ids.
	pub fn display_name(&self, id: &SourceSetId) -> String {
		self.get(id).map_or_else(
			|| id.source_set_name.clone(),
			|source_set| source_set.display_name.clone(),
		)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn platform(&self, id: &SourceSetId) -> Platform {
		self.get(id)
			.map(|source_set| source_set.analysis_platform)
			.unwrap_or_default()
	}
}
