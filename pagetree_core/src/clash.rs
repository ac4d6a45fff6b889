use std::hash::Hash;

use indexmap::IndexMap;

use crate::ClashingDriIdentifier;
use crate::Documentable;
use crate::DriClashAwareName;
use crate::PropertyContainer;
use crate::SourceSetRegistry;

/// Group `items` by `key`, keeping groups and their members in first-seen
/// order.
pub fn group_by_first_seen<T, K, F>(items: Vec<T>, key: F) -> Vec<Vec<T>>
where
	K: Eq + Hash,
	F: FnMut(&T) -> K,
{
	group_by_first_seen_keyed(items, key).into_values().collect()
}

/// Like [`group_by_first_seen`] but keeps the key of every group.
pub fn group_by_first_seen_keyed<T, K, F>(items: Vec<T>, mut key: F) -> IndexMap<K, Vec<T>>
where
	K: Eq + Hash,
	F: FnMut(&T) -> K,
{
	let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
	for item in items {
		groups.entry(key(&item)).or_default().push(item);
	}
	groups
}

/// The disambiguated name of a clashing declaration, e.g. `[JVM, JS]foo`.
///
/// Markers come from [`ClashingDriIdentifier`] and fall back to the display
/// names of the declaration's source sets.
pub fn clashed_name(documentable: &Documentable, source_sets: &SourceSetRegistry) -> String {
	let markers: Vec<String> = match documentable
		.extra()
		.and_then(PropertyContainer::get::<ClashingDriIdentifier>)
	{
		Some(markers) if !markers.is_empty() => markers.iter().cloned().collect(),
		_ => {
			documentable
				.source_sets()
				.iter()
				.map(|id| source_sets.display_name(id))
				.collect()
		}
	};

	format!("[{}]{}", markers.join(", "), documentable.name().unwrap_or_default())
}

/// Give sibling declarations that would render under the same identifier a
/// distinct [`DriClashAwareName`].
///
/// Siblings clash when their DRIs are equal once the disambiguator is
/// dropped. Declarations without a clash pass through untouched and the
/// `name` field is never changed. Output is grouped by clash key in
/// first-seen order.
pub fn rename_clashing_documentables(
	documentables: Vec<Documentable>,
	source_sets: &SourceSetRegistry,
) -> Vec<Documentable> {
	group_by_first_seen(documentables, |documentable| documentable.dri().without_extra())
		.into_iter()
		.flat_map(|group| {
			if group.len() == 1 {
				return group;
			}

			group
				.into_iter()
				.map(|documentable| {
					let name = clashed_name(&documentable, source_sets);
					documentable.with_extra::<DriClashAwareName>(name)
				})
				.collect()
		})
		.collect()
}

/// Group sibling declarations sharing a DRI; each group becomes one page
/// with divergent content.
pub fn merge_clashing_documentables(documentables: Vec<Documentable>) -> Vec<Vec<Documentable>> {
	group_by_first_seen(documentables, Documentable::dri)
}
