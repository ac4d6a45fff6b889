use std::cmp::Ordering;

use crate::Callable;
use crate::Documentable;
use crate::group_by_first_seen_keyed;

/// Row key of a divergent table: members and extensions with the same name
/// are listed separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameAndIsExtension {
	pub name: Option<String>,
	pub is_extension: bool,
}

/// Case-insensitive order with the exact spelling as the tie-break, so that
/// `a`, `B`, `b` always come out as `a`, `B`, `b`.
pub fn canonical_alphabetical_order(left: &str, right: &str) -> Ordering {
	left.to_lowercase()
		.cmp(&right.to_lowercase())
		.then_with(|| left.cmp(right))
}

fn compare_group_keys(left: &NameAndIsExtension, right: &NameAndIsExtension) -> Ordering {
	let names = match (&left.name, &right.name) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(left), Some(right)) => canonical_alphabetical_order(left, right),
	};
	names.then_with(|| left.is_extension.cmp(&right.is_extension))
}

fn compare_callables(left: Option<&Callable>, right: Option<&Callable>) -> Ordering {
	match (left, right) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Greater,
		(Some(_), None) => Ordering::Less,
		(Some(left), Some(right)) => {
			left.params
				.len()
				.cmp(&right.params.len())
				.then_with(|| left.signature().cmp(&right.signature()))
		}
	}
}

/// Order of the variants inside one divergent row: package (absent last),
/// class chain (absent first), callable (absent last, by parameter count
/// then signature).
pub fn compare_divergent_elements(left: &Documentable, right: &Documentable) -> Ordering {
	let left = left.dri();
	let right = right.dri();

	let packages = match (&left.package_name, &right.package_name) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Greater,
		(Some(_), None) => Ordering::Less,
		(Some(l), Some(r)) => l.cmp(r),
	};

	packages
		.then_with(|| left.class_names.cmp(&right.class_names))
		.then_with(|| compare_callables(left.callable.as_ref(), right.callable.as_ref()))
}

/// Sort the variants of one row. The sort is stable and has no hidden
/// tie-break: elements equal under [`compare_divergent_elements`] keep their
/// relative input order.
pub fn sort_divergent_elements_deterministically(mut elements: Vec<Documentable>) -> Vec<Documentable> {
	if elements.len() > 1 {
		elements.sort_by(compare_divergent_elements);
	}
	elements
}

/// Split a section's declarations into table rows.
///
/// Rows are keyed by `(name, is_extension)` and ordered by name (absent
/// first, canonical alphabetical order) with members before extensions.
/// Type aliases are dropped from rows that also hold a classlike, and
/// repeated `(dri, source sets)` pairs are kept once. The variants of each
/// row are sorted with [`sort_divergent_elements_deterministically`].
pub fn group_and_sort_divergent_collection(
	collection: &[Documentable],
) -> Vec<(NameAndIsExtension, Vec<Documentable>)> {
	let groups = group_by_first_seen_keyed(collection.to_vec(), |documentable| {
		NameAndIsExtension {
			name: documentable.name().map(ToString::to_string),
			is_extension: documentable.is_extension(),
		}
	});

	let mut groups: Vec<_> = groups
		.into_iter()
		.map(|(key, elements)| {
			let has_classlike = elements
				.iter()
				.any(|element| matches!(element, Documentable::Classlike(_)));
			let mut unique: Vec<Documentable> = Vec::with_capacity(elements.len());
			for element in elements {
				if has_classlike && matches!(element, Documentable::TypeAlias(_)) {
					continue;
				}
				let duplicate = unique.iter().any(|seen| {
					seen.dri() == element.dri() && seen.source_sets() == element.source_sets()
				});
				if !duplicate {
					unique.push(element);
				}
			}
			(key, sort_divergent_elements_deterministically(unique))
		})
		.collect();

	groups.sort_by(|left, right| compare_group_keys(&left.0, &right.0));
	groups
}
