use std::any::Any;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::PageError;
use crate::PageResult;

/// What to do when both sides of a merge carry the same extra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStrategy<V> {
	/// Keep this value in the merged container.
	Replace(V),
	/// Drop the extra from the merged container.
	Remove,
	/// The two values cannot be unified.
	Fail,
}

/// A capability token for one kind of extra property.
///
/// The implementing type is only used as a key; the stored data is
/// [`ExtraKey::Value`]. Each key decides how two values are unified when
/// source-set variants of a declaration are merged.
pub trait ExtraKey: 'static {
	type Value: Clone + Debug + PartialEq + Send + Sync + 'static;

	/// Stable name used in diagnostics and debug output.
	const NAME: &'static str;

	fn merge(_left: &Self::Value, _right: &Self::Value) -> MergeStrategy<Self::Value> {
		MergeStrategy::Fail
	}
}

trait ErasedExtra: Send + Sync {
	fn name(&self) -> &'static str;
	fn as_any(&self) -> &dyn Any;
	fn clone_box(&self) -> Box<dyn ErasedExtra>;
	fn eq_dyn(&self, other: &dyn ErasedExtra) -> bool;
	fn fmt_value(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result;
	fn merge_dyn(&self, other: &dyn ErasedExtra) -> MergeStrategy<Box<dyn ErasedExtra>>;
}

struct Slot<K: ExtraKey> {
	value: K::Value,
	_key: PhantomData<fn() -> K>,
}

impl<K: ExtraKey> Slot<K> {
	fn new(value: K::Value) -> Self {
		Self {
			value,
			_key: PhantomData,
		}
	}
}

impl<K: ExtraKey> ErasedExtra for Slot<K> {
	fn name(&self) -> &'static str {
		K::NAME
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn clone_box(&self) -> Box<dyn ErasedExtra> {
		Box::new(Slot::<K>::new(self.value.clone()))
	}

	fn eq_dyn(&self, other: &dyn ErasedExtra) -> bool {
		other
			.as_any()
			.downcast_ref::<Slot<K>>()
			.is_some_and(|other| other.value == self.value)
	}

	fn fmt_value(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		Debug::fmt(&self.value, f)
	}

	fn merge_dyn(&self, other: &dyn ErasedExtra) -> MergeStrategy<Box<dyn ErasedExtra>> {
		let Some(other) = other.as_any().downcast_ref::<Slot<K>>() else {
			return MergeStrategy::Fail;
		};

		match K::merge(&self.value, &other.value) {
			MergeStrategy::Replace(value) => MergeStrategy::Replace(Box::new(Slot::<K>::new(value))),
			MergeStrategy::Remove => MergeStrategy::Remove,
			MergeStrategy::Fail => MergeStrategy::Fail,
		}
	}
}

/// Typed heterogeneous map of extra properties.
///
/// Used on documentables and content nodes to carry cross-cutting metadata
/// (inheritance, modifiers, renderer hints) without widening every struct.
#[derive(Default)]
pub struct PropertyContainer {
	entries: BTreeMap<TypeId, Box<dyn ErasedExtra>>,
}

impl PropertyContainer {
	pub fn empty() -> Self {
		Self::default()
	}

	/// A container holding a single extra.
	pub fn of<K: ExtraKey>(value: K::Value) -> Self {
		Self::empty().with::<K>(value)
	}

	/// Add or replace the extra for `K`.
	#[must_use]
	pub fn with<K: ExtraKey>(mut self, value: K::Value) -> Self {
		self.insert::<K>(value);
		self
	}

	pub fn insert<K: ExtraKey>(&mut self, value: K::Value) {
		self.entries
			.insert(TypeId::of::<K>(), Box::new(Slot::<K>::new(value)));
	}

	pub fn get<K: ExtraKey>(&self) -> Option<&K::Value> {
		self.entries
			.get(&TypeId::of::<K>())
			.and_then(|slot| slot.as_any().downcast_ref::<Slot<K>>())
			.map(|slot| &slot.value)
	}

	pub fn contains<K: ExtraKey>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<K>())
	}

	#[must_use]
	pub fn without<K: ExtraKey>(mut self) -> Self {
		self.entries.remove(&TypeId::of::<K>());
		self
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Names of the stored extras in sorted order.
	pub fn names(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.entries.values().map(|slot| slot.name()).collect();
		names.sort_unstable();
		names
	}

	/// Overlay `other` onto `self`. Values in `other` win without consulting
	/// the merge strategy.
	#[must_use]
	pub fn plus(mut self, other: &PropertyContainer) -> Self {
		for (id, slot) in &other.entries {
			self.entries.insert(*id, slot.clone_box());
		}
		self
	}

	/// Unify two containers of source-set variants of one declaration.
	///
	/// Keys present on one side only are kept as they are. Keys present on
	/// both sides are resolved through [`ExtraKey::merge`].
	pub fn merge(&self, other: &PropertyContainer) -> PageResult<PropertyContainer> {
		let mut merged = self.clone();

		for (id, right) in &other.entries {
			let Some(left) = self.entries.get(id) else {
				merged.entries.insert(*id, right.clone_box());
				continue;
			};

			match left.merge_dyn(right.as_ref()) {
				MergeStrategy::Replace(slot) => {
					merged.entries.insert(*id, slot);
				}
				MergeStrategy::Remove => {
					merged.entries.remove(id);
				}
				MergeStrategy::Fail => {
					return Err(PageError::ExtraMergeConflict {
						key: left.name().to_string(),
					});
				}
			}
		}

		Ok(merged)
	}
}

impl Clone for PropertyContainer {
	fn clone(&self) -> Self {
		Self {
			entries: self
				.entries
				.iter()
				.map(|(id, slot)| (*id, slot.clone_box()))
				.collect(),
		}
	}
}

impl PartialEq for PropertyContainer {
	fn eq(&self, other: &Self) -> bool {
		self.entries.len() == other.entries.len()
			&& self.entries.iter().all(|(id, slot)| {
				other
					.entries
					.get(id)
					.is_some_and(|other| slot.eq_dyn(other.as_ref()))
			})
	}
}

impl Eq for PropertyContainer {}

impl Debug for PropertyContainer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		struct Value<'a>(&'a dyn ErasedExtra);

		impl Debug for Value<'_> {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				self.0.fmt_value(f)
			}
		}

		let mut slots: Vec<&dyn ErasedExtra> = self.entries.values().map(|slot| slot.as_ref()).collect();
		slots.sort_by_key(|slot| slot.name());

		f.debug_map()
			.entries(slots.into_iter().map(|slot| (slot.name(), Value(slot))))
			.finish()
	}
}
