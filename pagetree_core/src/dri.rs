use std::cmp::Ordering;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// Declaration Reference Identifier.
///
/// A structured key that identifies one logical declaration across every
/// source set it appears in. Two documentables with equal `Dri`s are variants
/// of the same declaration and are merged into one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dri {
	/// Fully qualified package name, e.g. `org.example`.
	#[serde(default)]
	pub package_name: Option<String>,
	/// Dot separated chain of enclosing class names, e.g. `Outer.Inner`.
	#[serde(default)]
	pub class_names: Option<String>,
	/// The callable part for functions and properties.
	#[serde(default)]
	pub callable: Option<Callable>,
	/// Extra disambiguator used when two declarations would otherwise share
	/// the same identifier.
	#[serde(default)]
	pub extra: Option<String>,
}

impl Dri {
	pub fn new(package_name: impl Into<String>, class_names: impl Into<String>) -> Self {
		Self {
			package_name: Some(package_name.into()),
			class_names: Some(class_names.into()),
			..Self::default()
		}
	}

	/// A DRI pointing at a package.
	pub fn package(package_name: impl Into<String>) -> Self {
		Self {
			package_name: Some(package_name.into()),
			..Self::default()
		}
	}

	/// The DRI of the module root. It has no package and no class.
	pub fn top_level() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_class_names(mut self, class_names: impl Into<String>) -> Self {
		self.class_names = Some(class_names.into());
		self
	}

	#[must_use]
	pub fn with_callable(mut self, callable: Callable) -> Self {
		self.callable = Some(callable);
		self
	}

	#[must_use]
	pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
		self.extra = Some(extra.into());
		self
	}

	/// The same DRI with the disambiguator removed. Declarations that only
	/// differ in `extra` clash when rendered.
	#[must_use]
	pub fn without_extra(&self) -> Self {
		Self {
			extra: None,
			..self.clone()
		}
	}

	/// Child DRI for a class nested in this one.
	#[must_use]
	pub fn nested(&self, class_name: &str) -> Self {
		let class_names = match &self.class_names {
			Some(outer) if !outer.is_empty() => format!("{outer}.{class_name}"),
			_ => class_name.to_string(),
		};

		Self {
			package_name: self.package_name.clone(),
			class_names: Some(class_names),
			callable: None,
			extra: None,
		}
	}
}

impl Display for Dri {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let package = self.package_name.as_deref().unwrap_or_default();
		let classes = self.class_names.as_deref().unwrap_or_default();
		let callable = self
			.callable
			.as_ref()
			.map(ToString::to_string)
			.unwrap_or_default();
		let extra = self.extra.as_deref().unwrap_or_default();
		write!(f, "{package}/{classes}/{callable}/{extra}")
	}
}

/// The callable part of a [`Dri`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Callable {
	pub name: String,
	#[serde(default)]
	pub receiver: Option<TypeReference>,
	#[serde(default)]
	pub params: Vec<TypeReference>,
}

impl Callable {
	pub fn new(name: impl Into<String>, params: Vec<TypeReference>) -> Self {
		Self {
			name: name.into(),
			receiver: None,
			params,
		}
	}

	#[must_use]
	pub fn with_receiver(mut self, receiver: TypeReference) -> Self {
		self.receiver = Some(receiver);
		self
	}

	/// Receiver and parameter types joined with `#`.
	pub fn signature(&self) -> String {
		let receiver = self
			.receiver
			.as_ref()
			.map(ToString::to_string)
			.unwrap_or_default();
		let params = self
			.params
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join("#");
		format!("{receiver}#{params}")
	}
}

impl PartialOrd for Callable {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Callable {
	fn cmp(&self, other: &Self) -> Ordering {
		self.name
			.cmp(&other.name)
			.then_with(|| self.signature().cmp(&other.signature()))
	}
}

impl Display for Callable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}#{}", self.name, self.signature())
	}
}

/// A type as it appears inside a [`Callable`] signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeReference {
	/// A concrete type, e.g. `kotlin.collections.List[kotlin.Int]`.
	Constructor {
		full_name: String,
		#[serde(default)]
		params: Vec<TypeReference>,
	},
	/// A type parameter such as `T`.
	Param { name: String },
	/// A nullable wrapper around another reference.
	Nullable { wrapped: Box<TypeReference> },
	/// A star projection.
	Star,
}

impl TypeReference {
	pub fn constructor(full_name: impl Into<String>) -> Self {
		Self::Constructor {
			full_name: full_name.into(),
			params: Vec::new(),
		}
	}
}

impl Display for TypeReference {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Constructor { full_name, params } => {
				write!(f, "{full_name}")?;
				if !params.is_empty() {
					let params = params
						.iter()
						.map(ToString::to_string)
						.collect::<Vec<_>>()
						.join(",");
					write!(f, "[{params}]")?;
				}
				Ok(())
			}
			Self::Param { name } => write!(f, "{name}"),
			Self::Nullable { wrapped } => write!(f, "{wrapped}?"),
			Self::Star => write!(f, "*"),
		}
	}
}
