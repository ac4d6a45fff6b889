#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub type AnyEmptyResult = Result<(), Box<dyn std::error::Error>>;

pub fn pagetree_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("pagetree"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

const SOURCE_SET: &str =
	r#"{ "id": "app/commonMain", "display_name": "Common", "analysis_platform": "common" }"#;

fn entry(name: &str) -> String {
	format!(
		r#"{{ "dri": {{ "package_name": "org.example", "class_names": "Letters.{name}" }}, "name": "{name}", "source_sets": ["app/commonMain"] }}"#
	)
}

/// `enum class Letters { E1, .., E10 }` and `fun greet(): String` in
/// package `org.example`. `extra_properties` are appended to the package
/// properties verbatim.
pub fn letters_module(extra_properties: &[&str]) -> String {
	let entries = (1..=10)
		.map(|index| entry(&format!("E{index}")))
		.collect::<Vec<_>>()
		.join(",\n");
	let properties = extra_properties.join(",\n");

	format!(
		r#"{{
	"name": "letters",
	"source_sets": [{SOURCE_SET}],
	"packages": [{{
		"dri": {{ "package_name": "org.example" }},
		"name": "org.example",
		"source_sets": ["app/commonMain"],
		"classlikes": [{{
			"dri": {{ "package_name": "org.example", "class_names": "Letters" }},
			"name": "Letters",
			"kind": "enum",
			"source_sets": ["app/commonMain"],
			"visibility": {{ "app/commonMain": "public" }},
			"entries": [{entries}]
		}}],
		"functions": [{{
			"dri": {{ "package_name": "org.example", "callable": {{ "name": "greet" }} }},
			"name": "greet",
			"source_sets": ["app/commonMain"],
			"visibility": {{ "app/commonMain": "public" }},
			"return_type": {{
				"dri": {{ "package_name": "kotlin", "class_names": "String" }},
				"path_segments": ["kotlin", "String"]
			}}
		}}],
		"properties": [{properties}]
	}}]
}}"#
	)
}

/// A property whose type has no name. Rendering it logs an error.
pub const BROKEN_PROPERTY: &str = r#"{
	"dri": { "package_name": "org.example", "callable": { "name": "broken" } },
	"name": "broken",
	"source_sets": ["app/commonMain"],
	"type": {}
}"#;

/// Write `content` to `name` inside `dir` and return the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> std::io::Result<PathBuf> {
	let path = dir.join(name);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(&path, content)?;
	Ok(path)
}
