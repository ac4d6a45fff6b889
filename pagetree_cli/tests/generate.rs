mod common;

use common::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn outline_lists_pages_in_declaration_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", &common::letters_module(&[]))?;

	let output = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?;
	insta::assert_snapshot!(stdout.trim_end(), @r"
	letters (module)
	  org.example (package)
	    Letters (classlike)
	      E1 (classlike)
	      E2 (classlike)
	      E3 (classlike)
	      E4 (classlike)
	      E5 (classlike)
	      E6 (classlike)
	      E7 (classlike)
	      E8 (classlike)
	      E9 (classlike)
	      E10 (classlike)
	    greet (member)
	");

	Ok(())
}

#[test]
fn summary_is_written_to_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", &common::letters_module(&[]))?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.assert()
		.success()
		.stderr(predicates::str::contains(
			"Generated 14 page(s) for module `letters`",
		));

	Ok(())
}

#[test]
fn markdown_nests_pages_as_sections() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", &common::letters_module(&[]))?;

	let output = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.arg("--format")
		.arg("markdown")
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?;
	assert!(stdout.starts_with("# letters\n"), "{stdout}");
	assert!(stdout.contains("\n### Letters\n"), "{stdout}");
	assert!(stdout.contains("\n#### E10\n"), "{stdout}");
	assert!(stdout.contains("`public fun greet(): String`"), "{stdout}");
	assert!(stdout.contains("| --- | --- |"), "{stdout}");

	let second = stdout.find("E2").unwrap_or(usize::MAX);
	let tenth = stdout.find("E10").unwrap_or(usize::MAX);
	assert!(second < tenth, "E2 must be listed before E10:\n{stdout}");

	Ok(())
}

#[test]
fn all_types_flag_adds_a_page() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", &common::letters_module(&[]))?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.arg("--all-types")
		.assert()
		.success()
		.stdout(predicates::str::contains("  All Types (all types)\n"));

	Ok(())
}

#[test]
fn logged_errors_are_counted_but_do_not_fail_by_default() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let module = common::letters_module(&[common::BROKEN_PROPERTY]);
	let input = common::write_file(tmp.path(), "module.json", &module)?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.assert()
		.success()
		.stdout(predicates::str::contains("broken (member)"))
		.stderr(
			predicates::str::contains("cannot be resolved")
				.and(predicates::str::contains("error(s)")),
		);

	Ok(())
}

#[test]
fn fail_on_errors_exits_with_one() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let module = common::letters_module(&[common::BROKEN_PROPERTY]);
	let input = common::write_file(tmp.path(), "module.json", &module)?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.arg("--fail-on-errors")
		.assert()
		.code(1)
		.stdout(predicates::str::contains("broken (member)"))
		.stderr(predicates::str::contains("pagetree::generation_failed"));

	Ok(())
}

#[test]
fn fail_on_errors_passes_clean_runs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", &common::letters_module(&[]))?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.arg("--fail-on-errors")
		.assert()
		.success();

	Ok(())
}

#[test]
fn invalid_input_exits_with_two() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", "{ \"packages\": 1 }")?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.assert()
		.code(2)
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("pagetree::input_parse"));

	Ok(())
}

#[test]
fn missing_input_exits_with_two() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(tmp.path().join("missing.json"))
		.assert()
		.code(2)
		.stderr(predicates::str::contains("pagetree::io_error"));

	Ok(())
}

#[test]
fn missing_subcommand_exits_with_two() {
	let _ = common::pagetree_cmd()
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no subcommand specified"));
}

#[test]
fn verbose_logs_the_transformers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_file(tmp.path(), "module.json", &common::letters_module(&[]))?;

	let _ = common::pagetree_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--input")
		.arg(&input)
		.arg("--verbose")
		.assert()
		.success()
		.stderr(
			predicates::str::contains("running page transformer")
				.and(predicates::str::contains("path-to-root-substitution")),
		);

	Ok(())
}
