/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use std::fs;
use std::process::Command;

/// Dynamically collects test cases from a given directory. Each case is a
/// config file and the stdout expected when running with it.
fn collect_test_cases(subfolder: &str) -> Vec<(String, String)> {
	let dir_path = format!("tests/test_data/{}", subfolder);

	let mut test_cases = vec![];

	if let Ok(entries) = fs::read_dir(&dir_path) {
		let mut inputs = vec![];
		let mut outputs = vec![];

		for entry in entries.flatten() {
			let file_name =
				entry.file_name().into_string().unwrap_or_default();
			if file_name.ends_with("_in.toml") {
				inputs.push(file_name);
			} else if file_name.ends_with("_out.txt") {
				outputs.push(file_name);
			}
		}

		inputs.sort();
		outputs.sort();

		for input_file in inputs {
			let output_file = input_file.replace("_in.toml", "_out.txt");
			if outputs.contains(&output_file) {
				test_cases.push((input_file, output_file));
			}
		}
	}

	assert!(!test_cases.is_empty(), "no test cases in {}", dir_path);
	test_cases
}

#[test]
fn test_integration_check() {
	let test_cases = collect_test_cases("check");
	execute("check", test_cases, true, "check", vec![]);
}

#[test]
fn test_integration_should_fail() {
	let test_cases = collect_test_cases("failures");
	execute("failures", test_cases, false, "check", vec![]);
}

#[test]
fn test_integration_classify() {
	let test_cases = collect_test_cases("classify");
	execute(
		"classify",
		test_cases,
		true,
		"classify",
		vec!["WEB LASTNAME FIRSTNAME"],
	);
}

#[test]
fn test_integration_classify_no_match() {
	let test_cases = collect_test_cases("nomatch");
	execute("nomatch", test_cases, true, "classify", vec!["VIR SALAIRE"]);
}

#[test]
fn test_integration_classify_needs_a_term() {
	let output = Command::new("cargo")
		.args([
			"run",
			"--",
			"--config",
			"tests/test_data/classify/rules_in.toml",
			"classify",
		])
		.output()
		.expect("Failed to execute process");

	assert!(!output.status.success());
}

#[test]
fn test_integration_missing_config() {
	let output = Command::new("cargo")
		.args([
			"run",
			"--",
			"--config",
			"tests/test_data/does_not_exist.toml",
			"check",
		])
		.output()
		.expect("Failed to execute process");

	assert!(!output.status.success());
}

fn execute(
	subfolder: &str,
	test_cases: Vec<(String, String)>,
	should_succeed: bool,
	cmd: &str,
	args: Vec<&str>,
) {
	for (input_file, expected_output_file) in test_cases {
		println!("running for {}...", input_file);

		let loc = format!("{}/{}/{}", "tests/test_data", subfolder, input_file);

		let all_args =
			[vec!["run", "--", "--config", loc.as_str(), cmd], args.clone()]
				.concat();

		let output = Command::new("cargo")
			.args(all_args)
			.env_remove("RUST_LOG")
			.output()
			.expect("Failed to execute process");

		if should_succeed {
			assert!(
				output.status.success(),
				"{} failed processing: {}",
				input_file,
				String::from_utf8_lossy(&output.stderr)
			);
		} else {
			assert!(
				!output.status.success(),
				"{} unexpectedly succeeded!",
				input_file
			);
		}

		let stdout = String::from_utf8_lossy(&output.stdout);

		let expected_output = fs::read_to_string(format!(
			"{}/{}/{}",
			"tests/test_data", subfolder, expected_output_file
		))
		.expect("Failed to read expected output file");

		assert_eq!(
			stdout.trim(),
			expected_output.trim(),
			"Output did not match for {}; expected:\n{}\ngot:\n{}",
			input_file,
			expected_output.trim(),
			stdout.trim()
		);
	}
}
