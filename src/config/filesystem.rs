/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
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
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

const DEFAULT_CONFIG: &str = ".config/cafire/config.toml";

pub fn default_config_path() -> Result<PathBuf, Error> {
	let home = home_dir().ok_or_else(|| anyhow!("unable to determine home directory"))?;
	Ok(home.join(DEFAULT_CONFIG))
}

/// Fetches the config from the given path, or the default path if none. A
/// missing default config is created empty, which leaves every bank setting
/// at its placeholder. The boolean argument indicates whether the Firefly
/// token command should be run, i.e. whether we are about to talk to
/// Firefly.
pub fn get_config(
	custom_config_path: Option<&String>,
	expand_auth: bool,
) -> Result<Config, Error> {
	let config_path = match custom_config_path {
		None => default_config_path()?,
		Some(p) => PathBuf::from(p),
	};

	if !config_path.exists() && custom_config_path.is_none() {
		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent)?;
		}
		File::create(&config_path)?;
	}

	debug!(path = %config_path.display(), "reading config");
	let content = fs::read_to_string(&config_path).map_err(|e| {
		anyhow!("failed to read config {}: {}", config_path.display(), e)
	})?;
	let mut config: Config = toml::from_str(&content)
		.map_err(|e| anyhow!("failed to parse config: {}", e))?;

	if expand_auth {
		expand_token_cmd(&mut config)?;
	}

	Ok(config)
}

/// Runs `firefly.personal_token_cmd`, if set, and puts its output in
/// `firefly.personal_token`.
fn expand_token_cmd(config: &mut Config) -> Result<(), Error> {
	let firefly = &mut config.firefly;
	if firefly.personal_token_cmd.is_some() && firefly.personal_token.is_some() {
		bail!("Only one of firefly.personal_token and firefly.personal_token_cmd may be specified")
	}

	let Some(token_cmd) = &firefly.personal_token_cmd else {
		return Ok(());
	};

	let output = Command::new("sh")
		.arg("-c")
		.arg(token_cmd)
		.output()
		.map_err(|e| anyhow!("failed to execute personal_token_cmd: {}", e))?;

	if !output.status.success() {
		bail!(
			"firefly personal_token_cmd failed with status {}: {}",
			output.status,
			String::from_utf8_lossy(&output.stderr)
		);
	}

	let token = String::from_utf8(output.stdout)
		.map_err(|e| anyhow!("failed to parse command output: {}", e))?
		.trim()
		.to_string();
	firefly.personal_token = Some(token);

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn write_config(name: &str, content: &str) -> String {
		let path = std::env::temp_dir()
			.join(format!("cafire-{}-{}.toml", name, std::process::id()));
		let mut file = File::create(&path).unwrap();
		file.write_all(content.as_bytes()).unwrap();
		path.to_string_lossy().into_owned()
	}

	#[test]
	fn test_token_cmd_is_expanded() {
		let path = write_config(
			"token-cmd",
			"[firefly]\npersonal_token_cmd = \"echo '  abc123  '\"\n",
		);

		let config = get_config(Some(&path), true).unwrap();
		assert_eq!(config.firefly.personal_token.as_deref(), Some("abc123"));

		let config = get_config(Some(&path), false).unwrap();
		assert!(config.firefly.personal_token.is_none());
	}

	#[test]
	fn test_token_and_token_cmd_conflict() {
		let path = write_config(
			"token-conflict",
			"[firefly]\npersonal_token = \"x\"\npersonal_token_cmd = \"echo y\"\n",
		);
		assert!(get_config(Some(&path), true).is_err());
	}

	#[test]
	fn test_failing_token_cmd() {
		let path =
			write_config("token-fail", "[firefly]\npersonal_token_cmd = \"exit 3\"\n");
		assert!(get_config(Some(&path), true).is_err());
	}

	#[test]
	fn test_missing_custom_config_is_an_error() {
		let missing = "/nonexistent/cafire/config.toml".to_owned();
		assert!(get_config(Some(&missing), false).is_err());
	}

	#[test]
	fn test_malformed_config_is_an_error() {
		let path = write_config("malformed", "[bank\nregion = ");
		assert!(get_config(Some(&path), false).is_err());
	}
}
