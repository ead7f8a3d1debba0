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
use crate::bank::settings::ConnectionSettings;
use crate::classify::rules::RuleSet;
use crate::import::transfers::TransferRules;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub settings: Settings,
	pub bank: ConnectionSettings,
	pub transfers: TransferRules,
	pub firefly: Firefly,
	pub rules: RuleSet,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub debug: bool,
	pub auto_detect_transfers: bool,

	/// Applies to each request made to the bank, Firefly and the geocoder.
	pub timeout_secs: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: false,
			auto_detect_transfers: true,
			timeout_secs: 30,
		}
	}
}

impl Settings {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

#[derive(Default, Deserialize)]
pub struct Firefly {
	/// Root of the Firefly III instance, e.g. https://firefly.example.org
	pub hostname: Option<String>,
	pub personal_token: Option<String>,

	/// Shell command printing the personal token, as an alternative to
	/// storing it in this file.
	pub personal_token_cmd: Option<String>,
}

impl fmt::Debug for Firefly {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Firefly")
			.field("hostname", &self.hostname)
			.field("personal_token", &self.personal_token.as_ref().map(|_| "<redacted>"))
			.field("personal_token_cmd", &self.personal_token_cmd)
			.finish()
	}
}
