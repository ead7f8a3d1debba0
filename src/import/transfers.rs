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
use crate::classify::pattern::matches_any;
use serde::Deserialize;
use std::fmt;

/// Which side of a transfer between the user's own accounts an operation
/// is. The bank books both sides under different descriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferLeg {
	Outgoing,
	Incoming,
}

impl fmt::Display for TransferLeg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransferLeg::Outgoing => write!(f, "out"),
			TransferLeg::Incoming => write!(f, "in"),
		}
	}
}

/// The `[transfers]` section: wildcard patterns for the descriptions the bank
/// gives each side of an own transfer, e.g. `WEB LASTNAME FIRSTNAME` when
/// sending and `DE LASTNAME FIRSTNAME` when receiving.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TransferRules {
	pub source_name: Vec<String>,
	pub destination_name: Vec<String>,
}

impl TransferRules {
	pub fn detect(&self, description: &str) -> Option<TransferLeg> {
		if matches_any(&self.source_name, description) {
			Some(TransferLeg::Outgoing)
		} else if matches_any(&self.destination_name, description) {
			Some(TransferLeg::Incoming)
		} else {
			None
		}
	}
}
