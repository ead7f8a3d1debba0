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
use crate::classify::resolver::RuleTable;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

/// The independent dimensions a transaction is classified along. Each one
/// has its own rule table, and the ledger applies them separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
	Rename,
	Budget,
	Category,
	Account,
	Tag,
}

impl Axis {
	pub const ALL: [Axis; 5] = [
		Axis::Rename,
		Axis::Budget,
		Axis::Category,
		Axis::Account,
		Axis::Tag,
	];
}

impl fmt::Display for Axis {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Axis::Rename => "rename",
			Axis::Budget => "budget",
			Axis::Category => "category",
			Axis::Account => "account",
			Axis::Tag => "tags",
		};
		write!(f, "{}", name)
	}
}

/// The `[rules]` section of the config: one table per axis.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuleSet {
	pub rename: RuleTable,
	pub budget: RuleTable,
	pub category: RuleTable,
	pub account: RuleTable,
	pub tags: RuleTable,
}

impl RuleSet {
	pub fn table(&self, axis: Axis) -> &RuleTable {
		match axis {
			Axis::Rename => &self.rename,
			Axis::Budget => &self.budget,
			Axis::Category => &self.category,
			Axis::Account => &self.account,
			Axis::Tag => &self.tags,
		}
	}

	/// Runs the description through every table.
	pub fn classify(&self, description: &str) -> Classification {
		Classification {
			rename: self.rename.resolve(description),
			budget: self.budget.resolve(description),
			category: self.category.resolve(description),
			account: self.account.resolve(description),
			tags: self.tags.resolve(description),
		}
	}
}

/// Labels matched for a single transaction, kept apart per axis. Any axis
/// may hold zero labels or several. Choosing between several is up to
/// whoever consumes this.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
	pub rename: BTreeSet<String>,
	pub budget: BTreeSet<String>,
	pub category: BTreeSet<String>,
	pub account: BTreeSet<String>,
	pub tags: BTreeSet<String>,
}

impl Classification {
	pub fn axis(&self, axis: Axis) -> &BTreeSet<String> {
		match axis {
			Axis::Rename => &self.rename,
			Axis::Budget => &self.budget,
			Axis::Category => &self.category,
			Axis::Account => &self.account,
			Axis::Tag => &self.tags,
		}
	}

	/// The label for an axis when exactly one matched.
	pub fn single(&self, axis: Axis) -> Option<&str> {
		let labels = self.axis(axis);
		if labels.len() == 1 {
			labels.iter().next().map(String::as_str)
		} else {
			None
		}
	}

	pub fn is_ambiguous(&self, axis: Axis) -> bool {
		self.axis(axis).len() > 1
	}

	pub fn is_empty(&self) -> bool {
		Axis::ALL.iter().all(|a| self.axis(*a).is_empty())
	}

	/// All labels from all axes merged together.
	pub fn labels(&self) -> BTreeSet<&str> {
		Axis::ALL
			.iter()
			.flat_map(|a| self.axis(*a).iter().map(String::as_str))
			.collect()
	}
}
