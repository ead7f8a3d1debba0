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
use std::collections::{BTreeMap, BTreeSet};

/// One label and the patterns that select it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelRule {
	pub label: String,
	pub patterns: Vec<String>,
}

/// Maps labels to wildcard patterns. Written in config as a TOML table of
/// `label = ["pattern", ...]`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "BTreeMap<String, Vec<String>>")]
pub struct RuleTable {
	rules: Vec<LabelRule>,
}

impl RuleTable {
	pub fn new(rules: Vec<LabelRule>) -> Self {
		Self { rules }
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	/// Every label with at least one matching pattern, in human-readable
	/// form. Nothing matching is a normal outcome and gives an empty set.
	pub fn resolve(&self, candidate: &str) -> BTreeSet<String> {
		self.rules
			.iter()
			.filter(|rule| matches_any(&rule.patterns, candidate))
			.map(|rule| humanize(&rule.label))
			.collect()
	}
}

impl From<BTreeMap<String, Vec<String>>> for RuleTable {
	fn from(map: BTreeMap<String, Vec<String>>) -> Self {
		RuleTable::new(
			map.into_iter()
				.map(|(label, patterns)| LabelRule { label, patterns })
				.collect(),
		)
	}
}

impl<L: Into<String>, P: Into<String>> FromIterator<(L, Vec<P>)> for RuleTable {
	fn from_iter<T: IntoIterator<Item = (L, Vec<P>)>>(iter: T) -> Self {
		RuleTable::new(
			iter.into_iter()
				.map(|(label, patterns)| LabelRule {
					label: label.into(),
					patterns: patterns.into_iter().map(Into::into).collect(),
				})
				.collect(),
		)
	}
}

/// Turns a config key like `own_transfer` or `own-transfer` into
/// `Own Transfer`. Letters are upper-cased after any non-letter and
/// lower-cased otherwise.
pub fn humanize(label: &str) -> String {
	let mut out = String::with_capacity(label.len());
	let mut after_letter = false;

	for c in label.chars() {
		let c = if c == '_' || c == '-' { ' ' } else { c };
		if c.is_alphabetic() {
			if after_letter {
				out.extend(c.to_lowercase());
			} else {
				out.extend(c.to_uppercase());
			}
			after_letter = true;
		} else {
			out.push(c);
			after_letter = false;
		}
	}

	out
}
