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
use serde::{Deserialize, Serialize};

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct TransactionStore {
	pub error_if_duplicate_hash: bool,
	pub apply_rules: bool,
	pub transactions: Vec<TransactionSplit>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
	Withdrawal,
	Deposit,
	Transfer,
}

#[derive(Debug, Serialize)]
pub struct TransactionSplit {
	#[serde(rename = "type")]
	pub typ: TransactionType,
	pub date: String,
	pub amount: String,
	pub currency_code: String,
	pub description: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub source_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub destination_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub budget_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category_name: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,

	/// The description as the bank wrote it, kept when it was renamed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

// ---------------
// -- RECEIVING --
// ---------------

/// Firefly's validation failure body.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationFailure {
	#[serde(default)]
	pub message: String,
}
