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
use crate::bank::client::{AccountRef, Transaction};
use crate::error::BackendError;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct LoginForm {
	pub j_username: String,
	pub j_password: String,
	#[serde(rename = "keypadId")]
	pub keypad_id: String,
	pub path: String,
	pub j_path_ressource: String,
	pub j_validate: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsParams {
	pub compte_idx: String,
	pub grande_famille_code: String,
	pub id_devise: String,
	pub date_debut: i64,
	pub date_fin: i64,
	pub count: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_index: Option<String>,
}

// ---------------
// -- RECEIVING --
// ---------------

/// The virtual keypad shown on the login page. The password is never sent
/// as typed: each digit is replaced by the position of its key.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keypad {
	pub keypad_id: String,
	pub key_layout: Vec<String>,
}

impl Keypad {
	pub fn encode(&self, digits: &[u8]) -> Result<String, BackendError> {
		let positions = digits
			.iter()
			.map(|d| {
				self.key_layout
					.iter()
					.position(|k| k.trim().parse::<u8>().ok() == Some(*d))
					.map(|p| p.to_string())
					.ok_or_else(|| {
						BackendError::Decode("keypad is missing a digit".to_owned())
					})
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(positions.join(","))
	}
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
	pub url: Option<String>,
	pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub numero_compte: String,
	#[serde(deserialize_with = "deserialize_number_as_string")]
	pub index: String,
	#[serde(deserialize_with = "deserialize_number_as_string")]
	pub grande_famille_produit_code: String,
	#[serde(default)]
	pub libelle_produit: String,
}

impl From<Account> for AccountRef {
	fn from(a: Account) -> Self {
		AccountRef {
			number: a.numero_compte,
			id: a.index,
			family: a.grande_famille_produit_code,
			label: a.libelle_produit,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsHolder {
	#[serde(default, rename = "listeOperations")]
	pub operations: Vec<Operation>,
	#[serde(default)]
	pub has_next: bool,
	pub next_set_start_index: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
	pub libelle_operation: String,

	#[serde(deserialize_with = "deserialize_number_as_string")]
	pub montant: String,

	#[serde(deserialize_with = "deserialize_date")]
	pub date_operation: NaiveDate,

	#[serde(default = "default_currency")]
	pub id_devise: String,

	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl From<Operation> for Transaction {
	fn from(op: Operation) -> Self {
		Transaction {
			date: op.date_operation,
			// the bank pads descriptions with runs of spaces
			description: op
				.libelle_operation
				.split_whitespace()
				.collect::<Vec<_>>()
				.join(" "),
			amount: op.montant,
			currency: op.id_devise,
			extra: op.extra,
		}
	}
}

fn default_currency() -> String {
	"EUR".to_owned()
}

fn deserialize_number_as_string<'de, D>(
	deserializer: D,
) -> Result<String, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	match value {
		Value::Number(num) => Ok(num.to_string()),
		Value::String(s) => Ok(s),
		_ => Err(serde::de::Error::custom("expected a number")),
	}
}

/// Dates arrive either as epoch milliseconds or as an ISO-8601 string.
/// Timestamps are read on the local calendar, like the fetch window.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	match &value {
		Value::Number(num) => num
			.as_i64()
			.and_then(DateTime::from_timestamp_millis)
			.map(|dt| dt.with_timezone(&Local).date_naive())
			.ok_or_else(|| serde::de::Error::custom("timestamp out of range")),
		Value::String(s) => s
			.get(..10)
			.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
			.ok_or_else(|| {
				serde::de::Error::custom(format!("invalid date {}", s))
			}),
		_ => Err(serde::de::Error::custom("expected a date")),
	}
}
