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
use crate::classify::rules::Axis;
use crate::config::config_file::Firefly;
use crate::error::BackendError;
use crate::import::pipeline::ClassifiedTransaction;
use crate::import::transfers::TransferLeg;
use crate::ledger::firefly::models::{
	TransactionSplit, TransactionStore, TransactionType, ValidationFailure,
};
use crate::ledger::{LedgerSink, Submission};
use crate::util::http::Client;
use anyhow::{bail, Error};
use std::time::Duration;
use tracing::{debug, info, warn};

const DUPLICATE_STATUS: u16 = 422;

/// Pushes classified transactions into a Firefly III instance through its
/// REST API. Write-only: it never reads back or reconciles.
pub struct FireflyClient {
	http: Client,
}

impl FireflyClient {
	pub fn new(config: &Firefly, timeout: Duration) -> Result<Self, Error> {
		let Some(hostname) = &config.hostname else {
			bail!("no firefly hostname in config");
		};
		let Some(token) = &config.personal_token else {
			bail!("no firefly personal token in config");
		};

		let api_url = format!("{}/api/v1", hostname.trim_end_matches('/'));
		Ok(FireflyClient {
			http: Client::with_bearer(&api_url, timeout, token)?,
		})
	}
}

impl LedgerSink for FireflyClient {
	fn submit(&mut self, item: &ClassifiedTransaction) -> Result<Submission, Error> {
		// the outgoing leg already recorded the whole transfer
		if item.transfer == Some(TransferLeg::Incoming) {
			info!(
				description = %item.transaction.description,
				"skipping incoming side of own transfer"
			);
			return Ok(Submission::Skipped);
		}

		let store = TransactionStore {
			error_if_duplicate_hash: true,
			apply_rules: true,
			transactions: vec![build_split(item)],
		};

		match self
			.http
			.post_json::<_, serde_json::Value>("transactions", Some(&store))
		{
			Ok(_) => {
				debug!(description = %item.transaction.description, "created");
				Ok(Submission::Created)
			},
			Err(BackendError::Status { status, body })
				if status == DUPLICATE_STATUS && is_duplicate(&body) =>
			{
				info!(
					description = %item.transaction.description,
					date = %item.transaction.date,
					"already in firefly"
				);
				Ok(Submission::Duplicate)
			},
			Err(e) => Err(e.into()),
		}
	}
}

fn is_duplicate(body: &str) -> bool {
	let failure: ValidationFailure =
		serde_json::from_str(body).unwrap_or_default();
	failure.message.contains("Duplicate") || body.contains("Duplicate of transaction")
}

/// Maps one classified transaction onto a Firefly split. Budget, category
/// and counterparty are only filled in when exactly one label matched on
/// that axis; with several, the choice is left to the user in Firefly.
pub fn build_split(item: &ClassifiedTransaction) -> TransactionSplit {
	let t = &item.transaction;
	let asset = item.account.number.trim().to_owned();
	let counterparty = single_label(item, Axis::Account);
	let renamed = single_label(item, Axis::Rename);

	let (typ, source_name, destination_name) = match item.transfer {
		Some(TransferLeg::Outgoing) if counterparty.is_some() => {
			(TransactionType::Transfer, Some(asset), counterparty)
		},
		_ if t.is_debit() => {
			(TransactionType::Withdrawal, Some(asset), counterparty)
		},
		_ => (TransactionType::Deposit, counterparty, Some(asset)),
	};

	if item.transfer == Some(TransferLeg::Outgoing)
		&& typ != TransactionType::Transfer
	{
		warn!(
			description = %t.description,
			"own transfer has no destination account label, sending as a withdrawal"
		);
	}

	TransactionSplit {
		typ,
		date: t.date.to_string(),
		amount: t.magnitude().to_owned(),
		currency_code: t.currency.clone(),
		description: renamed.clone().unwrap_or_else(|| t.description.clone()),
		source_name,
		destination_name,
		budget_name: single_label(item, Axis::Budget),
		category_name: single_label(item, Axis::Category),
		tags: item.classification.tags.iter().cloned().collect(),
		notes: renamed.map(|_| t.description.clone()),
	}
}

fn single_label(item: &ClassifiedTransaction, axis: Axis) -> Option<String> {
	let c = &item.classification;
	if c.is_ambiguous(axis) {
		warn!(
			%axis,
			labels = ?c.axis(axis),
			description = %item.transaction.description,
			"several labels matched, leaving it unset"
		);
	}
	c.single(axis).map(str::to_owned)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bank::fake::{account, operation};
	use crate::classify::rules::Classification;
	use chrono::NaiveDate;
	use std::collections::BTreeSet;

	fn labels(l: &[&str]) -> BTreeSet<String> {
		l.iter().map(|s| s.to_string()).collect()
	}

	fn item(
		description: &str,
		amount: &str,
		classification: Classification,
		transfer: Option<TransferLeg>,
	) -> ClassifiedTransaction {
		ClassifiedTransaction {
			account: account(" 111 "),
			transaction: operation(
				NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
				description,
				amount,
			),
			classification,
			transfer,
		}
	}

	#[test]
	fn test_withdrawal() {
		let split = build_split(&item(
			"CARTE X1234 CARREFOUR",
			"-31.20",
			Classification {
				rename: labels(&["Carrefour Market"]),
				budget: labels(&["Daily"]),
				category: labels(&["Groceries"]),
				account: labels(&["Carrefour"]),
				tags: labels(&["Card", "Food"]),
			},
			None,
		));

		assert_eq!(split.typ, TransactionType::Withdrawal);
		assert_eq!(split.date, "2024-11-15");
		assert_eq!(split.amount, "31.20");
		assert_eq!(split.description, "Carrefour Market");
		assert_eq!(split.notes.as_deref(), Some("CARTE X1234 CARREFOUR"));
		assert_eq!(split.source_name.as_deref(), Some("111"));
		assert_eq!(split.destination_name.as_deref(), Some("Carrefour"));
		assert_eq!(split.budget_name.as_deref(), Some("Daily"));
		assert_eq!(split.category_name.as_deref(), Some("Groceries"));
		assert_eq!(split.tags, vec!["Card", "Food"]);
	}

	#[test]
	fn test_deposit_without_labels() {
		let split = build_split(&item(
			"VIR SALAIRE",
			"2100.00",
			Classification::default(),
			None,
		));

		assert_eq!(split.typ, TransactionType::Deposit);
		assert_eq!(split.description, "VIR SALAIRE");
		assert_eq!(split.notes, None);
		assert_eq!(split.source_name, None);
		assert_eq!(split.destination_name.as_deref(), Some("111"));
		assert!(split.tags.is_empty());
	}

	#[test]
	fn test_ambiguous_axes_are_left_unset() {
		let split = build_split(&item(
			"CARREFOUR STATION",
			"-50",
			Classification {
				category: labels(&["Fuel", "Groceries"]),
				rename: labels(&["A", "B"]),
				..Classification::default()
			},
			None,
		));

		assert_eq!(split.category_name, None);
		assert_eq!(split.description, "CARREFOUR STATION");
	}

	#[test]
	fn test_outgoing_transfer() {
		let split = build_split(&item(
			"WEB LASTNAME FIRSTNAME",
			"-200",
			Classification {
				account: labels(&["Livret A"]),
				..Classification::default()
			},
			Some(TransferLeg::Outgoing),
		));

		assert_eq!(split.typ, TransactionType::Transfer);
		assert_eq!(split.source_name.as_deref(), Some("111"));
		assert_eq!(split.destination_name.as_deref(), Some("Livret A"));
	}

	#[test]
	fn test_transfer_without_destination_falls_back() {
		let split = build_split(&item(
			"WEB LASTNAME FIRSTNAME",
			"-200",
			Classification::default(),
			Some(TransferLeg::Outgoing),
		));
		assert_eq!(split.typ, TransactionType::Withdrawal);
	}

	#[test]
	fn test_payload_shape() {
		let store = TransactionStore {
			error_if_duplicate_hash: true,
			apply_rules: true,
			transactions: vec![build_split(&item(
				"VIR SALAIRE",
				"2100.00",
				Classification::default(),
				None,
			))],
		};
		let json = serde_json::to_value(&store).unwrap();

		assert_eq!(json["error_if_duplicate_hash"], true);
		let split = &json["transactions"][0];
		assert_eq!(split["type"], "deposit");
		assert_eq!(split["currency_code"], "EUR");
		assert!(split.get("source_name").is_none());
		assert!(split.get("tags").is_none());
	}

	#[test]
	fn test_duplicate_detection() {
		assert!(is_duplicate(
			r#"{"message":"Duplicate of transaction #12.","errors":{}}"#
		));
		assert!(!is_duplicate(r#"{"message":"The amount field is required."}"#));
		assert!(!is_duplicate("not json"));
	}

	#[test]
	fn test_client_needs_hostname_and_token() {
		let timeout = Duration::from_secs(1);
		assert!(FireflyClient::new(&Firefly::default(), timeout).is_err());
		assert!(FireflyClient::new(
			&Firefly {
				hostname: Some("https://firefly.example.org/".to_owned()),
				..Firefly::default()
			},
			timeout
		)
		.is_err());
		assert!(FireflyClient::new(
			&Firefly {
				hostname: Some("https://firefly.example.org/".to_owned()),
				personal_token: Some("t0ken".to_owned()),
				personal_token_cmd: None,
			},
			timeout
		)
		.is_ok());
	}
}
