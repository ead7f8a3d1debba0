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
use crate::bank::client::{AccountRef, AuthClient, Transaction};
use crate::bank::session::BankSession;
use crate::bank::settings::{ConnectionSettings, ValidatedSettings};
use crate::classify::rules::{Axis, Classification, RuleSet};
use crate::error::PipelineError;
use crate::import::transfers::{TransferLeg, TransferRules};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

/// A fetched transaction along with everything the rules said about it.
#[derive(Clone, Debug)]
pub struct ClassifiedTransaction {
	pub account: AccountRef,
	pub transaction: Transaction,
	pub classification: Classification,
	pub transfer: Option<TransferLeg>,
}

/// Fetch-then-classify for every enabled account. The run is all or
/// nothing: any failure past validation stops it and nothing fetched so far
/// is returned, so the ledger never sees half an import.
pub struct TransactionImportPipeline<'a> {
	rules: &'a RuleSet,
	transfers: Option<&'a TransferRules>,
	today: NaiveDate,
}

impl<'a> TransactionImportPipeline<'a> {
	pub fn new(rules: &'a RuleSet) -> Self {
		Self {
			rules,
			transfers: None,
			today: Local::now().date_naive(),
		}
	}

	/// Turns on own-transfer detection.
	pub fn with_transfers(mut self, transfers: &'a TransferRules) -> Self {
		self.transfers = Some(transfers);
		self
	}

	/// Anchors the lookback window on a given day instead of today.
	#[cfg(test)]
	pub fn as_of(mut self, today: NaiveDate) -> Self {
		self.today = today;
		self
	}

	pub fn run<C: AuthClient>(
		&self,
		client: C,
		settings: &ConnectionSettings,
	) -> Result<Vec<ClassifiedTransaction>, PipelineError> {
		let settings = ValidatedSettings::try_from(settings)?;
		for axis in Axis::ALL {
			let rules = self.rules.table(axis).len();
			debug!(%axis, rules, "classification rules");
		}
		if Axis::ALL.iter().all(|a| self.rules.table(*a).is_empty()) {
			warn!("no classification rules configured");
		}
		let max_rows = settings.max_transactions as usize;

		let session = BankSession::open_on(client, &settings, self.today)?;
		let accounts = session.list_enabled_accounts()?;
		if accounts.is_empty() {
			info!("none of the configured accounts were found");
		}

		let mut results = Vec::new();
		for account in accounts {
			let transactions = session.fetch_transactions(
				&account,
				settings.lookback_days,
				max_rows,
			)?;
			results.extend(
				transactions.into_iter().map(|t| self.classify(&account, t)),
			);
		}

		info!(
			count = results.len(),
			lookback_days = settings.lookback_days,
			today = %self.today,
			"import run complete"
		);
		Ok(results)
	}

	pub fn classify(
		&self,
		account: &AccountRef,
		transaction: Transaction,
	) -> ClassifiedTransaction {
		let classification = self.rules.classify(&transaction.description);
		let transfer = self
			.transfers
			.and_then(|t| t.detect(&transaction.description));

		debug!(
			description = %transaction.description,
			labels = ?classification.labels(),
			?transfer,
			"classified"
		);

		ClassifiedTransaction {
			account: account.clone(),
			transaction,
			classification,
			transfer,
		}
	}
}
