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
use crate::bank::client::{AccountRef, AuthClient, OperationQuery, Transaction};
use crate::bank::settings::ValidatedSettings;
use crate::error::{AuthError, FetchError};
use crate::util::date::DateWindow;
use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Largest page asked of the bank in one request.
const PAGE_SIZE: usize = 50;

/// An authenticated session with the bank. There is no unauthenticated
/// state: `open` either logs in or returns an error, and a session is never
/// logged out and back in. Start a new one for the next run.
///
/// The underlying session is not safe to share, so every call goes through
/// `&self` on a single owner and accounts are fetched one after the other.
pub struct BankSession<C: AuthClient> {
	client: C,
	session: C::Session,
	enabled_accounts: BTreeSet<String>,
	today: NaiveDate,
}

impl<C: AuthClient> BankSession<C> {
	pub fn open(
		client: C,
		settings: &ValidatedSettings,
	) -> Result<Self, AuthError> {
		Self::open_on(client, settings, Local::now().date_naive())
	}

	/// Same as `open`, with lookback windows ending on `today` rather than
	/// the local calendar date.
	pub fn open_on(
		client: C,
		settings: &ValidatedSettings,
		today: NaiveDate,
	) -> Result<Self, AuthError> {
		let credentials = &settings.credentials;
		info!(
			region = credentials.region().slug,
			department = credentials.department(),
			"authenticating"
		);

		let session = client.authenticate(credentials)?;
		debug!("authenticated");

		Ok(BankSession {
			client,
			session,
			enabled_accounts: settings.enabled_accounts.clone(),
			today,
		})
	}

	/// Every account the bank shows whose number, trimmed, is one of the
	/// configured numbers.
	pub fn list_enabled_accounts(&self) -> Result<Vec<AccountRef>, FetchError> {
		let accounts = self
			.client
			.list_accounts(&self.session)
			.map_err(|source| FetchError::Accounts { source })?;

		let total = accounts.len();
		let enabled: Vec<AccountRef> = accounts
			.into_iter()
			.filter(|a| self.enabled_accounts.contains(a.number.trim()))
			.collect();

		info!(total, enabled = enabled.len(), "listed accounts");
		Ok(enabled)
	}

	/// Operations from the last `window_days` days (today included), at most
	/// `max_rows` of them.
	pub fn fetch_transactions(
		&self,
		account: &AccountRef,
		window_days: u32,
		max_rows: usize,
	) -> Result<Vec<Transaction>, FetchError> {
		let window = DateWindow::lookback(self.today, window_days);
		self.fetch_window(account, window, max_rows)
	}

	/// Walks the bank's pages until `max_rows` operations dated inside the
	/// window are collected or the bank runs out. Order is whatever the bank
	/// returns.
	fn fetch_window(
		&self,
		account: &AccountRef,
		window: DateWindow,
		max_rows: usize,
	) -> Result<Vec<Transaction>, FetchError> {
		let mut rows = Vec::new();
		let mut cursor: Option<String> = None;

		while rows.len() < max_rows {
			let query = OperationQuery {
				window,
				count: (max_rows - rows.len()).min(PAGE_SIZE),
				cursor: cursor.clone(),
			};

			let page = self
				.client
				.get_operations(&self.session, account, &query)
				.map_err(|source| FetchError::Transactions {
					account: account.number.clone(),
					window,
					source,
				})?;

			let fetched = page.operations.len();
			rows.extend(
				page.operations.into_iter().filter(|t| window.contains(t.date)),
			);
			debug!(account = %account.number, fetched, kept = rows.len(), "fetched page");

			match page.next {
				Some(next) if fetched > 0 && Some(&next) != cursor.as_ref() => {
					cursor = Some(next)
				},
				_ => break,
			}
		}

		rows.truncate(max_rows);
		info!(account = %account.number, %window, count = rows.len(), "fetched transactions");
		Ok(rows)
	}
}
