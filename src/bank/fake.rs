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
use crate::bank::client::{
	AccountRef, AuthClient, OperationPage, OperationQuery, Transaction,
};
use crate::bank::settings::Credentials;
use crate::error::BackendError;
use chrono::NaiveDate;
use serde_json::Map;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory bank for tests. It pages through whatever operations it holds
/// and, like a sloppy backend, ignores the requested date window.
pub struct FakeBank {
	pub accounts: Vec<AccountRef>,
	pub operations: BTreeMap<String, Vec<Transaction>>,
	pub page_size: usize,
	pub reject_login: bool,
	pub failing_account: Option<String>,

	pub logins: RefCell<Vec<Vec<u8>>>,
	pub queries: RefCell<Vec<(String, OperationQuery)>>,
}

pub struct FakeSession {
	pub account_id: String,
}

impl FakeBank {
	pub fn new(numbers: &[&str]) -> Self {
		Self {
			accounts: numbers.iter().map(|n| account(n)).collect(),
			operations: BTreeMap::new(),
			page_size: 2,
			reject_login: false,
			failing_account: None,
			logins: RefCell::new(Vec::new()),
			queries: RefCell::new(Vec::new()),
		}
	}

	pub fn with_operations(mut self, number: &str, ops: Vec<Transaction>) -> Self {
		self.operations.insert(number.to_owned(), ops);
		self
	}
}

impl AuthClient for FakeBank {
	type Session = FakeSession;

	fn authenticate(
		&self,
		credentials: &Credentials,
	) -> Result<FakeSession, BackendError> {
		self.logins.borrow_mut().push(credentials.password_digits());
		if self.reject_login {
			return Err(BackendError::Rejected("bad credentials".to_owned()));
		}
		Ok(FakeSession {
			account_id: credentials.account_id().to_owned(),
		})
	}

	fn list_accounts(
		&self,
		_session: &FakeSession,
	) -> Result<Vec<AccountRef>, BackendError> {
		Ok(self.accounts.clone())
	}

	fn get_operations(
		&self,
		_session: &FakeSession,
		account: &AccountRef,
		query: &OperationQuery,
	) -> Result<OperationPage, BackendError> {
		self.queries
			.borrow_mut()
			.push((account.number.clone(), query.clone()));

		if self.failing_account.as_deref() == Some(account.number.as_str()) {
			return Err(BackendError::Status {
				status: 500,
				body: "boom".to_owned(),
			});
		}

		let all = self.operations.get(&account.number).cloned().unwrap_or_default();
		let start = match &query.cursor {
			Some(c) => c.parse::<usize>().map_err(|_| {
				BackendError::Decode(format!("bad cursor {}", c))
			})?,
			None => 0,
		};
		let end = (start + query.count.min(self.page_size)).min(all.len());
		let operations = all.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

		Ok(OperationPage {
			operations,
			next: (end < all.len()).then(|| end.to_string()),
		})
	}
}

pub fn account(number: &str) -> AccountRef {
	AccountRef {
		number: number.to_owned(),
		id: format!("idx-{}", number),
		family: "1".to_owned(),
		label: format!("Compte {}", number),
	}
}

pub fn operation(date: NaiveDate, description: &str, amount: &str) -> Transaction {
	Transaction {
		date,
		description: description.to_owned(),
		amount: amount.to_owned(),
		currency: "EUR".to_owned(),
		extra: Map::new(),
	}
}
