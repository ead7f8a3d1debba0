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
use crate::bank::settings::Credentials;
use crate::error::BackendError;
use crate::util::date::DateWindow;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// An account as the bank lists it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRef {
	/// The number printed on statements, which is what users configure.
	pub number: String,
	/// The bank's own handle for the account, opaque outside the client.
	pub id: String,
	pub family: String,
	pub label: String,
}

/// A booked operation. Only the description drives classification; the
/// other fields ride along for the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
	pub date: NaiveDate,
	pub description: String,
	/// Signed decimal, negative for money leaving the account.
	pub amount: String,
	pub currency: String,
	pub extra: Map<String, Value>,
}

impl Transaction {
	pub fn is_debit(&self) -> bool {
		self.amount.trim_start().starts_with('-')
	}

	/// The amount without its sign.
	pub fn magnitude(&self) -> &str {
		self.amount.trim().trim_start_matches(['-', '+'])
	}
}

/// One page request for an account's operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationQuery {
	pub window: DateWindow,
	pub count: usize,
	/// Continuation token from the previous page, `None` for the first.
	pub cursor: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct OperationPage {
	pub operations: Vec<Transaction>,
	pub next: Option<String>,
}

/// The remote side of a bank session. Implementations are free to keep
/// whatever they need (cookies, tokens) inside `Session`; callers only ever
/// hand it back.
pub trait AuthClient {
	type Session;

	fn authenticate(
		&self,
		credentials: &Credentials,
	) -> Result<Self::Session, BackendError>;

	fn list_accounts(
		&self,
		session: &Self::Session,
	) -> Result<Vec<AccountRef>, BackendError>;

	fn get_operations(
		&self,
		session: &Self::Session,
		account: &AccountRef,
		query: &OperationQuery,
	) -> Result<OperationPage, BackendError>;
}

impl<C: AuthClient + ?Sized> AuthClient for &C {
	type Session = C::Session;

	fn authenticate(
		&self,
		credentials: &Credentials,
	) -> Result<Self::Session, BackendError> {
		(**self).authenticate(credentials)
	}

	fn list_accounts(
		&self,
		session: &Self::Session,
	) -> Result<Vec<AccountRef>, BackendError> {
		(**self).list_accounts(session)
	}

	fn get_operations(
		&self,
		session: &Self::Session,
		account: &AccountRef,
		query: &OperationQuery,
	) -> Result<OperationPage, BackendError> {
		(**self).get_operations(session, account, query)
	}
}
