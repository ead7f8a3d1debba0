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
	AccountRef, AuthClient, OperationPage, OperationQuery,
};
use crate::bank::credit_agricole::models::{
	Account, Keypad, LoginForm, LoginResponse, OperationsHolder,
	OperationsParams,
};
use crate::bank::settings::Credentials;
use crate::error::BackendError;
use crate::util::http::Client;
use std::time::Duration;
use tracing::debug;

const LOGIN_PAGE: &str = "particulier/acceder-a-mes-comptes.html";
const KEYPAD: &str =
	"particulier/acceder-a-mes-comptes.authenticationKeypad.json";
const SECURITY_CHECK: &str =
	"particulier/acceder-a-mes-comptes.html/j_security_check";
const ACCOUNTS: &str =
	"particulier/operations/synthese/jcr:content.produits-valorisation.json";
const OPERATIONS: &str =
	"particulier/operations/synthese/detail-comptes/jcr:content.n3.operations.json";

const CURRENCY: &str = "EUR";

/// Talks to the Crédit Agricole customer site. Read-only: it logs in, lists
/// accounts and reads operations, nothing else.
pub struct CreditAgricole {
	timeout: Duration,
}

/// A logged-in cookie jar. Dropping it is the only way to end the session.
pub struct CaSession {
	http: Client,
}

impl CreditAgricole {
	pub fn new(timeout: Duration) -> Self {
		Self { timeout }
	}
}

impl AuthClient for CreditAgricole {
	type Session = CaSession;

	fn authenticate(
		&self,
		credentials: &Credentials,
	) -> Result<CaSession, BackendError> {
		let region = credentials.region();
		let http = Client::new(&region.base_url(), self.timeout)?;

		// the keypad endpoint wants the cookies handed out by the login page
		http.touch(LOGIN_PAGE)?;
		let keypad: Keypad = http.post_json::<(), _>(KEYPAD, None)?;
		debug!(keypad = %keypad.keypad_id, "got login keypad");

		let form = LoginForm {
			j_username: credentials.account_id().to_owned(),
			j_password: keypad.encode(&credentials.password_digits())?,
			keypad_id: keypad.keypad_id.clone(),
			path: "/content/npc/start".to_owned(),
			j_path_ressource: format!(
				"/ca-{}/particulier/operations/synthese.html",
				region.slug
			),
			j_validate: true,
		};

		let response: LoginResponse = http.post_form(SECURITY_CHECK, &form)?;
		match (response.url, response.error) {
			(_, Some(error)) => Err(BackendError::Rejected(error)),
			(None, None) => Err(BackendError::Rejected(
				"login was not accepted".to_owned(),
			)),
			(Some(_), None) => Ok(CaSession { http }),
		}
	}

	fn list_accounts(
		&self,
		session: &CaSession,
	) -> Result<Vec<AccountRef>, BackendError> {
		let accounts: Vec<Account> = session.http.get::<(), _>(ACCOUNTS, None)?;
		Ok(accounts.into_iter().map(Into::into).collect())
	}

	fn get_operations(
		&self,
		session: &CaSession,
		account: &AccountRef,
		query: &OperationQuery,
	) -> Result<OperationPage, BackendError> {
		let params = OperationsParams {
			compte_idx: account.id.clone(),
			grande_famille_code: account.family.clone(),
			id_devise: CURRENCY.to_owned(),
			date_debut: query.window.start_millis(),
			date_fin: query.window.end_millis(),
			count: query.count,
			start_index: query.cursor.clone(),
		};

		let holder: OperationsHolder = session.http.get(OPERATIONS, Some(&params))?;

		Ok(OperationPage {
			operations: holder.operations.into_iter().map(Into::into).collect(),
			next: if holder.has_next {
				holder.next_set_start_index
			} else {
				None
			},
		})
	}
}
