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
use crate::util::date::DateWindow;
use std::fmt;
use thiserror::Error;

/// A single problem found in the bank settings. Validation collects every
/// one of these rather than stopping at the first.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
	pub field: &'static str,
	pub message: String,
}

impl ValidationError {
	pub fn new(field: &'static str, message: impl Into<String>) -> Self {
		Self {
			field,
			message: message.into(),
		}
	}
}

/// All problems found in one validation pass.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} problem(s) in bank settings", self.0.len())?;
		for problem in &self.0 {
			write!(f, "\n  {}", problem)?;
		}
		Ok(())
	}
}

/// Anything the bank (or any other remote) did wrong at the transport or
/// protocol level.
#[derive(Debug, Error)]
pub enum BackendError {
	#[error("http error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("request failed with status {status}: {body}")]
	Status { status: u16, body: String },

	#[error("unexpected response: {0}")]
	Decode(String),

	#[error("rejected: {0}")]
	Rejected(String),
}

/// Bad credentials, a locked account and a dead network all look the same
/// from here.
#[derive(Debug, Error)]
#[error("could not authenticate against the bank")]
pub struct AuthError {
	#[from]
	source: BackendError,
}

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("failed to list accounts")]
	Accounts {
		#[source]
		source: BackendError,
	},

	#[error("failed to fetch transactions for account {account} in {window}")]
	Transactions {
		account: String,
		window: DateWindow,
		#[source]
		source: BackendError,
	},
}

/// The first fatal error of an import run.
#[derive(Debug, Error)]
pub enum PipelineError {
	#[error(transparent)]
	Invalid(#[from] ValidationErrors),

	#[error("import aborted")]
	Auth(#[from] AuthError),

	#[error("import aborted")]
	Fetch(#[from] FetchError),
}
