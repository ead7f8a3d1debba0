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
use crate::bank::region::Region;
use crate::error::{ValidationError, ValidationErrors};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

// Placeholders shipped in a fresh config. Every one of them must be replaced
// before the bank is contacted.
pub const REGION_PLACEHOLDER: &str = "paris";
pub const ACCOUNT_ID_PLACEHOLDER: &str = "XXXXXXXXXXX";
pub const PASSWORD_PLACEHOLDER: &str = "XXXXXX";
pub const IMPORT_ACCOUNT_PLACEHOLDER: &str = "XXXXXXXXXXX";
pub const LOOKBACK_DAYS_PLACEHOLDER: &str = "XX";
pub const MAX_TRANSACTIONS_PLACEHOLDER: &str = "XXX";

/// The `[bank]` section of the config, exactly as the user wrote it. Nothing
/// here is trusted until `validate` comes back empty.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
	pub region: String,
	pub department: Option<String>,
	pub account_id: String,
	pub password: String,
	pub import_accounts: Vec<String>,

	#[serde(deserialize_with = "deserialize_number_or_string")]
	pub lookback_days: String,

	#[serde(deserialize_with = "deserialize_number_or_string")]
	pub max_transactions: String,
}

impl Default for ConnectionSettings {
	fn default() -> Self {
		Self {
			region: REGION_PLACEHOLDER.to_owned(),
			department: None,
			account_id: ACCOUNT_ID_PLACEHOLDER.to_owned(),
			password: PASSWORD_PLACEHOLDER.to_owned(),
			import_accounts: vec![IMPORT_ACCOUNT_PLACEHOLDER.to_owned(); 3],
			lookback_days: LOOKBACK_DAYS_PLACEHOLDER.to_owned(),
			max_transactions: MAX_TRANSACTIONS_PLACEHOLDER.to_owned(),
		}
	}
}

// the password stays out of logs and panics
impl fmt::Debug for ConnectionSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConnectionSettings")
			.field("region", &self.region)
			.field("department", &self.department)
			.field("account_id", &self.account_id)
			.field("password", &"<redacted>")
			.field("import_accounts", &self.import_accounts)
			.field("lookback_days", &self.lookback_days)
			.field("max_transactions", &self.max_transactions)
			.finish()
	}
}

impl ConnectionSettings {
	/// Checks every field and reports every problem found, at most one per
	/// field. An empty result means the bank may be contacted.
	pub fn validate(&self) -> Vec<ValidationError> {
		let mut problems = Vec::new();

		if self.region == REGION_PLACEHOLDER {
			problems.push(ValidationError::new(
				"region",
				"please set your bank account region",
			));
		} else if Region::find(&self.region).is_none() {
			problems.push(ValidationError::new(
				"region",
				format!("unknown bank account region '{}'", self.region),
			));
		}

		if self.department.as_deref().map_or(true, |d| d.trim().is_empty()) {
			problems.push(ValidationError::new(
				"department",
				"please set your bank department",
			));
		}

		if !is_digits(&self.account_id)
			|| self.account_id.len() != ACCOUNT_ID_PLACEHOLDER.len()
		{
			problems.push(ValidationError::new(
				"account_id",
				format!(
					"your bank account ID must be {} digits long",
					ACCOUNT_ID_PLACEHOLDER.len()
				),
			));
		}

		if !is_digits(&self.password)
			|| self.password.len() != PASSWORD_PLACEHOLDER.len()
		{
			problems.push(ValidationError::new(
				"password",
				format!(
					"your bank password must be {} digits long",
					PASSWORD_PLACEHOLDER.len()
				),
			));
		}

		if self
			.import_accounts
			.iter()
			.all(|a| a.trim() == IMPORT_ACCOUNT_PLACEHOLDER)
			&& !self.import_accounts.is_empty()
		{
			problems.push(ValidationError::new(
				"import_accounts",
				"please set the list of account numbers to import",
			));
		}

		if parse_count(&self.lookback_days).is_none() {
			problems.push(ValidationError::new(
				"lookback_days",
				"the transaction lookback period must be a positive number of days",
			));
		}

		if parse_count(&self.max_transactions).is_none() {
			problems.push(ValidationError::new(
				"max_transactions",
				"the maximum number of transactions to fetch must be a positive number",
			));
		}

		problems
	}
}

/// Placeholders are made of `X`s, so the digit checks on the id and password
/// reject them too.
fn is_digits(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Any digit string is a valid count. Values past `u32::MAX` are clamped to
/// it.
fn parse_count(s: &str) -> Option<u32> {
	if is_digits(s) {
		Some(s.parse().unwrap_or(u32::MAX))
	} else {
		None
	}
}

/// What the bank needs to open a session.
#[derive(Clone)]
pub struct Credentials {
	region: &'static Region,
	department: String,
	account_id: String,
	password: String,
}

impl Credentials {
	pub fn region(&self) -> &'static Region {
		self.region
	}

	pub fn department(&self) -> &str {
		&self.department
	}

	pub fn account_id(&self) -> &str {
		&self.account_id
	}

	/// The password one digit at a time, which is how the bank's virtual
	/// keypad takes it.
	pub fn password_digits(&self) -> Vec<u8> {
		self.password.bytes().map(|b| b - b'0').collect()
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("region", &self.region.slug)
			.field("department", &self.department)
			.field("account_id", &self.account_id)
			.finish_non_exhaustive()
	}
}

/// Settings that passed validation. This is the only way to get hold of
/// `Credentials`, so a session can never be opened on unchecked input.
#[derive(Clone, Debug)]
pub struct ValidatedSettings {
	pub credentials: Credentials,
	pub enabled_accounts: BTreeSet<String>,
	pub lookback_days: u32,
	pub max_transactions: u32,
}

impl TryFrom<&ConnectionSettings> for ValidatedSettings {
	type Error = ValidationErrors;

	fn try_from(s: &ConnectionSettings) -> Result<Self, Self::Error> {
		let problems = s.validate();
		if !problems.is_empty() {
			return Err(ValidationErrors(problems));
		}

		// validate() has vouched for all of these
		let invariant = |field: &'static str| {
			ValidationErrors(vec![ValidationError::new(field, "invalid")])
		};

		Ok(ValidatedSettings {
			credentials: Credentials {
				region: Region::find(&s.region)
					.ok_or_else(|| invariant("region"))?,
				department: s
					.department
					.clone()
					.ok_or_else(|| invariant("department"))?,
				account_id: s.account_id.clone(),
				password: s.password.clone(),
			},
			enabled_accounts: s
				.import_accounts
				.iter()
				.map(|a| a.trim().to_owned())
				.filter(|a| !a.is_empty())
				.collect(),
			lookback_days: parse_count(&s.lookback_days)
				.ok_or_else(|| invariant("lookback_days"))?,
			max_transactions: parse_count(&s.max_transactions)
				.ok_or_else(|| invariant("max_transactions"))?,
		})
	}
}

/// Accepts `30` as well as `"30"`, so that the digit checks can run on what
/// the user actually wrote.
fn deserialize_number_or_string<'de, D>(
	deserializer: D,
) -> Result<String, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	match value {
		serde_json::Value::Number(num) => Ok(num.to_string()),
		serde_json::Value::String(s) => Ok(s),
		_ => Err(serde::de::Error::custom("expected a number or a string")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn valid() -> ConnectionSettings {
		ConnectionSettings {
			region: "sudmed".to_owned(),
			department: Some("34".to_owned()),
			account_id: "12345678901".to_owned(),
			password: "975310".to_owned(),
			import_accounts: vec!["111".to_owned(), " 222 ".to_owned()],
			lookback_days: "30".to_owned(),
			max_transactions: "100".to_owned(),
		}
	}

	fn fields(problems: &[ValidationError]) -> Vec<&str> {
		problems.iter().map(|p| p.field).collect()
	}

	#[test]
	fn test_all_placeholders_give_seven_problems() {
		let problems = ConnectionSettings::default().validate();
		assert_eq!(
			fields(&problems),
			vec![
				"region",
				"department",
				"account_id",
				"password",
				"import_accounts",
				"lookback_days",
				"max_transactions",
			]
		);
	}

	#[test]
	fn test_valid_settings_give_no_problems() {
		assert!(valid().validate().is_empty());
	}

	#[test]
	fn test_unknown_region() {
		let settings = ConnectionSettings {
			region: "atlantis".to_owned(),
			..valid()
		};
		let problems = settings.validate();
		assert_eq!(fields(&problems), vec!["region"]);
		assert!(problems[0].message.contains("atlantis"));
	}

	#[test]
	fn test_blank_department() {
		let settings = ConnectionSettings {
			department: Some("  ".to_owned()),
			..valid()
		};
		assert_eq!(fields(&settings.validate()), vec!["department"]);
	}

	#[test]
	fn test_account_id_shape() {
		for bad in ["1234567890", "123456789012", "1234567890a", ""] {
			let settings = ConnectionSettings {
				account_id: bad.to_owned(),
				..valid()
			};
			assert_eq!(fields(&settings.validate()), vec!["account_id"], "{bad}");
		}
	}

	#[test]
	fn test_password_shape() {
		for bad in ["12345", "1234567", "12a456", "１２３４５６"] {
			let settings = ConnectionSettings {
				password: bad.to_owned(),
				..valid()
			};
			assert_eq!(fields(&settings.validate()), vec!["password"], "{bad}");
		}
	}

	#[test]
	fn test_counts_must_be_digit_strings() {
		let settings = ConnectionSettings {
			lookback_days: "-3".to_owned(),
			max_transactions: "1e3".to_owned(),
			..valid()
		};
		assert_eq!(
			fields(&settings.validate()),
			vec!["lookback_days", "max_transactions"]
		);

		let zero = ConnectionSettings {
			lookback_days: "0".to_owned(),
			max_transactions: "0".to_owned(),
			..valid()
		};
		assert!(zero.validate().is_empty());
	}

	#[test]
	fn test_huge_counts_are_clamped() {
		let settings = ConnectionSettings {
			lookback_days: "5000000000".to_owned(),
			max_transactions: "99999999999999999999999".to_owned(),
			..valid()
		};
		assert!(settings.validate().is_empty());

		let validated = ValidatedSettings::try_from(&settings).unwrap();
		assert_eq!(validated.lookback_days, u32::MAX);
		assert_eq!(validated.max_transactions, u32::MAX);
	}

	#[test]
	fn test_problems_are_reported_together() {
		let settings = ConnectionSettings {
			region: "atlantis".to_owned(),
			password: "12ab56".to_owned(),
			lookback_days: "-3".to_owned(),
			..valid()
		};
		assert_eq!(
			fields(&settings.validate()),
			vec!["region", "password", "lookback_days"]
		);
	}

	#[test]
	fn test_validate_does_not_mutate() {
		let settings = ConnectionSettings::default();
		let before = format!("{:?}", settings);
		let _ = settings.validate();
		assert_eq!(format!("{:?}", settings), before);
	}

	#[test]
	fn test_validated_settings() {
		let validated = ValidatedSettings::try_from(&valid()).unwrap();
		assert_eq!(validated.credentials.region().slug, "sudmed");
		assert_eq!(validated.credentials.password_digits(), vec![9u8, 7, 5, 3, 1, 0]);
		assert_eq!(validated.lookback_days, 30);
		assert_eq!(validated.max_transactions, 100);
		assert_eq!(
			validated.enabled_accounts,
			["111", "222"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
		);
	}

	#[test]
	fn test_validated_settings_refuses_placeholders() {
		let err = ValidatedSettings::try_from(&ConnectionSettings::default())
			.unwrap_err();
		assert_eq!(err.0.len(), 7);
	}

	#[test]
	fn test_password_never_in_debug_output() {
		let settings = valid();
		let validated = ValidatedSettings::try_from(&settings).unwrap();
		assert!(!format!("{:?}", settings).contains("975310"));
		assert!(!format!("{:?}", validated).contains("975310"));
	}

	#[test]
	fn test_deserialize_from_toml() {
		let settings: ConnectionSettings = toml::from_str(
			r#"
			region = "sudmed"
			department = "34"
			account_id = "12345678901"
			password = "123456"
			import_accounts = ["111", "222"]
			lookback_days = 30
			max_transactions = "100"
			"#,
		)
		.unwrap();

		assert_eq!(settings.lookback_days, "30");
		assert_eq!(settings.max_transactions, "100");
		assert!(settings.validate().is_empty());
	}
}
