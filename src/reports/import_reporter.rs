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
use crate::bank::client::AccountRef;
use crate::classify::rules::{Axis, Classification};
use crate::import::pipeline::ClassifiedTransaction;
use crate::import::transfers::TransferLeg;
use crate::reports::table::Table;
use std::collections::BTreeSet;

pub struct ImportReporter {
	items: Vec<ClassifiedTransaction>,
}

impl ImportReporter {
	pub fn new(mut items: Vec<ClassifiedTransaction>) -> Self {
		items.sort_by(|a, b| {
			(a.transaction.date, &a.account.number)
				.cmp(&(b.transaction.date, &b.account.number))
		});

		Self { items }
	}

	/// What an import would send, one row per transaction. Several labels on
	/// an axis are all shown; the ledger would get none of them.
	pub fn preview(&self) -> Table {
		let mut table = Table::new(8);
		table.right_align(vec![2]);
		table.add_header(vec![
			"Date",
			"Account",
			"Amount",
			"Description",
			"Rename",
			"Category",
			"Tags",
			"Transfer",
		]);
		table.add_separator();

		for item in &self.items {
			let t = &item.transaction;
			let c = &item.classification;
			let amount = format!("{} {}", t.amount, t.currency);
			let transfer = item.transfer.map(|l| l.to_string()).unwrap_or_default();

			table.add_row(vec![
				&t.date.to_string(),
				item.account.number.trim(),
				&amount,
				&t.description,
				&join(c.axis(Axis::Rename)),
				&join(c.axis(Axis::Category)),
				&join(c.axis(Axis::Tag)),
				&transfer,
			]);
		}

		table
	}

	pub fn print_preview(&self) {
		if self.items.is_empty() {
			println!("No transactions");
			return;
		}
		self.preview().print();
	}
}

pub fn accounts_table(accounts: &[AccountRef]) -> Table {
	let mut table = Table::new(3);
	table.add_header(vec!["Number", "Label", "Family"]);
	table.add_separator();
	for account in accounts {
		table.add_row(vec![account.number.trim(), &account.label, &account.family]);
	}
	table
}

pub fn print_accounts(accounts: &[AccountRef]) {
	if accounts.is_empty() {
		println!("No enabled accounts found");
		return;
	}
	accounts_table(accounts).print();
}

/// One `axis: labels` line per axis that matched, then the transfer leg if
/// one was detected.
pub fn classification_lines(
	classification: &Classification,
	transfer: Option<TransferLeg>,
) -> Vec<String> {
	let mut lines: Vec<String> = Axis::ALL
		.iter()
		.filter(|axis| !classification.axis(**axis).is_empty())
		.map(|axis| format!("{}: {}", axis, join(classification.axis(*axis))))
		.collect();

	if let Some(leg) = transfer {
		lines.push(format!("transfer: {}", leg));
	}
	lines
}

pub fn print_classification(
	classification: &Classification,
	transfer: Option<TransferLeg>,
) {
	if classification.is_empty() && transfer.is_none() {
		println!("No match");
		return;
	}
	for line in classification_lines(classification, transfer) {
		println!("{}", line);
	}
}

fn join(labels: &BTreeSet<String>) -> String {
	labels.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
