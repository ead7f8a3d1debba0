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
use crate::import::pipeline::ClassifiedTransaction;
use anyhow::Error;
use tracing::info;

pub mod firefly;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
	Created,
	Duplicate,
	Skipped,
}

/// Wherever classified transactions end up.
pub trait LedgerSink {
	fn submit(&mut self, item: &ClassifiedTransaction) -> Result<Submission, Error>;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
	pub created: usize,
	pub duplicates: usize,
	pub skipped: usize,
}

/// Submits every item in order and stops at the first failure.
pub fn sync(
	sink: &mut impl LedgerSink,
	items: &[ClassifiedTransaction],
) -> Result<SyncSummary, Error> {
	let mut summary = SyncSummary::default();

	for item in items {
		match sink.submit(item)? {
			Submission::Created => summary.created += 1,
			Submission::Duplicate => summary.duplicates += 1,
			Submission::Skipped => summary.skipped += 1,
		}
	}

	info!(
		created = summary.created,
		duplicates = summary.duplicates,
		skipped = summary.skipped,
		"ledger sync complete"
	);
	Ok(summary)
}
