/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
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

use chrono::{Days, Local, NaiveDate, NaiveTime};
use std::fmt;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A closed range of calendar days. Both ends are included, and the
/// granularity is the date, never the time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
	start: NaiveDate,
	end: NaiveDate,
}

impl DateWindow {
	/// The window ending on `today` and reaching back `days` calendar days.
	/// Zero days is today only.
	pub fn lookback(today: NaiveDate, days: u32) -> Self {
		let start = today
			.checked_sub_days(Days::new(days as u64))
			.unwrap_or(NaiveDate::MIN);

		Self { start, end: today }
	}

	pub fn contains(&self, date: NaiveDate) -> bool {
		self.start <= date && date <= self.end
	}

	/// Local midnight of the first day, in epoch milliseconds.
	pub fn start_millis(&self) -> i64 {
		local_midnight_millis(self.start)
	}

	/// Last millisecond of the final day, local time.
	pub fn end_millis(&self) -> i64 {
		match self.end.succ_opt() {
			Some(next) => local_midnight_millis(next) - 1,
			None => local_midnight_millis(self.end) + MILLIS_PER_DAY - 1,
		}
	}
}

/// Window dates are local calendar dates, and so are operation dates.
fn local_midnight_millis(date: NaiveDate) -> i64 {
	let midnight = date.and_time(NaiveTime::MIN);
	match midnight.and_local_timezone(Local).earliest() {
		Some(dt) => dt.timestamp_millis(),
		// midnight skipped by a DST change
		None => midnight.and_utc().timestamp_millis(),
	}
}

impl fmt::Display for DateWindow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..={}", self.start, self.end)
	}
}
