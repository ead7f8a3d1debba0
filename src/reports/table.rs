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
/// Plain column printer for reports made of many single-line rows, such as
/// the dry-run preview or the account listing.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

pub enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(self.fill(row)));
	}

	pub fn add_row(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Data(self.fill(row)));
	}

	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			if let Some(flag) = self.right_align.get_mut(col) {
				*flag = true;
			}
		}
	}

	pub fn print(&self) {
		println!();
		print!("{}", self.render());
	}

	pub fn render(&self) -> String {
		let mut max_widths = vec![0; self.column_count];

		for row in &self.rows {
			if let Row::Data(cells) | Row::Header(cells) = row {
				for (i, value) in cells.iter().enumerate() {
					max_widths[i] = max_widths[i].max(width(value));
				}
			}
		}

		let mut out = String::new();
		for row in &self.rows {
			let line = match row {
				Row::Header(cells) => cells
					.iter()
					.enumerate()
					.map(|(i, v)| center_align(v, max_widths[i]))
					.collect::<Vec<_>>()
					.join(" | "),
				Row::Data(cells) => cells
					.iter()
					.enumerate()
					.map(|(i, v)| self.align(i, v, max_widths[i]))
					.collect::<Vec<_>>()
					.join("   "),
				Row::Separator => {
					let total = max_widths.iter().sum::<usize>()
						+ 3 * self.column_count.saturating_sub(1);
					"-".repeat(total)
				},
			};
			out.push_str(line.trim_end());
			out.push('\n');
		}
		out
	}

	/// Pads or cuts a row to exactly `column_count` cells.
	fn fill(&self, row: Vec<&str>) -> Vec<String> {
		let mut cells: Vec<String> = row
			.into_iter()
			.take(self.column_count)
			.map(str::to_string)
			.collect();
		cells.resize(self.column_count, String::new());
		cells
	}

	fn align(&self, col: usize, value: &str, col_width: usize) -> String {
		let pad = " ".repeat(col_width.saturating_sub(width(value)));
		if self.right_align[col] {
			format!("{}{}", pad, value)
		} else {
			format!("{}{}", value, pad)
		}
	}
}

// bank descriptions carry accented letters, so count chars rather than bytes
fn width(value: &str) -> usize {
	value.chars().count()
}

fn center_align(value: &str, col_width: usize) -> String {
	let len = width(value);
	if len >= col_width {
		return value.to_string();
	}
	let total_padding = col_width - len;
	let left_padding = total_padding / 2;
	let right_padding = total_padding - left_padding;

	format!(
		"{}{}{}",
		" ".repeat(left_padding),
		value,
		" ".repeat(right_padding)
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render() {
		let mut table = Table::new(3);
		table.right_align(vec![2]);
		table.add_header(vec!["Date", "Description", "Amount"]);
		table.add_separator();
		table.add_row(vec!["2024-11-15", "CARTE CARREFOUR", "-31.20"]);
		table.add_row(vec!["2024-11-16", "VIR SALAIRE", "2100.00"]);

		assert_eq!(
			table.render(),
			"   Date    |   Description   | Amount\n\
			 --------------------------------------\n\
			 2024-11-15   CARTE CARREFOUR    -31.20\n\
			 2024-11-16   VIR SALAIRE       2100.00\n"
		);
	}

	#[test]
	fn test_accents_count_as_one_column() {
		let mut table = Table::new(2);
		table.add_row(vec!["PRÉLÈVEMENT", "x"]);
		table.add_row(vec!["PRELEVEMENT", "y"]);

		let rendered = table.render();
		let lines: Vec<&str> = rendered.lines().collect();
		assert_eq!(lines[0].chars().count(), lines[1].chars().count());
	}

	#[test]
	fn test_short_and_long_rows_are_fitted() {
		let mut table = Table::new(2);
		table.right_align(vec![5]);
		table.add_row(vec!["a"]);
		table.add_row(vec!["b", "c", "dropped"]);

		assert_eq!(table.render(), "a\nb   c\n");
	}

	#[test]
	fn test_lines_are_trimmed_and_terminated() {
		let mut table = Table::new(2);
		table.add_header(vec!["Account", "Label"]);
		table.add_row(vec!["111", ""]);
		table.add_row(vec!["222", "Livret A"]);

		let rendered = table.render();
		assert!(rendered.ends_with('\n'));
		assert_eq!(rendered.lines().count(), 3);
		assert!(rendered.lines().all(|l| l == l.trim_end()));
		assert_eq!(rendered.lines().nth(1), Some("111"));
	}
}
