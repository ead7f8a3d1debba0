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

/// A wildcard pattern as written in the rule tables. `*` is only meaningful
/// at either end, and there is no way to escape it.
///
/// The variants are listed in the order they are tried: a pattern that both
/// starts and ends with `*` is always a substring match, even if it is a bare
/// `*`, which therefore matches anything.
#[derive(Debug, PartialEq, Eq)]
pub enum Pattern<'a> {
	Contains(&'a str),
	EndsWith(&'a str),
	StartsWith(&'a str),
	Exact(&'a str),
}

impl<'a> Pattern<'a> {
	pub fn parse(raw: &'a str) -> Self {
		if raw.starts_with('*') && raw.ends_with('*') {
			// "*" alone has no inner part
			Pattern::Contains(raw.get(1..raw.len() - 1).unwrap_or(""))
		} else if let Some(suffix) = raw.strip_prefix('*') {
			Pattern::EndsWith(suffix)
		} else if let Some(prefix) = raw.strip_suffix('*') {
			Pattern::StartsWith(prefix)
		} else {
			Pattern::Exact(raw)
		}
	}

	/// Case-insensitive test against a candidate string.
	pub fn matches(&self, candidate: &str) -> bool {
		let candidate = candidate.to_uppercase();
		match self {
			Pattern::Contains(s) => candidate.contains(&s.to_uppercase()),
			Pattern::EndsWith(s) => candidate.ends_with(&s.to_uppercase()),
			Pattern::StartsWith(s) => candidate.starts_with(&s.to_uppercase()),
			Pattern::Exact(s) => candidate == s.to_uppercase(),
		}
	}
}

pub fn matches(pattern: &str, candidate: &str) -> bool {
	Pattern::parse(pattern).matches(candidate)
}

/// Whether any of the patterns matches.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], candidate: &str) -> bool {
	patterns.iter().any(|p| matches(p.as_ref(), candidate))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_precedence() {
		assert_eq!(Pattern::parse("*x*"), Pattern::Contains("x"));
		assert_eq!(Pattern::parse("*x"), Pattern::EndsWith("x"));
		assert_eq!(Pattern::parse("x*"), Pattern::StartsWith("x"));
		assert_eq!(Pattern::parse("x"), Pattern::Exact("x"));
		assert_eq!(Pattern::parse("*"), Pattern::Contains(""));
		assert_eq!(Pattern::parse("**"), Pattern::Contains(""));
		assert_eq!(Pattern::parse("***"), Pattern::Contains("*"));
		assert_eq!(Pattern::parse(""), Pattern::Exact(""));
	}

	#[test]
	fn test_catch_all() {
		for candidate in ["", "anything", "CARTE X1234 SUPERMARCHE", "*"] {
			assert!(matches("*", candidate), "* should match {:?}", candidate);
			assert!(matches("**", candidate), "** should match {:?}", candidate);
		}
	}

	#[test]
	fn test_case_insensitive() {
		assert!(matches("ABC", "abc"));
		assert!(matches("abc", "ABC"));
		assert!(matches("*Shop*", "WE SHOP HERE"));
		assert!(matches("prél*", "PRÉLÈVEMENT EDF"));
	}

	#[test]
	fn test_contains() {
		assert!(matches("*shop*", "we shop here"));
		assert!(matches("*shop*", "shop"));
		assert!(!matches("*shop*", "we sho here"));
	}

	#[test]
	fn test_suffix() {
		assert!(matches("*mart", "hypermart"));
		assert!(matches("*mart", "mart"));
		assert!(!matches("*mart", "hypermarket"));
	}

	#[test]
	fn test_prefix() {
		assert!(matches("shop*", "shopping"));
		assert!(matches("shop*", "shop"));
		assert!(!matches("shop*", "we shop"));
	}

	#[test]
	fn test_exact() {
		assert!(matches("shop", "SHOP"));
		assert!(!matches("shop", "shopping"));
		assert!(!matches("shop", "eshop"));
		assert!(matches("", ""));
		assert!(!matches("", "x"));
	}

	#[test]
	fn test_inner_star_is_literal() {
		assert!(matches("a*b", "A*B"));
		assert!(!matches("a*b", "axb"));
	}

	#[test]
	fn test_matches_any() {
		let patterns = vec!["*edf*", "free mobile*"];
		assert!(matches_any(&patterns, "PRLV EDF CLIENTS"));
		assert!(matches_any(&patterns, "FREE MOBILE 0612"));
		assert!(!matches_any(&patterns, "SNCF"));
		assert!(!matches_any::<&str>(&[], "SNCF"));
	}
}
