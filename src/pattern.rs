//! Path pattern compilation, matching and generation.
//!
//! Patterns use `{name}` placeholders for single path segments and
//! `{name:*}` for the rest of the path. A placeholder can be constrained
//! with a per-parameter regex requirement supplied at compile time, which
//! replaces the default `[^/]+` segment matcher.

use std::collections::HashMap;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled path pattern.
///
/// Supports patterns like:
/// - `/search` - exact match
/// - `/users/{id}` - single path parameter
/// - `/users/{id}/posts/{post_id}` - multiple parameters
/// - `/static/{path:*}` - wildcard matching the rest of the path
///
/// # Examples
///
/// ```
/// use i18n_router::pattern::PathPattern;
///
/// let pattern = PathPattern::new("/users/{id}").unwrap();
/// let params = pattern.matches("/users/42").unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex.
	regex: regex::Regex,
	/// Parameter names in pattern order.
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a pattern without parameter requirements.
	pub fn new(pattern: &str) -> Result<Self, String> {
		Self::with_requirements(pattern, &HashMap::new())
	}

	/// Compiles a pattern, constraining placeholders with the given
	/// per-parameter regex requirements.
	///
	/// A requirement replaces the default `[^/]+` matcher for its
	/// placeholder, so `id => \d+` turns `{id}` into a digits-only
	/// segment.
	///
	/// # Errors
	///
	/// Returns an error if the pattern exceeds the length or segment
	/// limits, or if the compiled regex is invalid or too large.
	pub fn with_requirements(
		pattern: &str,
		requirements: &HashMap<String, String>,
	) -> Result<Self, String> {
		// Reject oversized patterns up front to prevent ReDoS
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(format!(
				"pattern length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			));
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(format!(
				"pattern has {} path segments, exceeding maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			));
		}

		let (regex_str, param_names) = Self::compile_pattern(pattern, requirements);

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| format!("failed to compile pattern regex: {}", e))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Compiles a pattern string into a regex and extracts parameter names.
	fn compile_pattern(
		pattern: &str,
		requirements: &HashMap<String, String>,
	) -> (String, Vec<String>) {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut chars = pattern.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				'{' => {
					let mut param = String::new();
					let mut is_wildcard = false;

					while let Some(&next) = chars.peek() {
						if next == '}' {
							chars.next();
							break;
						}
						if next == ':' {
							chars.next();
							if chars.peek() == Some(&'*') {
								chars.next();
								is_wildcard = true;
							}
							continue;
						}
						param.push(next);
						chars.next();
					}

					if let Some(requirement) = requirements.get(&param) {
						regex_str.push_str(&format!("(?P<{}>{})", param, requirement));
					} else if is_wildcard {
						// Wildcard: matches anything including path separators
						regex_str.push_str(&format!("(?P<{}>.*)", param));
					} else {
						// Normal: anything except slashes
						regex_str.push_str(&format!("(?P<{}>[^/]+)", param));
					}
					param_names.push(param);
				}
				'/' | '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '^' | '$' | '|' | '\\' => {
					// Escape regex special characters
					regex_str.push('\\');
					regex_str.push(c);
				}
				_ => {
					regex_str.push(c);
				}
			}
		}

		regex_str.push('$');
		(regex_str, param_names)
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether this pattern contains no placeholders.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Attempts to match a path, returning extracted parameters on success.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect()
		})
	}

	/// Checks whether this pattern would match the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Interpolates parameter values into the pattern.
	///
	/// Performs a single pass over the pattern; placeholder lookup is O(1)
	/// per parameter. Returns `None` when a placeholder has no value.
	pub fn interpolate(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut result = String::with_capacity(self.pattern.len());
		let mut chars = self.pattern.chars().peekable();

		while let Some(ch) = chars.next() {
			if ch == '{' {
				let spec: String = chars.by_ref().take_while(|&c| c != '}').collect();
				// Strip a wildcard marker like "path:*"
				let name = spec.split(':').next().unwrap_or(&spec);
				result.push_str(params.get(name)?);
			} else {
				result.push(ch);
			}
		}

		Some(result)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

/// Validates a parameter value used for URL generation.
///
/// Rejects values that could break out of their path segment: path
/// separators, query/fragment delimiters, backslashes and percent-encoded
/// sequences.
pub fn validate_param(value: &str) -> bool {
	!value
		.chars()
		.any(|c| matches!(c, '/' | '?' | '#' | '\\' | '%'))
}
