//! Error types for localized routing.
//!
//! Build-time configuration problems, request-time match failures and
//! URL-generation failures are kept in separate enums so callers can map
//! them to their own responses (configuration errors abort startup, match
//! errors map to 404/406, generation errors indicate broken links).

use thiserror::Error;

/// Errors detected while building the localized route table.
///
/// All of these are fatal: the table build fails fast instead of producing
/// a partially localized table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// A domain entry has no default locale configured.
	#[error("domain '{0}' has no default locale")]
	MissingDefaultLocale(String),

	/// A domain's default locale is not part of its own locale list.
	#[error("default locale '{locale}' of domain '{domain}' is not in the domain's locale list")]
	DefaultLocaleNotInDomain {
		/// Domain key (usually a hostname).
		domain: String,
		/// The misconfigured default locale.
		locale: String,
	},

	/// A locale is claimed by more than one domain.
	#[error("locale '{locale}' belongs to both domain '{first}' and domain '{second}'")]
	AmbiguousLocaleOwnership {
		/// The doubly-owned locale.
		locale: String,
		/// Domain that registered the locale first.
		first: String,
		/// Domain that registered it again.
		second: String,
	},

	/// Two canonical routes share one name.
	#[error("route name '{0}' is registered twice")]
	DuplicateRouteName(String),

	/// A route pattern (or a generated localized variant) failed to compile.
	#[error("invalid pattern for route '{name}': {reason}")]
	InvalidPattern {
		/// Canonical route name.
		name: String,
		/// Compiler diagnostic.
		reason: String,
	},
}

/// Errors returned by [`I18nRouter::match_path`](crate::router::I18nRouter::match_path).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
	/// No localized pattern matches the request path. Maps to 404.
	#[error("no route found for path '{0}'")]
	ResourceNotFound(String),

	/// A pattern matched, but none of its locales is served on the current
	/// host. Also maps to 404; the allowed hosts are reported so callers
	/// can redirect.
	#[error("the route '{route}' is not available on the current host '{host}', but only on these hosts: {hosts}", hosts = .allowed_hosts.join(", "))]
	HostNotAllowed {
		/// Canonical route name.
		route: String,
		/// Host the request arrived on.
		host: String,
		/// Hosts that do serve the route, in locale-list order.
		allowed_hosts: Vec<String>,
	},

	/// A pattern matched on this host but the locale could not be settled.
	/// Maps to 406.
	#[error("the requested language {requested} is not available; available languages: {languages}", requested = .requested.as_deref().map(|l| format!("'{l}'")).unwrap_or_else(|| "(none)".to_string()), languages = .available.join(", "))]
	NotAcceptableLanguage {
		/// The locale pinned by the request context, if any.
		requested: Option<String>,
		/// Locales the matched route is actually served in.
		available: Vec<String>,
	},
}

/// Errors returned by [`I18nRouter::generate`](crate::router::I18nRouter::generate).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
	/// No localized route exists for the requested name and locale.
	/// Usually a broken link in application code.
	#[error("no route '{name}' for locale '{locale}'")]
	NotFound {
		/// Canonical route name.
		name: String,
		/// The locale the caller resolved to.
		locale: String,
	},

	/// A pattern placeholder had no value in the parameter map.
	#[error("missing parameter '{param}' for route '{name}'")]
	MissingParameter {
		/// Canonical route name.
		name: String,
		/// Placeholder without a value.
		param: String,
	},

	/// A parameter value contains characters that would break out of its
	/// path segment (separators, query/fragment delimiters, encoded
	/// traversal sequences).
	#[error("invalid value for parameter '{param}': contains unsafe characters")]
	InvalidParameter {
		/// Offending parameter name.
		param: String,
	},

	/// Leftover parameters could not be encoded into a query string.
	#[error("failed to encode query string: {0}")]
	QueryEncoding(String),
}
