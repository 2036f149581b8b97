//! Per-request context for matching and generation.
//!
//! The router itself holds no request state; every `match`/`generate`
//! call receives a [`RequestContext`] value, so concurrent requests never
//! share mutable state.

use http::Method;

/// The request-scoped facts the router needs: current host, scheme, HTTP
/// method and (when already known) the active locale.
///
/// # Examples
///
/// ```
/// use i18n_router::context::RequestContext;
///
/// let ctx = RequestContext::new("en.host", "https").with_locale("en");
/// assert_eq!(ctx.host, "en.host");
/// assert_eq!(ctx.locale.as_deref(), Some("en"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
	/// Host the request arrived on.
	pub host: String,
	/// URL scheme of the request.
	pub scheme: String,
	/// HTTP method of the request.
	pub method: Method,
	/// The active locale, when something upstream already pinned one.
	pub locale: Option<String>,
}

impl RequestContext {
	/// Creates a context for the given host and scheme, method `GET`, no
	/// active locale.
	pub fn new(host: impl Into<String>, scheme: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			scheme: scheme.into().to_ascii_lowercase(),
			method: Method::GET,
			locale: None,
		}
	}

	/// Sets the HTTP method.
	pub fn with_method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Pins the active locale.
	pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());
		self
	}
}

impl Default for RequestContext {
	fn default() -> Self {
		Self::new("localhost", "http")
	}
}
