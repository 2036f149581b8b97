//! Canonical route definitions.
//!
//! A [`Route`] is the single locale-agnostic definition of an endpoint; the
//! loader expands it into one localized variant per locale. Routes are
//! collected in a [`RouteCollection`], whose insertion order is the match
//! priority (first declared wins).

use http::Method;
use std::collections::HashMap;

use crate::error::ConfigError;

/// A canonical, locale-agnostic route definition.
///
/// # Examples
///
/// ```
/// use i18n_router::route::Route;
/// use http::Method;
///
/// let route = Route::new("/users/{id}")
///     .with_method(Method::GET)
///     .with_requirement("id", r"\d+")
///     .with_default("page", "1");
/// assert_eq!(route.path, "/users/{id}");
/// ```
#[derive(Debug, Clone)]
pub struct Route {
	/// The path pattern, e.g. `/users/{id}`.
	pub path: String,
	/// Allowed HTTP methods; empty means any.
	pub methods: Vec<Method>,
	/// Allowed URL schemes; empty means any. A non-empty list also forces
	/// the first scheme during generation when the current one is not
	/// allowed.
	pub schemes: Vec<String>,
	/// Default parameter values merged into every match result.
	pub defaults: HashMap<String, String>,
	/// Per-parameter regex requirements for the inner matcher.
	pub requirements: HashMap<String, String>,
	/// Whether this route participates in localization at all.
	pub localizable: bool,
	/// Restricts the candidate locales for this route; `None` means the
	/// globally configured (or domain-owned) locale list applies.
	pub locales: Option<Vec<String>>,
	/// Extra static prefix prepended to prefixed localized patterns.
	pub prefix: Option<String>,
}

impl Route {
	/// Creates a route for the given path pattern.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			methods: Vec::new(),
			schemes: Vec::new(),
			defaults: HashMap::new(),
			requirements: HashMap::new(),
			localizable: true,
			locales: None,
			prefix: None,
		}
	}

	/// Restricts the route to an HTTP method. May be called repeatedly.
	pub fn with_method(mut self, method: Method) -> Self {
		self.methods.push(method);
		self
	}

	/// Restricts the route to a URL scheme. May be called repeatedly.
	pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.schemes.push(scheme.into().to_ascii_lowercase());
		self
	}

	/// Sets a default parameter value.
	pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.defaults.insert(name.into(), value.into());
		self
	}

	/// Sets a regex requirement for a path parameter.
	pub fn with_requirement(
		mut self,
		name: impl Into<String>,
		requirement: impl Into<String>,
	) -> Self {
		self.requirements.insert(name.into(), requirement.into());
		self
	}

	/// Marks the route as not localizable; it is carried through to the
	/// localized table unmodified.
	pub fn not_localized(mut self) -> Self {
		self.localizable = false;
		self
	}

	/// Restricts the candidate locales for this route, overriding the
	/// global (and domain) locale lists.
	pub fn with_locales<I, S>(mut self, locales: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.locales = Some(locales.into_iter().map(Into::into).collect());
		self
	}

	/// Sets an extra static prefix applied to prefixed localized patterns.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Whether the route accepts the given HTTP method.
	pub fn allows_method(&self, method: &Method) -> bool {
		self.methods.is_empty() || self.methods.contains(method)
	}

	/// Whether the route accepts the given URL scheme.
	pub fn allows_scheme(&self, scheme: &str) -> bool {
		self.schemes.is_empty() || self.schemes.iter().any(|s| s == scheme)
	}
}

/// An insertion-ordered collection of named canonical routes.
///
/// Names are unique; adding a duplicate fails. Iteration yields routes in
/// declaration order, which the router uses as match priority.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
	routes: Vec<(String, Route)>,
}

impl RouteCollection {
	/// Creates an empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a named route.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::DuplicateRouteName`] when the name is taken.
	pub fn add(&mut self, name: impl Into<String>, route: Route) -> Result<(), ConfigError> {
		let name = name.into();
		if self.routes.iter().any(|(n, _)| *n == name) {
			return Err(ConfigError::DuplicateRouteName(name));
		}
		self.routes.push((name, route));
		Ok(())
	}

	/// Looks up a route by name.
	pub fn get(&self, name: &str) -> Option<&Route> {
		self.routes
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, r)| r)
	}

	/// Iterates over `(name, route)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
		self.routes.iter().map(|(n, r)| (n.as_str(), r))
	}

	/// Number of routes in the collection.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Whether the collection is empty.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}
