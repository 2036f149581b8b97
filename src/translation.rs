//! Translation lookup for route patterns.
//!
//! The pattern generation strategy looks up each route name in a
//! translation catalog scoped to a fixed domain (`"routes"` by default).
//! The contract is deliberately echo-based: a lookup that finds no
//! translation returns the key unchanged, and the strategy detects absence
//! of translation by comparing the result against the key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Translation lookup used during pattern generation.
///
/// Implementations must return the key unchanged when no translation
/// exists; the strategy relies on this exact echo behavior.
pub trait RouteTranslator: Send + Sync {
	/// Translates `key` in `domain` for `locale`, echoing the key when no
	/// translation exists.
	fn translate(&self, key: &str, domain: &str, locale: &str) -> String;

	/// External resources (e.g. translation files) backing the given
	/// locale, reported for cache invalidation.
	fn resources(&self, locale: &str) -> Vec<PathBuf> {
		let _ = locale;
		Vec::new()
	}
}

/// A translator that never translates anything: every lookup echoes its
/// key, so the strategy always falls back to the route's own pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl RouteTranslator for IdentityTranslator {
	fn translate(&self, key: &str, _domain: &str, _locale: &str) -> String {
		key.to_string()
	}
}

/// A translation catalog for one locale.
///
/// Messages are grouped by translation domain; route patterns live in the
/// `"routes"` domain by convention.
///
/// # Examples
///
/// ```
/// use i18n_router::translation::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new("de");
/// catalog.add("routes", "welcome", "/willkommen-auf-unserer-webseite");
///
/// assert_eq!(
///     catalog.get("routes", "welcome"),
///     Some("/willkommen-auf-unserer-webseite")
/// );
/// assert_eq!(catalog.get("routes", "missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	locale: String,
	domains: HashMap<String, HashMap<String, String>>,
	resources: Vec<PathBuf>,
}

impl MessageCatalog {
	/// Creates an empty catalog for the given locale.
	pub fn new(locale: impl Into<String>) -> Self {
		Self {
			locale: locale.into(),
			domains: HashMap::new(),
			resources: Vec::new(),
		}
	}

	/// The locale this catalog serves.
	pub fn locale(&self) -> &str {
		&self.locale
	}

	/// Adds a translation to a domain.
	pub fn add(
		&mut self,
		domain: impl Into<String>,
		key: impl Into<String>,
		text: impl Into<String>,
	) {
		self.domains
			.entry(domain.into())
			.or_default()
			.insert(key.into(), text.into());
	}

	/// Records an external resource this catalog was loaded from.
	///
	/// Parsing of translation files happens outside this crate; loaders
	/// register the file path here so the route table can report which
	/// resources it depends on.
	pub fn add_resource(&mut self, path: impl AsRef<Path>) {
		self.resources.push(path.as_ref().to_path_buf());
	}

	/// Looks up a translation.
	pub fn get(&self, domain: &str, key: &str) -> Option<&str> {
		self.domains
			.get(domain)
			.and_then(|messages| messages.get(key))
			.map(String::as_str)
	}

	/// Resources registered via [`add_resource`](Self::add_resource).
	pub fn resources(&self) -> &[PathBuf] {
		&self.resources
	}
}

/// A [`RouteTranslator`] over a set of per-locale catalogs.
///
/// Lookups try the exact locale first, then fall back to the bare language
/// tag (`en_US` falls back to `en`), then echo the key.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
	catalogs: HashMap<String, MessageCatalog>,
}

impl CatalogTranslator {
	/// Creates a translator with no catalogs (every lookup echoes).
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a catalog, keyed by its locale. Replaces any catalog already
	/// registered for that locale.
	pub fn add_catalog(&mut self, catalog: MessageCatalog) {
		self.catalogs.insert(catalog.locale().to_string(), catalog);
	}

	/// Splits a locale like `en_US` or `en-US` down to its language tag.
	fn language_of(locale: &str) -> &str {
		locale.split(['_', '-']).next().unwrap_or(locale)
	}

	fn lookup(&self, key: &str, domain: &str, locale: &str) -> Option<&str> {
		if let Some(text) = self
			.catalogs
			.get(locale)
			.and_then(|catalog| catalog.get(domain, key))
		{
			return Some(text);
		}

		let language = Self::language_of(locale);
		if language != locale {
			return self
				.catalogs
				.get(language)
				.and_then(|catalog| catalog.get(domain, key));
		}

		None
	}
}

impl RouteTranslator for CatalogTranslator {
	fn translate(&self, key: &str, domain: &str, locale: &str) -> String {
		match self.lookup(key, domain, locale) {
			Some(text) => text.to_string(),
			None => key.to_string(),
		}
	}

	fn resources(&self, locale: &str) -> Vec<PathBuf> {
		let mut resources = Vec::new();
		if let Some(catalog) = self.catalogs.get(locale) {
			resources.extend_from_slice(catalog.resources());
		}
		let language = Self::language_of(locale);
		if language != locale
			&& let Some(catalog) = self.catalogs.get(language)
		{
			resources.extend_from_slice(catalog.resources());
		}
		resources
	}
}
