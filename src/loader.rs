//! Expansion of canonical routes into the localized route table.
//!
//! The loader runs once per build, outside the request-serving hot path:
//! it filters canonical routes through the exclusion strategy, expands the
//! remaining ones via the pattern generation strategy, and produces an
//! immutable [`LocalizedRouteTable`]. The table also records the external
//! translation resources consulted during the build so an outer cache
//! layer can invalidate on changes.

use http::Method;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::error::ConfigError;
use crate::pattern::PathPattern;
use crate::route::{Route, RouteCollection};
use crate::strategy::{GeneratedPatterns, PatternGenerationStrategy, RouteExclusionStrategy};
use crate::translation::RouteTranslator;

/// The parameter name carrying the resolved locale in match results and
/// generation parameters.
pub const LOCALE_PARAM: &str = "_locale";

/// One (canonical route, locale) expansion with its own compiled pattern.
///
/// Identity is structured rather than name-mangled: the canonical name,
/// locale and owning domain are stored as separate fields, so recovering
/// them from a matched route is trivially collision-free. A `locale` of
/// `None` marks a pass-through route that was excluded from localization
/// and serves its canonical pattern unchanged.
#[derive(Debug, Clone)]
pub struct LocalizedRoute {
	canonical_name: String,
	locale: Option<String>,
	domain: Option<String>,
	pattern: PathPattern,
	methods: Vec<Method>,
	schemes: Vec<String>,
	defaults: HashMap<String, String>,
}

impl LocalizedRoute {
	/// The canonical route name this expansion belongs to.
	pub fn canonical_name(&self) -> &str {
		&self.canonical_name
	}

	/// The locale this route serves; `None` for pass-through routes.
	pub fn locale(&self) -> Option<&str> {
		self.locale.as_deref()
	}

	/// The domain key owning this route, for domain-grouped tables.
	pub fn domain(&self) -> Option<&str> {
		self.domain.as_deref()
	}

	/// The compiled localized pattern.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// Default parameter values, including the injected `_locale`.
	pub fn defaults(&self) -> &HashMap<String, String> {
		&self.defaults
	}

	/// Allowed URL schemes; empty means any.
	pub fn schemes(&self) -> &[String] {
		&self.schemes
	}

	/// Whether this is a pass-through (excluded) route.
	pub fn is_pass_through(&self) -> bool {
		self.locale.is_none()
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

/// The full ordered collection of localized routes.
///
/// Built once and read-only afterwards; the router shares it behind an
/// `Arc` and swaps the whole table atomically on rebuild, so concurrent
/// readers never observe a partially built table.
#[derive(Debug, Default)]
pub struct LocalizedRouteTable {
	routes: Vec<LocalizedRoute>,
	index: HashMap<(String, Option<String>), usize>,
	resources: Vec<PathBuf>,
}

impl LocalizedRouteTable {
	/// Iterates over localized routes in match-priority order.
	pub fn iter(&self) -> impl Iterator<Item = &LocalizedRoute> {
		self.routes.iter()
	}

	/// Number of localized routes in the table.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Whether the table holds no routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Looks up the expansion of `name` for `locale`, falling back to the
	/// pass-through entry when the route was excluded from localization.
	pub fn get(&self, name: &str, locale: &str) -> Option<&LocalizedRoute> {
		self.index
			.get(&(name.to_string(), Some(locale.to_string())))
			.or_else(|| self.index.get(&(name.to_string(), None)))
			.map(|&i| &self.routes[i])
	}

	/// All locales the named route is served in, in table order.
	pub fn locales_of(&self, name: &str) -> Vec<String> {
		let mut locales = Vec::new();
		for route in &self.routes {
			if route.canonical_name == name
				&& let Some(locale) = route.locale()
				&& !locales.iter().any(|l| l == locale)
			{
				locales.push(locale.to_string());
			}
		}
		locales
	}

	/// External resources (translation files) consulted while building the
	/// table. An outer cache layer recomputes the table when any changes.
	pub fn resources(&self) -> &[PathBuf] {
		&self.resources
	}

	fn push(&mut self, route: LocalizedRoute) {
		let key = (route.canonical_name.clone(), route.locale.clone());
		// First-declared-wins: never overwrite an earlier index entry
		self.index.entry(key).or_insert(self.routes.len());
		self.routes.push(route);
	}
}

/// Expands a canonical [`RouteCollection`] into a [`LocalizedRouteTable`].
///
/// # Examples
///
/// ```
/// use i18n_router::config::{GenerationMode, I18nConfig};
/// use i18n_router::loader::I18nLoader;
/// use i18n_router::route::{Route, RouteCollection};
/// use i18n_router::strategy::{DefaultRouteExclusionStrategy, PatternGenerationStrategy};
/// use i18n_router::translation::IdentityTranslator;
/// use std::sync::Arc;
///
/// let config = I18nConfig::new(["en", "de"], "en", GenerationMode::PrefixExceptDefault);
/// let loader = I18nLoader::new(
///     Box::new(DefaultRouteExclusionStrategy),
///     PatternGenerationStrategy::from_config(&config),
///     Arc::new(IdentityTranslator),
/// );
///
/// let mut routes = RouteCollection::new();
/// routes.add("welcome", Route::new("/welcome")).unwrap();
///
/// let table = loader.load(&routes).unwrap();
/// assert_eq!(table.len(), 2);
/// ```
pub struct I18nLoader {
	exclusion: Box<dyn RouteExclusionStrategy>,
	strategy: PatternGenerationStrategy,
	translator: Arc<dyn RouteTranslator>,
}

impl I18nLoader {
	/// Creates a loader from its collaborators. All of them are explicit
	/// arguments; there is no ambient registry.
	pub fn new(
		exclusion: Box<dyn RouteExclusionStrategy>,
		strategy: PatternGenerationStrategy,
		translator: Arc<dyn RouteTranslator>,
	) -> Self {
		Self {
			exclusion,
			strategy,
			translator,
		}
	}

	/// Builds the localized route table from the canonical collection.
	///
	/// # Errors
	///
	/// Fails fast on invalid domain configuration or on a pattern that
	/// does not compile; no partially built table is ever returned.
	pub fn load(&self, routes: &RouteCollection) -> Result<LocalizedRouteTable, ConfigError> {
		self.strategy.domains().validate()?;

		let mut table = LocalizedRouteTable::default();
		let mut consulted_locales: Vec<String> = Vec::new();

		for (name, route) in routes.iter() {
			if self.exclusion.should_exclude(name, route) {
				table.push(self.pass_through(name, route)?);
				continue;
			}

			match self
				.strategy
				.generate_patterns(name, route, self.translator.as_ref())?
			{
				GeneratedPatterns::Simple(set) => {
					for (pattern, locales) in set.iter() {
						for locale in locales {
							table.push(self.localized(name, route, pattern, locale, None)?);
							note_locale(&mut consulted_locales, locale);
						}
					}
				}
				GeneratedPatterns::PerDomain(per_domain) => {
					for (domain, set) in &per_domain {
						for (pattern, locales) in set.iter() {
							for locale in locales {
								table.push(self.localized(
									name,
									route,
									pattern,
									locale,
									Some(domain.as_str()),
								)?);
								note_locale(&mut consulted_locales, locale);
							}
						}
					}
				}
			}
		}

		for locale in &consulted_locales {
			for resource in self.translator.resources(locale) {
				if !table.resources.contains(&resource) {
					table.resources.push(resource);
				}
			}
		}

		debug!(
			canonical = routes.len(),
			localized = table.len(),
			resources = table.resources.len(),
			"built localized route table"
		);

		Ok(table)
	}

	fn pass_through(&self, name: &str, route: &Route) -> Result<LocalizedRoute, ConfigError> {
		let pattern = PathPattern::with_requirements(&route.path, &route.requirements).map_err(
			|reason| ConfigError::InvalidPattern {
				name: name.to_string(),
				reason,
			},
		)?;

		Ok(LocalizedRoute {
			canonical_name: name.to_string(),
			locale: None,
			domain: None,
			pattern,
			methods: route.methods.clone(),
			schemes: route.schemes.clone(),
			defaults: route.defaults.clone(),
		})
	}

	fn localized(
		&self,
		name: &str,
		route: &Route,
		pattern: &str,
		locale: &str,
		domain: Option<&str>,
	) -> Result<LocalizedRoute, ConfigError> {
		let compiled = PathPattern::with_requirements(pattern, &route.requirements).map_err(
			|reason| ConfigError::InvalidPattern {
				name: name.to_string(),
				reason,
			},
		)?;

		let mut defaults = route.defaults.clone();
		defaults.insert(LOCALE_PARAM.to_string(), locale.to_string());

		Ok(LocalizedRoute {
			canonical_name: name.to_string(),
			locale: Some(locale.to_string()),
			domain: domain.map(str::to_string),
			pattern: compiled,
			methods: route.methods.clone(),
			schemes: route.schemes.clone(),
			defaults,
		})
	}
}

fn note_locale(seen: &mut Vec<String>, locale: &str) {
	if !seen.iter().any(|l| l == locale) {
		seen.push(locale.to_string());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{GenerationMode, I18nConfig};
	use crate::strategy::DefaultRouteExclusionStrategy;
	use crate::translation::{CatalogTranslator, IdentityTranslator, MessageCatalog};

	fn loader(config: &I18nConfig, translator: Arc<dyn RouteTranslator>) -> I18nLoader {
		I18nLoader::new(
			Box::new(DefaultRouteExclusionStrategy),
			PatternGenerationStrategy::from_config(config),
			translator,
		)
	}

	#[test]
	fn test_load_expands_one_route_per_locale() {
		let config = I18nConfig::new(["en", "de", "fr"], "en", GenerationMode::Prefix);
		let loader = loader(&config, Arc::new(IdentityTranslator));
		let mut routes = RouteCollection::new();
		routes.add("welcome", Route::new("/welcome")).unwrap();

		let table = loader.load(&routes).unwrap();

		assert_eq!(table.len(), 3);
		assert_eq!(table.locales_of("welcome"), vec!["en", "de", "fr"]);
		let de = table.get("welcome", "de").unwrap();
		assert_eq!(de.pattern().pattern(), "/de/welcome");
		assert_eq!(de.defaults().get(LOCALE_PARAM), Some(&"de".to_string()));
	}

	#[test]
	fn test_excluded_routes_pass_through_unmodified() {
		let config = I18nConfig::new(["en", "de"], "en", GenerationMode::Prefix);
		let loader = loader(&config, Arc::new(IdentityTranslator));
		let mut routes = RouteCollection::new();
		routes
			.add(
				"_internal",
				Route::new("/internal").with_default("_controller", "internal"),
			)
			.unwrap();

		let table = loader.load(&routes).unwrap();

		assert_eq!(table.len(), 1);
		let route = table.get("_internal", "de").unwrap();
		assert!(route.is_pass_through());
		assert_eq!(route.pattern().pattern(), "/internal");
		assert!(!route.defaults().contains_key(LOCALE_PARAM));
	}

	#[test]
	fn test_table_lookup_prefers_exact_locale() {
		let config = I18nConfig::new(["en", "de"], "en", GenerationMode::Custom);
		let mut catalog = MessageCatalog::new("de");
		catalog.add("routes", "welcome", "/willkommen");
		let mut translator = CatalogTranslator::new();
		translator.add_catalog(catalog);
		let loader = loader(&config, Arc::new(translator));

		let mut routes = RouteCollection::new();
		routes.add("welcome", Route::new("/welcome")).unwrap();

		let table = loader.load(&routes).unwrap();

		assert_eq!(
			table.get("welcome", "de").unwrap().pattern().pattern(),
			"/willkommen"
		);
		assert_eq!(
			table.get("welcome", "en").unwrap().pattern().pattern(),
			"/welcome"
		);
		assert!(table.get("welcome", "nl").is_none());
	}

	#[test]
	fn test_table_reports_translation_resources() {
		let config = I18nConfig::new(["en", "de"], "en", GenerationMode::Custom);
		let mut catalog = MessageCatalog::new("de");
		catalog.add("routes", "welcome", "/willkommen");
		catalog.add_resource("/tmp/routes.de.yml");
		let mut translator = CatalogTranslator::new();
		translator.add_catalog(catalog);
		let loader = loader(&config, Arc::new(translator));

		let mut routes = RouteCollection::new();
		routes.add("welcome", Route::new("/welcome")).unwrap();

		let table = loader.load(&routes).unwrap();

		assert_eq!(table.resources().len(), 1);
		assert!(table.resources()[0].ends_with("routes.de.yml"));
	}

	#[test]
	fn test_domain_mode_tags_routes_with_owning_domain() {
		use crate::config::{DomainConfig, DomainMap};

		let mut config =
			I18nConfig::new(["en", "de"], "en", GenerationMode::DomainsPrefixExceptDefault);
		let mut domains = DomainMap::new();
		domains.insert(
			"en.host",
			DomainConfig {
				locales: vec!["en".to_string()],
				default_locale: "en".to_string(),
			},
		);
		domains.insert(
			"de.host",
			DomainConfig {
				locales: vec!["de".to_string()],
				default_locale: "de".to_string(),
			},
		);
		config.domains = domains;
		let loader = loader(&config, Arc::new(IdentityTranslator));

		let mut routes = RouteCollection::new();
		routes.add("search", Route::new("/search")).unwrap();

		let table = loader.load(&routes).unwrap();

		assert_eq!(table.len(), 2);
		assert_eq!(table.get("search", "en").unwrap().domain(), Some("en.host"));
		assert_eq!(table.get("search", "de").unwrap().domain(), Some("de.host"));
	}

	#[test]
	fn test_load_fails_on_invalid_domain_map() {
		use crate::config::{DomainConfig, DomainMap};

		let mut config =
			I18nConfig::new(["en"], "en", GenerationMode::DomainsPrefixExceptDefault);
		let mut domains = DomainMap::new();
		domains.insert(
			"en.host",
			DomainConfig {
				locales: vec!["en".to_string()],
				default_locale: "nl".to_string(),
			},
		);
		config.domains = domains;
		let loader = loader(&config, Arc::new(IdentityTranslator));

		let result = loader.load(&RouteCollection::new());

		assert!(matches!(
			result,
			Err(ConfigError::DefaultLocaleNotInDomain { .. })
		));
	}
}
