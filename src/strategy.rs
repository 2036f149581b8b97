//! Route exclusion and localized pattern generation.
//!
//! Exclusion decides which canonical routes participate in localization at
//! all; pattern generation decides, per route and per locale (or per
//! domain and locale), what the localized pattern string looks like.

use tracing::trace;

use crate::config::{DomainMap, GenerationMode, I18nConfig};
use crate::error::ConfigError;
use crate::route::Route;
use crate::translation::RouteTranslator;

/// Decides which canonical routes are excluded from localization.
///
/// Excluded routes are carried through to the localized table completely
/// unmodified. Implementations must be pure; the loader calls them once
/// per canonical route.
pub trait RouteExclusionStrategy: Send + Sync {
	/// Whether the named route should be excluded from localization.
	fn should_exclude(&self, name: &str, route: &Route) -> bool;
}

/// Default exclusion policy: internal routes (name starting with `_`) and
/// routes explicitly flagged as not localizable are excluded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRouteExclusionStrategy;

impl RouteExclusionStrategy for DefaultRouteExclusionStrategy {
	fn should_exclude(&self, name: &str, route: &Route) -> bool {
		name.starts_with('_') || !route.localizable
	}
}

/// An insertion-ordered set of localized patterns, grouped by pattern
/// string. Multiple locales may legitimately share one pattern (e.g. when
/// both fall back to the untranslated path).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
	groups: Vec<(String, Vec<String>)>,
}

impl PatternSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a locale under the given pattern, creating the group when the
	/// pattern is new. Insertion order of patterns is preserved.
	pub fn push(&mut self, pattern: impl Into<String>, locale: impl Into<String>) {
		let pattern = pattern.into();
		let locale = locale.into();
		if let Some((_, locales)) = self.groups.iter_mut().find(|(p, _)| *p == pattern) {
			locales.push(locale);
		} else {
			self.groups.push((pattern, vec![locale]));
		}
	}

	/// Iterates over `(pattern, locales)` groups in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.groups
			.iter()
			.map(|(p, locales)| (p.as_str(), locales.as_slice()))
	}

	/// Whether no patterns were generated.
	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}
}

/// The two shapes pattern generation can produce, depending on the mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedPatterns {
	/// Patterns keyed by locale set only.
	Simple(PatternSet),
	/// Patterns grouped per domain, so the loader can tag each localized
	/// route with its owning domain. Entries follow domain-map order.
	PerDomain(Vec<(String, PatternSet)>),
}

/// Generates localized pattern strings for canonical routes.
///
/// The mode is fixed at construction; which shape
/// [`generate_patterns`](Self::generate_patterns) produces depends only on
/// that mode, never on route content.
#[derive(Debug, Clone)]
pub struct PatternGenerationStrategy {
	mode: GenerationMode,
	translation_domain: String,
	locales: Vec<String>,
	default_locale: String,
	locale_mapping: std::collections::HashMap<String, String>,
	domains: DomainMap,
}

impl PatternGenerationStrategy {
	/// Builds a strategy from the routing configuration.
	pub fn from_config(config: &I18nConfig) -> Self {
		Self {
			mode: config.mode,
			translation_domain: config.translation_domain.clone(),
			locales: config.locales.clone(),
			default_locale: config.default_locale.clone(),
			locale_mapping: config.locale_mapping.clone(),
			domains: config.domains.clone(),
		}
	}

	/// The configured generation mode.
	pub fn mode(&self) -> GenerationMode {
		self.mode
	}

	/// The domain map this strategy groups patterns by.
	pub fn domains(&self) -> &DomainMap {
		&self.domains
	}

	/// Translates the route name for one locale, falling back to the
	/// route's own pattern when the catalog echoes the key back.
	///
	/// The echo comparison cannot distinguish a missing translation from a
	/// translation whose text happens to equal the route name; such routes
	/// fall back to their declared pattern.
	fn translated_pattern(
		&self,
		name: &str,
		route: &Route,
		locale: &str,
		translator: &dyn RouteTranslator,
	) -> String {
		let translated = translator.translate(name, &self.translation_domain, locale);
		if translated == name {
			route.path.clone()
		} else {
			translated
		}
	}

	/// The path segment used when prefixing with the given locale: the
	/// locale-mapping override when configured, else the raw locale code.
	fn locale_segment<'a>(&'a self, locale: &'a str) -> &'a str {
		self.locale_mapping
			.get(locale)
			.map(String::as_str)
			.unwrap_or(locale)
	}

	/// Candidate locales for a route outside domain grouping: the route's
	/// own override wins over the global list.
	fn candidate_locales<'a>(&'a self, route: &'a Route) -> &'a [String] {
		route.locales.as_deref().unwrap_or(&self.locales)
	}

	/// Candidate locales within one domain: the route's own override wins,
	/// then the domain's locale list, then the global list.
	fn domain_candidate_locales<'a>(
		&'a self,
		route: &'a Route,
		domain_locales: &'a [String],
	) -> &'a [String] {
		if let Some(route_locales) = route.locales.as_deref() {
			route_locales
		} else if !domain_locales.is_empty() {
			domain_locales
		} else {
			&self.locales
		}
	}

	/// Produces the localized patterns for one canonical route.
	///
	/// # Errors
	///
	/// Fails fast on an invalid domain map in the domain mode.
	pub fn generate_patterns(
		&self,
		name: &str,
		route: &Route,
		translator: &dyn RouteTranslator,
	) -> Result<GeneratedPatterns, ConfigError> {
		if self.mode == GenerationMode::DomainsPrefixExceptDefault {
			return self.generate_domain_patterns(name, route, translator);
		}

		let mut patterns = PatternSet::new();

		for locale in self.candidate_locales(route) {
			let mut pattern = self.translated_pattern(name, route, locale, translator);

			let prefixed = match self.mode {
				GenerationMode::Prefix => true,
				GenerationMode::PrefixExceptDefault => *locale != self.default_locale,
				_ => false,
			};
			if prefixed {
				pattern = format!("/{}{}", self.locale_segment(locale), pattern);
				if let Some(prefix) = &route.prefix {
					pattern = format!("{}{}", prefix, pattern);
				}
			}

			trace!(route = name, locale = %locale, pattern = %pattern, "generated localized pattern");
			patterns.push(pattern, locale.clone());
		}

		Ok(GeneratedPatterns::Simple(patterns))
	}

	fn generate_domain_patterns(
		&self,
		name: &str,
		route: &Route,
		translator: &dyn RouteTranslator,
	) -> Result<GeneratedPatterns, ConfigError> {
		self.domains.validate()?;

		let mut per_domain = Vec::new();

		for (domain, config) in self.domains.iter() {
			let mut patterns = PatternSet::new();

			for locale in self.domain_candidate_locales(route, &config.locales) {
				let mut pattern = self.translated_pattern(name, route, locale, translator);

				// The domain's own default locale is never prefixed
				if *locale != config.default_locale {
					pattern = format!("/{}{}", self.locale_segment(locale), pattern);
				}
				if let Some(prefix) = &route.prefix {
					pattern = format!("{}{}", prefix, pattern);
				}

				trace!(
					route = name,
					domain = domain,
					locale = %locale,
					pattern = %pattern,
					"generated localized pattern"
				);
				patterns.push(pattern, locale.clone());
			}

			per_domain.push((domain.to_string(), patterns));
		}

		Ok(GeneratedPatterns::PerDomain(per_domain))
	}
}
