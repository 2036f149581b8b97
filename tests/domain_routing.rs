//! Per-domain routing: each domain carries its own locale list and default,
//! matching is scoped to the request host and generation crosses domains
//! with absolute URLs.

use i18n_router::{
	DefaultRouteExclusionStrategy, DomainConfig, DomainMap, GenerationMode, I18nConfig,
	I18nLoader, I18nRouter, IdentityTranslator, MatchError, PatternGenerationStrategy,
	RequestContext, Route, RouteCollection,
};
use rstest::rstest;
use std::collections::HashMap;
use std::sync::Arc;

fn domain_config() -> I18nConfig {
	let mut domains = DomainMap::new();
	domains.insert(
		"www.example.com",
		DomainConfig {
			locales: vec!["en".to_string(), "fr".to_string()],
			default_locale: "en".to_string(),
		},
	);
	domains.insert(
		"www.example.de",
		DomainConfig {
			locales: vec!["de".to_string()],
			default_locale: "de".to_string(),
		},
	);
	I18nConfig::new(
		["en", "fr", "de"],
		"en",
		GenerationMode::DomainsPrefixExceptDefault,
	)
	.with_domains(domains)
}

fn build_router(config: &I18nConfig, routes: &RouteCollection) -> I18nRouter {
	let loader = I18nLoader::new(
		Box::new(DefaultRouteExclusionStrategy),
		PatternGenerationStrategy::from_config(config),
		Arc::new(IdentityTranslator),
	);
	I18nRouter::new(loader.load(routes).unwrap(), config)
}

#[rstest]
#[case("www.example.com", "/search", "en")]
#[case("www.example.com", "/fr/search", "fr")]
#[case("www.example.de", "/search", "de")]
fn test_each_domain_serves_its_own_locales(
	#[case] host: &str,
	#[case] path: &str,
	#[case] locale: &str,
) {
	// Arrange
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);

	// Act
	let matched = router
		.match_path(path, &RequestContext::new(host, "http"))
		.unwrap();

	// Assert: the domain default is unprefixed, other locales carry a prefix
	assert_eq!(matched.route, "search");
	assert_eq!(matched.locale.as_deref(), Some(locale));
}

#[rstest]
fn test_domain_default_locale_is_never_served_prefixed() {
	// Arrange: es is the default of es.host, de and en are its guests
	let mut domains = DomainMap::new();
	domains.insert(
		"es.host",
		DomainConfig {
			locales: vec!["es".to_string(), "de".to_string(), "en".to_string()],
			default_locale: "es".to_string(),
		},
	);
	let config = I18nConfig::new(
		["es", "de", "en"],
		"es",
		GenerationMode::DomainsPrefixExceptDefault,
	)
	.with_domains(domains);
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);
	let host = RequestContext::new("es.host", "http");

	// Act
	let unprefixed = router.match_path("/search", &host);
	let de = router.match_path("/de/search", &host);
	let en = router.match_path("/en/search", &host);
	let es_prefixed = router.match_path("/es/search", &host);

	// Assert: the domain default only exists unprefixed
	assert_eq!(unprefixed.unwrap().locale.as_deref(), Some("es"));
	assert_eq!(de.unwrap().locale.as_deref(), Some("de"));
	assert_eq!(en.unwrap().locale.as_deref(), Some("en"));
	assert!(matches!(es_prefixed, Err(MatchError::ResourceNotFound(_))));
}

#[rstest]
fn test_prefixed_locale_is_not_served_on_foreign_domain() {
	// Arrange: fr belongs to www.example.com only
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);

	// Act
	let result = router.match_path("/fr/search", &RequestContext::new("www.example.de", "http"));

	// Assert
	assert!(matches!(result, Err(MatchError::HostNotAllowed { .. })));
}

#[rstest]
fn test_unknown_host_lists_owning_domains() {
	// Arrange
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);

	// Act
	let result = router.match_path("/search", &RequestContext::new("other.host", "http"));

	// Assert
	assert_eq!(
		result,
		Err(MatchError::HostNotAllowed {
			route: "search".to_string(),
			host: "other.host".to_string(),
			allowed_hosts: vec![
				"www.example.com".to_string(),
				"www.example.de".to_string(),
			],
		})
	);
}

#[rstest]
fn test_cross_domain_generation_is_forced_absolute() {
	// Arrange
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);
	let ctx = RequestContext::new("www.example.com", "http").with_locale("de");

	// Act: relative URL requested, but de lives on the German domain
	let url = router
		.generate("search", &HashMap::new(), false, &ctx)
		.unwrap();

	// Assert
	assert_eq!(url, "http://www.example.de/search");
}

#[rstest]
fn test_cross_domain_generation_honors_host_scheme_override() {
	// Arrange
	let config = domain_config().with_host_scheme("www.example.de", "https");
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);
	let ctx = RequestContext::new("www.example.com", "http").with_locale("de");

	// Act
	let url = router
		.generate("search", &HashMap::new(), false, &ctx)
		.unwrap();

	// Assert
	assert_eq!(url, "https://www.example.de/search");
}

#[rstest]
fn test_same_domain_generation_stays_relative() {
	// Arrange
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);
	let ctx = RequestContext::new("www.example.com", "http").with_locale("fr");

	// Act
	let url = router
		.generate("search", &HashMap::new(), false, &ctx)
		.unwrap();

	// Assert: fr is served by the current domain, prefixed
	assert_eq!(url, "/fr/search");
}

#[rstest]
fn test_route_locale_restriction_removes_domain_variants() {
	// Arrange: the route opts out of fr entirely
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes
		.add("search", Route::new("/search").with_locales(["en", "de"]))
		.unwrap();
	let router = build_router(&config, &routes);

	// Act
	let fr_match =
		router.match_path("/fr/search", &RequestContext::new("www.example.com", "http"));
	let en_match = router.match_path("/search", &RequestContext::new("www.example.com", "http"));

	// Assert
	assert!(matches!(fr_match, Err(MatchError::ResourceNotFound(_))));
	assert_eq!(en_match.unwrap().locale.as_deref(), Some("en"));
}

#[rstest]
fn test_locale_mapping_replaces_prefix_segment() {
	// Arrange: fr is published under a custom path segment
	let config = domain_config().with_locale_mapping([("fr", "france")]);
	let mut routes = RouteCollection::new();
	routes.add("search", Route::new("/search")).unwrap();
	let router = build_router(&config, &routes);
	let host = RequestContext::new("www.example.com", "http");

	// Act
	let mapped = router.match_path("/france/search", &host);
	let raw = router.match_path("/fr/search", &host);

	// Assert
	assert_eq!(mapped.unwrap().locale.as_deref(), Some("fr"));
	assert!(matches!(raw, Err(MatchError::ResourceNotFound(_))));
}

#[rstest]
fn test_pass_through_route_ignores_domains() {
	// Arrange
	let config = domain_config();
	let mut routes = RouteCollection::new();
	routes.add("_healthcheck", Route::new("/healthz")).unwrap();
	let router = build_router(&config, &routes);

	// Act: pass-through routes are host-agnostic
	let matched = router
		.match_path("/healthz", &RequestContext::new("other.host", "http"))
		.unwrap();

	// Assert
	assert_eq!(matched.route, "_healthcheck");
	assert_eq!(matched.locale, None);
}
