//! Request-time matching and URL generation over a localized route table.
//!
//! The router resolves three axes at once: which canonical route a path
//! belongs to, which locale the request is served in, and which host and
//! scheme a generated URL must target. The table it operates on is
//! immutable; rebuilds swap in a whole new table atomically.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::{DomainMap, I18nConfig};
use crate::context::RequestContext;
use crate::error::{GenerateError, MatchError};
use crate::loader::{LOCALE_PARAM, LocalizedRoute, LocalizedRouteTable};
use crate::pattern::validate_param;
use crate::resolver::LocaleResolver;

/// A successful match: the canonical route name, the resolved locale and
/// all matched parameters (route defaults overlaid with path captures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
	/// Canonical route name, with the localized identity stripped.
	pub route: String,
	/// The resolved locale; `None` for pass-through routes.
	pub locale: Option<String>,
	/// Matched parameters, including `_locale` for localized routes.
	pub params: HashMap<String, String>,
}

/// Locale-aware router over a [`LocalizedRouteTable`].
///
/// # Examples
///
/// ```
/// use i18n_router::config::{GenerationMode, I18nConfig};
/// use i18n_router::context::RequestContext;
/// use i18n_router::loader::I18nLoader;
/// use i18n_router::route::{Route, RouteCollection};
/// use i18n_router::router::I18nRouter;
/// use i18n_router::strategy::{DefaultRouteExclusionStrategy, PatternGenerationStrategy};
/// use i18n_router::translation::IdentityTranslator;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let config = I18nConfig::new(["en", "de"], "en", GenerationMode::PrefixExceptDefault);
/// let loader = I18nLoader::new(
///     Box::new(DefaultRouteExclusionStrategy),
///     PatternGenerationStrategy::from_config(&config),
///     Arc::new(IdentityTranslator),
/// );
/// let mut routes = RouteCollection::new();
/// routes.add("welcome", Route::new("/welcome")).unwrap();
///
/// let router = I18nRouter::new(loader.load(&routes).unwrap(), &config);
/// let ctx = RequestContext::new("localhost", "http").with_locale("de");
///
/// let matched = router.match_path("/de/welcome", &ctx).unwrap();
/// assert_eq!(matched.route, "welcome");
/// assert_eq!(matched.locale.as_deref(), Some("de"));
///
/// let url = router.generate("welcome", &HashMap::new(), false, &ctx).unwrap();
/// assert_eq!(url, "/de/welcome");
/// ```
pub struct I18nRouter {
	table: RwLock<Arc<LocalizedRouteTable>>,
	host_map: HashMap<String, String>,
	domains: DomainMap,
	host_schemes: HashMap<String, String>,
	default_locale: String,
	resolver: Option<Arc<dyn LocaleResolver>>,
}

impl I18nRouter {
	/// Creates a router over a freshly built table, taking the host map,
	/// domain map, scheme overrides and default locale from the config.
	pub fn new(table: LocalizedRouteTable, config: &I18nConfig) -> Self {
		Self {
			table: RwLock::new(Arc::new(table)),
			host_map: config.host_map.clone(),
			domains: config.domains.clone(),
			host_schemes: config.host_schemes.clone(),
			default_locale: config.default_locale.clone(),
			resolver: None,
		}
	}

	/// Attaches a locale resolver consulted when a matched route is
	/// servable by several locales and the context pins none.
	pub fn with_resolver(mut self, resolver: Arc<dyn LocaleResolver>) -> Self {
		self.resolver = Some(resolver);
		self
	}

	/// The current table. Callers get a snapshot; a concurrent
	/// [`replace_table`](Self::replace_table) does not affect it.
	pub fn table(&self) -> Arc<LocalizedRouteTable> {
		Arc::clone(&self.table.read())
	}

	/// Atomically swaps in a newly built table, e.g. after the translation
	/// catalog changed. In-flight requests keep the snapshot they started
	/// with.
	pub fn replace_table(&self, table: LocalizedRouteTable) {
		*self.table.write() = Arc::new(table);
	}

	/// Matches a request path against the localized table.
	///
	/// Candidates are scanned in declaration order. Pass-through routes
	/// win as soon as their pattern matches; localized candidates must
	/// additionally survive the host/domain check and agree with the
	/// context's active locale. When several locales remain possible on
	/// this host, the locale resolver decides.
	pub fn match_path(
		&self,
		path: &str,
		ctx: &RequestContext,
	) -> Result<RouteMatch, MatchError> {
		let table = self.table();

		// Remembered rejections drive the error reported when no
		// candidate fits: a locale rejection on a host-valid candidate
		// outranks a host rejection, which outranks plain not-found.
		let mut host_rejected: Option<String> = None;
		let mut locale_rejected: Option<String> = None;

		for route in table.iter() {
			let Some(captured) = route.pattern().matches(path) else {
				continue;
			};
			if !route.allows_method(&ctx.method) || !route.allows_scheme(&ctx.scheme) {
				continue;
			}

			if route.is_pass_through() {
				return Ok(Self::success(route, None, captured));
			}
			let Some(locale) = route.locale() else {
				continue;
			};

			if !self.host_allows(route, locale, ctx) {
				host_rejected.get_or_insert_with(|| route.canonical_name().to_string());
				continue;
			}

			if let Some(active) = ctx.locale.as_deref() {
				if active != locale {
					locale_rejected
						.get_or_insert_with(|| route.canonical_name().to_string());
					continue;
				}
				return Ok(Self::success(route, Some(locale), captured));
			}

			// No active locale: collect the locales this pattern serves
			// on the current host and disambiguate.
			let candidates = self.host_valid_siblings(&table, route, ctx);
			if candidates.len() == 1 {
				return Ok(Self::success(route, Some(locale), captured));
			}

			if let Some(resolver) = &self.resolver
				&& let Some(resolved) = resolver.resolve_locale(ctx, &candidates)
				&& candidates.contains(&resolved)
			{
				debug!(route = route.canonical_name(), locale = %resolved, "locale resolved");
				return Ok(Self::success(route, Some(resolved.as_str()), captured));
			}

			return Err(MatchError::NotAcceptableLanguage {
				requested: None,
				available: candidates,
			});
		}

		if let Some(name) = locale_rejected {
			return Err(MatchError::NotAcceptableLanguage {
				requested: ctx.locale.clone(),
				available: table.locales_of(&name),
			});
		}
		if let Some(name) = host_rejected {
			return Err(MatchError::HostNotAllowed {
				allowed_hosts: self.hosts_for_route(&table, &name),
				route: name,
				host: ctx.host.clone(),
			});
		}
		Err(MatchError::ResourceNotFound(path.to_string()))
	}

	/// Generates a URL for the canonical route `name`.
	///
	/// The target locale is `params["_locale"]`, else the context's active
	/// locale, else the configured default. When the host map (or domain
	/// map) places the target locale on another host, the URL is forced
	/// absolute onto that host even if `absolute` is false.
	pub fn generate(
		&self,
		name: &str,
		params: &HashMap<String, String>,
		absolute: bool,
		ctx: &RequestContext,
	) -> Result<String, GenerateError> {
		let table = self.table();

		let locale = params
			.get(LOCALE_PARAM)
			.cloned()
			.or_else(|| ctx.locale.clone())
			.unwrap_or_else(|| self.default_locale.clone());

		let route = table
			.get(name, &locale)
			.ok_or_else(|| GenerateError::NotFound {
				name: name.to_string(),
				locale: locale.clone(),
			})?;

		// Defaults fill pattern placeholders the caller did not supply
		let mut merged = route.defaults().clone();
		for (key, value) in params {
			merged.insert(key.clone(), value.clone());
		}

		for param in route.pattern().param_names() {
			let value = merged.get(param).ok_or_else(|| {
				GenerateError::MissingParameter {
					name: name.to_string(),
					param: param.clone(),
				}
			})?;
			if !validate_param(value) {
				return Err(GenerateError::InvalidParameter {
					param: param.clone(),
				});
			}
		}

		let mut url = route
			.pattern()
			.interpolate(&merged)
			.unwrap_or_else(|| route.pattern().pattern().to_string());

		let query = self.query_string(route, params)?;
		if !query.is_empty() {
			url.push('?');
			url.push_str(&query);
		}

		// A host bound to the target locale forces an absolute URL
		let target_host = self.host_of_locale(route, &locale);
		let forced_host = target_host.filter(|host| *host != ctx.host);

		// A scheme requirement the current scheme does not satisfy also
		// forces an absolute URL (e.g. an https-only login route)
		let forced_scheme = if route.allows_scheme(&ctx.scheme) {
			None
		} else {
			route.schemes().first().map(String::as_str)
		};

		if forced_host.is_none() && forced_scheme.is_none() && !absolute {
			return Ok(url);
		}

		let host = forced_host.or(target_host).unwrap_or(ctx.host.as_str());
		let scheme = self
			.host_schemes
			.get(host)
			.map(String::as_str)
			.or(forced_scheme)
			.unwrap_or(ctx.scheme.as_str());

		debug!(route = name, locale = %locale, host = host, "generated absolute url");
		Ok(format!("{}://{}{}", scheme, host, url))
	}

	/// Whether the current host may serve the given localized route.
	fn host_allows(&self, route: &LocalizedRoute, locale: &str, ctx: &RequestContext) -> bool {
		if let Some(domain) = route.domain() {
			return domain == ctx.host;
		}
		match self.host_map.get(locale) {
			Some(host) => *host == ctx.host,
			None => true,
		}
	}

	/// The host a locale is pinned to, from the host map or (for domain
	/// routes) the owning domain key.
	fn host_of_locale<'a>(&'a self, route: &'a LocalizedRoute, locale: &str) -> Option<&'a str> {
		if let Some(host) = self.host_map.get(locale) {
			return Some(host.as_str());
		}
		if route.domain().is_some() {
			return self.domains.domain_of(locale);
		}
		None
	}

	/// Locales served by routes sharing this route's canonical name and
	/// pattern that are valid on the current host, in table order.
	fn host_valid_siblings(
		&self,
		table: &LocalizedRouteTable,
		route: &LocalizedRoute,
		ctx: &RequestContext,
	) -> Vec<String> {
		table
			.iter()
			.filter(|sibling| {
				sibling.canonical_name() == route.canonical_name()
					&& sibling.pattern().pattern() == route.pattern().pattern()
			})
			.filter_map(|sibling| sibling.locale().map(|locale| (sibling, locale)))
			.filter(|(sibling, locale)| self.host_allows(sibling, locale, ctx))
			.map(|(_, locale)| locale.to_string())
			.collect()
	}

	/// All hosts serving any locale of the named route, in locale order:
	/// host-map entries first, then owning domains.
	fn hosts_for_route(&self, table: &LocalizedRouteTable, name: &str) -> Vec<String> {
		let locales = table.locales_of(name);
		let mut hosts = Vec::new();
		for locale in &locales {
			if let Some(host) = self.host_map.get(locale)
				&& !hosts.contains(host)
			{
				hosts.push(host.clone());
			}
		}
		for host in self
			.domains
			.domains_for_locales(locales.iter().map(String::as_str))
		{
			if !hosts.contains(&host) {
				hosts.push(host);
			}
		}
		hosts
	}

	/// Parameters not consumed by the pattern become a query string.
	/// `_locale` is consumed by localized routes but kept for
	/// pass-through routes.
	fn query_string(
		&self,
		route: &LocalizedRoute,
		params: &HashMap<String, String>,
	) -> Result<String, GenerateError> {
		let mut extra: Vec<(&str, &str)> = params
			.iter()
			.filter(|(key, value)| {
				if route.pattern().param_names().contains(key) {
					return false;
				}
				if *key == LOCALE_PARAM && !route.is_pass_through() {
					return false;
				}
				route.defaults().get(*key) != Some(*value)
			})
			.map(|(key, value)| (key.as_str(), value.as_str()))
			.collect();
		extra.sort_unstable();

		serde_urlencoded::to_string(&extra)
			.map_err(|e| GenerateError::QueryEncoding(e.to_string()))
	}

	fn success(
		route: &LocalizedRoute,
		locale: Option<&str>,
		captured: HashMap<String, String>,
	) -> RouteMatch {
		let mut params = route.defaults().clone();
		for (key, value) in captured {
			params.insert(key, value);
		}
		if let Some(locale) = locale {
			params.insert(LOCALE_PARAM.to_string(), locale.to_string());
		}

		RouteMatch {
			route: route.canonical_name().to_string(),
			locale: locale.map(str::to_string),
			params,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::GenerationMode;
	use crate::loader::I18nLoader;
	use crate::route::{Route, RouteCollection};
	use crate::strategy::{DefaultRouteExclusionStrategy, PatternGenerationStrategy};
	use crate::translation::IdentityTranslator;

	fn router(config: &I18nConfig, routes: &RouteCollection) -> I18nRouter {
		let loader = I18nLoader::new(
			Box::new(DefaultRouteExclusionStrategy),
			PatternGenerationStrategy::from_config(config),
			Arc::new(IdentityTranslator),
		);
		I18nRouter::new(loader.load(routes).unwrap(), config)
	}

	#[test]
	fn test_match_prefixed_route() {
		let config = I18nConfig::new(["en", "de"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes.add("welcome", Route::new("/welcome")).unwrap();
		let router = router(&config, &routes);
		let ctx = RequestContext::default();

		let matched = router.match_path("/de/welcome", &ctx).unwrap();

		assert_eq!(matched.route, "welcome");
		assert_eq!(matched.locale.as_deref(), Some("de"));
		assert_eq!(
			matched.params.get(LOCALE_PARAM),
			Some(&"de".to_string())
		);
	}

	#[test]
	fn test_match_extracts_path_params() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes
			.add(
				"user_detail",
				Route::new("/users/{id}").with_requirement("id", r"\d+"),
			)
			.unwrap();
		let router = router(&config, &routes);

		let matched = router
			.match_path("/users/42", &RequestContext::default())
			.unwrap();

		assert_eq!(matched.params.get("id"), Some(&"42".to_string()));
		assert!(
			router
				.match_path("/users/abc", &RequestContext::default())
				.is_err()
		);
	}

	#[test]
	fn test_match_respects_method_constraint() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes
			.add("submit", Route::new("/submit").with_method(http::Method::POST))
			.unwrap();
		let router = router(&config, &routes);

		let get_ctx = RequestContext::default();
		let post_ctx = RequestContext::default().with_method(http::Method::POST);

		assert!(matches!(
			router.match_path("/submit", &get_ctx),
			Err(MatchError::ResourceNotFound(_))
		));
		assert!(router.match_path("/submit", &post_ctx).is_ok());
	}

	#[test]
	fn test_replace_table_swaps_atomically() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes.add("welcome", Route::new("/welcome")).unwrap();
		let router = router(&config, &routes);

		// A snapshot taken before the swap keeps serving the old table
		let snapshot = router.table();

		let loader = I18nLoader::new(
			Box::new(DefaultRouteExclusionStrategy),
			PatternGenerationStrategy::from_config(&config),
			Arc::new(IdentityTranslator),
		);
		let mut new_routes = RouteCollection::new();
		new_routes.add("goodbye", Route::new("/goodbye")).unwrap();
		router.replace_table(loader.load(&new_routes).unwrap());

		assert!(snapshot.get("welcome", "en").is_some());
		assert!(router.table().get("welcome", "en").is_none());
		assert!(router.table().get("goodbye", "en").is_some());
	}

	#[test]
	fn test_generate_unknown_locale_fails() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes.add("welcome", Route::new("/welcome")).unwrap();
		let router = router(&config, &routes);

		let mut params = HashMap::new();
		params.insert(LOCALE_PARAM.to_string(), "nl".to_string());
		let result = router.generate("welcome", &params, false, &RequestContext::default());

		assert_eq!(
			result,
			Err(GenerateError::NotFound {
				name: "welcome".to_string(),
				locale: "nl".to_string(),
			})
		);
	}

	#[test]
	fn test_generate_missing_parameter_fails() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes.add("user_detail", Route::new("/users/{id}")).unwrap();
		let router = router(&config, &routes);

		let result =
			router.generate("user_detail", &HashMap::new(), false, &RequestContext::default());

		assert!(matches!(
			result,
			Err(GenerateError::MissingParameter { ref param, .. }) if param == "id"
		));
	}

	#[test]
	fn test_generate_rejects_unsafe_parameter_values() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes.add("user_detail", Route::new("/users/{id}")).unwrap();
		let router = router(&config, &routes);

		for value in ["123/../../admin", "123?admin=true", "123#admin", "a%2fb"] {
			let mut params = HashMap::new();
			params.insert("id".to_string(), value.to_string());

			let result =
				router.generate("user_detail", &params, false, &RequestContext::default());

			assert!(
				matches!(result, Err(GenerateError::InvalidParameter { .. })),
				"value {:?} should be rejected",
				value
			);
		}
	}

	#[test]
	fn test_generate_appends_extra_params_as_query() {
		let config = I18nConfig::new(["en"], "en", GenerationMode::PrefixExceptDefault);
		let mut routes = RouteCollection::new();
		routes.add("search", Route::new("/search")).unwrap();
		let router = router(&config, &routes);

		let mut params = HashMap::new();
		params.insert("q".to_string(), "route table".to_string());
		params.insert("page".to_string(), "2".to_string());

		let url = router
			.generate("search", &params, false, &RequestContext::default())
			.unwrap();

		assert_eq!(url, "/search?page=2&q=route+table");
	}
}
