//! Configuration surface for localized routing.
//!
//! These are plain value structs consumed at table-build time. They derive
//! `serde` traits so an external configuration layer (YAML, TOML, ...) can
//! deserialize them directly; this crate never parses config files itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::ConfigError;

/// How localized patterns are derived from a canonical route.
///
/// Selected once at construction; the serialized names match the usual
/// config-file spellings (`prefix`, `prefix_except_default`, `custom`,
/// `domains_prefix_except_default`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
	/// Every candidate locale gets a `/{locale}` prefix.
	Prefix,
	/// Like [`Prefix`](Self::Prefix), but the default locale stays
	/// unprefixed.
	PrefixExceptDefault,
	/// No prefix is injected; patterns differ per locale only through
	/// translation.
	Custom,
	/// Patterns are grouped per domain; within each domain the domain's
	/// own default locale is unprefixed and all others are prefixed.
	DomainsPrefixExceptDefault,
}

/// One domain's locale policy: the locales it serves and which of them is
/// its unprefixed default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
	/// Locales served by this domain.
	pub locales: Vec<String>,
	/// The domain's own default locale; must be a member of `locales`.
	pub default_locale: String,
}

/// Mapping from domain key (a hostname) to that domain's locale policy.
///
/// Each locale may be owned by at most one domain; ambiguous ownership is
/// a build-time configuration error, never a runtime one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainMap {
	domains: BTreeMap<String, DomainConfig>,
}

impl DomainMap {
	/// Creates an empty domain map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a domain entry.
	pub fn insert(&mut self, domain: impl Into<String>, config: DomainConfig) {
		self.domains.insert(domain.into(), config);
	}

	/// Whether no domains are configured.
	pub fn is_empty(&self) -> bool {
		self.domains.is_empty()
	}

	/// Iterates over `(domain, config)` entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainConfig)> {
		self.domains.iter().map(|(d, c)| (d.as_str(), c))
	}

	/// Looks up a domain's config by its key.
	pub fn get(&self, domain: &str) -> Option<&DomainConfig> {
		self.domains.get(domain)
	}

	/// The domain owning the given locale, if any.
	pub fn domain_of(&self, locale: &str) -> Option<&str> {
		self.domains
			.iter()
			.find(|(_, config)| config.locales.iter().any(|l| l == locale))
			.map(|(domain, _)| domain.as_str())
	}

	/// Domains serving any of the given locales, deduplicated, in locale
	/// order. Used to report the valid hosts for a route.
	pub fn domains_for_locales<'a, I>(&self, locales: I) -> Vec<String>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut hosts = Vec::new();
		for locale in locales {
			if let Some(domain) = self.domain_of(locale)
				&& !hosts.iter().any(|h| h == domain)
			{
				hosts.push(domain.to_string());
			}
		}
		hosts
	}

	/// Validates the map: every domain must have a default locale from its
	/// own locale list, and no locale may belong to two domains.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let mut owners: HashMap<&str, &str> = HashMap::new();

		for (domain, config) in &self.domains {
			if config.default_locale.is_empty() {
				return Err(ConfigError::MissingDefaultLocale(domain.clone()));
			}
			if !config.locales.iter().any(|l| *l == config.default_locale) {
				return Err(ConfigError::DefaultLocaleNotInDomain {
					domain: domain.clone(),
					locale: config.default_locale.clone(),
				});
			}
			for locale in &config.locales {
				if let Some(first) = owners.insert(locale, domain) {
					return Err(ConfigError::AmbiguousLocaleOwnership {
						locale: locale.clone(),
						first: first.to_string(),
						second: domain.clone(),
					});
				}
			}
		}

		Ok(())
	}
}

/// Top-level localized-routing configuration.
///
/// # Examples
///
/// ```
/// use i18n_router::config::{GenerationMode, I18nConfig};
///
/// let config = I18nConfig::new(["en", "de", "fr"], "en", GenerationMode::PrefixExceptDefault);
/// assert_eq!(config.default_locale, "en");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
	/// The globally configured locale list.
	pub locales: Vec<String>,
	/// Locale used when neither parameters nor context pin one.
	pub default_locale: String,
	/// Pattern generation mode.
	pub mode: GenerationMode,
	/// Translation-catalog domain for route-name lookups.
	#[serde(default = "default_translation_domain")]
	pub translation_domain: String,
	/// Mapping locale -> host, used to force cross-host absolute URLs.
	#[serde(default)]
	pub host_map: HashMap<String, String>,
	/// Per-domain locale policies for the domain generation mode.
	#[serde(default)]
	pub domains: DomainMap,
	/// Mapping locale -> custom path segment used instead of the raw
	/// locale code when prefixing.
	#[serde(default)]
	pub locale_mapping: HashMap<String, String>,
	/// Per-host scheme overrides applied when generating onto that host.
	#[serde(default)]
	pub host_schemes: HashMap<String, String>,
}

fn default_translation_domain() -> String {
	"routes".to_string()
}

impl I18nConfig {
	/// Creates a config with the given locales, default locale and mode;
	/// everything else starts empty.
	pub fn new<I, S>(locales: I, default_locale: impl Into<String>, mode: GenerationMode) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			locales: locales.into_iter().map(Into::into).collect(),
			default_locale: default_locale.into(),
			mode,
			translation_domain: default_translation_domain(),
			host_map: HashMap::new(),
			domains: DomainMap::new(),
			locale_mapping: HashMap::new(),
			host_schemes: HashMap::new(),
		}
	}

	/// Sets the host map (locale -> host).
	pub fn with_host_map<I, K, V>(mut self, entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.host_map = entries
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		self
	}

	/// Sets the domain map.
	pub fn with_domains(mut self, domains: DomainMap) -> Self {
		self.domains = domains;
		self
	}

	/// Sets the locale -> path segment mapping.
	pub fn with_locale_mapping<I, K, V>(mut self, entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.locale_mapping = entries
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		self
	}

	/// Sets a scheme override for one host.
	pub fn with_host_scheme(
		mut self,
		host: impl Into<String>,
		scheme: impl Into<String>,
	) -> Self {
		self.host_schemes.insert(host.into(), scheme.into());
		self
	}
}
