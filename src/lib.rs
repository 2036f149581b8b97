//! Locale-aware URL routing.
//!
//! This crate expands a collection of canonical routes into per-locale
//! variants, translating each route's path through a pluggable message
//! catalog, and matches and generates URLs against the expanded table.
//!
//! The main pieces are:
//!
//! - [`route::RouteCollection`]: the canonical routes as the application
//!   declares them
//! - [`translation::RouteTranslator`]: looks up translated paths; a
//!   missed lookup falls back to the route's own path
//! - [`strategy::PatternGenerationStrategy`]: derives the localized
//!   pattern per locale (locale prefixes, per-domain tables)
//! - [`loader::I18nLoader`]: builds the immutable
//!   [`loader::LocalizedRouteTable`]
//! - [`router::I18nRouter`]: request-time matching and URL generation
//!
//! # Examples
//!
//! ```
//! use i18n_router::config::{GenerationMode, I18nConfig};
//! use i18n_router::context::RequestContext;
//! use i18n_router::loader::I18nLoader;
//! use i18n_router::route::{Route, RouteCollection};
//! use i18n_router::router::I18nRouter;
//! use i18n_router::strategy::{DefaultRouteExclusionStrategy, PatternGenerationStrategy};
//! use i18n_router::translation::IdentityTranslator;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let config = I18nConfig::new(["en", "de", "fr"], "en", GenerationMode::PrefixExceptDefault);
//! let loader = I18nLoader::new(
//!     Box::new(DefaultRouteExclusionStrategy),
//!     PatternGenerationStrategy::from_config(&config),
//!     Arc::new(IdentityTranslator),
//! );
//!
//! let mut routes = RouteCollection::new();
//! routes.add("homepage", Route::new("/")).unwrap();
//! let router = I18nRouter::new(loader.load(&routes).unwrap(), &config);
//!
//! let ctx = RequestContext::new("localhost", "http").with_locale("fr");
//! assert_eq!(
//!     router.generate("homepage", &HashMap::new(), false, &ctx).unwrap(),
//!     "/fr/",
//! );
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod pattern;
pub mod resolver;
pub mod route;
pub mod router;
pub mod strategy;
pub mod translation;

pub use config::{DomainConfig, DomainMap, GenerationMode, I18nConfig};
pub use context::RequestContext;
pub use error::{ConfigError, GenerateError, MatchError};
pub use loader::{I18nLoader, LOCALE_PARAM, LocalizedRoute, LocalizedRouteTable};
pub use resolver::{LocaleResolver, PreferredLocaleResolver};
pub use route::{Route, RouteCollection};
pub use router::{I18nRouter, RouteMatch};
pub use strategy::{
	DefaultRouteExclusionStrategy, PatternGenerationStrategy, RouteExclusionStrategy,
};
pub use translation::{CatalogTranslator, IdentityTranslator, MessageCatalog, RouteTranslator};
