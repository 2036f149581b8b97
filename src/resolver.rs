//! Pluggable locale resolution.
//!
//! When a matched route is legitimately servable by more than one locale
//! on the current host and the request context pins none, the router asks
//! a [`LocaleResolver`] to pick one. Applications typically supply their
//! own implementation (cookies, `Accept-Language`, user profile); the
//! crate ships a simple preference-list resolver.

use crate::context::RequestContext;

/// Fallback used when a request carries no usable locale signal.
pub trait LocaleResolver: Send + Sync {
	/// Picks a locale from `candidates` for the given request, or `None`
	/// when no candidate is acceptable.
	fn resolve_locale(&self, ctx: &RequestContext, candidates: &[String]) -> Option<String>;
}

/// Resolves by walking an ordered preference list and returning the first
/// preference that is among the candidates.
///
/// # Examples
///
/// ```
/// use i18n_router::context::RequestContext;
/// use i18n_router::resolver::{LocaleResolver, PreferredLocaleResolver};
///
/// let resolver = PreferredLocaleResolver::new(["de", "en"]);
/// let ctx = RequestContext::default();
///
/// let candidates = vec!["en".to_string(), "de".to_string(), "fr".to_string()];
/// assert_eq!(resolver.resolve_locale(&ctx, &candidates), Some("de".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PreferredLocaleResolver {
	preferences: Vec<String>,
}

impl PreferredLocaleResolver {
	/// Creates a resolver with the given preference order.
	pub fn new<I, S>(preferences: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			preferences: preferences.into_iter().map(Into::into).collect(),
		}
	}
}

impl LocaleResolver for PreferredLocaleResolver {
	fn resolve_locale(&self, _ctx: &RequestContext, candidates: &[String]) -> Option<String> {
		self.preferences
			.iter()
			.find(|preference| candidates.contains(preference))
			.cloned()
	}
}
