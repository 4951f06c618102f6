//! The Gatherer client: intent-named request builders over a shared
//! keep-alive connection, with manual redirect following and cache-wrapped
//! fetching.
//!
//! Gatherer redirects freely — a search with a single match 302s straight to
//! the card details page — so the client follows `Location` headers itself
//! rather than letting the transport do it. That way every hop lands in the
//! cache under its own URI.

use crate::cache::{CacheKey, FetchCache};
use crate::config;
use crate::error::{Error, Result};
use crate::response::GathererResponse;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use url::form_urlencoded;
use url::Url;

/// Base URL of the Gatherer site.
const BASE_URL: &str = "https://gatherer.wizards.com";

/// Card details page, keyed by multiverse ID.
const CARD_PATH: &str = "/Pages/Card/Details.aspx";
/// Search results page.
const SEARCH_PATH: &str = "/Pages/Search/Default.aspx";
/// Homepage, listing formats, sets and card types.
const HOMEPAGE_PATH: &str = "/Pages/Default.aspx";

/// Redirect hops allowed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Search options that take arbitrary text. Each present value becomes one
/// whole AND condition in Gatherer's advanced-search syntax: `+["<value>"]`.
const SEARCH_TEXT_OPTIONS: [&str; 3] = ["name", "format", "set"];

/// All recognized search options: the text options plus the two output-format
/// options (`output`, `method`) that control how the results page renders.
const SEARCH_ALLOWED_OPTIONS: [&str; 5] = ["name", "format", "set", "output", "method"];

/// Client for the Gatherer website.
///
/// Holds one lazily-built HTTP connection pool with keep-alive, so routing
/// all requests through a single instance reuses connections. The shared
/// process-wide instance from [`instance`] does exactly that; tests and
/// embedders can build their own with [`GathererAccess::new`].
pub struct GathererAccess {
    base: Url,
    cache: Arc<dyn FetchCache>,
    connection: OnceLock<reqwest::Client>,
}

/// The shared process-wide client, created on first use with the cache store
/// the global [`crate::config`] resolves at that moment.
pub fn instance() -> &'static GathererAccess {
    static INSTANCE: OnceLock<GathererAccess> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let base = Url::parse(BASE_URL).expect("base url is valid");
        GathererAccess::new(base, config::cache_store())
    })
}

impl GathererAccess {
    /// Create a client against `base` with an injected cache store.
    pub fn new(base: Url, cache: Arc<dyn FetchCache>) -> Self {
        Self {
            base,
            cache,
            connection: OnceLock::new(),
        }
    }

    /// Request the details page for a card by multiverse ID.
    pub async fn card(&self, multiverse_id: &str) -> Result<GathererResponse> {
        let query = BTreeMap::from([("multiverseid".to_string(), multiverse_id.to_string())]);
        self.get(CARD_PATH, &query).await
    }

    /// Search Gatherer with the given options.
    ///
    /// Recognized options are `name`, `format` and `set` (free-text AND
    /// conditions) plus `output` and `method`, which together pick the
    /// results page rendering: `output=standard`, `output=compact`,
    /// `output=checklist`, or `output=spoiler` with `method=text` or
    /// `method=visual`. A search with exactly one match redirects to the
    /// card details page, and this follows the redirect.
    ///
    /// The request goes out with the caller's raw options. The decorated
    /// `+["…"]` form computed below is what the advanced-search syntax
    /// expects; switching the outgoing request over to it changes which
    /// results the site returns for multi-word values and has not been
    /// verified against live searches.
    pub async fn search(&self, options: &BTreeMap<String, String>) -> Result<GathererResponse> {
        let params = decorated_search_params(options);
        tracing::trace!(?params, "advanced-search form of the query");
        self.get(SEARCH_PATH, options).await
    }

    /// Request the Gatherer homepage. It carries site-wide metadata: the
    /// lists of all formats, sets and card types.
    pub async fn homepage(&self) -> Result<GathererResponse> {
        self.get(HOMEPAGE_PATH, &BTreeMap::new()).await
    }

    /// Shared GET path: build the target URI, fetch through the cache, and
    /// follow redirects until a terminal response.
    async fn get(&self, path: &str, query: &BTreeMap<String, String>) -> Result<GathererResponse> {
        let uri = match to_query(query) {
            Some(qs) => format!("{path}?{qs}"),
            None => path.to_string(),
        };

        let mut response = self.get_with_cache(&uri).await?;
        let mut hops = 0usize;
        while let Some(location) = response.redirect_location() {
            if hops >= MAX_REDIRECTS {
                return Err(Error::RedirectLimitExceeded {
                    limit: MAX_REDIRECTS,
                    uri: location.to_string(),
                });
            }
            hops += 1;
            let next = location.to_string();
            tracing::debug!(to = %next, hop = hops, "following redirect");
            response = self.get_with_cache(&next).await?;
        }
        Ok(response)
    }

    /// Fetch one URI through the cache: a hit returns the stored response
    /// with no network I/O, a miss issues the GET and stores the result.
    async fn get_with_cache(&self, uri: &str) -> Result<GathererResponse> {
        let key = CacheKey::get(uri);
        let url = self.resolve(uri)?;
        let connection = self.connection().clone();

        self.cache
            .fetch(
                key,
                Box::pin(async move {
                    tracing::debug!(%url, "GET");
                    let resp = connection.get(url).send().await?;
                    let status = resp.status().as_u16();
                    let headers = resp
                        .headers()
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                        .collect();
                    let body = resp.text().await.unwrap_or_default();
                    Ok(GathererResponse {
                        status,
                        headers,
                        body,
                    })
                }),
            )
            .await
    }

    /// Resolve a request target (path-and-query, or an absolute `Location`)
    /// against the base URL.
    fn resolve(&self, uri: &str) -> Result<Url> {
        self.base.join(uri).map_err(|source| Error::InvalidUri {
            uri: uri.to_string(),
            source,
        })
    }

    /// The shared HTTP connection, built on first use. Redirects are not
    /// followed by the transport — the caching layer needs to see each hop.
    fn connection(&self) -> &reqwest::Client {
        self.connection.get_or_init(|| {
            reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default()
        })
    }
}

/// The allow-list + decoration pass over search options: unrecognized keys
/// are dropped, and each present text option is wrapped into one whole AND
/// condition, `+["<value>"]`.
pub(crate) fn decorated_search_params(
    options: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut params: BTreeMap<String, String> = options
        .iter()
        .filter(|(key, _)| SEARCH_ALLOWED_OPTIONS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    for key in SEARCH_TEXT_OPTIONS {
        if let Some(value) = options.get(key) {
            params.insert(key.to_string(), format!("+[\"{value}\"]"));
        }
    }
    params
}

/// Encode a parameter mapping as `key=value&key=value…`, form-urlencoded.
/// An empty mapping yields no query component at all.
fn to_query(params: &BTreeMap<String, String>) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    Some(serializer.finish())
}
