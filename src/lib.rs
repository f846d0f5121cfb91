/// Dotted browser versions.
pub mod versions;

/// Builder types.
pub mod configs;
/// The compact version catalog.
pub mod catalog;
/// Error types.
pub mod error;
/// Client hint headers.
pub mod spoof_headers;
/// User agent selection.
pub mod spoof_user_agent;

pub use catalog::{Catalog, CatalogEntry, VersionNode};
pub use configs::{AgentOs, Browser, ClientHints, GenerateOptions};
pub use error::{Error, Result};
pub use versions::Version;

#[cfg(feature = "headers")]
pub use http;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spoof_headers::{client_hint_headers, grease_brand, USER_AGENT};
use spoof_user_agent::{filter_versions, render_user_agent, select_version};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The catalog document embedded at build time.
static BROWSERS_YAML: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/browsers.yaml"));

lazy_static::lazy_static! {
    /// The embedded catalog, decoded once on first use.
    static ref EMBEDDED_CATALOG: Result<Arc<Catalog>> = Catalog::from_slice(BROWSERS_YAML).map(Arc::new);
}

/// The catalog shipped with the crate.
pub fn embedded_catalog() -> Result<Arc<Catalog>> {
    EMBEDDED_CATALOG.clone()
}

/// A generated user-agent with its headers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Generated {
    /// The user-agent string.
    pub user_agent: String,
    /// The enabled client hints plus `User-Agent`, keyed by header name.
    pub headers: HashMap<String, String>,
}

impl Generated {
    /// The headers as a typed header map.
    #[cfg(feature = "headers")]
    pub fn header_map(&self) -> http::HeaderMap {
        let mut map = http::HeaderMap::with_capacity(self.headers.len());

        for (name, value) in &self.headers {
            match (
                http::header::HeaderName::from_bytes(name.as_bytes()),
                http::header::HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => tracing::debug!(%name, "skipping header that is not valid http"),
            }
        }

        map
    }
}

/// Pick a version from the catalog and build the user-agent and headers for it.
pub fn generate_from_catalog<R: Rng + ?Sized>(
    catalog: &Catalog,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<Generated> {
    let (browser, os) = (options.browser, options.os);

    let entry = catalog
        .lookup(browser, os)
        .ok_or(Error::NotFound { browser, os })?;

    let candidates = filter_versions(
        entry.versions(),
        &options.min_version,
        &options.max_version,
    );

    let version = select_version(&candidates, options.weighted, rng)
        .ok_or(Error::NoMatch { browser, os })?;

    tracing::trace!(
        %browser,
        %os,
        %version,
        candidates = candidates.len(),
        "selected version"
    );

    let user_agent = render_user_agent(entry.ua_template(), version);
    let grease = grease_brand(rng);

    let mut headers = client_hint_headers(version, &options.client_hints, grease);
    headers.insert(USER_AGENT.into(), user_agent.clone());

    Ok(Generated {
        user_agent,
        headers,
    })
}

/// Generate with the embedded catalog and the thread local rng.
pub fn generate(options: &GenerateOptions) -> Result<Generated> {
    generate_rng(options, &mut rand::rng())
}

/// Generate with the embedded catalog and a custom rng.
pub fn generate_rng<R: Rng + ?Sized>(options: &GenerateOptions, rng: &mut R) -> Result<Generated> {
    let catalog = EMBEDDED_CATALOG.as_ref().map_err(Clone::clone)?;
    generate_from_catalog(catalog, options, rng)
}

/// Generates user-agents from a shared catalog.
///
/// The catalog is immutable and shared by `Arc`. The random source is owned by the generator and locked for
/// each call, so one generator can serve many threads. Use [`Generator::generate_with_rng`] to supply a
/// random source per call instead.
///
/// ```
/// use spider_user_agent::{GenerateOptions, Generator};
///
/// let generator = Generator::new().unwrap();
/// let generated = generator
///     .generate(&GenerateOptions::default().with_all_client_hints())
///     .unwrap();
///
/// assert_eq!(generated.headers["User-Agent"], generated.user_agent);
/// assert!(generated.headers.contains_key("Sec-CH-UA"));
/// ```
#[derive(Debug)]
pub struct Generator {
    catalog: Arc<Catalog>,
    rng: Mutex<StdRng>,
}

impl Generator {
    /// A generator over the embedded catalog. Fails if the embedded catalog cannot be decoded.
    pub fn new() -> Result<Self> {
        Ok(Self::with_catalog_and_rng(embedded_catalog()?, StdRng::from_os_rng()))
    }

    /// A generator over a custom catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::with_catalog_and_rng(Arc::new(catalog), StdRng::from_os_rng())
    }

    /// A generator over a shared catalog and a given rng, e.g. a seeded one.
    pub fn with_catalog_and_rng(catalog: Arc<Catalog>, rng: StdRng) -> Self {
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate a user-agent and headers.
    pub fn generate(&self, options: &GenerateOptions) -> Result<Generated> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        generate_from_catalog(&self.catalog, options, &mut *rng)
    }

    /// Generate a user-agent and headers with a caller owned rng.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> Result<Generated> {
        generate_from_catalog(&self.catalog, options, rng)
    }
}
