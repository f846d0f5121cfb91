use crate::configs::{AgentOs, Browser};
use crate::error::Result;
use crate::versions::Version;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};

/// The marker replaced with the selected version inside a user-agent template.
pub const VERSION_MARKER: &str = "{{version}}";

/// The catalog document layout.
#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    browsers: BTreeMap<String, Value>,
}

/// A single browser and os pair in the catalog document.
#[derive(Debug, serde::Deserialize)]
struct PlatformFile {
    ua_template: String,
    #[serde(default)]
    versions: Value,
}

/// One node of the compact version tree.
///
/// The tree is keyed by the version component at each depth:
///
/// ```yaml
/// 133:
///   0:
///     6943: [53, 98]
/// 145:
///   2: ~
/// ```
///
/// describes `133.0.6943.53`, `133.0.6943.98` and `145.2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionNode {
    /// More components follow, keyed by the next component.
    ///
    /// Keys that coerce to the same component (`133` and `"133"`) each keep their subtree, so the
    /// children are a list in document order rather than a map.
    Branch(Vec<(u32, VersionNode)>),
    /// The final component of sibling versions sharing the prefix.
    Leaves(Vec<u32>),
    /// The prefix is a complete version.
    Terminal,
}

impl VersionNode {
    /// Map a raw YAML node onto the tree. Returns `None` for shapes that cannot describe versions.
    ///
    /// Keys and leaves that are not integer-like are dropped, the rest of the branch is kept.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(VersionNode::Terminal),
            Value::Mapping(map) => {
                let mut branch = Vec::with_capacity(map.len());

                for (key, child) in map {
                    let Some(component) = coerce_component(key) else {
                        tracing::trace!(?key, "skipping non numeric version key");
                        continue;
                    };
                    let Some(node) = VersionNode::from_value(child) else {
                        tracing::trace!(component, "skipping malformed version branch");
                        continue;
                    };
                    branch.push((component, node));
                }

                Some(VersionNode::Branch(branch))
            }
            Value::Sequence(items) => Some(VersionNode::Leaves(
                items
                    .iter()
                    .filter_map(|item| {
                        let leaf = coerce_component(item);
                        if leaf.is_none() {
                            tracing::trace!(?item, "skipping non numeric version leaf");
                        }
                        leaf
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Expand the tree into every version it describes, in tree order.
    pub fn flatten(&self) -> Vec<Version> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect(&mut prefix, &mut out);
        out
    }

    fn collect(&self, prefix: &mut Vec<u32>, out: &mut Vec<Version>) {
        match self {
            VersionNode::Branch(children) => {
                for (component, child) in children {
                    prefix.push(*component);
                    child.collect(prefix, out);
                    prefix.pop();
                }
            }
            VersionNode::Leaves(leaves) => {
                for leaf in leaves {
                    let mut components = Vec::with_capacity(prefix.len() + 1);
                    components.extend_from_slice(prefix);
                    components.push(*leaf);
                    out.push(Version::new(components));
                }
            }
            VersionNode::Terminal => {
                if !prefix.is_empty() {
                    out.push(Version::new(prefix.clone()));
                }
            }
        }
    }
}

/// Normalize an integer-like YAML scalar into a version component.
fn coerce_component(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                u32::try_from(n).ok()
            } else if n.is_f64() {
                let f = n.as_f64()?;
                (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64)
                    .then_some(f as u32)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode a raw version tree into a deduplicated list sorted newest first.
pub fn decode_versions(value: &Value) -> Vec<Version> {
    match VersionNode::from_value(value) {
        Some(node) => sort_versions(node.flatten()),
        None => {
            tracing::trace!("version tree is not a map, list or null");
            Vec::new()
        }
    }
}

/// Sort newest first and drop versions with identical components.
///
/// `145.2` and `145.2.0.0` compare equal but both are kept since they render differently.
fn sort_versions(mut versions: Vec<Version>) -> Vec<Version> {
    versions.sort_by(|a, b| b.cmp(a).then_with(|| b.components.cmp(&a.components)));
    versions.dedup_by(|a, b| a.components == b.components);
    versions
}

/// The decoded versions of one browser and os pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    ua_template: String,
    versions: Vec<Version>,
}

impl CatalogEntry {
    /// Build an entry from a template and any versions. The versions are deduplicated and sorted newest first.
    pub fn new(ua_template: impl Into<String>, versions: impl IntoIterator<Item = Version>) -> Self {
        Self {
            ua_template: ua_template.into(),
            versions: sort_versions(versions.into_iter().collect()),
        }
    }

    /// The user-agent template containing [`VERSION_MARKER`].
    pub fn ua_template(&self) -> &str {
        &self.ua_template
    }

    /// The versions sorted newest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// The newest version.
    pub fn latest(&self) -> Option<&Version> {
        self.versions.first()
    }
}

/// The read-only version catalog, keyed by browser and os.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<(Browser, AgentOs), CatalogEntry>,
}

impl Catalog {
    /// Decode a YAML catalog document.
    ///
    /// A document that is not valid YAML or lacks the `browsers` map is an error. Browser and os names
    /// that are not known are skipped, as are malformed entries, and malformed version branches only drop
    /// the versions they held.
    ///
    /// ```
    /// use spider_user_agent::{AgentOs, Browser, Catalog};
    ///
    /// let catalog = Catalog::from_slice(br#"
    /// browsers:
    ///   chrome:
    ///     windows:
    ///       ua_template: "Chrome/{{version}}"
    ///       versions:
    ///         133:
    ///           0:
    ///             6943: [53, 98]
    /// "#).unwrap();
    ///
    /// let entry = catalog.lookup(Browser::Chrome, AgentOs::Windows).unwrap();
    /// assert_eq!(entry.versions()[0].to_string(), "133.0.6943.98");
    /// ```
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_slice(bytes)?;
        let mut catalog = Catalog::default();

        for (browser_name, platforms) in file.browsers {
            let Ok(browser) = browser_name.parse::<Browser>() else {
                tracing::debug!(browser = %browser_name, "skipping unknown browser in catalog");
                continue;
            };
            let Value::Mapping(platforms) = platforms else {
                tracing::debug!(%browser, "skipping catalog browser that is not a map");
                continue;
            };

            for (os_key, platform) in platforms {
                let Some(os_name) = os_key.as_str() else {
                    tracing::debug!(%browser, ?os_key, "skipping non string os in catalog");
                    continue;
                };
                let Ok(os) = os_name.parse::<AgentOs>() else {
                    tracing::debug!(%browser, os = %os_name, "skipping unknown os in catalog");
                    continue;
                };
                let platform = match serde_yaml::from_value::<PlatformFile>(platform) {
                    Ok(platform) => platform,
                    Err(error) => {
                        tracing::debug!(%browser, %os, %error, "skipping malformed catalog entry");
                        continue;
                    }
                };

                let versions = decode_versions(&platform.versions);

                tracing::debug!(%browser, %os, versions = versions.len(), "decoded catalog entry");

                catalog.entries.insert(
                    (browser, os),
                    CatalogEntry {
                        ua_template: platform.ua_template,
                        versions,
                    },
                );
            }
        }

        Ok(catalog)
    }

    /// Decode a YAML catalog document from a string.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::from_slice(source.as_bytes())
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, browser: Browser, os: AgentOs, entry: CatalogEntry) {
        self.entries.insert((browser, os), entry);
    }

    /// Find the entry for a browser and os.
    pub fn lookup(&self, browser: Browser, os: AgentOs) -> Option<&CatalogEntry> {
        self.entries.get(&(browser, os))
    }

    /// Iterate every entry.
    pub fn iter(&self) -> impl Iterator<Item = (Browser, AgentOs, &CatalogEntry)> {
        self.entries
            .iter()
            .map(|((browser, os), entry)| (*browser, *os, entry))
    }

    /// The number of browser and os pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
