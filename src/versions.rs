use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A dotted browser version with a variable number of components, e.g. `133.0.6943.98` or `145.2`.
///
/// Ordering and equality treat missing trailing components as `0`, so `145.2` equals `145.2.0.0`.
/// Rendering keeps the components exactly as stored.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Version {
    /// The numeric components in order, most significant first.
    pub components: Vec<u32>,
}

impl Version {
    /// Constructs a new `Version` from its components.
    ///
    /// # Example
    /// ```
    /// use spider_user_agent::Version;
    ///
    /// let v = Version::new(vec![133, 0, 6943, 98]);
    /// assert_eq!(v.to_string(), "133.0.6943.98");
    /// ```
    pub fn new(components: Vec<u32>) -> Self {
        Self { components }
    }

    /// Parse a dotted version string.
    ///
    /// Only the leading run of numeric tokens is kept. Parsing stops at the first token that is not a
    /// non-negative integer and never fails, so `"abc"` yields an empty version.
    ///
    /// ```
    /// use spider_user_agent::Version;
    ///
    /// assert_eq!(Version::parse("133.0.6943.98").components, vec![133, 0, 6943, 98]);
    /// assert_eq!(Version::parse("136.0.beta.1").components, vec![136, 0]);
    /// assert!(Version::parse("abc").is_empty());
    /// ```
    pub fn parse(version: &str) -> Self {
        let components = version
            .split('.')
            .map_while(|part| part.parse::<u32>().ok())
            .collect();
        Self { components }
    }

    /// The major component, `0` when the version has none.
    pub fn major(&self) -> u32 {
        self.components.first().copied().unwrap_or_default()
    }

    /// The version has no components. Used as "no bound" by the range filters.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components with trailing zeros removed, the canonical form for equality and hashing.
    fn significant(&self) -> &[u32] {
        let end = self
            .components
            .iter()
            .rposition(|c| *c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..end]
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());

        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);

            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.components.iter();

        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
            for part in parts {
                write!(f, ".{part}")?;
            }
        }

        Ok(())
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Vec<u32>> for Version {
    fn from(components: Vec<u32>) -> Self {
        Self { components }
    }
}

impl From<&str> for Version {
    fn from(version: &str) -> Self {
        Self::parse(version)
    }
}
