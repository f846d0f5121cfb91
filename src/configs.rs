use crate::versions::Version;
use std::fmt;
use std::str::FromStr;

/// Browser names accepted in the catalog and by [`Browser::from_str`].
static BROWSER_NAMES: phf::Map<&'static str, Browser> = phf::phf_map! {
    "chrome" => Browser::Chrome,
    "google-chrome" => Browser::Chrome,
    "firefox" => Browser::Firefox,
    "safari" => Browser::Safari,
    "edge" => Browser::Edge,
    "msedge" => Browser::Edge,
};

/// Operating system names accepted in the catalog and by [`AgentOs::from_str`].
static OS_NAMES: phf::Map<&'static str, AgentOs> = phf::phf_map! {
    "windows" => AgentOs::Windows,
    "win" => AgentOs::Windows,
    "linux" => AgentOs::Linux,
    "macos" => AgentOs::Mac,
    "mac" => AgentOs::Mac,
    "osx" => AgentOs::Mac,
    "android" => AgentOs::Android,
    "ios" => AgentOs::IPhone,
    "iphone" => AgentOs::IPhone,
};

/// The browser to generate a user-agent for.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    /// Google Chrome.
    Chrome,
    /// Mozilla Firefox.
    Firefox,
    /// Apple Safari.
    Safari,
    /// Microsoft Edge.
    Edge,
}

impl Browser {
    /// The catalog key of the browser.
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Safari => "safari",
            Browser::Edge => "edge",
        }
    }
}

/// The user agent type of profiles.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentOs {
    /// Linux.
    Linux,
    /// Mac.
    #[serde(rename = "macos")]
    Mac,
    /// Iphone
    #[serde(rename = "ios")]
    IPhone,
    #[default]
    /// Windows.
    Windows,
    /// Android.
    Android,
}

impl AgentOs {
    /// The catalog key of the operating system.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentOs::Linux => "linux",
            AgentOs::Mac => "macos",
            AgentOs::IPhone => "ios",
            AgentOs::Windows => "windows",
            AgentOs::Android => "android",
        }
    }
}

/// A browser or operating system name that is not known.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown name `{0}`")]
pub struct UnknownName(pub String);

impl FromStr for Browser {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BROWSER_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl FromStr for AgentOs {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OS_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AgentOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which `Sec-CH-UA*` client hint headers to emit. Every flag defaults to `false`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClientHints {
    /// `Sec-CH-UA`
    pub sec_ch_ua: bool,
    /// `Sec-CH-UA-Full-Version-List`
    pub full_version_list: bool,
    /// `Sec-CH-UA-Platform`
    pub platform: bool,
    /// `Sec-CH-UA-Platform-Version`
    pub platform_version: bool,
    /// `Sec-CH-UA-Mobile`
    pub mobile: bool,
    /// `Sec-CH-UA-Bitness`
    pub bitness: bool,
    /// `Sec-CH-UA-Arch`
    pub arch: bool,
    /// `Sec-CH-UA-Form-Factors`
    pub form_factors: bool,
    /// `Sec-CH-UA-Model`
    pub model: bool,
    /// `Sec-CH-UA-Wow64`
    pub wow64: bool,
}

impl ClientHints {
    /// The low entropy hints a browser sends by default: `Sec-CH-UA`, `Sec-CH-UA-Mobile` and `Sec-CH-UA-Platform`.
    pub fn basic() -> Self {
        Self {
            sec_ch_ua: true,
            mobile: true,
            platform: true,
            ..Default::default()
        }
    }

    /// Every supported hint.
    pub fn all() -> Self {
        Self {
            sec_ch_ua: true,
            full_version_list: true,
            platform: true,
            platform_version: true,
            mobile: true,
            bitness: true,
            arch: true,
            form_factors: true,
            model: true,
            wow64: true,
        }
    }

    /// No hint is enabled.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Options for a single generation.
///
/// The defaults are Chrome on Windows, no version bounds, weighted selection and no client hints.
/// Each builder method only touches the fields it names.
///
/// ```
/// use spider_user_agent::{AgentOs, Browser, GenerateOptions};
///
/// let options = GenerateOptions::default()
///     .with_browser(Browser::Chrome)
///     .with_os(AgentOs::Windows)
///     .with_min_version("133")
///     .with_client_hints();
///
/// assert!(options.weighted);
/// assert!(options.client_hints.sec_ch_ua);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerateOptions {
    /// The target browser.
    pub browser: Browser,
    /// The target operating system.
    pub os: AgentOs,
    /// Lowest allowed version, inclusive. Empty means unbounded.
    pub min_version: Version,
    /// Highest allowed version, inclusive. Empty means unbounded.
    pub max_version: Version,
    /// Favor newer versions when picking.
    pub weighted: bool,
    /// Client hint headers to emit.
    pub client_hints: ClientHints,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            browser: Browser::Chrome,
            os: AgentOs::Windows,
            min_version: Version::default(),
            max_version: Version::default(),
            weighted: true,
            client_hints: ClientHints::default(),
        }
    }
}

impl GenerateOptions {
    /// Set `browser`.
    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }

    /// Set `os`.
    pub fn with_os(mut self, os: AgentOs) -> Self {
        self.os = os;
        self
    }

    /// Set `min_version` from a dotted string such as `"133.0.0.0"` or `"145.2"`.
    pub fn with_min_version(mut self, version: &str) -> Self {
        self.min_version = Version::parse(version);
        self
    }

    /// Set `max_version` from a dotted string.
    pub fn with_max_version(mut self, version: &str) -> Self {
        self.max_version = Version::parse(version);
        self
    }

    /// Set `min_version`.
    pub fn with_min_version_value(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    /// Set `max_version`.
    pub fn with_max_version_value(mut self, version: Version) -> Self {
        self.max_version = version;
        self
    }

    /// Set `weighted`. Disabled selection is uniform over the matching versions.
    pub fn with_weighted_selection(mut self, enable: bool) -> Self {
        self.weighted = enable;
        self
    }

    /// Turn on the [`ClientHints::basic`] flags. Other flags are left as they are.
    pub fn with_client_hints(mut self) -> Self {
        self.client_hints.sec_ch_ua = true;
        self.client_hints.mobile = true;
        self.client_hints.platform = true;
        self
    }

    /// Turn on every client hint flag.
    pub fn with_all_client_hints(mut self) -> Self {
        self.client_hints = ClientHints::all();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = GenerateOptions::default();
        assert_eq!(options.browser, Browser::Chrome);
        assert_eq!(options.os, AgentOs::Windows);
        assert!(options.weighted);
        assert!(options.min_version.is_empty());
        assert!(options.max_version.is_empty());
        assert!(options.client_hints.is_empty());
    }

    #[test]
    fn client_hints_keep_other_flags() {
        let mut options = GenerateOptions::default();
        options.client_hints.wow64 = true;
        let options = options.with_client_hints();
        assert!(options.client_hints.wow64);
        assert!(options.client_hints.sec_ch_ua);
        assert!(options.client_hints.mobile);
        assert!(options.client_hints.platform);
        assert!(!options.client_hints.full_version_list);
    }

    #[test]
    fn version_bounds() {
        let options = GenerateOptions::default()
            .with_min_version("133.0")
            .with_max_version_value(Version::new(vec![140]));
        assert_eq!(options.min_version.components, vec![133, 0]);
        assert_eq!(options.max_version.components, vec![140]);
    }

    #[test]
    fn parse_names() {
        assert_eq!("chrome".parse::<Browser>(), Ok(Browser::Chrome));
        assert_eq!("MSEdge".parse::<Browser>(), Ok(Browser::Edge));
        assert_eq!("osx".parse::<AgentOs>(), Ok(AgentOs::Mac));
        assert_eq!("ios".parse::<AgentOs>(), Ok(AgentOs::IPhone));
        assert!("netscape".parse::<Browser>().is_err());

        for os in [
            AgentOs::Linux,
            AgentOs::Mac,
            AgentOs::IPhone,
            AgentOs::Windows,
            AgentOs::Android,
        ] {
            assert_eq!(os.to_string().parse::<AgentOs>(), Ok(os));
        }
    }
}
