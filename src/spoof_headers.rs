use crate::configs::ClientHints;
use crate::versions::Version;
use rand::prelude::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;

/// `Sec-CH-UA`
pub const SEC_CH_UA: &str = "Sec-CH-UA";
/// `Sec-CH-UA-Full-Version-List`
pub const SEC_CH_UA_FULL_VERSION_LIST: &str = "Sec-CH-UA-Full-Version-List";
/// `Sec-CH-UA-Mobile`
pub const SEC_CH_UA_MOBILE: &str = "Sec-CH-UA-Mobile";
/// `Sec-CH-UA-Platform`
pub const SEC_CH_UA_PLATFORM: &str = "Sec-CH-UA-Platform";
/// `Sec-CH-UA-Platform-Version`
pub const SEC_CH_UA_PLATFORM_VERSION: &str = "Sec-CH-UA-Platform-Version";
/// `Sec-CH-UA-Bitness`
pub const SEC_CH_UA_BITNESS: &str = "Sec-CH-UA-Bitness";
/// `Sec-CH-UA-Arch`
pub const SEC_CH_UA_ARCH: &str = "Sec-CH-UA-Arch";
/// `Sec-CH-UA-Model`
pub const SEC_CH_UA_MODEL: &str = "Sec-CH-UA-Model";
/// `Sec-CH-UA-Wow64`
pub const SEC_CH_UA_WOW64: &str = "Sec-CH-UA-Wow64";
/// `Sec-CH-UA-Form-Factors`
pub const SEC_CH_UA_FORM_FACTORS: &str = "Sec-CH-UA-Form-Factors";
/// `User-Agent`
pub const USER_AGENT: &str = "User-Agent";

/// GREASE brands rotated into the brand list.
pub const GREASE_BRANDS: [&str; 3] = ["Not(A:Brand", "Not?A_Brand", "Not A;Brand"];

/// The fixed placeholder brand that follows the GREASE brand.
const NOT_A_BRAND: &str = "Not(A:Brand";

lazy_static::lazy_static! {
    /// The version reported for the GREASE and placeholder brands, configurable via the `CHROME_NOT_A_BRAND_VERSION` env variable.
    pub static ref CHROME_NOT_A_BRAND_VERSION: String =
        not_a_brand_version(std::env::var("CHROME_NOT_A_BRAND_VERSION").ok());
    /// The major of the not a brand version.
    static ref CHROME_NOT_A_BRAND_MAJOR: String =
        Version::parse(&CHROME_NOT_A_BRAND_VERSION).major().to_string();
}

/// The placeholder version used when the override is unset or does not start with a number.
const DEFAULT_NOT_A_BRAND_VERSION: &str = "99.0.0.0";

/// Resolve the not a brand version override. Values without a leading numeric component fall back to `99.0.0.0`.
fn not_a_brand_version(raw: Option<String>) -> String {
    match raw {
        Some(v) if !Version::parse(v.trim()).is_empty() => v.trim().to_string(),
        Some(v) => {
            if !v.is_empty() {
                tracing::debug!(value = %v, "ignoring non numeric CHROME_NOT_A_BRAND_VERSION");
            }
            DEFAULT_NOT_A_BRAND_VERSION.into()
        }
        None => DEFAULT_NOT_A_BRAND_VERSION.into(),
    }
}

/// Represents a browser brand and its version, as sent in the `Sec-CH-UA` brand lists.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BrandEntry {
    /// The name of the browser brand (e.g., "Chromium", "Not(A:Brand").
    pub brand: String,
    /// The version of the brand, major only or full depending on the header.
    pub version: String,
}

/// Pick a GREASE brand.
pub fn grease_brand<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    GREASE_BRANDS.choose(rng).copied().unwrap_or(NOT_A_BRAND)
}

/// Build the brand list for a Chrome version. `full` selects the full version list instead of majors.
pub fn build_brand_list(version: &Version, grease: &str, full: bool) -> Vec<BrandEntry> {
    let (placeholder, real) = if full {
        (CHROME_NOT_A_BRAND_VERSION.clone(), version.to_string())
    } else {
        (CHROME_NOT_A_BRAND_MAJOR.clone(), version.major().to_string())
    };

    vec![
        BrandEntry {
            brand: grease.into(),
            version: placeholder.clone(),
        },
        BrandEntry {
            brand: NOT_A_BRAND.into(),
            version: placeholder,
        },
        BrandEntry {
            brand: "Google Chrome".into(),
            version: real.clone(),
        },
        BrandEntry {
            brand: "Chromium".into(),
            version: real,
        },
    ]
}

/// Render a brand list as a structured header value: `"Brand";v="1", ...`.
pub fn format_brand_list(brands: &[BrandEntry]) -> String {
    brands
        .iter()
        .map(|b| format!(r#""{}";v="{}""#, b.brand, b.version))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the enabled client hint headers for a version.
///
/// Only the brand lists depend on the version. The platform hints are fixed desktop Windows values.
pub fn client_hint_headers(
    version: &Version,
    hints: &ClientHints,
    grease: &str,
) -> HashMap<String, String> {
    let mut headers = HashMap::with_capacity(11);

    if hints.sec_ch_ua {
        headers.insert(
            SEC_CH_UA.into(),
            format_brand_list(&build_brand_list(version, grease, false)),
        );
    }
    if hints.mobile {
        headers.insert(SEC_CH_UA_MOBILE.into(), "?0".into());
    }
    if hints.platform {
        headers.insert(SEC_CH_UA_PLATFORM.into(), r#""Windows""#.into());
    }
    if hints.full_version_list {
        headers.insert(
            SEC_CH_UA_FULL_VERSION_LIST.into(),
            format_brand_list(&build_brand_list(version, grease, true)),
        );
    }
    if hints.platform_version {
        headers.insert(SEC_CH_UA_PLATFORM_VERSION.into(), r#""10.0.0""#.into());
    }
    if hints.bitness {
        headers.insert(SEC_CH_UA_BITNESS.into(), r#""64""#.into());
    }
    if hints.arch {
        headers.insert(SEC_CH_UA_ARCH.into(), r#""x86""#.into());
    }
    if hints.model {
        headers.insert(SEC_CH_UA_MODEL.into(), r#""""#.into());
    }
    if hints.wow64 {
        headers.insert(SEC_CH_UA_WOW64.into(), "?0".into());
    }
    if hints.form_factors {
        headers.insert(SEC_CH_UA_FORM_FACTORS.into(), r#""Desktop""#.into());
    }

    headers
}
