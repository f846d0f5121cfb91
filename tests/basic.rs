use rand::rngs::StdRng;
use rand::SeedableRng;
use spider_user_agent::{
    embedded_catalog, AgentOs, Browser, Catalog, Error, GenerateOptions, Generator, Version,
};
use std::sync::Arc;

const ALL_HINT_HEADERS: [&str; 10] = [
    "Sec-CH-UA",
    "Sec-CH-UA-Mobile",
    "Sec-CH-UA-Platform",
    "Sec-CH-UA-Full-Version-List",
    "Sec-CH-UA-Platform-Version",
    "Sec-CH-UA-Bitness",
    "Sec-CH-UA-Arch",
    "Sec-CH-UA-Model",
    "Sec-CH-UA-Wow64",
    "Sec-CH-UA-Form-Factors",
];

/// The version embedded in a chrome user-agent.
fn chrome_version(ua: &str) -> Version {
    let version = ua
        .split_whitespace()
        .find_map(|s| s.strip_prefix("Chrome/"))
        .unwrap_or_default();
    Version::parse(version)
}

#[test]
fn test_default() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;
    let generated = generator.generate(&GenerateOptions::default())?;

    assert!(!generated.user_agent.is_empty());
    assert!(generated.user_agent.contains("Windows NT 10.0"));
    assert_eq!(generated.headers.len(), 1);
    assert_eq!(generated.headers["User-Agent"], generated.user_agent);
    assert!(!chrome_version(&generated.user_agent).is_empty());

    Ok(())
}

#[test]
fn test_min_version_filters() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;
    let min = Version::parse("133.0.0.0");

    for _ in 0..50 {
        let generated = generator.generate(
            &GenerateOptions::default()
                .with_browser(Browser::Chrome)
                .with_os(AgentOs::Windows)
                .with_min_version("133.0.0.0"),
        )?;
        assert!(chrome_version(&generated.user_agent) >= min);
    }

    let generated = generator.generate(&GenerateOptions::default().with_min_version("133"))?;
    assert!(chrome_version(&generated.user_agent) >= Version::parse("133"));

    Ok(())
}

#[test]
fn test_version_window() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;
    let options = GenerateOptions::default()
        .with_min_version_value(Version::new(vec![136]))
        .with_max_version("137.0.7151.120");

    for _ in 0..50 {
        let version = chrome_version(&generator.generate(&options)?.user_agent);
        assert!(version >= Version::parse("136"));
        assert!(version <= Version::parse("137.0.7151.120"));
    }

    Ok(())
}

#[test]
fn test_no_match() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;

    let err = generator
        .generate(&GenerateOptions::default().with_min_version("999"))
        .unwrap_err();
    assert!(matches!(err, Error::NoMatch { .. }));

    let err = generator
        .generate(
            &GenerateOptions::default()
                .with_min_version("140")
                .with_max_version("139"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NoMatch { .. }));

    Ok(())
}

#[test]
fn test_no_match_above_catalog_maximum() {
    let catalog = Catalog::from_yaml_str(
        r#"
browsers:
  chrome:
    windows:
      ua_template: "Chrome/{{version}}"
      versions:
        133:
          0:
            6943: [53, 98]
"#,
    )
    .unwrap();
    let generator = Generator::with_catalog(catalog);

    let err = generator
        .generate(&GenerateOptions::default().with_min_version("133.0.6943.10000"))
        .unwrap_err();
    assert!(matches!(err, Error::NoMatch { .. }));

    let generated = generator
        .generate(&GenerateOptions::default().with_min_version("133.0.6943.98"))
        .unwrap();
    assert_eq!(generated.user_agent, "Chrome/133.0.6943.98");
}

#[test]
fn test_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;

    let err = generator
        .generate(&GenerateOptions::default().with_browser(Browser::Edge))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            browser: Browser::Edge,
            os: AgentOs::Windows
        }
    ));

    let err = generator
        .generate(
            &GenerateOptions::default()
                .with_browser(Browser::Safari)
                .with_os(AgentOs::Windows),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    Ok(())
}

#[test]
fn test_client_hints() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;

    let generated = generator.generate(&GenerateOptions::default().with_client_hints())?;
    assert_eq!(generated.headers.len(), 4);
    for name in ["Sec-CH-UA", "Sec-CH-UA-Mobile", "Sec-CH-UA-Platform", "User-Agent"] {
        assert!(generated.headers.contains_key(name), "missing {name}");
    }

    let generated = generator.generate(&GenerateOptions::default().with_all_client_hints())?;
    assert_eq!(generated.headers.len(), ALL_HINT_HEADERS.len() + 1);
    for name in ALL_HINT_HEADERS {
        assert!(generated.headers.contains_key(name), "missing {name}");
    }

    let version = chrome_version(&generated.user_agent);
    let sec_ch_ua = &generated.headers["Sec-CH-UA"];
    assert!(sec_ch_ua.contains(&format!(r#""Google Chrome";v="{}""#, version.major())));
    assert!(sec_ch_ua.contains(&format!(r#""Chromium";v="{}""#, version.major())));

    let full = &generated.headers["Sec-CH-UA-Full-Version-List"];
    assert!(full.contains(&format!(r#""Google Chrome";v="{version}""#)));

    Ok(())
}

#[test]
fn test_variable_length_versions() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new()?;

    for _ in 0..50 {
        let generated = generator.generate(
            &GenerateOptions::default()
                .with_browser(Browser::Safari)
                .with_os(AgentOs::Mac)
                .with_min_version("18")
                .with_max_version("18.6.2"),
        )?;
        let version = generated
            .user_agent
            .split_whitespace()
            .find_map(|s| s.strip_prefix("Version/"))
            .map(Version::parse)
            .unwrap_or_default();

        assert_eq!(version.major(), 18);
        assert!(version.components.len() == 2 || version.components.len() == 3);
    }

    let firefox = embedded_catalog()?;
    let entry = firefox
        .lookup(Browser::Firefox, AgentOs::Windows)
        .expect("firefox on windows");
    let lengths: Vec<usize> = entry.versions().iter().map(|v| v.components.len()).collect();
    assert!(lengths.contains(&2));
    assert!(lengths.contains(&3));

    Ok(())
}

#[test]
fn test_seeded_rng_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = embedded_catalog()?;
    let options = GenerateOptions::default().with_all_client_hints();

    let a = Generator::with_catalog_and_rng(Arc::clone(&catalog), StdRng::seed_from_u64(2024));
    let b = Generator::with_catalog_and_rng(catalog, StdRng::seed_from_u64(2024));

    for _ in 0..25 {
        assert_eq!(a.generate(&options)?, b.generate(&options)?);
    }

    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    assert_eq!(
        spider_user_agent::generate_rng(&options, &mut rng_a)?,
        spider_user_agent::generate_rng(&options, &mut rng_b)?
    );

    Ok(())
}

#[test]
fn test_weighted_favors_newest() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = embedded_catalog()?;
    let entry = catalog
        .lookup(Browser::Chrome, AgentOs::Windows)
        .expect("chrome on windows");
    let newest = entry.versions().first().cloned().unwrap_or_default();
    let oldest = entry.versions().last().cloned().unwrap_or_default();

    let mut rng = StdRng::seed_from_u64(99);
    let (mut newest_hits, mut oldest_hits) = (0usize, 0usize);

    for _ in 0..20_000 {
        let generated = spider_user_agent::generate_rng(&GenerateOptions::default(), &mut rng)?;
        let version = chrome_version(&generated.user_agent);
        if version.components == newest.components {
            newest_hits += 1;
        } else if version.components == oldest.components {
            oldest_hits += 1;
        }
    }

    assert!(newest_hits > oldest_hits * 5, "{newest_hits} vs {oldest_hits}");

    Ok(())
}
