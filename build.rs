// Env toggles:
// - SPIDER_UA_ASSETS=1 => write the refreshed catalog back into assets/browsers.yaml (dynamic-versions only)

use std::{
    fs,
    path::{Path, PathBuf},
};

const CATALOG_ASSET: &str = "assets/browsers.yaml";

fn manifest_dir() -> PathBuf {
    PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap())
}

fn out_catalog_path() -> PathBuf {
    PathBuf::from(std::env::var("OUT_DIR").unwrap()).join("browsers.yaml")
}

fn atomic_write(path: &Path, bytes: &[u8]) {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)
        .unwrap_or_else(|e| panic!("failed to write temp file {}: {e}", tmp.display()));
    fs::rename(&tmp, path).unwrap_or_else(|e| {
        panic!(
            "failed to rename {} -> {}: {e}",
            tmp.display(),
            path.display()
        )
    });
}

/// Read the checked-in catalog and warn early when it is not valid yaml.
fn read_catalog_asset(manifest: &Path) -> Vec<u8> {
    let path = manifest.join(CATALOG_ASSET);
    let bytes = fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read catalog {}: {e}", path.display()));

    if let Err(e) = serde_yaml::from_slice::<serde_yaml::Value>(&bytes) {
        println!("cargo:warning=catalog {} is not valid yaml: {e}", path.display());
    }

    bytes
}

#[cfg(not(feature = "dynamic-versions"))]
fn main() {
    let manifest = manifest_dir();
    println!(
        "cargo:rerun-if-changed={}",
        manifest.join(CATALOG_ASSET).display()
    );

    let bytes = read_catalog_asset(&manifest);
    atomic_write(&out_catalog_path(), &bytes);
}

#[cfg(feature = "dynamic-versions")]
mod refresh {
    use serde_yaml::{Mapping, Value};

    const KNOWN_GOOD_VERSIONS: &str =
        "https://googlechromelabs.github.io/chrome-for-testing/known-good-versions.json";

    /// Oldest chrome major kept in the catalog.
    pub const MIN_MAJOR_VERSION: u32 = 133;

    /// Fetch every known good chrome version at or above [`MIN_MAJOR_VERSION`].
    pub fn fetch_chrome_versions() -> Option<Vec<Vec<u32>>> {
        let known_json: serde_json::Value = reqwest::blocking::get(KNOWN_GOOD_VERSIONS)
            .ok()?
            .json()
            .ok()?;

        let mut versions = Vec::new();

        for entry in known_json["versions"].as_array()? {
            let Some(version) = entry["version"].as_str() else {
                continue;
            };
            let components: Vec<u32> = version
                .split('.')
                .map_while(|part| part.parse().ok())
                .collect();

            if components.first().is_some_and(|major| *major >= MIN_MAJOR_VERSION) {
                versions.push(components);
            }
        }

        Some(versions)
    }

    fn key(component: u32) -> Value {
        Value::Number(u64::from(component).into())
    }

    fn same_component(value: &Value, component: u32) -> bool {
        value.as_u64() == Some(u64::from(component))
    }

    /// Merge one version into a version tree.
    ///
    /// The last component goes into the leaf list of its parent. A leaf list that must grow deeper is
    /// promoted to a map whose former leaves become null terminals.
    pub fn merge_version(tree: &mut Mapping, components: &[u32]) {
        let Some((head, tail)) = components.split_first() else {
            return;
        };

        match tail {
            [] => {
                if !tree.contains_key(key(*head)) {
                    tree.insert(key(*head), Value::Null);
                }
            }
            [leaf] => {
                let slot = tree
                    .entry(key(*head))
                    .or_insert_with(|| Value::Sequence(Vec::new()));

                match slot {
                    Value::Sequence(leaves) => {
                        if !leaves.iter().any(|v| same_component(v, *leaf)) {
                            leaves.push(key(*leaf));
                            leaves.sort_by_key(|v| v.as_u64());
                        }
                    }
                    Value::Mapping(children) => {
                        if !children.contains_key(key(*leaf)) {
                            children.insert(key(*leaf), Value::Null);
                        }
                    }
                    _ => {
                        println!("cargo:warning=replacing terminal {head} with leaf list");
                        *slot = Value::Sequence(vec![key(*leaf)]);
                    }
                }
            }
            _ => {
                let slot = tree
                    .entry(key(*head))
                    .or_insert_with(|| Value::Mapping(Mapping::new()));

                if let Value::Sequence(leaves) = slot {
                    let promoted = leaves
                        .iter()
                        .map(|leaf| (leaf.clone(), Value::Null))
                        .collect::<Mapping>();
                    *slot = Value::Mapping(promoted);
                }

                if !slot.is_mapping() {
                    println!("cargo:warning=replacing terminal {head} with version map");
                    *slot = Value::Mapping(Mapping::new());
                }

                if let Value::Mapping(children) = slot {
                    merge_version(children, tail);
                }
            }
        }
    }

    /// Merge the versions into every chrome entry of the catalog.
    pub fn merge_into_catalog(catalog: &mut Value, versions: &[Vec<u32>]) -> Option<usize> {
        let platforms = catalog
            .get_mut("browsers")?
            .get_mut("chrome")?
            .as_mapping_mut()?;

        let mut merged = 0;

        for (_, platform) in platforms.iter_mut() {
            let Some(platform) = platform.as_mapping_mut() else {
                continue;
            };
            let tree = platform
                .entry(Value::String("versions".into()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));

            if !tree.is_mapping() {
                *tree = Value::Mapping(Mapping::new());
            }

            if let Value::Mapping(tree) = tree {
                for version in versions {
                    merge_version(tree, version);
                }
                merged += 1;
            }
        }

        Some(merged)
    }
}

#[cfg(feature = "dynamic-versions")]
fn main() {
    let manifest = manifest_dir();
    let asset_path = manifest.join(CATALOG_ASSET);
    println!("cargo:rerun-if-changed={}", asset_path.display());
    println!("cargo:rerun-if-env-changed=SPIDER_UA_ASSETS");

    let fallback = read_catalog_asset(&manifest);

    let refreshed = (|| -> Option<String> {
        let versions = refresh::fetch_chrome_versions()?;
        let mut catalog: serde_yaml::Value = serde_yaml::from_slice(&fallback).ok()?;
        let merged = refresh::merge_into_catalog(&mut catalog, &versions)?;
        println!(
            "cargo:warning=merged {} chrome versions >= {} into {merged} catalog entries",
            versions.len(),
            refresh::MIN_MAJOR_VERSION
        );
        serde_yaml::to_string(&catalog).ok()
    })();

    match refreshed {
        Some(catalog) => {
            atomic_write(&out_catalog_path(), catalog.as_bytes());

            if std::env::var("SPIDER_UA_ASSETS").ok().as_deref() == Some("1") {
                atomic_write(&asset_path, catalog.as_bytes());
            }
        }
        None => {
            println!(
                "cargo:warning=failed to fetch or merge chrome versions; using the checked-in catalog"
            );
            atomic_write(&out_catalog_path(), &fallback);
        }
    }
}
