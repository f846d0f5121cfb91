use crate::catalog::VERSION_MARKER;
use crate::versions::Version;
use rand::Rng;

/// Keep the versions within `min..=max`. An empty bound is unbounded.
///
/// The input order is preserved, so a newest first list stays newest first.
pub fn filter_versions<'a>(
    versions: &'a [Version],
    min: &Version,
    max: &Version,
) -> Vec<&'a Version> {
    versions
        .iter()
        .filter(|v| min.is_empty() || *v >= min)
        .filter(|v| max.is_empty() || *v <= max)
        .collect()
}

/// Pick one candidate. Returns `None` only for an empty list.
///
/// Weighted picks expect the candidates newest first: index `i` of `n` has weight `n - i`, so the newest is
/// `n` times as likely as the oldest and every candidate stays reachable.
pub fn select_version<'a, R: Rng + ?Sized>(
    candidates: &[&'a Version],
    weighted: bool,
    rng: &mut R,
) -> Option<&'a Version> {
    let n = candidates.len();

    if n == 0 {
        return None;
    }
    if !weighted || n == 1 {
        return candidates.get(rng.random_range(0..n)).copied();
    }

    let n = n as u64;
    let total = n * (n + 1) / 2;
    let draw = rng.random_range(0..total);

    let mut cumulative = 0u64;
    for (i, candidate) in candidates.iter().enumerate() {
        cumulative += n - i as u64;
        if draw < cumulative {
            return Some(*candidate);
        }
    }

    candidates.first().copied()
}

/// Substitute every version marker in the template.
///
/// ```
/// use spider_user_agent::{spoof_user_agent::render_user_agent, Version};
///
/// let ua = render_user_agent("Chrome/{{version}} Safari/537.36", &Version::parse("136.0.7103.114"));
/// assert_eq!(ua, "Chrome/136.0.7103.114 Safari/537.36");
/// ```
pub fn render_user_agent(template: &str, version: &Version) -> String {
    template.replace(VERSION_MARKER, &version.to_string())
}
