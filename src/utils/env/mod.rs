//! Inspection of the environment variables that configure the client.

/// Prefixes whose variables are shown by `n8n-workflow env`.
pub const RELEVANT_PREFIXES: &[&str] = &["N8N_", "NODE_ENV"];

const SENSITIVE_MARKERS: &[&str] = &["API_KEY", "SECRET", "TOKEN", "PASSWORD"];

pub struct EnvManager;

impl EnvManager {
    /// Relevant variables from the current process environment, sorted and masked.
    pub fn relevant_vars() -> Vec<(String, String)> {
        Self::filter_and_mask(std::env::vars())
    }

    /// Keep variables matching [`RELEVANT_PREFIXES`] and mask sensitive values.
    pub fn filter_and_mask<I>(vars: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut selected: Vec<(String, String)> = vars
            .into_iter()
            .filter(|(key, _)| RELEVANT_PREFIXES.iter().any(|prefix| key.starts_with(prefix)))
            .map(|(key, value)| {
                let shown = if Self::is_sensitive(&key) {
                    Self::mask(&value)
                } else {
                    value
                };
                (key, shown)
            })
            .collect();
        selected.sort_by(|left, right| left.0.cmp(&right.0));
        selected
    }

    pub fn is_sensitive(key: &str) -> bool {
        SENSITIVE_MARKERS.iter().any(|marker| key.contains(marker))
    }

    /// Mask a secret so only its edges remain visible.
    pub fn mask(value: &str) -> String {
        let segments: Vec<&str> = value.split('.').collect();
        if segments.len() == 3 && segments.iter().all(|segment| segment.len() >= 4) {
            // JWT: header.payload.signature
            return format!(
                "{}... . ... . ...{}",
                prefix(segments[0], 4),
                suffix(segments[2], 4)
            );
        }
        if value.chars().count() > 8 {
            format!("{}...{}", prefix(value, 4), suffix(value, 4))
        } else {
            "********".to_string()
        }
    }
}

fn prefix(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

fn suffix(value: &str, count: usize) -> String {
    let total = value.chars().count();
    value.chars().skip(total.saturating_sub(count)).collect()
}
