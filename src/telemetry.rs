//! Application counters emitted through the `metrics` facade.
//!
//! No exporter is installed by this crate; counters are no-ops until the
//! embedding binary registers a recorder.

use metrics::counter;

pub mod names {
    pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
    pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
    pub const LOGINS_TOTAL: &str = "auth_logins_total";
    pub const TOKEN_REFRESHES_TOTAL: &str = "auth_token_refreshes_total";
    pub const TOKENS_REVOKED_TOTAL: &str = "auth_tokens_revoked_total";
}

/// Cache name is the key namespace, e.g. `projectById`.
pub fn record_cache_hit(cache: &str) {
    counter!(names::CACHE_HITS_TOTAL, "cache" => cache.to_string()).increment(1);
}

pub fn record_cache_miss(cache: &str) {
    counter!(names::CACHE_MISSES_TOTAL, "cache" => cache.to_string()).increment(1);
}

pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(names::LOGINS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_token_refresh(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(names::TOKEN_REFRESHES_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_token_revoked(kind: &'static str) {
    counter!(names::TOKENS_REVOKED_TOTAL, "kind" => kind).increment(1);
}

/// Namespace part of a cache key (`projectById::7` → `projectById`).
pub fn cache_name(key: &str) -> &str {
    key.split("::").next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_name() {
        assert_eq!(cache_name("projectById::7"), "projectById");
        assert_eq!(cache_name("projects::0:10:id:ASC"), "projects");
        assert_eq!(cache_name("plain"), "plain");
    }

    #[test]
    fn test_counters_without_recorder_are_noops() {
        record_cache_hit("projects");
        record_cache_miss("projects");
        record_login(true);
        record_token_refresh(false);
        record_token_revoked("access_token");
    }
}
