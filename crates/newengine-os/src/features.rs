use std::collections::HashSet;
use std::sync::Arc;

/// Extra feature source consulted after the backend. Must be side-effect free.
pub type FeatureCallback = Arc<dyn Fn(&str) -> bool + Send + Sync>;

const BUILD_MODE: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "release"
};

const TARGET_KIND: &str = if cfg!(feature = "editor") {
    "editor"
} else {
    "standalone"
};

const POINTER_WIDTH: &str = if cfg!(target_pointer_width = "64") {
    "64"
} else {
    "32"
};

#[inline]
fn arch_tokens() -> &'static [&'static str] {
    if cfg!(target_arch = "x86_64") {
        &["x86_64"]
    } else if cfg!(target_arch = "x86") {
        &["x86"]
    } else if cfg!(target_arch = "aarch64") {
        &["arm64"]
    } else if cfg!(target_arch = "arm") {
        if cfg!(target_feature = "v7") {
            &["armv7", "arm"]
        } else {
            &["arm"]
        }
    } else {
        &[]
    }
}

/// Every build-mode, ABI and architecture token, compiled in or not.
const KNOWN_BUILD_TOKENS: &[&str] = &[
    "debug",
    "release",
    "editor",
    "standalone",
    "64",
    "32",
    "x86_64",
    "x86",
    "arm64",
    "arm",
    "armv7",
];

/// Tokens fixed when this binary was compiled.
pub fn build_features() -> Vec<&'static str> {
    let mut out = vec![BUILD_MODE, TARGET_KIND, POINTER_WIDTH];
    out.extend_from_slice(arch_tokens());
    out
}

/// True for tokens whose answer is decided by the build alone.
#[inline]
pub fn is_build_token(token: &str) -> bool {
    KNOWN_BUILD_TOKENS.contains(&token)
}

#[inline]
pub fn is_build_feature(token: &str) -> bool {
    token == BUILD_MODE
        || token == TARGET_KIND
        || token == POINTER_WIDTH
        || arch_tokens().contains(&token)
}

/// Feature lookup state owned by the OS service.
///
/// Nothing is cached: every query walks the sources in order and stops at the
/// first hit.
#[derive(Default)]
pub struct FeatureResolver {
    callback: Option<FeatureCallback>,
    custom: HashSet<String>,
}

impl FeatureResolver {
    pub fn set_callback(&mut self, callback: Option<FeatureCallback>) {
        self.callback = callback;
    }

    pub fn set_custom_features<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom = tokens.into_iter().map(Into::into).collect();
    }

    pub fn custom_features(&self) -> impl Iterator<Item = &str> {
        self.custom.iter().map(String::as_str)
    }

    /// Order: backend identity, build tokens, backend internal support,
    /// callback, project custom features.
    ///
    /// Build tokens are answered from the compiled configuration only; no
    /// later source can claim one that was not compiled in.
    pub fn resolve(&self, token: &str, identity: &str, internal: impl FnOnce(&str) -> bool) -> bool {
        if is_build_token(token) {
            return is_build_feature(token);
        }
        if token == identity {
            return true;
        }
        if internal(token) {
            return true;
        }
        if let Some(cb) = &self.callback {
            if cb(token) {
                return true;
            }
        }
        self.custom.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn none(_: &str) -> bool {
        false
    }

    #[test]
    fn test_build_tokens_are_exclusive_pairs() {
        let r = FeatureResolver::default();
        assert_ne!(r.resolve("debug", "Test", none), r.resolve("release", "Test", none));
        assert_ne!(r.resolve("editor", "Test", none), r.resolve("standalone", "Test", none));
        assert_ne!(r.resolve("64", "Test", none), r.resolve("32", "Test", none));
    }

    #[test]
    fn test_build_tokens_are_stable() {
        let r = FeatureResolver::default();
        let first: Vec<bool> = build_features().iter().map(|t| r.resolve(t, "Test", none)).collect();
        let second: Vec<bool> = build_features().iter().map(|t| r.resolve(t, "Test", none)).collect();
        assert!(first.iter().all(|hit| *hit));
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_tokens_cannot_be_claimed_by_other_sources() {
        let mut r = FeatureResolver::default();
        r.set_callback(Some(Arc::new(|_: &str| true)));
        r.set_custom_features(KNOWN_BUILD_TOKENS.iter().copied());

        let absent: Vec<&str> = KNOWN_BUILD_TOKENS
            .iter()
            .copied()
            .filter(|t| !build_features().contains(t))
            .collect();
        assert!(absent.contains(&(if BUILD_MODE == "debug" { "release" } else { "debug" })));

        for token in absent {
            assert!(!r.resolve(token, token, |_| true), "{token} was claimed");
        }
        for token in build_features() {
            assert!(r.resolve(token, "Test", |_| false));
        }
        // Non-build tokens still reach the later sources.
        assert!(r.resolve("pc", "Test", |t| t == "pc"));
        assert!(r.resolve("anything", "Test", none));
    }

    #[test]
    fn test_identity_matches_backend_name() {
        let r = FeatureResolver::default();
        assert!(r.resolve("Server", "Server", none));
        assert!(!r.resolve("Server", "LinuxBSD", none));
    }

    #[test]
    fn test_callback_not_consulted_when_earlier_source_answers() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_cb = seen.clone();
        let mut r = FeatureResolver::default();
        r.set_callback(Some(Arc::new(move |t: &str| {
            seen_cb.lock().push(t.to_string());
            t == "dynamic"
        })));

        assert!(r.resolve(BUILD_MODE, "Test", none));
        assert!(r.resolve("pc", "Test", |t| t == "pc"));
        assert!(seen.lock().is_empty());

        assert!(r.resolve("dynamic", "Test", none));
        assert_eq!(*seen.lock(), vec!["dynamic".to_string()]);
    }

    #[test]
    fn test_callback_registration_visible_on_next_query() {
        let mut r = FeatureResolver::default();
        assert!(!r.resolve("late", "Test", none));
        r.set_callback(Some(Arc::new(|t: &str| t == "late")));
        assert!(r.resolve("late", "Test", none));
        r.set_callback(None);
        assert!(!r.resolve("late", "Test", none));
    }

    #[test]
    fn test_custom_features_checked_last() {
        let mut r = FeatureResolver::default();
        r.set_custom_features(["demo", "mobile_ui"]);
        assert!(r.resolve("mobile_ui", "Test", none));
        assert!(!r.resolve("missing", "Test", none));
        assert_eq!(r.custom_features().count(), 2);
    }
}
