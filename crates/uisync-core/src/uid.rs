use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide interner behind every [`Uid`].
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// The attribute that carries an element's UID in source text.
pub const UID_ATTRIBUTE: &str = "data-uid";

/// A stable per-element identifier, interned.
/// Compares and hashes as a `Spur` index; orders by the resolved string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid(Spur);

impl Uid {
    /// Intern a string as a Uid, or return the existing one.
    pub fn intern(s: &str) -> Self {
        Uid(INTERNER.get_or_intern(s))
    }

    /// Look up an already-interned UID without interning `s`.
    pub fn get(s: &str) -> Option<Self> {
        INTERNER.get(s).map(Uid)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// A UID must be non-empty and free of whitespace, quotes and the
    /// element-path separators `/` and `:`.
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && s
                .chars()
                .all(|c| !c.is_whitespace() && !matches!(c, '/' | ':' | '\'' | '"' | '`'))
    }
}

impl PartialOrd for Uid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Uid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Uid::intern(&s))
    }
}

// ─── Generation ──────────────────────────────────────────────────────────

/// 64-bit FNV-1a. Stable across runs and platforms, unlike `DefaultHasher`.
fn fnv1a(s: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    s.bytes()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Generate a UID derived from `seed`, avoiding anything `is_taken` reports.
///
/// Starts from the first three hex digits of the seed's hash and lengthens
/// the prefix on collision; once the full hash is taken a numeric suffix is
/// appended. The same seed and the same taken set always give the same UID.
pub fn generate_consistent_uid(seed: &str, is_taken: impl Fn(&str) -> bool) -> Uid {
    let hash = format!("{:016x}", fnv1a(seed));
    for len in 3..=hash.len() {
        let candidate = &hash[..len];
        if !is_taken(candidate) {
            return Uid::intern(candidate);
        }
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{hash}_{n}");
        if !is_taken(&candidate) {
            return Uid::intern(&candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn interning_roundtrip() {
        let a = Uid::intern("app-root");
        let b = Uid::intern("app-root");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "app-root");
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_consistent_uid("div|style", |_| false);
        let b = generate_consistent_uid("div|style", |_| false);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 3);
    }

    #[test]
    fn generation_avoids_taken() {
        let first = generate_consistent_uid("seed", |_| false);
        let taken: HashSet<String> = [first.as_str().to_string()].into();
        let second = generate_consistent_uid("seed", |s| taken.contains(s));
        assert_ne!(first, second);
        assert!(second.as_str().starts_with(first.as_str()));
    }

    #[test]
    fn generation_falls_back_to_suffix() {
        let full = format!("{:016x}", fnv1a("x"));
        let uid = generate_consistent_uid("x", |s| full.starts_with(s));
        assert_eq!(uid.as_str(), format!("{full}_1"));
    }

    #[test]
    fn validity() {
        assert!(Uid::is_valid("aaa"));
        assert!(Uid::is_valid("app-root_2"));
        assert!(!Uid::is_valid(""));
        assert!(!Uid::is_valid("a b"));
        assert!(!Uid::is_valid("a/b"));
        assert!(!Uid::is_valid("a:b"));
    }
}
