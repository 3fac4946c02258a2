//! Element paths: the globally unique address of a rendered element instance.
//!
//! A path is a list of segments; each segment is the chain of UIDs walked
//! inside one component's render output. Text form joins UIDs with `/` and
//! segments with `:`, so `sb/scene/app:app-root` is the root element of the
//! `App` instance placed at `sb/scene/app`.

use crate::uid::Uid;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// One component's worth of UIDs.
pub type PathSegment = SmallVec<[Uid; 4]>;

#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ElementPath {
    segments: Vec<PathSegment>,
}

impl ElementPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    /// A single-segment path from a UID chain.
    pub fn from_uids(uids: &[&str]) -> Self {
        Self::new(vec![uids.iter().map(|u| Uid::intern(u)).collect()])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The UID of the addressed element itself.
    pub fn last_uid(&self) -> Option<Uid> {
        self.segments.last().and_then(|s| s.last().copied())
    }

    /// Append a UID to the last segment.
    pub fn child(&self, uid: Uid) -> Self {
        let mut segments = self.segments.clone();
        match segments.last_mut() {
            Some(last) => last.push(uid),
            None => segments.push(SmallVec::from_elem(uid, 1)),
        }
        Self { segments }
    }

    /// Start a new segment (descend into a component instance's output).
    pub fn append_segment(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        if !segment.is_empty() {
            segments.push(segment);
        }
        Self { segments }
    }

    /// Drop the last UID; an emptied segment is removed.
    pub fn parent(&self) -> Option<Self> {
        let mut segments = self.segments.clone();
        let last = segments.last_mut()?;
        last.pop();
        if last.is_empty() {
            segments.pop();
        }
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    fn flattened(&self) -> impl Iterator<Item = (usize, Uid)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.iter().map(move |u| (i, *u)))
    }

    fn depth(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    /// True if `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &ElementPath) -> bool {
        if self.depth() <= ancestor.depth() {
            return false;
        }
        // Every ancestor UID must match in the same segment position.
        let mut mine = self.flattened();
        ancestor.flattened().all(|a| mine.next() == Some(a))
    }

    pub fn is_ancestor_of(&self, descendant: &ElementPath) -> bool {
        descendant.is_descendant_of(self)
    }

    pub fn is_descendant_of_or_equal(&self, other: &ElementPath) -> bool {
        self == other || self.is_descendant_of(other)
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            for (j, uid) in segment.iter().enumerate() {
                if j > 0 {
                    f.write_str("/")?;
                }
                f.write_str(uid.as_str())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementPath({self})")
    }
}

impl FromStr for ElementPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for part in s.split(':') {
            let mut segment = PathSegment::new();
            for uid in part.split('/') {
                if !Uid::is_valid(uid) {
                    return Err(format!("invalid UID `{uid}` in element path `{s}`"));
                }
                segment.push(Uid::intern(uid));
            }
            segments.push(segment);
        }
        Ok(Self::new(segments))
    }
}
