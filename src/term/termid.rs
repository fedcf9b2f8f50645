use core::fmt::Debug;
use std::borrow::Borrow;
use std::fmt::Display;

use crate::{PhenoError, PhenoResult};

/// The public identifier of an ontology term, e.g. `HP:0000118`
///
/// The identifier is opaque, `phenosim` never parses or validates its format.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: Box<str>,
}

impl TermId {
    /// Returns the identifier as string slice
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::TermId;
    ///
    /// let id = TermId::from("HP:0000118");
    /// assert_eq!(id.as_str(), "HP:0000118");
    /// ```
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        Self { inner: s.into() }
    }
}

impl From<String> for TermId {
    fn from(s: String) -> Self {
        Self {
            inner: s.into_boxed_str(),
        }
    }
}

impl From<&String> for TermId {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&TermId> for TermId {
    fn from(id: &TermId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({self})")
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        &*self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        &*self.inner == *other
    }
}

/// The position of a term inside the [`Ontology`](crate::Ontology) arena
///
/// Indices are assigned in the order terms are added to the ontology
/// and are only meaningful for the ontology that created them.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermIndex {
    inner: u32,
}

impl TermIndex {
    /// Returns the index as `usize`, to index into arena-sized vectors
    pub fn to_usize(self) -> usize {
        self.inner as usize
    }

    /// Returns the integer representation of the index
    pub fn as_u32(self) -> u32 {
        self.inner
    }
}

impl From<u32> for TermIndex {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl TryFrom<usize> for TermIndex {
    type Error = PhenoError;
    fn try_from(n: usize) -> PhenoResult<Self> {
        Ok(Self {
            inner: u32::try_from(n)
                .map_err(|_| PhenoError::InvalidInput(format!("too many terms: {n}")))?,
        })
    }
}

impl Debug for TermIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermIndex({})", self.inner)
    }
}

impl Display for TermIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn compare_with_str() {
        let id = TermId::from("HP:0000001");
        assert!(id == "HP:0000001");
        assert!(id != "HP:0000002");
        assert_eq!(format!("{id}"), "HP:0000001");
        assert_eq!(format!("{id:?}"), "TermId(HP:0000001)");
    }

    #[test]
    fn lookup_by_str() {
        let mut map: HashMap<TermId, usize> = HashMap::new();
        map.insert("Foo".into(), 1);
        assert_eq!(map.get("Foo"), Some(&1));
        assert!(map.get("Bar").is_none());
    }

    #[test]
    fn index_conversion() {
        let idx = TermIndex::try_from(12usize).unwrap();
        assert_eq!(idx.to_usize(), 12);
        assert_eq!(idx, TermIndex::from(12u32));
        assert!(TermIndex::try_from(usize::MAX).is_err());
    }
}
