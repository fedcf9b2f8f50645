use crate::term::{TermGroup, TermId, TermIndex};
use crate::DEFAULT_NUM_PARENTS;

#[derive(Clone, Debug)]
pub(crate) struct TermInternal {
    id: TermId,
    index: TermIndex,
    parents: TermGroup,
    ancestors: TermGroup,
}

impl TermInternal {
    pub fn new(id: TermId, index: TermIndex) -> TermInternal {
        TermInternal {
            id,
            index,
            parents: TermGroup::with_capacity(DEFAULT_NUM_PARENTS),
            ancestors: TermGroup::default(),
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn index(&self) -> TermIndex {
        self.index
    }

    pub fn parents(&self) -> &TermGroup {
        &self.parents
    }

    /// All direct and indirect parents, including the term itself
    ///
    /// Empty until the ancestor cache is created
    pub fn ancestors(&self) -> &TermGroup {
        &self.ancestors
    }

    pub fn ancestors_mut(&mut self) -> &mut TermGroup {
        &mut self.ancestors
    }

    pub fn add_parent(&mut self, parent: TermIndex) -> bool {
        self.parents.insert(parent)
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for TermInternal {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parents_are_unique() {
        let mut term = TermInternal::new("A".into(), 0u32.into());
        assert!(term.add_parent(1u32.into()));
        assert!(term.add_parent(2u32.into()));
        assert!(!term.add_parent(1u32.into()));
        assert_eq!(term.parents().len(), 2);
        assert!(term.ancestors().is_empty());
    }
}
