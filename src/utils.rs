//! Utility structs and methods

/// Iterator of all index pairs `(i, j)` with `i <= j < n`
///
/// These are the cells of the upper triangle of a symmetric `n x n` matrix,
/// including the diagonal, in row-major order.
///
/// # Examples
/// ```
/// use phenosim::utils::UpperTriangle;
///
/// let mut c = UpperTriangle::new(3);
/// assert_eq!(c.len(), 6);
///
/// assert_eq!(c.next(), Some((0, 0)));
/// assert_eq!(c.next(), Some((0, 1)));
/// assert_eq!(c.next(), Some((0, 2)));
/// assert_eq!(c.next(), Some((1, 1)));
/// assert_eq!(c.next(), Some((1, 2)));
/// assert_eq!(c.next(), Some((2, 2)));
/// assert!(c.next().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct UpperTriangle {
    n: usize,
    idx1: usize,
    idx2: usize,
}

impl UpperTriangle {
    /// Creates a new `UpperTriangle` iterator for an `n x n` matrix
    pub fn new(n: usize) -> Self {
        Self {
            n,
            idx1: 0,
            idx2: 0,
        }
    }

    /// Returns the number of pairs that are not yet yielded
    pub fn len(&self) -> usize {
        if self.idx1 >= self.n {
            return 0;
        }
        // remaining cells of the current row + all following rows
        let rest = self.n - self.idx1 - 1;
        (self.n - self.idx2) + rest * (rest + 1) / 2
    }

    /// Returns `true` if all pairs are yielded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for UpperTriangle {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx1 >= self.n {
            return None;
        }
        let res = (self.idx1, self.idx2);
        self.idx2 += 1;
        if self.idx2 == self.n {
            self.idx1 += 1;
            self.idx2 = self.idx1;
        }
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for UpperTriangle {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn upper_triangle() {
        let pairs: Vec<(usize, usize)> = UpperTriangle::new(4).collect();
        assert_eq!(pairs.len(), 10);
        assert!(pairs.iter().all(|(i, j)| i <= j && *j < 4));
        assert_eq!(pairs[3], (0, 3));
        assert_eq!(pairs[4], (1, 1));
    }

    #[test]
    fn upper_triangle_empty() {
        let mut c = UpperTriangle::new(0);
        assert!(c.is_empty());
        assert_eq!(c.next(), None);
    }

    #[test]
    fn upper_triangle_single() {
        let mut c = UpperTriangle::new(1);
        assert_eq!(c.len(), 1);
        assert_eq!(c.next(), Some((0, 0)));
        assert_eq!(c.next(), None);
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn len_is_exact() {
        let mut c = UpperTriangle::new(5);
        let mut expected = 15;
        while c.next().is_some() {
            expected -= 1;
            assert_eq!(c.len(), expected);
        }
    }
}
