//! Transpositions of the lower subgroup.
//!
//! A transposition is an arrangement of the lower subgroup laid against the
//! upper subgroup: `upper[i]` meets `lower[arrangement[i]]`. Arrangements are
//! produced lazily in lexicographic order of lower-subgroup indices, so the
//! first one is the straightforward pairing and later ones disturb the
//! bottom boards before the top boards.
//!
//! When the lower subgroup is larger than the upper one, only the first
//! `width` positions are paired; arrangements that differ only in the unpaired
//! tail are not repeated.

/// Lazy enumeration of lower-subgroup arrangements.
#[derive(Debug, Clone)]
pub struct Transpositions {
    perm: Vec<usize>,
    width: usize,
    started: bool,
    exhausted: bool,
    skip_after: Option<usize>,
}

impl Transpositions {
    /// Arrangements of `width` indices drawn from `0..len`.
    pub fn new(len: usize, width: usize) -> Self {
        Self {
            perm: (0..len).collect(),
            width: width.min(len),
            started: false,
            exhausted: false,
            skip_after: None,
        }
    }

    /// Skip every remaining arrangement that shares positions `0..=position`
    /// with the one just returned. Used when the pair at `position` breaks an
    /// absolute criterion.
    pub fn skip_from(&mut self, position: usize) {
        let position = position.min(self.width.saturating_sub(1));
        self.skip_after = Some(match self.skip_after {
            Some(p) => p.min(position),
            None => position,
        });
    }
}

impl Iterator for Transpositions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.perm[..self.width].to_vec());
        }

        // Everything after `cut` is pushed to its last ordering so the next
        // permutation changes a position before it
        let cut = match self.skip_after.take() {
            Some(p) => p + 1,
            None => self.width,
        };
        self.perm[cut..].sort_unstable_by(|a, b| b.cmp(a));
        if !next_permutation(&mut self.perm) {
            self.exhausted = true;
            return None;
        }
        Some(self.perm[..self.width].to_vec())
    }
}

/// Rearrange into the next lexicographic permutation. Returns false (and
/// leaves the slice untouched) when it is already the last one.
pub fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let mut i = items.len() - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = items.len() - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}

#[cfg(test)]
#[path = "transposition_tests.rs"]
mod transposition_tests;
