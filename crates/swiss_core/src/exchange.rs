//! Exchanges between subgroups and with the float pool.
//!
//! When no transposition of the current split pairs a bracket, members are
//! swapped between the upper and lower subgroup. Swaps grow from one player
//! per side upward; within a size, the lowest upper-subgroup players and the
//! highest lower-subgroup players are tried first, keeping the split as close
//! to the original ranking as possible.
//!
//! If no split works either, players are moved out of the bracket into the
//! float pool, lowest ranked first.

/// k-subsets of `0..n` in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    idx: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            idx: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.idx.clone());
        }

        let (n, k) = (self.n, self.k);
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.idx[i] < n - k + i {
                break;
            }
        }
        self.idx[i] += 1;
        for j in i + 1..k {
            self.idx[j] = self.idx[j - 1] + 1;
        }
        Some(self.idx.clone())
    }
}

/// A swap of subgroup members, given as positions within each subgroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub upper: Vec<usize>,
    pub lower: Vec<usize>,
}

impl Exchange {
    /// Apply the swap. Both subgroups come back in their original relative
    /// order with the incoming players appended; callers re-sort by rank.
    pub fn apply<T: Copy>(&self, upper: &[T], lower: &[T]) -> (Vec<T>, Vec<T>) {
        let mut new_upper: Vec<T> = upper
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.upper.contains(i))
            .map(|(_, &p)| p)
            .collect();
        let mut new_lower: Vec<T> = lower
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.lower.contains(i))
            .map(|(_, &p)| p)
            .collect();
        new_upper.extend(self.lower.iter().map(|&i| lower[i]));
        new_lower.extend(self.upper.iter().map(|&i| upper[i]));
        (new_upper, new_lower)
    }
}

/// Lazy enumeration of subgroup exchanges.
#[derive(Debug, Clone)]
pub struct Exchanges {
    upper_len: usize,
    lower_len: usize,
    size: usize,
    upper_combos: Combinations,
    current_upper: Option<Vec<usize>>,
    lower_combos: Combinations,
}

impl Exchanges {
    pub fn new(upper_len: usize, lower_len: usize) -> Self {
        Self {
            upper_len,
            lower_len,
            size: 1,
            upper_combos: Combinations::new(upper_len, 1),
            current_upper: None,
            lower_combos: Combinations::new(lower_len, 1),
        }
    }

    fn max_size(&self) -> usize {
        self.upper_len.min(self.lower_len)
    }
}

impl Iterator for Exchanges {
    type Item = Exchange;

    fn next(&mut self) -> Option<Exchange> {
        loop {
            if self.size == 0 || self.size > self.max_size() {
                return None;
            }

            if self.current_upper.is_none() {
                match self.upper_combos.next() {
                    Some(combo) => {
                        // Combinations run over the upper subgroup bottom-up
                        let mut upper: Vec<usize> =
                            combo.iter().map(|&c| self.upper_len - 1 - c).collect();
                        upper.sort_unstable();
                        self.current_upper = Some(upper);
                        self.lower_combos = Combinations::new(self.lower_len, self.size);
                    }
                    None => {
                        self.size += 1;
                        self.upper_combos = Combinations::new(self.upper_len, self.size);
                        continue;
                    }
                }
            }

            match self.lower_combos.next() {
                Some(lower) => {
                    let upper = self.current_upper.clone().unwrap_or_default();
                    return Some(Exchange { upper, lower });
                }
                None => self.current_upper = None,
            }
        }
    }
}

/// Choices of `count` bracket positions to move into the float pool, lowest
/// ranked players first.
#[derive(Debug, Clone)]
pub struct PoolExchanges {
    len: usize,
    combos: Combinations,
}

impl PoolExchanges {
    pub fn new(len: usize, count: usize) -> Self {
        Self {
            len,
            combos: Combinations::new(len, count),
        }
    }
}

impl Iterator for PoolExchanges {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let combo = self.combos.next()?;
        let mut picked: Vec<usize> = combo.iter().map(|&c| self.len - 1 - c).collect();
        picked.sort_unstable();
        Some(picked)
    }
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod exchange_tests;
