// 🧮 Points - fixed award schedule and an order-preserving tally

use crate::entities::contestant::{Contestant, ContestantKey};
use std::collections::HashMap;

pub const FIRST_PLACE_POINTS: u32 = 3;
pub const SECOND_PLACE_POINTS: u32 = 2;
pub const THIRD_PLACE_POINTS: u32 = 1;

/// Points per contestant, remembering the order contestants were first credited.
///
/// Ties in later sorting fall back to this order.
#[derive(Debug, Clone, Default)]
pub struct PointsTally {
    totals: Vec<(Contestant, u32)>,
    index: HashMap<ContestantKey, usize>,
}

impl PointsTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &ContestantKey) -> bool {
        self.index.contains_key(key)
    }

    /// Add to the contestant's running total
    pub fn add(&mut self, contestant: &Contestant, points: u32) {
        let key = contestant.key();
        match self.index.get(&key) {
            Some(&i) => self.totals[i].1 += points,
            None => {
                self.index.insert(key, self.totals.len());
                self.totals.push((contestant.clone(), points));
            }
        }
    }

    /// Credit only if the contestant has nothing yet; returns whether it did
    pub fn credit_once(&mut self, contestant: &Contestant, points: u32) -> bool {
        if self.contains(&contestant.key()) {
            return false;
        }
        self.add(contestant, points);
        true
    }

    pub fn get(&self, key: &ContestantKey) -> Option<u32> {
        self.index.get(key).map(|&i| self.totals[i].1)
    }

    pub fn max(&self) -> Option<u32> {
        self.totals.iter().map(|(_, p)| *p).max()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Everyone holding exactly `points`, in credit order
    pub fn holding(&self, points: u32) -> Vec<Contestant> {
        self.totals
            .iter()
            .filter(|(_, p)| *p == points)
            .map(|(c, _)| c.clone())
            .collect()
    }

    pub fn into_vec(self) -> Vec<(Contestant, u32)> {
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates_by_identity() {
        let alice = Contestant::new("Alice Appleby", ["1", "2"]);
        let alice_paid = Contestant::new("Alice Appleby", ["2", "1"]).with_paid(3.0);
        let bob = Contestant::new("Bob Beetroot", ["1"]);

        let mut tally = PointsTally::new();
        tally.add(&alice, 3);
        tally.add(&bob, 2);
        tally.add(&alice_paid, 1);

        assert_eq!(tally.len(), 2);
        assert_eq!(tally.get(&alice.key()), Some(4));
        assert_eq!(tally.max(), Some(4));
    }

    #[test]
    fn test_credit_once_keeps_first_value() {
        let bob = Contestant::new("Bob Beetroot", ["1"]);
        let mut tally = PointsTally::new();

        assert!(tally.credit_once(&bob, SECOND_PLACE_POINTS));
        assert!(!tally.credit_once(&bob, THIRD_PLACE_POINTS));
        assert_eq!(tally.get(&bob.key()), Some(SECOND_PLACE_POINTS));
    }
}
