use std::collections::HashSet;

use crate::card::{Card, ROWS};

/// All orderings of the three line groups. ROWS is fixed, so the 3! = 6
/// permutations are enumerated rather than generated recursively.
const LINE_PERMUTATIONS: [[usize; ROWS]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Collision state for one generation batch.
///
/// `seen_cards` holds whole-card fingerprints. `seen_line_sets` holds, for
/// every registered card, the line-set fingerprint of *each* row-order
/// permutation of its lines. Expanding at registration keeps the duplicate
/// check on a candidate to a single lookup of its own arrangement, while
/// still catching a historical line set that reappears with rows swapped.
#[derive(Debug, Default)]
pub struct UniquenessTracker {
    seen_cards: HashSet<String>,
    seen_line_sets: HashSet<String>,
}

impl UniquenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted card in both collision sets.
    pub fn register_card(&mut self, card: &Card) {
        self.seen_cards.insert(card.fingerprint());
        let lines = card.line_fingerprints();
        for order in &LINE_PERMUTATIONS {
            self.seen_line_sets.insert(join_line_set(&lines, order));
        }
    }

    /// True when a card with the same twelve songs was already registered,
    /// in any arrangement.
    pub fn is_card_duplicate(&self, card: &Card) -> bool {
        self.seen_cards.contains(&card.fingerprint())
    }

    /// True when the candidate's own row arrangement matches any registered
    /// line set. Only the candidate's current ordering is checked; the
    /// permutation expansion happened at registration time.
    pub fn is_line_duplicate(&self, card: &Card) -> bool {
        let lines = card.line_fingerprints();
        self.seen_line_sets
            .contains(&join_line_set(&lines, &[0, 1, 2]))
    }
}

fn join_line_set(lines: &[String], order: &[usize; ROWS]) -> String {
    let ordered: Vec<&str> = order.iter().map(|&i| lines[i].as_str()).collect();
    ordered.join("|")
}
