use tracing::debug;

use crate::card::{Card, build_card};
use crate::error::Error;
use crate::song::Song;
use crate::uniqueness::UniquenessTracker;

pub const MAX_BINGO_ATTEMPTS: usize = 30;
pub const MAX_LINE_ATTEMPTS: usize = 30;

/// Result of one generation batch.
///
/// `duplicates` lists the ids of cards that repeat the full song set of an
/// earlier card in the same batch. That can only happen once the retry
/// budgets are spent, and it is a degraded outcome rather than a failure:
/// callers decide whether to warn, regenerate with another seed, or accept.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    pub cards: Vec<Card>,
    pub duplicates: Vec<String>,
}

impl GeneratedBatch {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }
}

/// Generates `amount` cards with ids `start_id..start_id + amount`, in order.
///
/// Each card draws from its own seed, `"{seed}-{id}"`, so batches are fully
/// reproducible and cards within a batch are independent shuffles. The
/// uniqueness tracker lives for exactly one call: separate batches (say,
/// "normal" and "special" tickets) may legitimately repeat each other.
pub fn generate_cards(
    kind: &str,
    start_id: u64,
    amount: usize,
    songs: &[Song],
    seed: &str,
) -> Result<GeneratedBatch, Error> {
    let mut tracker = UniquenessTracker::new();
    let mut cards = Vec::with_capacity(amount);
    let mut duplicates = Vec::new();

    for offset in 0..amount {
        let id = (start_id + offset as u64).to_string();
        let card_seed = format!("{seed}-{id}");
        let card = draw_card(&tracker, &id, kind, songs, &card_seed)?;

        if tracker.is_card_duplicate(&card) {
            debug!(card = %id, "accepted a duplicate card after exhausting retries");
            duplicates.push(id);
        }
        tracker.register_card(&card);
        cards.push(card);
    }

    Ok(GeneratedBatch { cards, duplicates })
}

/// Draws one card in up to three phases: avoid whole-card duplicates, then
/// fall back to avoiding line duplicates, then accept a known duplicate built
/// from the bare per-card seed. Every attempt derives a fresh seed so retries
/// never rebuild the same candidate.
fn draw_card(
    tracker: &UniquenessTracker,
    id: &str,
    kind: &str,
    songs: &[Song],
    card_seed: &str,
) -> Result<Card, Error> {
    for attempt in 0..MAX_BINGO_ATTEMPTS {
        let card = build_card(id, kind, songs, &attempt_seed(card_seed, attempt))?;
        if !tracker.is_card_duplicate(&card) {
            return Ok(card);
        }
    }

    for attempt in 0..MAX_LINE_ATTEMPTS {
        let seed = attempt_seed(card_seed, MAX_BINGO_ATTEMPTS + attempt);
        let card = build_card(id, kind, songs, &seed)?;
        if !tracker.is_line_duplicate(&card) {
            return Ok(card);
        }
    }

    build_card(id, kind, songs, card_seed)
}

fn attempt_seed(card_seed: &str, attempt: usize) -> String {
    if attempt == 0 {
        card_seed.to_string()
    } else {
        format!("{card_seed}-{attempt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::SONGS_PER_CARD;
    use crate::song::sample_songs;
    use std::collections::HashSet;

    #[test]
    fn batches_are_reproducible() {
        let songs = sample_songs(48);
        let a = generate_cards("normal", 1, 12, &songs, "quina-2024").expect("generate");
        let b = generate_cards("normal", 1, 12, &songs, "quina-2024").expect("generate");
        assert_eq!(a.cards, b.cards);
        assert_eq!(a.duplicates, b.duplicates);
    }

    #[test]
    fn ids_are_sequential_from_start_id() {
        let songs = sample_songs(48);
        let batch = generate_cards("normal", 5, 4, &songs, "seed").expect("generate");
        let ids: Vec<&str> = batch.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["5", "6", "7", "8"]);
        assert!(batch.cards.iter().all(|c| c.kind == "normal"));
    }

    #[test]
    fn roomy_catalogue_produces_no_duplicates() {
        let songs = sample_songs(48);
        let batch = generate_cards("normal", 1, 12, &songs, "roomy").expect("generate");
        assert!(batch.duplicates.is_empty());

        let fingerprints: HashSet<String> =
            batch.cards.iter().map(|c| c.fingerprint()).collect();
        assert_eq!(fingerprints.len(), batch.cards.len());
    }

    #[test]
    fn every_card_is_valid() {
        let songs = sample_songs(40);
        let batch = generate_cards("normal", 1, 10, &songs, "valid").expect("generate");
        for card in &batch.cards {
            let distinct: HashSet<u32> = card.song_ids().collect();
            assert_eq!(distinct.len(), SONGS_PER_CARD);
            for line in &card.lines {
                assert_eq!(line.len(), 4);
                for pair in line.windows(2) {
                    assert!(pair[0].title <= pair[1].title);
                }
            }
        }
    }

    #[test]
    fn exhausted_retries_degrade_to_counted_duplicates() {
        // With exactly twelve songs every card holds the same song set, so
        // every card after the first is a duplicate no matter how often the
        // driver retries. The first card is never one: the tracker is empty.
        let songs = sample_songs(SONGS_PER_CARD as u32);
        let batch = generate_cards("normal", 1, 2, &songs, "cramped").expect("generate");
        assert_eq!(batch.cards.len(), 2);
        assert_eq!(batch.cards[0].fingerprint(), batch.cards[1].fingerprint());
        assert_eq!(batch.duplicates, vec!["2".to_string()]);
        assert_eq!(batch.duplicate_count(), 1);
    }

    #[test]
    fn insufficient_catalogue_aborts_the_whole_batch() {
        let songs = sample_songs(11);
        let err = generate_cards("normal", 1, 3, &songs, "short").unwrap_err();
        assert!(matches!(err, Error::NotEnoughSongs { got: 11, .. }));
    }

    #[test]
    fn thirteen_song_catalogue_drops_the_same_song_every_run() {
        let songs = sample_songs(13);
        let run = |seed: &str| generate_cards("normal", 1, 1, &songs, seed).expect("generate");

        let a = run("test");
        let b = run("test");
        assert_eq!(a.cards, b.cards);
        assert_eq!(a.cards[0].id, "1");

        let used: HashSet<u32> = a.cards[0].song_ids().collect();
        assert_eq!(used.len(), SONGS_PER_CARD);
        let dropped_a: Vec<u32> = songs.iter().map(|s| s.id).filter(|id| !used.contains(id)).collect();
        let used_b: HashSet<u32> = b.cards[0].song_ids().collect();
        let dropped_b: Vec<u32> = songs.iter().map(|s| s.id).filter(|id| !used_b.contains(id)).collect();
        assert_eq!(dropped_a, dropped_b);
        assert_eq!(dropped_a.len(), 1);
    }
}
