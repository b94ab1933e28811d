use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::shuffle::shuffle_with_seed;
use crate::song::Song;

pub const ROWS: usize = 3;
pub const COLUMNS: usize = 4;
pub const SONGS_PER_CARD: usize = ROWS * COLUMNS;

/// A printable bingo card: exactly [`ROWS`] lines of [`COLUMNS`] songs each,
/// all twelve songs distinct, every line sorted by title.
///
/// `kind` is the batch the card belongs to ("normal", "special", ...); it is
/// carried through to the JSON output but plays no part in uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub lines: Vec<Vec<Song>>,
}

impl Card {
    /// Canonical key for whole-card equality: the twelve song ids, sorted.
    /// Two cards with the same songs share a fingerprint regardless of how
    /// the rows and columns are arranged.
    pub fn fingerprint(&self) -> String {
        let mut ids: Vec<u32> = self.song_ids().collect();
        ids.sort_unstable();
        join_ids(&ids)
    }

    /// Fingerprint of one line: its song ids, sorted. Column order within the
    /// printed line is irrelevant.
    pub fn line_fingerprints(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| {
                let mut ids: Vec<u32> = line.iter().map(|song| song.id).collect();
                ids.sort_unstable();
                join_ids(&ids)
            })
            .collect()
    }

    pub fn song_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().flatten().map(|song| song.id)
    }
}

fn join_ids(ids: &[u32]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    parts.join("-")
}

/// Builds one card from a seeded shuffle of the catalogue.
///
/// The first [`SONGS_PER_CARD`] shuffled songs are split into consecutive
/// lines of [`COLUMNS`], and each line is stable-sorted by title for display.
/// Identical `(songs, seed)` always produce an identical card.
pub fn build_card(id: &str, kind: &str, songs: &[Song], seed: &str) -> Result<Card, Error> {
    if songs.len() < SONGS_PER_CARD {
        return Err(Error::NotEnoughSongs {
            needed: SONGS_PER_CARD,
            got: songs.len(),
        });
    }

    let shuffled = shuffle_with_seed(songs, seed);
    let lines = shuffled[..SONGS_PER_CARD]
        .chunks(COLUMNS)
        .map(|chunk| {
            let mut line = chunk.to_vec();
            line.sort_by(|a, b| a.title.cmp(&b.title));
            line
        })
        .collect();

    Ok(Card {
        id: id.to_string(),
        kind: kind.to_string(),
        lines,
    })
}
