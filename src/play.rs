use std::collections::HashSet;

use crate::card::Card;
use crate::song::Song;

/// Songs on the card that have not been played yet, in card order.
pub fn missing_songs<'a>(card: &'a Card, played: &HashSet<u32>) -> Vec<&'a Song> {
    card.lines
        .iter()
        .flatten()
        .filter(|song| !played.contains(&song.id))
        .collect()
}

/// Full-card bingo: every song on the card has been played.
pub fn is_full_card(card: &Card, played: &HashSet<u32>) -> bool {
    card.song_ids().all(|id| played.contains(&id))
}

/// Line bingo: the index of the first line whose four songs have all been
/// played, if any.
pub fn winning_line(card: &Card, played: &HashSet<u32>) -> Option<usize> {
    card.lines
        .iter()
        .position(|line| line.iter().all(|song| played.contains(&song.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::build_card;
    use crate::song::sample_songs;

    fn played(ids: impl IntoIterator<Item = u32>) -> HashSet<u32> {
        ids.into_iter().collect()
    }

    #[test]
    fn nothing_played_means_everything_missing() {
        let songs = sample_songs(12);
        let card = build_card("1", "normal", &songs, "play").expect("build");
        assert_eq!(missing_songs(&card, &played([])).len(), 12);
        assert!(!is_full_card(&card, &played([])));
        assert_eq!(winning_line(&card, &played([])), None);
    }

    #[test]
    fn full_card_needs_all_twelve_songs() {
        let songs = sample_songs(12);
        let card = build_card("1", "normal", &songs, "play").expect("build");

        let almost = played(1..=11);
        assert!(!is_full_card(&card, &almost));
        assert_eq!(missing_songs(&card, &almost).len(), 1);

        let all = played(1..=12);
        assert!(is_full_card(&card, &all));
        assert!(missing_songs(&card, &all).is_empty());
    }

    #[test]
    fn a_completed_line_is_reported() {
        let songs = sample_songs(20);
        let card = build_card("1", "normal", &songs, "play").expect("build");

        let second_line = played(card.lines[1].iter().map(|song| song.id));
        assert_eq!(winning_line(&card, &second_line), Some(1));
        assert!(!is_full_card(&card, &second_line));
    }

    #[test]
    fn extra_played_songs_do_not_matter() {
        let songs = sample_songs(30);
        let card = build_card("1", "normal", &songs, "play").expect("build");
        let everything = played(1..=30);
        assert!(is_full_card(&card, &everything));
        assert_eq!(winning_line(&card, &everything), Some(0));
    }
}
