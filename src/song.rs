use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Error;

/// One entry of the song catalogue. Immutable reference data: the generator
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
}

/// Reads a song catalogue from a JSON array of `{id, title, artist}` objects.
///
/// Song ids must be unique: a repeated id would let one catalogue entry
/// stand in for two "distinct" songs on a card, so it is rejected here at
/// the boundary rather than surfacing as a bad card later.
pub fn read_songs_from_json(path: &Path) -> Result<Vec<Song>, Error> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let songs: Vec<Song> = serde_json::from_reader(reader).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    for song in &songs {
        if !seen.insert(song.id) {
            return Err(Error::DuplicateSongId {
                id: song.id,
                path: path.to_path_buf(),
            });
        }
    }
    Ok(songs)
}

#[cfg(test)]
pub(crate) fn sample_songs(count: u32) -> Vec<Song> {
    (1..=count)
        .map(|id| Song {
            id,
            title: format!("Song {id:02}"),
            artist: format!("Artist {id:02}"),
        })
        .collect()
}
