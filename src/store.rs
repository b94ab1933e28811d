use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::card::Card;
use crate::error::Error;

/// Writes the generated cards to a JSON file, creating parent directories as
/// needed. `pretty` trades file size for a diffable layout.
pub fn save_cards(cards: &[Card], path: &Path, pretty: bool) -> Result<(), Error> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, cards)
    } else {
        serde_json::to_writer(&mut writer, cards)
    };
    result.map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;

    // BufWriter::drop swallows flush errors; a full disk must not look like
    // a successful write.
    writer.flush().map_err(io_err)
}

/// Reads a card file back, e.g. to look a card up by id during the game.
pub fn load_cards(path: &Path) -> Result<Vec<Card>, Error> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
