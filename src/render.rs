use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::card::{COLUMNS, Card, ROWS};
use crate::error::Error;

/// Printed sheets carry three cards stacked on one portrait page; batch sizes
/// are conventionally a multiple of this.
pub const CARDS_PER_PAGE: usize = 3;

// A4 portrait at 150 dpi.
const PAGE_W: u32 = 1240;
const PAGE_H: u32 = 1754;
const MARGIN: u32 = 50;

const HEADER_PX: f32 = 52.0;
const CARD_NO_PX: f32 = 26.0;
const TITLE_PX: f32 = 24.0;
const ARTIST_PX: f32 = 19.0;

const EVENT_TITLE: &str = "QUINA QUINA!";

const FONT_CANDIDATES: &[&str] = &[
    "DejaVuSans",
    "LiberationSans",
    "Arial",
    "Helvetica",
    "NotoSans-Regular",
    "NotoSans",
    "Cantarell-Regular",
];

/// Locates a TrueType/OpenType font on the host. An explicit
/// `QUINA_FONT_PATH` wins; otherwise the platform font directories are
/// scanned and a common sans face is preferred over whatever parses first.
pub fn find_system_font_data() -> Option<Vec<u8>> {
    if let Ok(path) = std::env::var("QUINA_FONT_PATH")
        && let Ok(bytes) = fs::read(&path)
    {
        return Some(bytes);
    }

    let mut font_files: Vec<PathBuf> = Vec::new();
    for dir in font_search_dirs() {
        if !dir.exists() {
            continue;
        }
        for entry in walkdir::WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_font = path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"));
            if is_font {
                font_files.push(path.to_path_buf());
            }
        }
    }

    for &candidate in FONT_CANDIDATES {
        let hit = font_files.iter().find(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.eq_ignore_ascii_case(candidate))
        });
        if let Some(path) = hit
            && let Ok(bytes) = fs::read(path)
        {
            return Some(bytes);
        }
    }

    // No known face: take the first file rusttype accepts.
    font_files.into_iter().find_map(|path| {
        let bytes = fs::read(&path).ok()?;
        Font::try_from_vec(bytes.clone()).map(|_| bytes)
    })
}

fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = dirs_next::home_dir() {
            dirs.push(home.join("Library/Fonts"));
        }
    } else if cfg!(target_os = "windows") {
        if let Some(win) = std::env::var_os("WINDIR") {
            dirs.push(PathBuf::from(win).join("Fonts"));
        }
        dirs.push(PathBuf::from("C:/Windows/Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = dirs_next::home_dir() {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
        }
    }
    dirs
}

struct TextPainter {
    font: Font<'static>,
}

impl TextPainter {
    fn new(font_data: Vec<u8>) -> Result<Self, Error> {
        let font = Font::try_from_vec(font_data).ok_or(Error::InvalidFont)?;
        Ok(Self { font })
    }

    fn width(&self, text: &str, px: f32) -> f32 {
        let scale = Scale::uniform(px);
        let glyphs: Vec<_> = self.font.layout(text, scale, point(0.0, 0.0)).collect();
        glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draws one line, shortening it with an ellipsis when it overflows
    /// `max_w`.
    fn draw_clipped(&self, img: &mut RgbImage, text: &str, x: u32, baseline_y: f32, max_w: f32, px: f32, color: Rgb<u8>) {
        let mut line = text.to_string();
        if self.width(&line, px) > max_w {
            while !line.is_empty() && self.width(&format!("{line}…"), px) > max_w {
                line.pop();
            }
            line.push('…');
        }
        self.draw(img, &line, x as f32, baseline_y, px, color);
    }

    fn draw_centered(&self, img: &mut RgbImage, text: &str, center_x: u32, baseline_y: f32, px: f32, color: Rgb<u8>) {
        let x = center_x as f32 - self.width(text, px) / 2.0;
        self.draw(img, text, x.max(0.0), baseline_y, px, color);
    }

    fn draw(&self, img: &mut RgbImage, text: &str, x: f32, baseline_y: f32, px: f32, color: Rgb<u8>) {
        let scale = Scale::uniform(px);
        for glyph in self.font.layout(text, scale, point(x, baseline_y)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v < 0.05 {
                        return;
                    }
                    let px_x = gx as i32 + bb.min.x;
                    let px_y = gy as i32 + bb.min.y;
                    if px_x >= 0 && px_y >= 0 && (px_x as u32) < img.width() && (px_y as u32) < img.height() {
                        let dst = img.get_pixel_mut(px_x as u32, px_y as u32);
                        for c in 0..3 {
                            dst[c] = ((dst[c] as f32) * (1.0 - v) + (color[c] as f32) * v) as u8;
                        }
                    }
                });
            }
        }
    }
}

/// Renders the cards to printable PNG pages (`page-01.png`, ...) under
/// `out_dir`, [`CARDS_PER_PAGE`] cards per page. Returns the written paths.
pub fn render_card_pages(cards: &[Card], out_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let font_data = find_system_font_data().ok_or(Error::FontNotFound)?;
    let painter = TextPainter::new(font_data)?;

    fs::create_dir_all(out_dir).map_err(|source| Error::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut pages = Vec::new();
    for (page_no, chunk) in cards.chunks(CARDS_PER_PAGE).enumerate() {
        let mut img = RgbImage::from_pixel(PAGE_W, PAGE_H, Rgb([255, 255, 255]));
        let slot_h = PAGE_H / CARDS_PER_PAGE as u32;
        for (slot, card) in chunk.iter().enumerate() {
            draw_card(&mut img, &painter, card, slot as u32 * slot_h, slot_h);
        }

        let path = out_dir.join(format!("page-{:02}.png", page_no + 1));
        img.save(&path).map_err(|source| Error::Image {
            path: path.clone(),
            source,
        })?;
        pages.push(path);
    }
    Ok(pages)
}

fn draw_card(img: &mut RgbImage, painter: &TextPainter, card: &Card, top: u32, slot_h: u32) {
    let ink = Rgb([20, 20, 20]);
    let grey = Rgb([77, 77, 77]);

    let left = MARGIN;
    let right = PAGE_W - MARGIN;
    let card_top = top + MARGIN / 2;
    let card_bottom = top + slot_h - MARGIN / 2;

    // Header: event title centered, card number right-aligned.
    let header_baseline = card_top as f32 + HEADER_PX;
    painter.draw_centered(img, EVENT_TITLE, PAGE_W / 2, header_baseline, HEADER_PX, ink);
    let card_no = format!("CARTRÓ #{}", card.id);
    let no_x = right as f32 - painter.width(&card_no, CARD_NO_PX);
    painter.draw(img, &card_no, no_x, card_top as f32 + CARD_NO_PX, CARD_NO_PX, grey);

    // Song grid.
    let grid_top = card_top + HEADER_PX as u32 + 20;
    let grid_h = card_bottom.saturating_sub(grid_top);
    let cell_w = (right - left) / COLUMNS as u32;
    let cell_h = grid_h / ROWS as u32;

    for r in 0..=ROWS as u32 {
        let y = grid_top + r * cell_h;
        for x in left..=right {
            img.put_pixel(x, y, ink);
        }
    }
    for c in 0..=COLUMNS as u32 {
        let x = left + c * cell_w;
        for y in grid_top..=(grid_top + ROWS as u32 * cell_h) {
            img.put_pixel(x, y, ink);
        }
    }

    for (row, line) in card.lines.iter().enumerate() {
        for (col, song) in line.iter().enumerate() {
            let x = left + col as u32 * cell_w + 12;
            let y = grid_top + row as u32 * cell_h;
            let max_w = (cell_w - 24) as f32;
            let title_baseline = y as f32 + cell_h as f32 / 2.0 - 8.0;
            let artist_baseline = title_baseline + ARTIST_PX + 8.0;
            painter.draw_clipped(img, &song.title.to_uppercase(), x, title_baseline, max_w, TITLE_PX, ink);
            painter.draw_clipped(img, &song.artist, x, artist_baseline, max_w, ARTIST_PX, grey);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_cards;
    use crate::song::sample_songs;

    #[test]
    fn renders_pages_when_a_font_is_available() {
        if find_system_font_data().is_none() {
            // Headless host without fonts; nothing to verify here.
            return;
        }

        let songs = sample_songs(48);
        let batch = generate_cards("normal", 1, 6, &songs, "render").expect("generate");
        let dir = tempfile::tempdir().expect("temp dir");

        let pages = render_card_pages(&batch.cards, dir.path()).expect("render");
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.exists()));
    }

    #[test]
    fn empty_batch_renders_no_pages() {
        if find_system_font_data().is_none() {
            return;
        }
        let dir = tempfile::tempdir().expect("temp dir");
        let pages = render_card_pages(&[], dir.path()).expect("render");
        assert!(pages.is_empty());
    }
}
