use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quina_cards::render::CARDS_PER_PAGE;
use quina_cards::{generate_cards, play, render, song, store};

#[derive(Parser)]
#[command(
    name = "quina-cards",
    about = "Card generator and play helpers for a live musical bingo",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a batch of cards from a song catalogue
    Generate(GenerateArgs),
    /// Check one card against the songs played so far
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Song catalogue, a JSON array of {id, title, artist}
    #[arg(long)]
    songs: PathBuf,

    /// Number of cards to generate (print sheets hold 3 per page)
    #[arg(long)]
    amount: usize,

    /// Id of the first card; later batches continue the numbering
    #[arg(long, default_value_t = 1)]
    start_id: u64,

    /// Ticket kind recorded on each card ("normal", "special", ...)
    #[arg(long, default_value = "normal")]
    kind: String,

    /// Seed: the same seed always reproduces the same batch
    #[arg(long)]
    seed: String,

    /// Where to write the generated cards
    #[arg(long)]
    out: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Also render printable PNG pages into this directory
    #[arg(long)]
    render_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Card file produced by `generate`
    #[arg(long)]
    cards: PathBuf,

    /// Id of the card being checked
    #[arg(long)]
    card: String,

    /// Ids of the songs played so far, comma separated
    #[arg(long, value_delimiter = ',')]
    played: Vec<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let songs = song::read_songs_from_json(&args.songs)?;
    info!(songs = songs.len(), amount = args.amount, kind = %args.kind, "generating cards");

    if args.amount % CARDS_PER_PAGE != 0 {
        warn!(
            amount = args.amount,
            "amount is not a multiple of {CARDS_PER_PAGE}; the last page will be short"
        );
    }

    let batch = generate_cards(&args.kind, args.start_id, args.amount, &songs, &args.seed)?;
    if !batch.duplicates.is_empty() {
        warn!(
            count = batch.duplicate_count(),
            ids = ?batch.duplicates,
            "retry budgets exhausted: batch contains duplicate cards; consider a different seed"
        );
    }

    store::save_cards(&batch.cards, &args.out, args.pretty)?;
    info!(cards = batch.cards.len(), out = %args.out.display(), "cards written");

    if let Some(dir) = args.render_dir {
        let pages = render::render_card_pages(&batch.cards, &dir)?;
        info!(pages = pages.len(), dir = %dir.display(), "print sheets written");
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let cards = store::load_cards(&args.cards)?;
    let card = cards
        .iter()
        .find(|c| c.id == args.card)
        .with_context(|| format!("card {} not found in {}", args.card, args.cards.display()))?;

    // An empty list is a valid question: before the first song every card
    // is simply missing all twelve.
    let played: HashSet<u32> = args.played.iter().copied().collect();

    if play::is_full_card(card, &played) {
        println!("card {}: QUINA! full card complete", card.id);
        return Ok(());
    }
    if let Some(line) = play::winning_line(card, &played) {
        println!("card {}: line {} complete", card.id, line + 1);
    }
    let missing = play::missing_songs(card, &played);
    println!("card {}: {} songs missing for full card", card.id, missing.len());
    for song in missing {
        println!("  - {} ({})", song.title, song.artist);
    }
    Ok(())
}
