use chess_rules::view::board_view;
use chess_rules::{Board, Color, GameStatus, MoveOutcome, PieceType};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Plays random legal games against itself and reports how they ended.
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Stop a game after this many half-moves
    #[arg(long, default_value_t = 200)]
    max_plies: u32,

    /// Seed for move selection; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print each final position as JSON
    #[arg(long)]
    json: bool,
}

fn play_game(rng: &mut StdRng, max_plies: u32) -> (Board, u32) {
    let mut board = Board::new();
    let mut plies = 0;

    while !board.status().is_concluded() && plies < max_plies {
        let moves = board.legal_moves_for_turn();
        let Some(&(from, candidate)) = moves.choose(rng) else {
            break;
        };

        let step = board
            .apply_move(from, candidate.to, candidate.extra)
            .and_then(|outcome| match outcome {
                MoveOutcome::Completed => board.advance_turn(),
                MoveOutcome::PromotionPending(_) => {
                    let kind = PieceType::PROMOTION_CHOICES
                        .choose(rng)
                        .copied()
                        .unwrap_or(PieceType::Queen);
                    board.promote(kind)
                }
            });
        if let Err(err) = step {
            warn!(%err, %from, to = %candidate.to, "move rejected");
            break;
        }
        plies += 1;
    }

    (board, plies)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (mut white_wins, mut black_wins, mut stalemates, mut unfinished) = (0u32, 0u32, 0u32, 0u32);

    for game in 1..=args.games {
        let (board, plies) = play_game(&mut rng, args.max_plies);
        let status = board.status();
        match status {
            GameStatus::Checkmate { winner } if winner == Color::White => white_wins += 1,
            GameStatus::Checkmate { .. } => black_wins += 1,
            GameStatus::Stalemate => stalemates += 1,
            _ => unfinished += 1,
        }
        info!(game, plies, ?status, "game finished");

        if args.json {
            match serde_json::to_string_pretty(&board_view(&board.snapshot())) {
                Ok(text) => println!("{text}"),
                Err(err) => warn!(%err, "could not render position"),
            }
        }
    }

    info!(white_wins, black_wins, stalemates, unfinished, "selfplay complete");
}
