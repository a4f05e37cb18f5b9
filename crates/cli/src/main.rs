use hazari_core::{winner, GameStatus};
use hazari_store::{default_store_path, Store};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut data_path: Option<PathBuf> = None;
    let mut list = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--data" | "-d" => {
                if let Some(value) = args.get(idx + 1) {
                    data_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--list" => list = true,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unknown argument: {other}");
                print_usage();
                return ExitCode::FAILURE;
            }
        }
        idx += 1;
    }

    if list {
        return print_games(data_path);
    }

    let mut cui_args = Vec::new();
    if let Some(path) = data_path {
        cui_args.push("--data".to_string());
        cui_args.push(path.display().to_string());
    }
    match hazari_cui::run_with_args(&cui_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_games(data_path: Option<PathBuf>) -> ExitCode {
    let Some(path) = data_path.or_else(default_store_path) else {
        eprintln!("no data path; pass --data or set HAZARI_DATA or HOME");
        return ExitCode::FAILURE;
    };
    let store = Store::open(path);
    let games = match store.load_all() {
        Ok(games) => games,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if games.is_empty() {
        println!("no games recorded");
        return ExitCode::SUCCESS;
    }
    for game in &games {
        let state = match game.status {
            GameStatus::Active => format!("active, round {}", game.current_round),
            GameStatus::Completed => match winner(game) {
                Some(best) => format!("completed, {} won with {}", best.player, best.score),
                None => "completed".to_string(),
            },
        };
        println!(
            "{}  [{}]  {} players, first to {}  ({})",
            game.title,
            game.id,
            game.players.len(),
            game.total_points,
            state
        );
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    println!("usage: hazari [--data <file>] [--list]");
    println!();
    println!("  --data, -d <file>  game data file (default: $HAZARI_DATA or ~/.hazari_games.json)");
    println!("  --list             print the stored games and exit");
}
