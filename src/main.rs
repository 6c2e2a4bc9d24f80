//! Command line front end for the deduction-only Minesweeper

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proof_sweeper::{
    board::{create_example_boards, load_board_from_file, save_board_to_file, BoardState, Cell},
    config::{CliOverrides, OracleBackend, Settings, DEFAULT_DIFFICULTY},
    game::{ClickOutcome, ConsistencyStatus, GameSession, GamePhase},
    logic::{ClauseEncoder, Literal},
    oracle::{build_oracle, wire, Query},
    solve::{Generator, Hint, QueryEvaluator},
    utils::{init_logger_with_level, BoardFormatter, ColorOutput},
    verify_board,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "proof_sweeper")]
#[command(about = "Deduction-only Minesweeper backed by a theorem-proving oracle")]
#[command(version = "0.1.0")]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration and example boards
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a puzzle that can be solved without guessing
    Generate {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Difficulty preset
        #[arg(short, long, default_value = DEFAULT_DIFFICULTY)]
        difficulty: String,

        /// RNG seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Oracle backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<OracleBackend>,

        /// Maximum generation attempts (overrides config)
        #[arg(short, long)]
        max_attempts: Option<usize>,

        /// Write the board to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a board can be cleared by deduction alone
    Verify {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board file
        #[arg(long)]
        board: PathBuf,

        /// Oracle backend (overrides config)
        #[arg(long, value_enum)]
        backend: Option<OracleBackend>,

        /// Per-query timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Print the oracle input for a board's current knowledge
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board file
        #[arg(long)]
        board: PathBuf,

        /// Goal cell as `row,col`; without it the satisfiability input is printed
        #[arg(short, long)]
        goal: Option<Cell>,

        /// Ask whether the goal is a mine instead of safe
        #[arg(long)]
        mine: bool,

        /// Also print encoding statistics
        #[arg(long)]
        stats: bool,
    },

    /// Play interactively on stdin
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Difficulty preset
        #[arg(short, long, default_value = DEFAULT_DIFFICULTY)]
        difficulty: String,

        /// RNG seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Oracle backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<OracleBackend>,

        /// Play on this board instead of generating one
        #[arg(long)]
        board: Option<PathBuf>,

        /// Print every response as a JSON line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Setup { directory, force } => {
            init_logger_with_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info });
            setup_command(directory, force)
        }
        Commands::Generate { config, difficulty, seed, backend, max_attempts, output } => {
            let overrides = CliOverrides { backend, seed, max_attempts, verbose, ..Default::default() };
            let settings = load_settings(&config, &overrides)?;
            generate_command(&settings, &difficulty, output)
        }
        Commands::Verify { config, board, backend, timeout } => {
            let overrides = CliOverrides { backend, timeout_seconds: timeout, verbose, ..Default::default() };
            let settings = load_settings(&config, &overrides)?;
            verify_command(&settings, board)
        }
        Commands::Encode { config, board, goal, mine, stats } => {
            let overrides = CliOverrides { verbose, ..Default::default() };
            let settings = load_settings(&config, &overrides)?;
            let board = load_board_from_file(&board)?;
            print!("{}", encode_output(&settings, &board, goal, mine, stats));
            Ok(())
        }
        Commands::Play { config, difficulty, seed, backend, board, json } => {
            let overrides = CliOverrides { backend, seed, verbose, ..Default::default() };
            let settings = load_settings(&config, &overrides)?;
            play_command(settings, &difficulty, board, json)
        }
    }
}

/// Load the config file (or defaults), apply CLI overrides, validate and start logging
fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        eprintln!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate()
        .context("Configuration validation failed")?;

    init_logger_with_level(settings.log_level()?);
    Ok(settings)
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let boards_dir = directory.join("boards");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_boards(&boards_dir)
        .context("Failed to create example boards")?;
    println!("Created example boards in: {}", boards_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: proof_sweeper verify --board {}", boards_dir.join("row.txt").display());
    println!("3. Run: proof_sweeper play --difficulty easy");

    Ok(())
}

fn generate_command(settings: &Settings, difficulty: &str, output: Option<PathBuf>) -> Result<()> {
    let (preset, fell_back) = settings.difficulty(difficulty);
    if fell_back {
        println!("{}", ColorOutput::warning(&format!(
            "Unknown difficulty '{}', using '{}'", difficulty, DEFAULT_DIFFICULTY
        )));
    }

    println!("{}", ColorOutput::info(&format!(
        "Generating a {}x{} board with {} mines...", preset.rows, preset.cols, preset.mines
    )));

    let oracle = build_oracle(&settings.oracle);
    let evaluator = QueryEvaluator::from_settings(oracle.as_ref(), settings);
    let generator = Generator::new(&evaluator, settings.generator.max_attempts)
        .with_parallel(settings.verifier.parallel);
    let mut rng = match settings.generator.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let start_time = Instant::now();
    let puzzle = generator.generate(&mut rng, preset.rows, preset.cols, preset.mines)
        .context("Failed to generate a board")?;

    println!("{}", BoardFormatter::format_board_uncovered(&puzzle.board));
    println!("Start cell: {}", puzzle.start);
    println!("Attempts: {}", puzzle.attempts);
    println!("Rounds to solve: {}", puzzle.report.round_count());

    if puzzle.guaranteed {
        println!("{}", ColorOutput::success(&format!(
            "Solvable by deduction alone (generated in {:.3}s)", start_time.elapsed().as_secs_f64()
        )));
    } else {
        println!("{}", ColorOutput::warning(
            "No deduction-solvable board found within the attempt limit; this board may require guessing"
        ));
    }

    if let Some(path) = output {
        save_board_to_file(&puzzle.board, &path)?;
        println!("Board saved to {}", path.display());
    }

    Ok(())
}

fn verify_command(settings: &Settings, board_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("Verifying board..."));

    let board = load_board_from_file(&board_path)?;
    if board.revealed_count() == 0 {
        println!("{}", ColorOutput::warning("Board has no revealed cell, nothing can be deduced"));
    }

    println!("{}", BoardFormatter::format_board_with_coords(&board));

    let report = verify_board(settings, &board)
        .context("Verification failed")?;
    println!("{}", BoardFormatter::format_report(&report));

    if report.is_solved() {
        println!("{}", ColorOutput::success("Board is solvable by deduction alone"));
    } else {
        println!("{}", ColorOutput::warning("Deduction gets stuck; final knowledge:"));
        println!("{}", BoardFormatter::format_board_with_coords(&report.board));
    }

    Ok(())
}

fn encode_output(settings: &Settings, board: &BoardState, goal: Option<Cell>, mine: bool, stats: bool) -> String {
    let encoder = ClauseEncoder::new(settings.encoding.flag_policy);
    let clauses = encoder.encode(board);

    let mut output = match goal {
        Some(cell) => {
            let literal = if mine { Literal::mine(cell) } else { Literal::safe(cell) };
            Query::new(literal, &clauses).to_wire()
        }
        None => wire::model_input(&clauses),
    };

    if stats {
        output.push('\n');
        output.push_str(&encoder.statistics(board).to_string());
    }

    output
}

fn play_command(settings: Settings, difficulty: &str, board: Option<PathBuf>, json: bool) -> Result<()> {
    let mut session = GameSession::from_settings(settings);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match board {
        Some(path) => {
            let board = load_board_from_file(&path)?;
            let view = session.load_board(board)?;
            emit(&mut out, json, &view, &format!("Loaded {}x{} board", view.rows, view.cols))?;
        }
        None => {
            let view = session.new_game(difficulty)?;
            emit(&mut out, json, &view, &format!(
                "New {} game: {}x{} with {} mines", view.difficulty, view.rows, view.cols, view.mine_count
            ))?;
        }
    }
    if !json {
        show(&mut out, &session)?;
        writeln!(out, "Commands: reveal r c | guess r c | flag r c | hint | hint all | check | show | new [difficulty] | quit")?;
    }

    run_repl(&mut session, stdin.lock(), &mut out, json)
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Reveal(Cell),
    Guess(Cell),
    Flag(Cell),
    Hint,
    HintAll,
    Check,
    Show,
    New(Option<String>),
    Quit,
}

fn parse_command(line: &str) -> Result<ReplCommand> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["reveal", rest @ ..] => ReplCommand::Reveal(parse_cell(rest)?),
        ["guess", rest @ ..] => ReplCommand::Guess(parse_cell(rest)?),
        ["flag", rest @ ..] => ReplCommand::Flag(parse_cell(rest)?),
        ["hint"] => ReplCommand::Hint,
        ["hint", "all"] => ReplCommand::HintAll,
        ["check"] => ReplCommand::Check,
        ["show"] => ReplCommand::Show,
        ["new"] => ReplCommand::New(None),
        ["new", name] => ReplCommand::New(Some(name.to_string())),
        ["quit"] | ["exit"] => ReplCommand::Quit,
        _ => anyhow::bail!("Unknown command: '{}'", line.trim()),
    };

    Ok(command)
}

/// Accepts `r c` or `r,c`
fn parse_cell(words: &[&str]) -> Result<Cell> {
    match words {
        [single] => single.parse(),
        [row, col] => Ok(Cell::new(
            row.parse().with_context(|| format!("Invalid row: {}", row))?,
            col.parse().with_context(|| format!("Invalid column: {}", col))?,
        )),
        _ => anyhow::bail!("Expected a cell as 'row col'"),
    }
}

fn run_repl<R: BufRead, W: Write>(session: &mut GameSession, input: R, out: &mut W, json: bool) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                report_error(out, json, &e.to_string())?;
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }
        if let Err(e) = execute(session, command, out, json) {
            report_error(out, json, &e.to_string())?;
        }
    }

    Ok(())
}

fn execute<W: Write>(session: &mut GameSession, command: ReplCommand, out: &mut W, json: bool) -> Result<()> {
    match command {
        ReplCommand::Reveal(cell) | ReplCommand::Guess(cell) => {
            let guess = matches!(command, ReplCommand::Guess(_));
            let outcome = session.click(cell, guess)?;
            emit(out, json, &outcome, &describe_click(&outcome))?;
            if !json && session.phase() != GamePhase::InProgress {
                show(out, session)?;
            }
        }
        ReplCommand::Flag(cell) => {
            let view = session.toggle_flag(cell)?;
            let text = format!("{} {}", cell, if view.flagged { "flagged" } else { "unflagged" });
            emit(out, json, &view, &text)?;
        }
        ReplCommand::Hint => {
            let hint = session.hint()?;
            let text = match hint {
                Hint::Safe { cell } => format!("{} is provably safe", cell),
                Hint::Mine { cell } => format!("{} is provably a mine", cell),
                Hint::NoMove => "No provable move".to_string(),
            };
            emit(out, json, &hint, &text)?;
        }
        ReplCommand::HintAll => {
            let cells = session.safe_cells()?;
            let text = if cells.is_empty() {
                "No provably safe cells".to_string()
            } else {
                let cells: Vec<String> = cells.iter().map(|cell| cell.to_string()).collect();
                format!("Provably safe: {}", cells.join(" "))
            };
            emit(out, json, &serde_json::json!({ "safe_cells": cells }), &text)?;
        }
        ReplCommand::Check => {
            let report = session.check_consistency()?;
            let text = match report.status {
                ConsistencyStatus::Consistent => "Knowledge is consistent".to_string(),
                ConsistencyStatus::Inconsistent => "Knowledge is contradictory (check your flags)".to_string(),
                ConsistencyStatus::Unknown => format!("Consistency unknown: {}", report.diagnostic),
            };
            emit(out, json, &report, &text)?;
        }
        ReplCommand::Show => show(out, session)?,
        ReplCommand::New(name) => {
            let difficulty = name.unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string());
            let view = session.new_game(&difficulty)?;
            let text = format!("New {} game: {}x{} with {} mines", view.difficulty, view.rows, view.cols, view.mine_count);
            emit(out, json, &view, &text)?;
            if !json {
                show(out, session)?;
            }
        }
        ReplCommand::Quit => {}
    }

    Ok(())
}

fn describe_click(outcome: &ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Already { cell, clue } => format!("{} is already revealed ({})", cell, clue),
        ClickOutcome::Blocked { cell, reason, .. } => format!("{} cannot be revealed: {:?}", cell, reason),
        ClickOutcome::Boom { cell, .. } => ColorOutput::error(&format!("Boom! {} was a mine", cell)),
        ClickOutcome::Safe { cell, clue, won, guessed } => {
            let mut text = format!("{} is safe ({})", cell, clue);
            if *guessed {
                text.push_str(" [guess]");
            }
            if *won {
                text = format!("{}\n{}", text, ColorOutput::success("All safe cells revealed, you win!"));
            }
            text
        }
    }
}

fn show<W: Write>(out: &mut W, session: &GameSession) -> Result<()> {
    match session.board() {
        Some(board) if session.phase() == GamePhase::InProgress => {
            write!(out, "{}", BoardFormatter::format_board_with_coords(board))?;
        }
        Some(board) => write!(out, "{}", BoardFormatter::format_board_uncovered(board))?,
        None => writeln!(out, "No game in progress")?,
    }
    Ok(())
}

fn emit<W: Write, T: Serialize>(out: &mut W, json: bool, value: &T, text: &str) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(value)?)?;
    } else {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

fn report_error<W: Write>(out: &mut W, json: bool, message: &str) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::json!({ "error": message }))?;
    } else {
        writeln!(out, "{}", ColorOutput::error(message))?;
    }
    Ok(())
}
