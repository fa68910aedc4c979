use std::{
    fmt,
    io::{self, BufRead, Write},
    time::{Duration, Instant},
};

use clap::{value_t, value_t_or_exit, App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use regex::{Captures, Regex};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rpsflag::{
    board::{CellRef, Coordinate, Direction},
    collision::BattleResult,
    game::{BattleReport, Game, GameConfig, MoveOutcome},
    setup::{Difficulty, SetupConfig},
    units::{Player, UnitKind},
};

fn main() -> io::Result<()> {
    let matches = App::new("rpsflag")
        .version("0.1")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Hot-seat rock-paper-scissors capture the flag for two players.")
        .arg(
            Arg::with_name("width")
                .short("W")
                .long("width")
                .value_name("WIDTH")
                .help("width of the board, at least 12")
                .takes_value(true)
                .default_value("20")
                .validator(is_number),
        )
        .arg(
            Arg::with_name("height")
                .short("H")
                .long("height")
                .value_name("HEIGHT")
                .help("height of the board, at least 12")
                .takes_value(true)
                .default_value("20")
                .validator(is_number),
        )
        .arg(
            Arg::with_name("difficulty")
                .short("d")
                .long("difficulty")
                .value_name("DIFFICULTY")
                .help("share of the board covered in mountains: easy 10%, medium 30%, hard 50%")
                .takes_value(true)
                .default_value("easy")
                .possible_values(&["easy", "medium", "hard", "0", "1", "2"])
                .case_insensitive(true),
        )
        .arg(
            Arg::with_name("mountains")
                .short("m")
                .long("mountains")
                .value_name("COUNT")
                .help("exact number of mountains, overrides the difficulty")
                .takes_value(true)
                .validator(is_number),
        )
        .arg(
            Arg::with_name("first_player")
                .short("f")
                .long("first")
                .value_name("FIRST_PLAYER")
                .help("which player moves first")
                .takes_value(true)
                .default_value("p0")
                .possible_values(&["p0", "0", "p1", "1", "random", "rand"])
                .case_insensitive(true),
        )
        .arg(
            Arg::with_name("turn_time")
                .short("t")
                .long("turn-time")
                .value_name("SECONDS")
                .help("time allowed per turn before it is forfeited, 0 for unlimited")
                .takes_value(true)
                .default_value("400")
                .validator(is_number),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .value_name("SEED")
                .help("seed for the board generator, random if omitted")
                .takes_value(true)
                .validator(is_number),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let setup = setup_config(&matches);
    let config = game_config(&matches);
    let seed = value_t!(matches, "seed", u64).unwrap_or_else(|_| rand::random());
    info!(seed, ?setup, ?config, "starting game");

    let mut game = match Game::setup(setup, config, &mut StdRng::seed_from_u64(seed)) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Could not set up the board: {}", err);
            std::process::exit(2);
        }
    };
    println!("Board seed: {}", seed);

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());
    play(&mut game, &mut input)
}

/// clap validator for non-negative integers.
fn is_number(value: String) -> Result<(), String> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|_| format!("expected a non-negative number, got {:?}", value))
}

/// Build the board setup from the size, difficulty and mountain args.
fn setup_config(matches: &ArgMatches) -> SetupConfig {
    let width = value_t_or_exit!(matches, "width", usize);
    let height = value_t_or_exit!(matches, "height", usize);
    if let Ok(mountains) = value_t!(matches, "mountains", usize) {
        return SetupConfig::new(width, height, mountains);
    }
    let difficulty = match matches.value_of("difficulty").map(str::to_ascii_lowercase) {
        Some(ref d) if d == "medium" || d == "1" => Difficulty::Medium,
        Some(ref d) if d == "hard" || d == "2" => Difficulty::Hard,
        _ => Difficulty::Easy,
    };
    SetupConfig::with_difficulty(width, height, difficulty)
}

/// Build the game config from the first player and turn time args.
fn game_config(matches: &ArgMatches) -> GameConfig {
    let first_player = match matches
        .value_of("first_player")
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("p1") | Some("1") => Player::P1,
        Some("random") | Some("rand") => rand::random(),
        _ => Player::P0,
    };
    let turn_time_limit = match value_t_or_exit!(matches, "turn_time", u64) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    GameConfig {
        first_player,
        turn_time_limit,
    }
}

/// Parsed player input for a single turn.
enum Command {
    Move(Coordinate, Coordinate),
    Pass,
    Help,
    Quit,
}

/// How a turn ended.
#[derive(Debug, PartialEq)]
enum TurnEnd {
    /// The player passed on purpose.
    Passed,
    /// The player answered after the turn time limit ran out.
    TimedOut,
    /// A move was applied.
    Moved(Coordinate, Coordinate, MoveOutcome),
}

/// What to do with a command typed during a turn.
#[derive(Debug, PartialEq)]
enum Action {
    Help,
    Quit,
    Move(Coordinate, Coordinate),
    End(TurnEnd),
}

impl Action {
    /// Decide what a command does. Quitting always works; anything else typed after the
    /// time limit ran out forfeits the turn.
    fn new(cmd: Command, expired: bool) -> Self {
        match cmd {
            Command::Quit => Action::Quit,
            _ if expired => Action::End(TurnEnd::TimedOut),
            Command::Help => Action::Help,
            Command::Pass => Action::End(TurnEnd::Passed),
            Command::Move(from, to) => Action::Move(from, to),
        }
    }
}

/// What the opponent is told about a turn that ended without a move.
fn forfeit_news(player: Player, end: &TurnEnd) -> Option<String> {
    match end {
        TurnEnd::Passed => Some(format!("{} passed.", PlayerName(player))),
        TurnEnd::TimedOut => Some(format!(
            "{} ran out of time and lost their turn.",
            PlayerName(player)
        )),
        TurnEnd::Moved(..) => None,
    }
}

/// Run turns until someone wins or a player quits.
fn play(game: &mut Game, input: &mut InputReader<impl BufRead>) -> io::Result<()> {
    // News for the player about to move, about what happened on the opponent's turn.
    let mut news: Option<String> = None;
    while !game.is_over() {
        let player = game.current();
        clear_console()?;
        input.read_input(
            &format!("{}, press enter when ready.", PlayerName(player)),
            |_| Some(()),
        )?;
        if let Some(news) = news.take() {
            println!("{}", news);
        }

        let started = Instant::now();
        let end = loop {
            println!();
            show_board(game, Some(player));
            println!(
                "{} to move, {} units left. Type help or ? for commands.",
                PlayerName(player),
                game.movable_units(player)
            );
            let cmd = input.read_input_lower("> ", parse_command)?;
            let expired = game
                .config()
                .turn_time_limit
                .map_or(false, |limit| started.elapsed() > limit);
            match Action::new(cmd, expired) {
                Action::Help => print_help(),
                Action::Quit => return Ok(()),
                Action::End(end) => break end,
                Action::Move(from, to) => match game.apply_move(player, from, to) {
                    Ok(outcome) => break TurnEnd::Moved(from, to, outcome),
                    Err(err) => println!("{}", err),
                },
            }
        };

        match end {
            TurnEnd::Moved(from, to, outcome) => {
                debug!(%player, %from, %to, ?outcome, "turn finished");
                let (mine, theirs) = describe(outcome, to);
                println!("{}", mine);
                news = theirs;
                if !game.is_over() {
                    input.read_input("Press enter to end your turn.", |_| Some(()))?;
                }
            }
            forfeited => {
                if forfeited == TurnEnd::TimedOut {
                    println!("Out of time! Your turn is forfeited.");
                }
                if let Err(err) = game.forfeit_turn(player) {
                    println!("{}", err);
                }
                news = forfeit_news(player, &forfeited);
            }
        }
    }

    if let Some(winner) = game.winner() {
        println!();
        show_board(game, None);
        println!("{} wins!", PlayerName(winner));
    }
    Ok(())
}

/// Messages for the moving player and, if anything happened to their units, the
/// opponent.
fn describe(outcome: MoveOutcome, to: Coordinate) -> (String, Option<String>) {
    match outcome {
        MoveOutcome::Moved => ("Moved.".to_string(), None),
        MoveOutcome::RolledBack => ("Blocked, nothing moved.".to_string(), None),
        MoveOutcome::GameOver(winner) => (format!("Game over, {} wins!", PlayerName(winner)), None),
        MoveOutcome::Battled(report) => {
            let BattleSummary(mine, theirs) = BattleSummary::new(report, to);
            (mine, Some(theirs))
        }
    }
}

/// Battle results from both sides.
struct BattleSummary(String, String);

impl BattleSummary {
    fn new(report: BattleReport, at: Coordinate) -> Self {
        let (attacker, defender) = (report.attacker(), report.defender());
        match report.result() {
            BattleResult::MoverWins => BattleSummary(
                format!("Your {} beat their {} at {}.", attacker, defender, at),
                format!("Your {} at {} was destroyed by a {}.", defender, at, attacker),
            ),
            BattleResult::DefenderWins => BattleSummary(
                format!("Your {} lost to their {} at {}.", attacker, defender, at),
                format!("Your {} at {} fended off a {}.", defender, at, attacker),
            ),
            BattleResult::Tie => BattleSummary(
                format!("Your {} and their {} at {} destroyed each other.", attacker, defender, at),
                format!("Your {} at {} traded with an attacking {}.", defender, at, attacker),
            ),
        }
    }
}

/// Parse a line of input into a command, printing a hint if it can't be understood.
fn parse_command(input: &str) -> Option<Command> {
    /// `x,y dir`
    static STEP: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:move\s+)?
    (?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)\s+
    (?P<dir>[a-z]+)$",
        )
        .unwrap()
    });
    /// `x,y -> x,y`
    static TARGET: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?:move\s+)?
    (?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)\s*
    (?:->|=>|to)\s*
    (?P<tx>[0-9]+)(?:\s*,\s*|\s+)(?P<ty>[0-9]+)$",
        )
        .unwrap()
    });

    match input {
        "?" | "help" | "h" => Some(Command::Help),
        "pass" | "skip" => Some(Command::Pass),
        "quit" | "exit" | "q" => Some(Command::Quit),
        other => {
            if let Some(captures) = TARGET.captures(other) {
                let from = parse_coord(&captures, "x", "y")?;
                let to = parse_coord(&captures, "tx", "ty")?;
                Some(Command::Move(from, to))
            } else if let Some(captures) = STEP.captures(other) {
                let from = parse_coord(&captures, "x", "y")?;
                let dir = match &captures["dir"] {
                    "up" | "north" | "u" | "n" => Direction::Up,
                    "down" | "south" | "d" | "s" => Direction::Down,
                    "left" | "west" | "l" | "w" => Direction::Left,
                    "right" | "east" | "r" | "e" => Direction::Right,
                    other => {
                        println!(
                            "invalid direction {}, choose \"up\", \"down\", \"left\", or \"right\"",
                            other
                        );
                        return None;
                    }
                };
                match from.step(dir) {
                    Some(to) => Some(Command::Move(from, to)),
                    None => {
                        println!("Can't move off the edge of the board.");
                        None
                    }
                }
            } else {
                println!("Invalid command \"{}\". Use '?' for help", other);
                None
            }
        }
    }
}

/// Read a coordinate out of the named capture groups.
fn parse_coord(captures: &Captures, x: &str, y: &str) -> Option<Coordinate> {
    let parse = |name: &str| match captures[name].parse::<usize>() {
        Ok(v) => Some(v),
        Err(_) => {
            println!("invalid coordinate: {}", &captures[name]);
            None
        }
    };
    Some(Coordinate::new(parse(x)?, parse(y)?))
}

fn print_help() {
    println!(
        "Available Commands:
    <x>,<y> <dir>         move the unit at x,y one step in the given direction.
        Possible directions are \"up\", \"down\", \"left\", and \"right\".
    <x>,<y> -> <x>,<y>    move the unit at the first coordinate to the second.
    pass                  end your turn without moving.
    quit                  leave the game.

Rock beats scissors, scissors beats paper, paper beats rock. Equal units destroy
each other. Mountains (M) block movement. Capture the enemy flag to win, or
destroy every unit the enemy can move."
    );
}

/// Clear the terminal so the next player can't see the previous player's board.
fn clear_console() -> io::Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush()
}

/// How a single cell is drawn for a given viewer.
enum ViewCell {
    Empty,
    /// A unit the viewer is allowed to see.
    Visible(char),
    /// An enemy soldier whose kind is hidden.
    Hidden,
}

impl ViewCell {
    fn new(cell: CellRef, viewer: Option<Player>) -> Self {
        match cell.unit() {
            None => ViewCell::Empty,
            Some(unit) => match (viewer, unit.owner()) {
                (Some(viewer), Some(owner))
                    if owner != viewer && unit.kind() != UnitKind::Flag =>
                {
                    ViewCell::Hidden
                }
                _ => ViewCell::Visible(unit.symbol()),
            },
        }
    }
}

impl fmt::Display for ViewCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViewCell::Empty => f.pad("."),
            ViewCell::Hidden => f.pad("?"),
            ViewCell::Visible(symbol) => f.pad(symbol.encode_utf8(&mut [0; 4])),
        }
    }
}

/// Print the board as seen by `viewer`, or fully revealed for `None`.
fn show_board(game: &Game, viewer: Option<Player>) {
    print!("    ");
    for i in 0..game.board().dimensions().width() {
        print!("{:^3}", i);
    }
    println!();
    for (i, row) in game.board().iter_rows().enumerate() {
        print!("{:>3} ", i);
        for cell in row {
            print!("{:^3}", ViewCell::new(cell, viewer));
        }
        println!();
    }
}

/// Display helper that names a player along with the case their units are drawn in.
struct PlayerName(Player);

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Player::P0 => f.pad("Player 0 (lowercase)"),
            Player::P1 => f.pad("Player 1 (UPPERCASE)"),
        }
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
