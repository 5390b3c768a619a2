use anyhow::{Context, bail};
use geocoin_core::{Command, Coord, Direction, Engine, Outcome, Position, Storage};
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  n | s | e | w            step one cell
  goto <lat> <lng>         jump to a position
  look                     describe nearby caches
  collect <row> <col>      take a coin from a nearby cache
  deposit <row> <col>      drop your newest coin into a nearby cache
  inv                      list your coins
  auto on|off              toggle automatic positioning
  fix <lat> <lng>          deliver a position fix to the running watch
  lost                     report the position source as unavailable
  reset                    start over, forgetting everything
  quit";

#[derive(Copy, Clone, Debug, PartialEq)]
enum Request {
    Apply(CellRequest),
    Step(Direction),
    Goto(Position),
    Look,
    Inventory,
    Auto(bool),
    Fix(Position),
    Lost,
    Reset,
    Help,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum CellRequest {
    Collect(Coord, Coord),
    Deposit(Coord, Coord),
}

fn parse_line(line: &str) -> anyhow::Result<Option<Request>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let coords = |args: &[&str]| -> anyhow::Result<(Coord, Coord)> {
        let [row, col] = args else {
            bail!("expected <row> <col>");
        };
        Ok((
            row.parse().context("row must be an integer")?,
            col.parse().context("column must be an integer")?,
        ))
    };
    let position = |args: &[&str]| -> anyhow::Result<Position> {
        let [lat, lng] = args else {
            bail!("expected <lat> <lng>");
        };
        Ok(Position::new(
            lat.parse().context("latitude must be a number")?,
            lng.parse().context("longitude must be a number")?,
        ))
    };

    let request = match verb {
        "n" | "north" => Request::Step(Direction::North),
        "s" | "south" => Request::Step(Direction::South),
        "e" | "east" => Request::Step(Direction::East),
        "w" | "west" => Request::Step(Direction::West),
        "goto" => Request::Goto(position(&args)?),
        "look" | "l" => Request::Look,
        "collect" | "c" => {
            let (row, col) = coords(&args)?;
            Request::Apply(CellRequest::Collect(row, col))
        }
        "deposit" | "d" => {
            let (row, col) = coords(&args)?;
            Request::Apply(CellRequest::Deposit(row, col))
        }
        "inv" | "i" => Request::Inventory,
        "auto" => match args.as_slice() {
            ["on"] => Request::Auto(true),
            ["off"] => Request::Auto(false),
            _ => bail!("expected auto on|off"),
        },
        "fix" => Request::Fix(position(&args)?),
        "lost" => Request::Lost,
        "reset" => Request::Reset,
        "help" | "?" => Request::Help,
        "quit" | "q" | "exit" => Request::Quit,
        other => bail!("unknown command {other:?}, try help"),
    };
    Ok(Some(request))
}

pub(crate) fn run<S: Storage>(
    engine: &mut Engine<S>,
    input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "Welcome to Geocoin. Type help for commands.")?;
    look(engine, &mut out)?;

    for line in input.lines() {
        let line = line?;
        let request = match parse_line(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "{err:#}")?;
                continue;
            }
        };
        log::trace!("request {:?}", request);

        let outcome = match request {
            Request::Quit => break,
            Request::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Request::Look => {
                look(engine, &mut out)?;
                continue;
            }
            Request::Inventory => {
                inventory(engine, &mut out)?;
                continue;
            }
            Request::Step(direction) => engine.apply(Command::Move(direction)),
            Request::Goto(position) => engine.apply(Command::MoveTo(position)),
            Request::Apply(CellRequest::Collect(row, col)) => {
                let id = engine.cell_id(row, col);
                engine.apply(Command::Collect(id))
            }
            Request::Apply(CellRequest::Deposit(row, col)) => {
                let id = engine.cell_id(row, col);
                engine.apply(Command::Deposit(id))
            }
            Request::Auto(enabled) => engine.apply(Command::SetAutoPositioning(enabled)),
            Request::Fix(position) => match engine.watch() {
                Some(watch) => engine.apply(Command::PositionFix { watch, position }),
                None => {
                    writeln!(out, "auto positioning is off")?;
                    continue;
                }
            },
            Request::Lost => match engine.watch() {
                Some(watch) => engine.apply(Command::PositionUnavailable { watch }),
                None => Outcome::NoChange,
            },
            Request::Reset => engine.apply(Command::Reset),
        };

        report(engine, outcome, &mut out)?;
    }

    Ok(())
}

fn report<S: Storage>(
    engine: &mut Engine<S>,
    outcome: Outcome,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match outcome {
        Outcome::NoChange => writeln!(out, "nothing happens")?,
        Outcome::Moved => look(engine, out)?,
        Outcome::Collected(coin) => writeln!(out, "collected {coin}")?,
        Outcome::Deposited(coin) => writeln!(out, "deposited {coin}")?,
        Outcome::AutoPositioningChanged(true) => writeln!(out, "auto positioning on")?,
        Outcome::AutoPositioningChanged(false) => writeln!(out, "auto positioning off")?,
        Outcome::Reset => {
            writeln!(out, "the world forgets you")?;
            look(engine, out)?;
        }
    }
    Ok(())
}

fn look<S: Storage>(engine: &mut Engine<S>, out: &mut impl Write) -> anyhow::Result<()> {
    let here = engine.player_cell();
    writeln!(
        out,
        "you stand at {} in cell {}",
        engine.position(),
        engine.cell(here)
    )?;

    let caches = engine.visible_caches();
    if caches.is_empty() {
        writeln!(out, "no caches nearby")?;
    }
    for (_, cache) in caches {
        let cell = cache.cell();
        writeln!(
            out,
            "  cache {} {} has {} coin(s)",
            cell.row,
            cell.col,
            cache.len()
        )?;
    }
    Ok(())
}

fn inventory<S: Storage>(engine: &Engine<S>, out: &mut impl Write) -> anyhow::Result<()> {
    let coins = engine.inventory();
    writeln!(out, "{} coin(s) in inventory", coins.len())?;
    for coin in coins {
        writeln!(out, "  {coin}")?;
    }
    Ok(())
}
