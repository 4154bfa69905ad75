use anyhow::{anyhow, Context};
use calgrid::{port, AnchorDate, CalendarGrid, CellFormat};
use lexopt::{Arg, Parser, ValueExt};
use std::io::{self, IsTerminal, Write};
use time::OffsetDateTime;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    anchor: Option<AnchorDate>,
    offset: i32,
    format: CellFormat,
    weeks: bool,
    serve: bool,
    verbosity: u8,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('o') | Arg::Long("offset") => opts.offset = parser.value()?.parse()?,
                Arg::Short('f') | Arg::Long("format") => opts.format = parser.value()?.parse()?,
                Arg::Short('w') | Arg::Long("weeks") => opts.weeks = true,
                Arg::Long("serve") => opts.serve = true,
                Arg::Short('v') | Arg::Long("verbose") => {
                    opts.verbosity = opts.verbosity.saturating_add(1);
                }
                Arg::Value(value) if opts.anchor.is_none() => opts.anchor = Some(value.parse()?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                init_tracing(opts.verbosity)?;
                if opts.serve {
                    let stats = port::serve(io::stdin().lock(), io::stdout().lock(), opts.format)
                        .context("failed to serve grid requests")?;
                    debug!(?stats, "port closed");
                    return Ok(());
                }
                let anchor = match opts.anchor {
                    Some(anchor) => anchor,
                    None => AnchorDate::new(
                        OffsetDateTime::now_local()
                            .context("failed to determine local date")?
                            .date(),
                    ),
                };
                debug!(%anchor, offset = opts.offset, "building grid");
                let grid = CalendarGrid::new(anchor.date(), opts.offset)
                    .with_context(|| format!("cannot build grid for {anchor} {:+}", opts.offset))?;
                let mut out = io::stdout().lock();
                if opts.weeks {
                    for week in grid.weeks() {
                        let line = week
                            .iter()
                            .map(|&d| opts.format.render(d))
                            .collect::<Vec<_>>()
                            .join(" ");
                        writeln!(out, "{line}")?;
                    }
                } else {
                    serde_json::to_writer(&mut out, &grid.render(opts.format))?;
                    writeln!(out)?;
                }
                out.flush()?;
                Ok(())
            }
            Command::Help => {
                println!("Usage: calgrid [options] [\"YYYY MMM DD\"]");
                println!("       calgrid --serve [options]");
                println!();
                println!("Print the 35 days of the five-week month view for a date");
                println!();
                println!("Options:");
                println!("  -o, --offset <N>    Move the anchor date N months (may be negative)");
                println!("  -f, --format <FMT>  Write cells as \"date\" (default) or \"datetime\"");
                println!("  -w, --weeks         Print one week per line instead of a JSON array");
                println!("      --serve         Answer JSON grid requests read from stdin");
                println!("  -v, --verbose       Log more to stderr; repeat for more detail");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid log filter: {e}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init()
        .map_err(|e| anyhow!("failed to set up logging: {e}"))?;
    Ok(())
}
