use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use spyfall::prelude::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

const USAGE: &str = "usage: pass-and-play [--minutes N] [--seconds N] [--impostors N] \
[--location NAME] [--catalog FILE.json] [--seed N] PLAYER PLAYER [PLAYER...]";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    players: Vec<String>,
    round: RoundConfig,
    location: Option<String>,
    catalog: Option<PathBuf>,
    seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read catalog: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("no location named {0:?} in the catalog")]
    UnknownLocation(String),
    #[error(transparent)]
    Game(#[from] SpyfallError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("input closed before the round was over")]
    InputClosed,
}

impl From<SessionError> for DemoError {
    fn from(err: SessionError) -> Self {
        Self::Game(err.into())
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, DemoError> {
    let mut opts = Options {
        players: Vec::new(),
        round: RoundConfig::default(),
        location: None,
        catalog: None,
        seed: None,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| DemoError::Usage(format!("{flag} needs a value")))
        };
        match arg.as_str() {
            "--minutes" => {
                opts.round.duration_seconds = number(&value("--minutes")?)?.saturating_mul(60);
            }
            "--seconds" => opts.round.duration_seconds = number(&value("--seconds")?)?,
            "--impostors" => opts.round.impostor_count = number(&value("--impostors")?)? as usize,
            "--location" => opts.location = Some(value("--location")?),
            "--catalog" => opts.catalog = Some(PathBuf::from(value("--catalog")?)),
            "--seed" => opts.seed = Some(number(&value("--seed")?)?),
            flag if flag.starts_with("--") => {
                return Err(DemoError::Usage(format!("unknown option {flag}")));
            }
            _ => opts.players.push(arg),
        }
    }

    if opts.players.len() < 2 {
        return Err(DemoError::Usage("at least two players are needed".into()));
    }
    Ok(opts)
}

fn number(s: &str) -> Result<u64, DemoError> {
    s.parse()
        .map_err(|_| DemoError::Usage(format!("{s:?} is not a number")))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn builtin_catalog() -> Vec<Scenario> {
    vec![
        Scenario::new("Ristorante", ["Cameriere", "Cuoco", "Cliente", "Manager"]),
        Scenario::new(
            "Aeroporto",
            ["Pilota", "Controllore", "Passeggero", "Addetto sicurezza"],
        ),
        Scenario::new(
            "Ospedale",
            ["Medico", "Infermiere", "Paziente", "Chirurgo", "Visitatore"],
        ),
        Scenario::new(
            "Spiaggia",
            ["Bagnino", "Turista", "Venditore ambulante", "Surfista", "Fotografo"],
        ),
    ]
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Vec<Scenario>, DemoError> {
    match path {
        Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => Ok(builtin_catalog()),
    }
}

fn pick<'a>(
    catalog: &'a [Scenario],
    location: Option<&str>,
    rng: &mut StdRng,
) -> Result<&'a Scenario, DemoError> {
    match location {
        Some(name) => catalog
            .by_name(name)
            .ok_or_else(|| DemoError::UnknownLocation(name.to_string())),
        None => choose_random(catalog, rng)
            .ok_or_else(|| DemoError::Usage("the catalog is empty".into())),
    }
}

fn describe(role: &RoleLabel, scenario: &Scenario) -> String {
    if role.is_impostor() {
        format!("You are the {IMPOSTOR_LABEL}. Find out where everyone else is.")
    } else {
        format!("Location: {}. Your role: {role}.", scenario.name())
    }
}

// ---------------------------------------------------------------------------
// Game loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownEnd {
    Expired,
    Stopped,
}

/// Waits for one line. End of input is an error: treating it as Enter
/// would flash every remaining role in a row.
async fn wait_enter<R: AsyncBufRead + Unpin>(input: &mut Lines<R>) -> Result<(), DemoError> {
    match input.next_line().await? {
        Some(_) => Ok(()),
        None => Err(DemoError::InputClosed),
    }
}

/// Prints the clock on every tick until the countdown expires or someone
/// types `stop`. Stops reading input once it is closed.
async fn run_countdown<R: AsyncBufRead + Unpin>(
    events: &mut mpsc::UnboundedReceiver<TimerEvent>,
    input: &mut Lines<R>,
    mut clock: TimerSnapshot,
) -> Result<CountdownEnd, DemoError> {
    let mut input_open = true;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(TimerEvent::Tick { remaining_seconds }) => {
                    clock.remaining_seconds = remaining_seconds;
                    println!("{clock}");
                }
                Some(TimerEvent::Expired) | None => return Ok(CountdownEnd::Expired),
            },
            line = input.next_line(), if input_open => match line? {
                Some(line) if line.trim().eq_ignore_ascii_case("stop") => {
                    return Ok(CountdownEnd::Stopped);
                }
                Some(_) => {}
                None => input_open = false,
            },
        }
    }
}

async fn play(opts: Options) -> Result<(), DemoError> {
    let catalog = load_catalog(opts.catalog.as_ref())?;
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let scenario = pick(&catalog, opts.location.as_deref(), &mut rng)?;
    let roster = Roster::from_names(&opts.players).map_err(SpyfallError::from)?;

    let mut builder = TableBuilder::new();
    if let Some(seed) = opts.seed {
        builder = builder.seed(seed);
    }
    let table = builder.spawn(SessionId(1));
    let mut events = table.subscribe().await?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let snap = table.start_round(roster, scenario, opts.round).await?;
    if snap.impostors_clamped {
        println!(
            "Asked for {} impostors, dealing {} for {} players.",
            snap.requested_impostors,
            snap.impostor_count,
            snap.players.len()
        );
    }

    for player in &snap.players {
        println!("\nPass the device to {player}. {player}, press Enter to see your role.");
        wait_enter(&mut input).await?;
        let role = table.reveal_current().await?;
        println!("{}", describe(&role, scenario));
        println!("Press Enter to hide it and pass the device on.");
        wait_enter(&mut input).await?;
        print!("{}", "\n".repeat(40));
        table.acknowledge_and_advance().await?;
    }

    let duration = opts.round.validated().duration_seconds;
    let clock = snap.timer.unwrap_or(TimerSnapshot {
        remaining_seconds: duration,
        duration_seconds: duration,
        phase: TimerPhase::Idle,
    });
    println!("Everyone has seen their role. Press Enter to start the {clock} countdown.");
    wait_enter(&mut input).await?;
    table.start_timer().await?;
    println!("Type 'stop' and Enter to end the round early.");

    if run_countdown(&mut events, &mut input, clock).await? == CountdownEnd::Stopped {
        println!("Round stopped early.");
    }

    let identities = table.terminate_round().await?;
    println!("\nRound over. The location was {}.", scenario.name());
    for entry in identities.iter() {
        println!("  {:<16} {}", entry.player.as_str(), entry.role);
    }

    table.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    spyfall::telemetry::init();

    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            std::process::exit(2);
        }
    };
    play(opts).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_players_and_defaults() {
        let opts = parse_args(args("Anna Bruno Carla")).unwrap();
        assert_eq!(opts.players, vec!["Anna", "Bruno", "Carla"]);
        assert_eq!(opts.round, RoundConfig::default());
        assert!(opts.seed.is_none());
    }

    #[test]
    fn test_parse_options() {
        let opts = parse_args(args(
            "--impostors 2 --minutes 8 --seed 5 --location Aeroporto A B C D",
        ))
        .unwrap();
        assert_eq!(opts.round, RoundConfig::new(2, 480));
        assert_eq!(opts.seed, Some(5));
        assert_eq!(opts.location.as_deref(), Some("Aeroporto"));
        assert_eq!(opts.players.len(), 4);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_args(args("Anna")), Err(DemoError::Usage(_))));
        assert!(matches!(
            parse_args(args("--minutes ten A B")),
            Err(DemoError::Usage(_))
        ));
        assert!(matches!(parse_args(args("A B --seed")), Err(DemoError::Usage(_))));
        assert!(matches!(parse_args(args("--fast A B")), Err(DemoError::Usage(_))));
    }

    #[test]
    fn test_builtin_catalog_pools_exclude_impostor() {
        for scenario in builtin_catalog() {
            assert!(scenario.base_pool().len() >= 4, "{}", scenario.name());
            assert!(scenario.base_pool().iter().all(|r| !r.is_impostor()));
        }
    }

    #[test]
    fn test_pick_by_name_and_at_random() {
        let catalog = builtin_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let s = pick(&catalog, Some("Ospedale"), &mut rng).unwrap();
        assert_eq!(s.name(), "Ospedale");
        assert!(matches!(
            pick(&catalog, Some("Luna"), &mut rng),
            Err(DemoError::UnknownLocation(_))
        ));
        assert!(pick(&catalog, None, &mut rng).is_ok());
        assert!(pick(&[], None, &mut rng).is_err());
    }

    #[test]
    fn test_catalog_json_normalizes_roles() {
        let json = r#"[{"name": "Museo", "roles": ["Guida", " Guida ", "Spia", "", "Custode"]}]"#;
        let catalog: Vec<Scenario> = serde_json::from_str(json).unwrap();
        let roles: Vec<_> = catalog[0].base_pool().iter().map(|r| r.as_str()).collect();
        assert_eq!(roles, vec!["Guida", "Custode"]);
    }

    fn clock(seconds: u64) -> TimerSnapshot {
        TimerSnapshot {
            remaining_seconds: seconds,
            duration_seconds: seconds,
            phase: TimerPhase::Running,
        }
    }

    #[tokio::test]
    async fn test_wait_enter_fails_at_end_of_input() {
        let mut input = (&b"\n"[..]).lines();
        assert!(wait_enter(&mut input).await.is_ok());
        assert!(matches!(
            wait_enter(&mut input).await,
            Err(DemoError::InputClosed)
        ));
    }

    #[tokio::test]
    async fn test_countdown_stops_on_command() {
        let (tx, mut events) = mpsc::unbounded_channel();
        let mut input = (&b"what?\n  STOP \n"[..]).lines();
        let end = run_countdown(&mut events, &mut input, clock(60)).await.unwrap();
        assert_eq!(end, CountdownEnd::Stopped);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_runs_to_expiry_after_input_closes() {
        let (tx, mut events) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            for remaining_seconds in [1, 0] {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                let _ = tx.send(TimerEvent::Tick { remaining_seconds });
            }
            let _ = tx.send(TimerEvent::Expired);
            // Keep the channel open so only the Expired event can end the loop.
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });

        // With closed input the loop must go idle, or the paused clock
        // would never advance to the ticks above.
        let mut input = (&b""[..]).lines();
        let end = run_countdown(&mut events, &mut input, clock(2)).await.unwrap();
        assert_eq!(end, CountdownEnd::Expired);
    }

    #[test]
    fn test_describe_hides_location_from_impostor() {
        let scenario = Scenario::new("Ristorante", ["Cuoco"]);
        let spy = describe(&RoleLabel::impostor(), &scenario);
        assert!(!spy.contains("Ristorante"));
        assert!(describe(&RoleLabel::new("Cuoco"), &scenario).contains("Ristorante"));
    }
}
