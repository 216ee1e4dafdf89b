use anyhow::{bail, Context};
use ashen_core::{BlindKind, Event, EventBus, HandKind, JokerKind, Phase, RunError, RunState};
use ashen_data::load_game_config;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Rush,
    Blinds,
}

#[derive(Debug, Clone)]
struct CliOptions {
    mode: Mode,
    seed: u64,
    json: bool,
    assets: PathBuf,
    start: usize,
    ticks: u32,
    jokers: Vec<JokerKind>,
    max_hands: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    phase: Phase,
    ante: u8,
    money: i64,
    souls: i64,
    hands_played: usize,
    bosses_defeated: usize,
    best_hand: Option<HandKind>,
    best_increment: i64,
}

fn parse_cli_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions {
        mode: Mode::Rush,
        seed: 0,
        json: false,
        assets: PathBuf::from("assets"),
        start: 0,
        ticks: 0,
        jokers: Vec::new(),
        max_hands: 500,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "--json" => options.json = true,
            "--blinds" => options.mode = Mode::Blinds,
            "--rush" => options.mode = Mode::Rush,
            "--seed" | "--assets" | "--start" | "--ticks" | "--joker" | "--max-hands" => {
                let value = args
                    .get(idx + 1)
                    .with_context(|| format!("{flag} needs a value"))?;
                idx += 1;
                match flag {
                    "--seed" => options.seed = value.parse().context("parse --seed")?,
                    "--assets" => options.assets = PathBuf::from(value),
                    "--start" => options.start = value.parse().context("parse --start")?,
                    "--ticks" => options.ticks = value.parse().context("parse --ticks")?,
                    "--max-hands" => {
                        options.max_hands = value.parse().context("parse --max-hands")?
                    }
                    _ => match JokerKind::from_name(value) {
                        Some(kind) => options.jokers.push(kind),
                        None => bail!("unknown joker: {value}"),
                    },
                }
            }
            other => bail!("unknown argument: {other}"),
        }
        idx += 1;
    }
    Ok(options)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_cli_options(&args).and_then(|options| run_headless(&options));
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run_headless(options: &CliOptions) -> anyhow::Result<()> {
    let config = load_game_config(&options.assets)
        .with_context(|| format!("load assets from {}", options.assets.display()))?;
    let mut run = RunState::new(config, options.seed);
    for kind in &options.jokers {
        run.add_joker(*kind)?;
    }
    tracing::info!(seed = options.seed, mode = ?options.mode, "starting run");

    let mut events = EventBus::default();
    match options.mode {
        Mode::Rush => run.start_boss_rush(options.start, &mut events)?,
        Mode::Blinds => run.start_blind(1, BlindKind::Small, &mut events)?,
    }

    let mut summary = Summary {
        phase: run.state.phase,
        ante: run.state.ante,
        money: 0,
        souls: 0,
        hands_played: 0,
        bosses_defeated: 0,
        best_hand: None,
        best_increment: 0,
    };

    while summary.hands_played < options.max_hands {
        emit(&mut events, options.json)?;
        match run.state.phase {
            Phase::Play => {
                if let Some(step) = play_turn(&mut run, options, &mut events)? {
                    summary.hands_played += 1;
                    if step.1 > summary.best_increment {
                        summary.best_increment = step.1;
                        summary.best_hand = Some(step.0);
                    }
                }
            }
            Phase::Cleared => {
                let next = match options.mode {
                    Mode::Rush => run.next_rush_boss(&mut events),
                    Mode::Blinds => run.start_next_blind(&mut events),
                };
                match next {
                    Ok(()) => {}
                    Err(RunError::MissingAnteRule(ante)) => {
                        tracing::info!(ante, "no more antes");
                        break;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Phase::Failed => {
                if let Err(err) = run.revive(&mut events) {
                    tracing::info!(%err, "revive refused");
                    break;
                }
            }
            Phase::Won | Phase::GameOver | Phase::Setup | Phase::Score => break,
        }
    }
    emit(&mut events, options.json)?;

    summary.phase = run.state.phase;
    summary.ante = run.state.ante;
    summary.money = run.state.money;
    summary.souls = run.state.souls;
    summary.bosses_defeated = run.rush.map(|rush| rush.defeated).unwrap_or(0);
    if options.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "finished: {:?} at ante {} | money {} | souls {} | hands {} | bosses {}",
            summary.phase,
            summary.ante,
            summary.money,
            summary.souls,
            summary.hands_played,
            summary.bosses_defeated
        );
        if let Some(hand) = summary.best_hand {
            println!("best hand: {} for {}", hand, summary.best_increment);
        }
    }
    Ok(())
}

/// Idles for the configured ticks, then plays the best-scoring selection.
/// Returns the played category and its increment.
fn play_turn(
    run: &mut RunState,
    options: &CliOptions,
    events: &mut EventBus,
) -> anyhow::Result<Option<(HandKind, i64)>> {
    if run.heat.level > 0 && !run.heat.active {
        run.activate_heat(events);
    }
    for _ in 0..options.ticks {
        if run.tick(events).is_some() {
            return Ok(None);
        }
    }
    let picks = best_selection(run);
    if picks.is_empty() {
        bail!("empty hand while the round is in play");
    }
    run.select(&picks)?;
    let pending = match run.play_hand(events) {
        Ok(pending) => pending,
        Err(RunError::HandForfeited) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let played = (pending.result().hand, pending.result().round_increment);
    match run.commit_score(pending, events) {
        Ok(_) => Ok(Some(played)),
        Err(err) if err.is_terminal() => {
            tracing::warn!(%err, "run ended");
            Ok(Some(played))
        }
        Err(err) => Err(err.into()),
    }
}

/// Hand positions the greedy search looks at. Cards past this are ignored.
const SEARCH_WIDTH: usize = 16;

/// Tries every selection up to the cap and keeps the highest increment.
fn best_selection(run: &RunState) -> Vec<usize> {
    let len = run.hand().len().min(SEARCH_WIDTH);
    let cap = run.max_selection().min(len);
    let mut best: Vec<usize> = Vec::new();
    let mut best_score = i64::MIN;
    for mask in 1u32..(1u32 << len) {
        if mask.count_ones() as usize > cap {
            continue;
        }
        let picks: Vec<usize> = (0..len).filter(|idx| mask & (1 << idx) != 0).collect();
        if let Some(result) = run.preview(&picks) {
            if result.round_increment > best_score {
                best_score = result.round_increment;
                best = picks;
            }
        }
    }
    best
}

fn emit(events: &mut EventBus, json: bool) -> anyhow::Result<()> {
    for event in events.drain() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", describe(&event));
        }
    }
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::BlindStarted {
            ante,
            blind,
            target,
            hands,
            discards,
        } => format!("ante {ante} {blind:?} blind: target {target}, {hands} hands, {discards} discards"),
        Event::BossEngaged {
            name,
            ability,
            target,
        } => format!("boss {name} ({ability}) with target {target}"),
        Event::HandDealt { count } => format!("dealt {count} cards"),
        Event::HandScored {
            hand,
            chips,
            mult,
            total,
        } => format!("{hand}: {chips} chips x {mult:.2} mult = {total}"),
        Event::ScoreCommitted {
            increment,
            round_score,
            target,
        } => format!("+{increment} -> {round_score} / {target}"),
        Event::TargetCrossed { souls, heat } => {
            format!("target crossed: +{souls} souls, +{heat} heat")
        }
        Event::CardsDiscarded { cards, forced } => {
            let who = if *forced { "boss discarded" } else { "discarded" };
            format!("{who} {} cards", cards.len())
        }
        Event::CardsDestroyed { cards } => format!("{} cards destroyed", cards.len()),
        Event::JokerDisabled { joker } => format!("{joker} disabled"),
        Event::JokerCreated { joker } => format!("{joker} created"),
        Event::ConsumableUsed { name } => format!("used {name}"),
        Event::ConsumablesCreated { names } => format!("created {}", names.join(", ")),
        Event::TargetChanged { target } => format!("target is now {target}"),
        Event::BossPhase { phase } => format!("boss entered phase {phase}"),
        Event::Heat(step) => format!("heat: {step:?}"),
        Event::Revived { souls } => format!("revived, {souls} souls left"),
        Event::BlindCleared {
            score,
            reward,
            money,
        } => format!("blind cleared with {score}: +${reward} (${money})"),
        Event::BlindFailed { score } => format!("blind failed at {score}"),
        Event::BossDefeated { name, souls, money } => {
            format!("{name} defeated: +{souls} souls (${money})")
        }
        Event::RushWon { bosses } => format!("boss rush won after {bosses} bosses"),
        Event::GameOver { reason } => format!("game over: {reason}"),
    }
}
