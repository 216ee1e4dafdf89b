use crate::schema::{
    AnteRule, BlindRule, BossRoster, BossTuning, EconomyRule, GameConfig, HandEvalRules, HandRule,
    HeatRule, RoundRule,
};
use anyhow::{bail, Context};
use ashen_core::{BlindKind, HandKind};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const RULES_FILE: &str = "rules.json";

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let round: RoundRule = load_json(dir.join("round.json"))?;
    let hands: Vec<HandRule> = load_json(dir.join("hands.json"))?;
    let blinds: Vec<BlindRule> = load_json(dir.join("blinds.json"))?;
    let antes: Vec<AnteRule> = load_json(dir.join("antes.json"))?;
    let economy: EconomyRule = load_json(dir.join("economy.json"))?;
    let heat: HeatRule = load_json(dir.join("heat.json"))?;
    let boss_tuning: BossTuning = load_json(dir.join("boss_tuning.json"))?;
    let bosses: BossRoster = load_json(dir.join("bosses.json"))?;
    let tarots: Vec<String> = load_json(dir.join("tarots.json"))?;
    let rules_path = dir.join(RULES_FILE);
    let rules: HandEvalRules = if rules_path.exists() {
        load_json(rules_path)?
    } else {
        HandEvalRules::default()
    };

    let config = GameConfig {
        round,
        hands,
        blinds,
        antes,
        economy,
        heat,
        boss_tuning,
        boss_rush: bosses.boss_rush,
        blind_bosses: bosses.blind_bosses,
        tarots,
        rules,
    };
    validate_config(&config).with_context(|| format!("validate {}", dir.display()))?;
    Ok(config)
}

/// Rejects configs the session cannot run on.
pub fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for rule in &config.hands {
        if !seen.insert(rule.kind) {
            bail!("duplicate hand row: {}", rule.kind);
        }
    }
    for kind in HandKind::LEVELED {
        if !seen.contains(&kind) {
            bail!("missing hand row: {kind}");
        }
    }

    for kind in [BlindKind::Small, BlindKind::Big, BlindKind::Boss] {
        if config.blind_rule(kind).is_none() {
            bail!("missing blind rule: {kind:?}");
        }
    }

    if config.antes.is_empty() {
        bail!("no antes configured");
    }
    let mut antes = HashSet::new();
    for rule in &config.antes {
        if !antes.insert(rule.ante) {
            bail!("duplicate ante {}", rule.ante);
        }
        if rule.base_target <= 0 {
            bail!("ante {} has a non-positive target", rule.ante);
        }
    }

    if config.boss_rush.is_empty() {
        bail!("boss rush roster is empty");
    }
    for boss in &config.boss_rush {
        if boss.target <= 0 {
            bail!("boss {} has a non-positive target", boss.name);
        }
    }

    let round = &config.round;
    if round.max_selection == 0 || round.max_selection > round.hand_size {
        bail!(
            "max_selection {} must be between 1 and hand_size {}",
            round.max_selection,
            round.hand_size
        );
    }
    if config.heat.max_level == 0 {
        bail!("heat needs at least one level");
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
