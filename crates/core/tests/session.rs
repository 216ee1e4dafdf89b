use ashen_core::{
    BlindKind, BlindOutcome, BossAbilityKind, BossDef, BuiltinTarots, Card, CardId, Consumable,
    EffectSource, Enhancement, Event, EventBus, GameConfig, HandKind, HeatState, HeatTransition,
    JokerKind, Phase, Planet, Rank, RunError, RunState, Suit, EMPEROR, FOOL, JUDGMENT,
};

fn card(id: u32, suit: Suit, rank: Rank) -> Card {
    Card::new(CardId(1000 + id), suit, rank)
}

/// Replaces the dealt hand with known cards so scores are predictable.
fn set_hand(run: &mut RunState, cards: Vec<Card>) {
    run.deck.hand = cards;
}

fn full_house_hand() -> Vec<Card> {
    vec![
        card(1, Suit::Spades, Rank::Ten),
        card(2, Suit::Hearts, Rank::Ten),
        card(3, Suit::Diamonds, Rank::Ten),
        card(4, Suit::Clubs, Rank::Three),
        card(5, Suit::Spades, Rank::Three),
        card(6, Suit::Hearts, Rank::Seven),
        card(7, Suit::Diamonds, Rank::Eight),
        card(8, Suit::Clubs, Rank::Nine),
    ]
}

fn weak_hand(offset: u32) -> Vec<Card> {
    (0..8)
        .map(|idx| {
            card(
                offset + idx,
                Suit::ALL[idx as usize % 4],
                Rank::ALL[idx as usize],
            )
        })
        .collect()
}

fn relabel(mut cards: Vec<Card>, base: u32) -> Vec<Card> {
    for (idx, card) in cards.iter_mut().enumerate() {
        card.id = CardId(3000 + base + idx as u32);
    }
    cards
}

fn play(
    run: &mut RunState,
    indices: &[usize],
    events: &mut EventBus,
) -> Result<Option<BlindOutcome>, RunError> {
    run.select(indices)?;
    let pending = run.play_hand(events)?;
    run.commit_score(pending, events)
}

fn drain(events: &mut EventBus) -> Vec<Event> {
    events.drain().collect()
}

fn rush_config(roster: Vec<BossDef>) -> GameConfig {
    GameConfig {
        boss_rush: roster,
        ..GameConfig::default()
    }
}

/// A lone Soul of Cinder style boss walked to `phase` by idle ticks.
fn phased_boss(seed: u64, round_score: i64, phase: u8) -> (RunState, EventBus) {
    let roster = vec![BossDef::new("Cinder", 1000, BossAbilityKind::PhaseChanges)];
    let mut run = RunState::new(rush_config(roster), seed);
    let mut events = EventBus::default();
    run.start_boss_rush(0, &mut events).expect("start rush");
    run.state.round_score = round_score;
    for _ in 1..phase {
        assert_eq!(run.tick(&mut events), None);
    }
    assert_eq!(run.boss.phase(), Some(phase));
    drain(&mut events);
    (run, events)
}

#[test]
fn scored_hand_is_staged_until_commit() {
    let mut run = RunState::new(GameConfig::default(), 7);
    let mut events = EventBus::default();
    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("start blind");
    assert_eq!(run.state.target, 300);
    assert_eq!(run.hand().len(), 8);

    set_hand(&mut run, full_house_hand());
    run.select(&[0, 1, 2, 3, 4]).expect("select");
    let pending = run.play_hand(&mut events).expect("play");
    assert_eq!(pending.result().hand, HandKind::FullHouse);
    assert_eq!(pending.result().round_increment, 304);
    assert_eq!(run.state.round_score, 0);
    assert_eq!(run.state.phase, Phase::Score);
    assert!(run.has_pending_score());

    let outcome = run.commit_score(pending, &mut events).expect("commit");
    assert_eq!(outcome, Some(BlindOutcome::Cleared));
    assert_eq!(run.state.round_score, 304);
    assert_eq!(run.state.money, 4);
    assert_eq!(run.heat.heat, 25);

    let events = drain(&mut events);
    assert!(events.contains(&Event::TargetCrossed { souls: 0, heat: 25 }));
    assert!(events.contains(&Event::BlindCleared {
        score: 304,
        reward: 4,
        money: 4,
    }));
}

#[test]
fn old_score_tickets_are_rejected() {
    let mut run = RunState::new(GameConfig::default(), 11);
    let mut events = EventBus::default();
    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("start blind");
    run.select(&[0]).expect("select");
    let stale = run.play_hand(&mut events).expect("first play");

    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("restart blind");
    assert!(matches!(
        run.commit_score(stale, &mut events),
        Err(RunError::InvalidPhase(Phase::Play))
    ));

    run.select(&[0]).expect("select");
    let stale = run.play_hand(&mut events).expect("second play");
    let hands_left = run.state.hands_left;
    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("restart blind");
    run.select(&[0]).expect("select");
    let fresh = run.play_hand(&mut events).expect("third play");
    assert!(matches!(
        run.commit_score(stale, &mut events),
        Err(RunError::StaleScore)
    ));
    assert_eq!(run.state.round_score, 0);
    assert_eq!(hands_left, 3);

    run.commit_score(fresh, &mut events).expect("fresh commit");
    assert_eq!(run.state.hands_played, 1);
    assert!(!run.has_pending_score());
}

#[test]
fn boss_blind_pays_souls_once_when_target_is_crossed() {
    let mut run = RunState::new(GameConfig::default(), 3);
    let mut events = EventBus::default();
    run.start_blind(1, BlindKind::Boss, &mut events)
        .expect("start boss blind");
    assert_eq!(run.state.target, 600);
    assert_eq!(run.boss.ability(), Some(BossAbilityKind::DiscardsHeldAfterHand));

    set_hand(&mut run, full_house_hand());
    let outcome = play(&mut run, &[0, 1, 2, 3, 4], &mut events).expect("first hand");
    assert_eq!(outcome, None);
    // The Hook throws away two held cards before the refill.
    let forced: usize = drain(&mut events)
        .iter()
        .filter_map(|event| match event {
            Event::CardsDiscarded { cards, forced: true } => Some(cards.len()),
            _ => None,
        })
        .sum();
    assert_eq!(forced, 2);
    assert_eq!(run.hand().len(), 8);

    let mut second = full_house_hand();
    for (idx, card) in second.iter_mut().enumerate() {
        card.id = CardId(2000 + idx as u32);
    }
    set_hand(&mut run, second);
    let outcome = play(&mut run, &[0, 1, 2, 3, 4], &mut events).expect("second hand");
    assert_eq!(outcome, Some(BlindOutcome::Cleared));
    assert_eq!(run.state.souls, 5);
    let crossings = drain(&mut events)
        .iter()
        .filter(|event| matches!(event, Event::TargetCrossed { .. }))
        .count();
    assert_eq!(crossings, 1);
}

#[test]
fn double_target_fires_exactly_once() {
    let mut run = RunState::new(GameConfig::default(), 5);
    let mut events = EventBus::default();
    run.start_boss_rush(3, &mut events).expect("start rush");
    assert_eq!(run.boss.def().map(|def| def.name.as_str()), Some("Prince Lothric"));
    assert_eq!(run.state.target, 5150);

    for hand in 0..4u32 {
        set_hand(&mut run, weak_hand(hand * 10));
        let outcome = play(&mut run, &[0], &mut events).expect("play");
        if hand < 3 {
            assert_eq!(outcome, None);
        } else {
            assert_eq!(outcome, Some(BlindOutcome::Failed));
        }
        if hand == 2 {
            assert_eq!(run.state.target, 10300);
        }
    }

    let changes: Vec<Event> = drain(&mut events)
        .into_iter()
        .filter(|event| matches!(event, Event::TargetChanged { .. }))
        .collect();
    assert_eq!(changes, vec![Event::TargetChanged { target: 10300 }]);
    assert_eq!(run.state.phase, Phase::Failed);
}

#[test]
fn aggression_discards_after_idle_ticks() {
    let mut run = RunState::new(GameConfig::default(), 9);
    let mut events = EventBus::default();
    run.start_boss_rush(0, &mut events).expect("start rush");
    drain(&mut events);

    for _ in 0..15 {
        assert_eq!(run.tick(&mut events), None);
    }
    assert!(events.is_empty());
    assert_eq!(run.tick(&mut events), None);
    assert_eq!(run.hand().len(), 7);
    assert!(matches!(
        drain(&mut events).as_slice(),
        [Event::CardsDiscarded { forced: true, .. }]
    ));
}

#[test]
fn boss_rush_walks_the_roster_and_ends_in_victory() {
    let roster = vec![
        BossDef::new("Warden", 1, BossAbilityKind::HonorableDuel),
        BossDef::new("Keeper", 1, BossAbilityKind::ReducesHandSize),
    ];
    let mut run = RunState::new(rush_config(roster), 21);
    let mut events = EventBus::default();
    run.start_boss_rush(0, &mut events).expect("start rush");

    assert_eq!(run.max_selection(), 4);
    assert!(matches!(
        run.select(&[0, 1, 2, 3, 4]),
        Err(RunError::InvalidSelection)
    ));
    let outcome = play(&mut run, &[0], &mut events).expect("clear warden");
    assert_eq!(outcome, Some(BlindOutcome::Cleared));
    assert_eq!(run.state.souls, 10);
    assert_eq!(run.state.money, 100);
    assert_eq!(run.state.phase, Phase::Cleared);

    run.next_rush_boss(&mut events).expect("next boss");
    assert_eq!(run.hand().len(), 6);
    let outcome = play(&mut run, &[0], &mut events).expect("clear keeper");
    assert_eq!(outcome, Some(BlindOutcome::Cleared));
    assert_eq!(run.state.souls, 22);
    assert_eq!(run.state.money, 200);
    assert_eq!(run.state.phase, Phase::Won);
    assert!(drain(&mut events).contains(&Event::RushWon { bosses: 2 }));
    assert!(matches!(
        run.next_rush_boss(&mut events),
        Err(RunError::InvalidPhase(Phase::Won))
    ));
}

#[test]
fn rush_index_out_of_range_starts_at_first_boss() {
    let mut run = RunState::new(GameConfig::default(), 1);
    let mut events = EventBus::default();
    run.start_boss_rush(42, &mut events).expect("start rush");
    assert_eq!(run.rush.map(|rush| rush.index), Some(0));
    assert_eq!(run.boss.def().map(|def| def.name.as_str()), Some("Champion Gundyr"));
}

#[test]
fn revive_costs_souls_and_only_works_once_per_blind() {
    let roster = vec![BossDef::new("Wall", 1_000_000, BossAbilityKind::HonorableDuel)];
    let mut run = RunState::new(rush_config(roster), 4);
    let mut events = EventBus::default();
    run.start_boss_rush(0, &mut events).expect("start rush");

    let mut outcome = None;
    for _ in 0..4 {
        outcome = play(&mut run, &[0], &mut events).expect("play");
    }
    assert_eq!(outcome, Some(BlindOutcome::Failed));
    assert!(matches!(
        run.revive(&mut events),
        Err(RunError::NotEnoughSouls { needed: 20, have: 0 })
    ));

    run.state.souls = 25;
    run.revive(&mut events).expect("revive");
    assert_eq!(run.state.souls, 5);
    assert_eq!(run.state.hands_left, 2);
    assert_eq!(run.state.discards_left, 2);
    assert_eq!(run.state.phase, Phase::Play);
    assert_eq!(run.hand().len(), 8);

    play(&mut run, &[0], &mut events).expect("play");
    let outcome = play(&mut run, &[0], &mut events).expect("play");
    assert_eq!(outcome, Some(BlindOutcome::Failed));
    assert!(matches!(run.revive(&mut events), Err(RunError::AlreadyRevived)));
    assert_eq!(run.state.souls, 0);
}

#[test]
fn consumables_level_hands_and_refill_the_inventory() {
    let mut run = RunState::new(GameConfig::default(), 8);
    let mut events = EventBus::default();
    let mut resolver = BuiltinTarots;

    let before = run.levels.stats(HandKind::FullHouse);
    run.add_consumable(Consumable::Planet(Planet::Uranus))
        .expect("add planet");
    run.use_consumable(0, &mut resolver, &mut events)
        .expect("use planet");
    let after = run.levels.stats(HandKind::FullHouse);
    assert_eq!(after.level, before.level + 1);
    assert_eq!(after.chips, before.chips + 35);

    run.add_consumable(Consumable::Tarot(EMPEROR.into()))
        .expect("add emperor");
    run.use_consumable(0, &mut resolver, &mut events)
        .expect("use emperor");
    assert_eq!(run.inventory.consumables.len(), 2);
    assert!(!run.inventory.holds(EMPEROR));
    run.inventory.consumables.clear();

    run.add_consumable(Consumable::Tarot(FOOL.into()))
        .expect("add fool");
    run.use_consumable(0, &mut resolver, &mut events)
        .expect("use fool");
    assert!(run.inventory.holds(EMPEROR));
    assert!(!run.inventory.holds(FOOL));

    run.add_consumable(Consumable::Tarot(JUDGMENT.into()))
        .expect("add judgment");
    let last = run.inventory.consumables.len() - 1;
    run.use_consumable(last, &mut resolver, &mut events)
        .expect("use judgment");
    assert_eq!(run.inventory.jokers.len(), 1);

    let events = drain(&mut events);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ConsumablesCreated { names } if names.len() == 2)));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::JokerCreated { .. })));
    assert!(matches!(
        run.use_consumable(9, &mut resolver, &mut EventBus::default()),
        Err(RunError::Inventory(_))
    ));
}

#[test]
fn heat_tier_two_lifts_the_discard_limit() {
    let mut run = RunState::new(GameConfig::default(), 2);
    let mut events = EventBus::default();
    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("start blind");
    assert!(!run.activate_heat(&mut events));

    let rule = run.config.heat.clone();
    run.heat.gain(100, &rule);
    run.heat.gain(100, &rule);
    assert_eq!(run.heat.level, 2);
    assert!(run.activate_heat(&mut events));
    assert!(!run.activate_heat(&mut events));

    run.state.discards_left = 0;
    run.select(&[0, 1]).expect("select");
    run.discard_selected(&mut events).expect("unlimited discard");
    assert_eq!(run.state.discards_left, 0);
    assert_eq!(run.hand().len(), 8);
    assert!(drain(&mut events).contains(&Event::Heat(HeatTransition::Activated {
        level: 2,
        ticks: 300,
    })));
}

#[test]
fn running_out_of_cards_ends_the_game() {
    let mut run = RunState::new(GameConfig::default(), 6);
    let mut events = EventBus::default();
    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("start blind");
    run.deck.draw.clear();
    run.select(&[0, 1]).expect("select");

    let err = run.discard_selected(&mut events).expect_err("exhausted");
    assert!(err.is_terminal());
    assert_eq!(run.state.phase, Phase::GameOver);
    assert_eq!(run.hand().len(), 8);
    assert!(drain(&mut events)
        .iter()
        .any(|event| matches!(event, Event::GameOver { .. })));
}

#[test]
fn double_target_applies_to_the_hand_that_triggers_it() {
    let roster = vec![BossDef::new("Lothric", 900, BossAbilityKind::DoubleTarget)];
    let mut run = RunState::new(rush_config(roster), 12);
    let mut events = EventBus::default();
    run.start_boss_rush(0, &mut events).expect("start rush");

    for hand in 0..2u32 {
        set_hand(&mut run, relabel(full_house_hand(), hand * 10));
        let outcome = play(&mut run, &[0, 1, 2, 3, 4], &mut events).expect("play");
        assert_eq!(outcome, None);
    }
    assert_eq!(run.state.round_score, 608);

    set_hand(&mut run, relabel(full_house_hand(), 20));
    run.select(&[0, 1, 2, 3, 4]).expect("select");
    let pending = run.play_hand(&mut events).expect("play");
    assert_eq!(run.state.target, 1800);
    let outcome = run.commit_score(pending, &mut events).expect("commit");
    assert_eq!(outcome, None);
    assert_eq!(run.state.round_score, 912);
    assert_eq!(run.state.hands_left, 1);
    assert_eq!(run.state.phase, Phase::Play);
}

#[test]
fn cooling_out_of_tier_three_fails_a_round_with_no_hands() {
    let roster = vec![BossDef::new("Wall", 1_000_000, BossAbilityKind::HonorableDuel)];
    let mut run = RunState::new(rush_config(roster), 13);
    let mut events = EventBus::default();
    run.add_joker(JokerKind::Gauntlet).expect("add gauntlet");
    run.start_boss_rush(0, &mut events).expect("start rush");
    run.heat = HeatState {
        heat: 0,
        level: 3,
        active: true,
        remaining_ticks: 1,
    };

    for _ in 0..2 {
        let outcome = play(&mut run, &[0], &mut events).expect("play");
        assert_eq!(outcome, None);
    }
    assert_eq!(run.state.hands_left, 0);
    assert_eq!(run.state.phase, Phase::Play);

    assert_eq!(run.tick(&mut events), Some(BlindOutcome::Failed));
    assert_eq!(run.heat.level, 2);
    assert_eq!(run.state.phase, Phase::Failed);
    assert!(drain(&mut events).contains(&Event::BlindFailed { score: run.state.round_score }));
}

#[test]
fn gauntlet_spending_the_last_hands_counts_as_the_final_hand() {
    let mut run = RunState::new(GameConfig::default(), 14);
    let mut events = EventBus::default();
    run.add_joker(JokerKind::Gauntlet).expect("add gauntlet");
    run.add_joker(JokerKind::EightOhTwo).expect("add 802");
    run.start_blind(1, BlindKind::Small, &mut events)
        .expect("start blind");
    set_hand(&mut run, weak_hand(0));

    let early = run.preview(&[0]).expect("preview");
    assert!(early.increment_steps.is_empty());

    run.state.hands_left = 2;
    let previewed = run.preview(&[0]).expect("preview");
    run.select(&[0]).expect("select");
    let pending = run.play_hand(&mut events).expect("play");
    let steps = &pending.result().increment_steps;
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].source, EffectSource::Joker(JokerKind::EightOhTwo));
    assert_eq!(steps[0].after, steps[0].before * 2);
    assert_eq!(previewed.round_increment, pending.result().round_increment);
}

#[test]
fn broken_glass_leaves_every_pile() {
    for seed in 0..64 {
        let mut run = RunState::new(GameConfig::default(), seed);
        let mut events = EventBus::default();
        run.start_blind(1, BlindKind::Small, &mut events)
            .expect("start blind");
        let mut cards = full_house_hand();
        cards[0].enhancement = Enhancement::Glass;
        let glass = cards[0].id;
        set_hand(&mut run, cards);
        run.select(&[0, 1, 2, 3, 4]).expect("select");
        let pending = run.play_hand(&mut events).expect("play");
        if pending.result().destroyed_cards.is_empty() {
            continue;
        }

        run.commit_score(pending, &mut events).expect("commit");
        assert!(run.deck.destroyed.iter().any(|card| card.id == glass));
        for pile in [&run.deck.hand, &run.deck.draw, &run.deck.discard] {
            assert!(pile.iter().all(|card| card.id != glass));
        }
        assert!(drain(&mut events).contains(&Event::CardsDestroyed { cards: vec![glass] }));
        return;
    }
    panic!("no seed in range broke the glass card");
}

#[test]
fn third_boss_phase_trims_the_staged_increment() {
    let (mut run, mut events) = phased_boss(15, 600, 3);
    set_hand(&mut run, full_house_hand());
    run.select(&[0, 1, 2, 3, 4]).expect("select");
    let pending = run.play_hand(&mut events).expect("play");
    // floor(304 * 0.95)
    assert_eq!(pending.result().round_increment, 288);

    run.commit_score(pending, &mut events).expect("commit");
    assert_eq!(run.state.round_score, 888);
    assert_eq!(run.boss.phase(), Some(4));
}

#[test]
fn last_boss_phase_throws_out_a_selected_card_before_scoring() {
    for seed in 0..64 {
        let (mut run, mut events) = phased_boss(seed, 900, 4);
        set_hand(&mut run, full_house_hand());
        run.select(&[0, 1, 2, 3, 4]).expect("select");
        let pending = run.play_hand(&mut events).expect("play");
        let log = drain(&mut events);
        let forced = log.iter().position(|event| {
            matches!(event, Event::CardsDiscarded { forced: true, .. })
        });
        let forced = match forced {
            Some(pos) => pos,
            None => continue,
        };
        let scored = log
            .iter()
            .position(|event| matches!(event, Event::HandScored { .. }))
            .expect("hand scored");
        assert!(forced < scored);
        assert_ne!(pending.result().hand, HandKind::FullHouse);
        assert_eq!(run.state.hands_left, 3);
        if let Event::CardsDiscarded { cards, .. } = &log[forced] {
            assert_eq!(cards.len(), 1);
            assert!(run.deck.discard.iter().any(|card| card.id == cards[0]));
        }
        return;
    }
    panic!("no seed in range triggered the phase four discard");
}

#[test]
fn losing_the_only_selected_card_forfeits_without_spending_a_hand() {
    for seed in 0..64 {
        let (mut run, mut events) = phased_boss(seed, 900, 4);
        let card = run.hand()[0];
        run.select(&[0]).expect("select");
        match run.play_hand(&mut events) {
            Err(RunError::HandForfeited) => {}
            Ok(_) => continue,
            Err(err) => panic!("unexpected error: {err}"),
        }

        assert_eq!(run.state.hands_left, 4);
        assert_eq!(run.state.round_score, 900);
        assert_eq!(run.state.phase, Phase::Play);
        assert!(!run.has_pending_score());
        assert!(run.deck.discard.iter().any(|discarded| discarded.id == card.id));
        assert!(drain(&mut events).contains(&Event::CardsDiscarded {
            cards: vec![card.id],
            forced: true,
        }));
        return;
    }
    panic!("no seed in range forfeited the hand");
}
