use ashen_core::{classify, Card, CardId, Enhancement, HandKind, Rank, Suit};
use proptest::prelude::*;

fn parse_card(idx: usize, spec: &str) -> Card {
    let (body, enhancement) = match spec.strip_suffix('*') {
        Some(body) => (body, Enhancement::Wild),
        None => (spec, Enhancement::Basic),
    };
    let (rank, suit) = body.split_at(body.len() - 1);
    let rank = match rank {
        "A" => Rank::Ace,
        "K" => Rank::King,
        "Q" => Rank::Queen,
        "J" => Rank::Jack,
        other => other
            .parse::<u8>()
            .ok()
            .and_then(Rank::from_value)
            .unwrap_or_else(|| panic!("bad rank in {spec}")),
    };
    let suit = match suit {
        "S" => Suit::Spades,
        "H" => Suit::Hearts,
        "D" => Suit::Diamonds,
        "C" => Suit::Clubs,
        _ => panic!("bad suit in {spec}"),
    };
    Card::new(CardId(idx as u32 + 1), suit, rank).with_enhancement(enhancement)
}

fn hand(specs: &str) -> Vec<Card> {
    specs
        .split_whitespace()
        .enumerate()
        .map(|(idx, spec)| parse_card(idx, spec))
        .collect()
}

macro_rules! classify_case {
    ($name:ident, $cards:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(classify(&hand($cards)), $expected);
        }
    };
}

classify_case!(single_card_high, "7H", HandKind::HighCard);
classify_case!(high_card_five, "AS KH 9D 5C 3S", HandKind::HighCard);
classify_case!(pair_of_kings, "KS KH 9D 5C 3S", HandKind::Pair);
classify_case!(two_pair, "KS KH 9D 9C 3S", HandKind::TwoPair);
classify_case!(trips, "7S 7H 7D 5C 3S", HandKind::Trips);
classify_case!(straight_mixed, "5S 6H 7D 8C 9S", HandKind::Straight);
classify_case!(wheel_straight, "AS 2H 3D 4C 5S", HandKind::Straight);
classify_case!(no_wraparound, "QS KH AD 2C 3S", HandKind::HighCard);
classify_case!(four_cards_no_straight, "5S 6H 7D 8C", HandKind::HighCard);
classify_case!(flush, "2H 7H 9H JH KH", HandKind::Flush);
classify_case!(full_house, "10S 10H 10D 3C 3S", HandKind::FullHouse);
classify_case!(quads, "9S 9H 9D 9C 2S", HandKind::Quads);
classify_case!(straight_flush, "5D 6D 7D 8D 9D", HandKind::StraightFlush);
classify_case!(steel_wheel, "AC 2C 3C 4C 5C", HandKind::StraightFlush);
classify_case!(royal_flush, "10S JS QS KS AS", HandKind::RoyalFlush);
classify_case!(flush_house, "8H 8H 8H 4H 4H", HandKind::FlushHouse);
classify_case!(wild_flush, "2S 5S 9S JS KH*", HandKind::Flush);
classify_case!(wild_royal, "10H JH QH KH AD*", HandKind::RoyalFlush);
classify_case!(wild_keeps_rank, "KS KH* 9D 5C 3S", HandKind::Pair);

fn any_card() -> impl Strategy<Value = (usize, usize)> {
    (0usize..13, 0usize..4)
}

fn build(specs: &[(usize, usize)]) -> Vec<Card> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, &(rank, suit))| Card::new(CardId(idx as u32 + 1), Suit::ALL[suit], Rank::ALL[rank]))
        .collect()
}

proptest! {
    #[test]
    fn classification_ignores_card_order(
        specs in prop::collection::vec(any_card(), 1..=5),
        rotate in 0usize..5,
    ) {
        let cards = build(&specs);
        let mut rotated = cards.clone();
        rotated.rotate_left(rotate % cards.len());
        rotated.reverse();
        prop_assert_eq!(classify(&cards), classify(&rotated));
    }

    #[test]
    fn classification_ignores_suit_names(
        specs in prop::collection::vec(any_card(), 1..=5),
        shift in 1usize..4,
    ) {
        let cards = build(&specs);
        let relabeled: Vec<(usize, usize)> = specs
            .iter()
            .map(|&(rank, suit)| (rank, (suit + shift) % 4))
            .collect();
        prop_assert_eq!(classify(&cards), classify(&build(&relabeled)));
    }

    #[test]
    fn every_hand_lands_in_one_known_category(
        specs in prop::collection::vec(any_card(), 1..=5),
    ) {
        let kind = classify(&build(&specs));
        prop_assert!(HandKind::ALL.contains(&kind));
        if specs.len() < 5 {
            prop_assert!(kind.tier() <= HandKind::Quads.tier());
            prop_assert!(kind != HandKind::Straight && kind != HandKind::Flush);
        }
    }
}
