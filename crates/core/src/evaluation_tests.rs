// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn alternative_values(evaluation: &WriteEvaluation) -> Vec<&str> {
    evaluation
        .alternatives
        .iter()
        .map(|a| a.value.as_str())
        .collect()
}

#[test]
fn no_guards_accepts_with_reason() {
    let evaluation = simulate(&[], "price", "100");

    assert_eq!(evaluation.verdict, Verdict::Accept);
    assert_eq!(evaluation.reason, "No guards defined for this key");
    assert!(evaluation.triggered_guards.is_empty());
    assert!(evaluation.alternatives.is_empty());
}

#[test]
fn non_matching_guards_are_ignored() {
    let guards = vec![Guard::range_int("scoreG", "score*", 0, 100)];

    let evaluation = simulate(&guards, "price", "999");

    assert_eq!(evaluation.verdict, Verdict::Accept);
    assert_eq!(evaluation.reason, "No guards defined for this key");
}

#[test]
fn disabled_guards_are_ignored() {
    let mut guard = Guard::range_int("scoreG", "*", 0, 100);
    guard.set_enabled(false);

    let evaluation = simulate(&[guard], "score", "999");

    assert_eq!(evaluation.verdict, Verdict::Accept);
}

#[test]
fn all_passing_guards_accept() {
    let guards = vec![
        Guard::range_int("rangeG", "*", 0, 100),
        Guard::length("lenG", "*", 1, 5),
    ];

    let evaluation = simulate(&guards, "score", "42");

    assert_eq!(evaluation.verdict, Verdict::Accept);
    assert_eq!(evaluation.reason, "All guards passed");
    assert!(evaluation.triggered_guards.is_empty());
}

#[test]
fn reject_short_circuits_later_guards() {
    let guards = vec![
        Guard::range_int("rangeG", "*", 0, 100),
        Guard::length("lenG", "*", 10, 20),
    ];

    // non-integer rejects on the first guard; the length guard would have
    // counter-offered but must not be consulted
    let evaluation = simulate(&guards, "score", "abc");

    assert_eq!(evaluation.verdict, Verdict::Reject);
    assert_eq!(evaluation.reason, "Value is not a valid integer");
    assert_eq!(evaluation.triggered_guards, vec!["rangeG"]);
    assert!(evaluation.alternatives.is_empty());
}

#[test]
fn counter_offer_collects_triggered_guard_names() {
    let guards = vec![Guard::range_int("scoreG", "score*", 0, 100)];

    let evaluation = simulate(&guards, "score", "150");

    assert_eq!(evaluation.verdict, Verdict::CounterOffer);
    assert_eq!(evaluation.triggered_guards, vec!["scoreG"]);
    assert_eq!(alternative_values(&evaluation), vec!["100", "75"]);
}

#[test]
fn multiple_counter_offers_join_reasons() {
    let guards = vec![
        Guard::range_int("rangeG", "*", 0, 10),
        Guard::length("lenG", "*", 3, 8),
    ];

    let evaluation = simulate(&guards, "k", "99");

    assert_eq!(evaluation.verdict, Verdict::CounterOffer);
    assert_eq!(evaluation.triggered_guards, vec!["rangeG", "lenG"]);
    assert_eq!(
        evaluation.reason,
        "Value 99 outside acceptable range [0, 10]; Length 2 outside acceptable range [3, 8]"
    );
}

#[test]
fn alternatives_deduplicate_across_guards_first_wins() {
    let guards = vec![
        Guard::range_int("a", "*", 0, 10),
        Guard::range_int("b", "*", 0, 10),
    ];

    let evaluation = simulate(&guards, "k", "50");

    // both guards offer "10" and "8"; the first guard's copies win
    assert_eq!(alternative_values(&evaluation), vec!["10", "8"]);
}

#[test]
fn accepting_guards_do_not_trigger() {
    let guards = vec![
        Guard::length("lenG", "*", 1, 10),
        Guard::range_int("rangeG", "*", 0, 10),
    ];

    let evaluation = simulate(&guards, "k", "99");

    assert_eq!(evaluation.triggered_guards, vec!["rangeG"]);
}

#[test]
fn simulation_is_deterministic() {
    let guards = vec![Guard::range_int("scoreG", "*", 0, 100)];

    let first = simulate(&guards, "score", "150");
    let second = simulate(&guards, "score", "150");

    assert_eq!(first, second);
}

#[test]
fn verdict_serializes_screaming_snake_case() {
    assert_eq!(
        serde_json::to_value(Verdict::CounterOffer).unwrap(),
        "COUNTER_OFFER"
    );
    assert_eq!(serde_json::to_value(Verdict::Accept).unwrap(), "ACCEPT");
    assert_eq!(serde_json::to_value(Verdict::Reject).unwrap(), "REJECT");
}

#[test]
fn evaluation_serializes_for_external_drivers() {
    let guards = vec![Guard::range_int("scoreG", "score*", 0, 100)];
    let evaluation = simulate(&guards, "score", "150");

    let json = serde_json::to_value(&evaluation).unwrap();

    assert_eq!(json["key"], "score");
    assert_eq!(json["proposed_value"], "150");
    assert_eq!(json["verdict"], "COUNTER_OFFER");
    assert_eq!(json["triggered_guards"][0], "scoreG");
    assert_eq!(json["alternatives"][0]["value"], "100");
}
