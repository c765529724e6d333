use std::collections::BTreeMap;

use cohort_scoring::aggregate::aggregate;
use cohort_scoring::builder::{build_ballots, team_ballot_id};
use cohort_scoring::codec;
use cohort_scoring::intake::{decode_answers, SubmittedAnswer};
use cohort_scoring::merge::merge;
use cohort_scoring::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn teams() -> Vec<Team> {
    vec![
        Team::new("A", &["alice", "adam"]),
        Team::new("B", &["bob"]),
        Team::new("C", &["carol"]),
    ]
}

fn impact(ballot: &str, voter: &str, project: &str, rank: u32) -> SubmittedAnswer {
    SubmittedAnswer {
        timestamp: None,
        voter_email: Some(format!("{}@example.com", voter)),
        ballot: team_ballot_id(ballot),
        category: "Impact".to_string(),
        project: project.to_string(),
        label: codec::encode(rank, 2).unwrap().text,
    }
}

fn answers() -> Vec<SubmittedAnswer> {
    vec![
        impact("A", "alice", "B", 1),
        impact("A", "alice", "C", 2),
        impact("B", "bob", "A", 1),
        impact("B", "bob", "C", 2),
        impact("C", "carol", "A", 2),
        impact("C", "carol", "B", 1),
    ]
}

fn participants_only(scores: Vec<WeightedScore>) -> Vec<FinalScore> {
    let per_cohort: BTreeMap<Cohort, Vec<WeightedScore>> =
        [(Cohort::Participants, scores)].into_iter().collect();
    let weights: BTreeMap<Cohort, f64> = [(Cohort::Participants, 1.0)].into_iter().collect();
    let scales: BTreeMap<Cohort, f64> = [(Cohort::Participants, 1.0)].into_iter().collect();
    merge(&per_cohort, &weights, &scales)
}

#[test]
fn three_teams() {
    init();
    let set = build_ballots(&teams()).unwrap();
    assert_eq!(set.ballot("team:A").unwrap().voting_options, vec!["B", "C"]);
    assert_eq!(set.ballot("team:B").unwrap().voting_options, vec!["A", "C"]);
    assert_eq!(set.ballot("team:C").unwrap().voting_options, vec!["A", "B"]);

    let decoded = decode_answers(&set.ballots, &answers());
    assert!(decoded.skipped.is_empty());
    assert_eq!(decoded.records.len(), 6);

    let scores = aggregate(&decoded.records);
    let totals: Vec<(&str, f64)> = scores
        .iter()
        .map(|ws| (ws.project.as_str(), ws.total))
        .collect();
    let expected = [("A", 0.6), ("B", 0.8), ("C", 0.4)];
    assert_eq!(totals.len(), expected.len());
    for ((p, t), (ep, et)) in totals.iter().zip(expected.iter()) {
        assert_eq!(p, ep);
        assert!((t - et).abs() < 1e-9, "{}: {} != {}", p, t, et);
    }

    let finals = participants_only(scores);
    let order: Vec<&str> = finals.iter().map(|f| f.project.as_str()).collect();
    assert_eq!(order, vec!["B", "A", "C"]);
}

#[test]
fn recomputing_gives_the_same_scores() {
    init();
    let set = build_ballots(&teams()).unwrap();
    let run = || {
        let decoded = decode_answers(&set.ballots, &answers());
        participants_only(aggregate(&decoded.records))
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.total.to_bits(), b.total.to_bits());
    }
}

#[test]
fn one_bad_answer_does_not_drop_the_cohort() {
    init();
    let set = build_ballots(&teams()).unwrap();
    let mut all = answers();
    all.push(SubmittedAnswer {
        label: "top".to_string(),
        ..impact("B", "bob", "A", 1)
    });
    let decoded = decode_answers(&set.ballots, &all);
    assert_eq!(decoded.skipped.len(), 1);
    assert_eq!(decoded.skipped[0].index, 6);
    assert_eq!(decoded.records.len(), 6);
}
