use log::info;
use std::collections::BTreeMap;

use crate::aggregate::aggregate_with_weights;
use crate::config::*;
use crate::intake::{decode_answers, SkippedAnswer, SubmittedAnswer};
use crate::merge::merge_with_rules;

/// Everything computed for one round.
#[derive(PartialEq, Debug, Clone)]
pub struct RoundSummary {
    /// Only the cohorts that received at least one vote.
    pub per_cohort: BTreeMap<Cohort, Vec<WeightedScore>>,
    pub final_scores: Vec<FinalScore>,
    pub records: usize,
    pub skipped: Vec<SkippedAnswer>,
    pub blank: usize,
}

/// Scores a closed set of records. Each record is counted in the cohort of
/// the ballot it came from.
pub fn score_records(
    records: &[VoteRecord],
    rules: &TallyRules,
) -> (BTreeMap<Cohort, Vec<WeightedScore>>, Vec<FinalScore>) {
    let mut by_cohort: BTreeMap<Cohort, Vec<VoteRecord>> = BTreeMap::new();
    for r in records.iter() {
        by_cohort.entry(r.cohort).or_default().push(r.clone());
    }
    let per_cohort: BTreeMap<Cohort, Vec<WeightedScore>> = by_cohort
        .iter()
        .map(|(c, rs)| {
            info!("score_records: cohort {}: {} records", c, rs.len());
            (*c, aggregate_with_weights(rs, &rules.category_weights))
        })
        .collect();
    let final_scores = merge_with_rules(&per_cohort, &rules.merge);
    (per_cohort, final_scores)
}

/// Decodes the answers of a round and computes the final ranking.
///
/// Running it twice on the same input gives the same result.
pub fn tally_round(
    ballots: &[Ballot],
    answers: &[SubmittedAnswer],
    rules: &TallyRules,
) -> RoundSummary {
    info!(
        "tally_round: {} ballots, {} answers",
        ballots.len(),
        answers.len()
    );
    let decoded = decode_answers(ballots, answers);
    let (per_cohort, final_scores) = score_records(&decoded.records, rules);
    RoundSummary {
        per_cohort,
        final_scores,
        records: decoded.records.len(),
        skipped: decoded.skipped,
        blank: decoded.blank,
    }
}
