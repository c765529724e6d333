use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::*;

/// Combines the scores of several cohorts into the final ranking.
///
/// For each project: `total = sum over cohorts of weight * scale * cohort total`.
///
/// - A project missing from the results of a cohort gets zero for that cohort.
/// - A cohort without a weight contributes zero. The other weights are not
///   renormalized.
/// - A cohort without a scale factor is not rescaled (factor 1).
///
/// The result is sorted by decreasing total, ties broken by project name.
pub fn merge(
    per_cohort: &BTreeMap<Cohort, Vec<WeightedScore>>,
    cohort_weights: &BTreeMap<Cohort, f64>,
    cohort_scale_factors: &BTreeMap<Cohort, f64>,
) -> Vec<FinalScore> {
    let cohorts: BTreeSet<Cohort> = per_cohort
        .keys()
        .chain(cohort_weights.keys())
        .cloned()
        .collect();
    let projects: BTreeSet<&str> = per_cohort
        .values()
        .flat_map(|scores| scores.iter().map(|ws| ws.project.as_str()))
        .collect();
    info!(
        "merge: {} projects across cohorts {:?}",
        projects.len(),
        cohorts
    );

    let raw: BTreeMap<(Cohort, &str), f64> = per_cohort
        .iter()
        .flat_map(|(c, scores)| scores.iter().map(move |ws| ((*c, ws.project.as_str()), ws.total)))
        .collect();

    let mut res: Vec<FinalScore> = projects
        .iter()
        .map(|project| {
            let per_cohort_contribution: BTreeMap<Cohort, f64> = cohorts
                .iter()
                .map(|c| {
                    let weight = cohort_weights.get(c).cloned().unwrap_or(0.0);
                    let scale = cohort_scale_factors.get(c).cloned().unwrap_or(1.0);
                    let value = raw.get(&(*c, *project)).cloned().unwrap_or(0.0);
                    (*c, weight * scale * value)
                })
                .collect();
            let total: f64 = per_cohort_contribution.values().sum();
            debug!(
                "merge: {}: {:?} -> {}",
                project, per_cohort_contribution, total
            );
            FinalScore {
                project: project.to_string(),
                per_cohort_contribution,
                total,
            }
        })
        .collect();
    sort_final_scores(&mut res);
    res
}

pub fn merge_with_rules(
    per_cohort: &BTreeMap<Cohort, Vec<WeightedScore>>,
    rules: &MergeRules,
) -> Vec<FinalScore> {
    merge(per_cohort, &rules.weights(), &rules.scales())
}

/// Decreasing total, then increasing project name.
pub fn sort_final_scores(scores: &mut [FinalScore]) {
    scores.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.project.cmp(&b.project))
    });
}
