use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::*;

/// Collects the points of every (project, category) pair seen in the records.
///
/// Every category of a project that appears at least once gets an entry,
/// possibly with no values.
pub fn category_scores(records: &[VoteRecord]) -> Vec<ProjectCategoryScore> {
    let mut groups: BTreeMap<&str, BTreeMap<Category, Vec<u32>>> = BTreeMap::new();
    for r in records.iter() {
        let by_category = groups.entry(r.project.as_str()).or_insert_with(|| {
            Category::ALL
                .iter()
                .map(|c| (*c, Vec::new()))
                .collect()
        });
        by_category.entry(r.category).or_default().push(r.points);
    }
    groups
        .into_iter()
        .flat_map(|(project, by_category)| {
            by_category
                .into_iter()
                .map(move |(category, values)| ProjectCategoryScore {
                    project: project.to_string(),
                    category,
                    values,
                })
        })
        .collect()
}

/// Reduces the records of one cohort to one weighted score per project,
/// with the default category weights.
pub fn aggregate(records: &[VoteRecord]) -> Vec<WeightedScore> {
    aggregate_with_weights(records, &CategoryWeights::DEFAULT)
}

/// Reduces the records of one cohort to one weighted score per project.
///
/// The score of a category is the mean of the points it received. A category
/// that received no vote counts as zero, so a project with partial turnout
/// is still ranked. The records must all belong to the same cohort.
///
/// The result is ordered by project name.
pub fn aggregate_with_weights(
    records: &[VoteRecord],
    weights: &CategoryWeights,
) -> Vec<WeightedScore> {
    info!("aggregate: processing {} records", records.len());
    let mut res: BTreeMap<String, WeightedScore> = BTreeMap::new();
    for pcs in category_scores(records) {
        let contribution = pcs.mean() * weights.weight(pcs.category);
        debug!(
            "aggregate: {} {}: values {:?} -> {}",
            pcs.project,
            pcs.category.as_str(),
            pcs.values,
            contribution
        );
        let ws = res
            .entry(pcs.project.clone())
            .or_insert_with(|| WeightedScore {
                project: pcs.project.clone(),
                per_category_contribution: BTreeMap::new(),
                total: 0.0,
            });
        ws.per_category_contribution
            .insert(pcs.category, contribution);
    }
    // Summed in category order so that the totals do not depend on the input order.
    res.into_values()
        .map(|mut ws| {
            ws.total = Category::ALL
                .iter()
                .filter_map(|c| ws.per_category_contribution.get(c))
                .sum();
            ws
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(project: &str, category: Category, points: u32) -> VoteRecord {
        VoteRecord {
            timestamp: None,
            voter_email: None,
            ballot: "judges".to_string(),
            cohort: Cohort::Judges,
            category,
            project: project.to_string(),
            rank: 4 - points,
            points,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn weighted_means() {
        let records = vec![
            record("A", Category::Impact, 3),
            record("A", Category::Impact, 2),
            record("A", Category::Readiness, 1),
            record("A", Category::Presentation, 3),
            record("B", Category::Impact, 1),
        ];
        let res = aggregate(&records);
        assert_eq!(res.len(), 2);
        let a = &res[0];
        assert_eq!(a.project, "A");
        assert!(close(a.per_category_contribution[&Category::Impact], 1.0));
        assert!(close(a.per_category_contribution[&Category::Readiness], 0.4));
        assert!(close(
            a.per_category_contribution[&Category::Presentation],
            0.6
        ));
        assert!(close(a.total, 2.0));
    }

    #[test]
    fn missing_categories_are_zero() {
        let res = aggregate(&[record("B", Category::Impact, 1)]);
        let b = &res[0];
        assert_eq!(b.per_category_contribution.len(), 3);
        assert_eq!(b.per_category_contribution[&Category::Readiness], 0.0);
        assert_eq!(b.per_category_contribution[&Category::Presentation], 0.0);
        assert!(close(b.total, 0.4));
    }

    #[test]
    fn category_groups() {
        let scores = category_scores(&[
            record("B", Category::Presentation, 2),
            record("B", Category::Presentation, 1),
        ]);
        assert_eq!(scores.len(), 3);
        let presentation = scores
            .iter()
            .find(|s| s.category == Category::Presentation)
            .unwrap();
        assert_eq!(presentation.values, vec![2, 1]);
        assert!(close(presentation.mean(), 1.5));
        let impact = scores.iter().find(|s| s.category == Category::Impact).unwrap();
        assert!(impact.values.is_empty());
        assert_eq!(impact.mean(), 0.0);
    }

    #[test]
    fn custom_weights() {
        let weights = CategoryWeights {
            impact: 1.0,
            readiness: 0.0,
            presentation: 0.0,
        };
        let res = aggregate_with_weights(
            &[
                record("A", Category::Impact, 3),
                record("A", Category::Readiness, 3),
            ],
            &weights,
        );
        assert!(close(res[0].total, 3.0));
    }

    #[test]
    fn no_records() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut records = vec![
            record("A", Category::Impact, 3),
            record("B", Category::Readiness, 2),
            record("A", Category::Presentation, 1),
            record("C", Category::Impact, 2),
        ];
        let first = aggregate(&records);
        records.reverse();
        assert_eq!(aggregate(&records), first);
    }
}
