//! Turning submitted answers into vote records.

use log::{debug, info, warn};
use snafu::prelude::*;
use std::collections::HashMap;

use crate::codec;
use crate::config::*;

/// One cell of a response form: what a voter picked for one project in one
/// category. All the fields are raw text, as exported by the form provider.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SubmittedAnswer {
    pub timestamp: Option<String>,
    pub voter_email: Option<String>,
    /// Id of the ballot the form was generated from.
    pub ballot: String,
    pub category: String,
    pub project: String,
    pub label: String,
}

/// An answer that could not be turned into a record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SkippedAnswer {
    /// Position of the answer in the input.
    pub index: usize,
    pub error: RecordError,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct DecodedAnswers {
    pub records: Vec<VoteRecord>,
    pub skipped: Vec<SkippedAnswer>,
    /// Cells left empty by the voter.
    pub blank: usize,
}

/// Decodes one answer against the ballot it was submitted on.
///
/// Returns `Ok(None)` for an empty cell.
pub fn decode_answer(
    ballot: &Ballot,
    answer: &SubmittedAnswer,
) -> Result<Option<VoteRecord>, RecordError> {
    if answer.label.trim().is_empty() {
        return Ok(None);
    }
    let category = Category::parse(&answer.category).context(UnknownCategorySnafu {
        category: answer.category.clone(),
    })?;
    let project = answer.project.trim();
    ensure!(
        ballot.offers(project),
        UnknownProjectSnafu {
            project,
            ballot: ballot.id.clone(),
        }
    );
    let rp = codec::decode(&answer.label, ballot.options_count()).context(LabelSnafu {
        ballot: ballot.id.clone(),
        project,
    })?;
    Ok(Some(VoteRecord {
        timestamp: answer.timestamp.clone(),
        voter_email: answer
            .voter_email
            .as_ref()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()),
        ballot: ballot.id.clone(),
        cohort: ballot.cohort,
        category,
        project: project.to_string(),
        rank: rp.rank,
        points: rp.points,
    }))
}

/// Decodes a batch of answers.
///
/// A bad answer never stops the batch: it is logged and reported in
/// [DecodedAnswers::skipped].
pub fn decode_answers(ballots: &[Ballot], answers: &[SubmittedAnswer]) -> DecodedAnswers {
    let by_id: HashMap<&str, &Ballot> = ballots.iter().map(|b| (b.id.as_str(), b)).collect();
    let mut res = DecodedAnswers::default();
    for (index, answer) in answers.iter().enumerate() {
        let decoded = by_id
            .get(answer.ballot.as_str())
            .context(UnknownBallotSnafu {
                ballot: answer.ballot.clone(),
            })
            .and_then(|ballot| decode_answer(ballot, answer));
        match decoded {
            Ok(Some(record)) => {
                debug!("decode_answers: {}: {:?}", index, record);
                res.records.push(record);
            }
            Ok(None) => {
                res.blank += 1;
            }
            Err(error) => {
                warn!(
                    "decode_answers: skipping answer {} from {:?}: {}",
                    index, answer.voter_email, error
                );
                res.skipped.push(SkippedAnswer { index, error });
            }
        }
    }
    info!(
        "decode_answers: {} answers: {} records, {} skipped, {} blank",
        answers.len(),
        res.records.len(),
        res.skipped.len(),
        res.blank
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_ballots;

    fn answer(ballot: &str, category: &str, project: &str, label: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            timestamp: Some("2024-03-02 10:00:00".to_string()),
            voter_email: Some(" alice@example.com ".to_string()),
            ballot: ballot.to_string(),
            category: category.to_string(),
            project: project.to_string(),
            label: label.to_string(),
        }
    }

    fn ballots() -> Vec<Ballot> {
        build_ballots(&[
            Team::new("A", &["alice"]),
            Team::new("B", &["bob"]),
            Team::new("C", &["carol"]),
        ])
        .unwrap()
        .ballots
    }

    #[test]
    fn decode_one() {
        let bs = ballots();
        let r = decode_answer(&bs[0], &answer("team:A", " Impact ", "B", "1st (2 pts)"))
            .unwrap()
            .unwrap();
        assert_eq!(r.category, Category::Impact);
        assert_eq!(r.cohort, Cohort::Participants);
        assert_eq!(r.project, "B");
        assert_eq!((r.rank, r.points), (1, 2));
        assert_eq!(r.voter_email, Some("alice@example.com".to_string()));
    }

    #[test]
    fn blank_cell() {
        let bs = ballots();
        assert_eq!(
            decode_answer(&bs[0], &answer("team:A", "impact", "B", "  ")),
            Ok(None)
        );
    }

    #[test]
    fn bad_answers_are_skipped() {
        let bs = ballots();
        let answers = vec![
            answer("team:A", "impact", "B", "1st (2 pts)"),
            // Own team.
            answer("team:A", "impact", "A", "2nd (1 pt)"),
            answer("team:A", "impact", "C", "second"),
            answer("team:Z", "impact", "C", "2nd (1 pt)"),
            answer("judges", "style", "C", "2nd (2 pts)"),
            answer("judges", "PRESENTATION", "C", "2nd (2 pts)"),
            answer("judges", "presentation", "B", ""),
        ];
        let res = decode_answers(&bs, &answers);
        assert_eq!(res.records.len(), 2);
        assert_eq!(res.blank, 1);
        let errors: Vec<(usize, RecordError)> = res
            .skipped
            .iter()
            .map(|s| (s.index, s.error.clone()))
            .collect();
        assert_eq!(
            errors,
            vec![
                (
                    1,
                    RecordError::UnknownProject {
                        project: "A".to_string(),
                        ballot: "team:A".to_string()
                    }
                ),
                (
                    2,
                    RecordError::Label {
                        source: LabelError::UnparsableLabel {
                            label: "second".to_string()
                        },
                        ballot: "team:A".to_string(),
                        project: "C".to_string()
                    }
                ),
                (
                    3,
                    RecordError::UnknownBallot {
                        ballot: "team:Z".to_string()
                    }
                ),
                (
                    4,
                    RecordError::UnknownCategory {
                        category: "style".to_string()
                    }
                ),
            ]
        );
        let judged = &res.records[1];
        assert_eq!(judged.cohort, Cohort::Judges);
        assert_eq!(judged.category, Category::Presentation);
        assert_eq!((judged.rank, judged.points), (2, 2));
    }
}
