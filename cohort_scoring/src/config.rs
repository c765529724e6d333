// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::collections::BTreeMap;
use std::fmt::Display;

/// A team taking part in the round, as produced by the draw.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<String>,
}

impl Team {
    pub fn new(name: &str, members: &[&str]) -> Team {
        Team {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// The classes of voters. Every per-team ballot feeds the participants cohort.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Participants,
    Judges,
    Public,
}

impl Cohort {
    pub const ALL: [Cohort; 3] = [Cohort::Participants, Cohort::Judges, Cohort::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::Participants => "participants",
            Cohort::Judges => "judges",
            Cohort::Public => "public",
        }
    }
}

impl Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The judging criteria. This is a closed set: free text from a form is
/// normalized with [Category::parse] before it reaches the aggregator.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Impact,
    Readiness,
    Presentation,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Impact, Category::Readiness, Category::Presentation];

    /// Case and whitespace insensitive.
    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "impact" => Some(Category::Impact),
            "readiness" => Some(Category::Readiness),
            "presentation" => Some(Category::Presentation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Impact => "impact",
            Category::Readiness => "readiness",
            Category::Presentation => "presentation",
        }
    }
}

/// A ballot: the options offered to one group of voters.
///
/// Invariants (enforced by the builder):
/// - `excluded_team` is never one of the `voting_options`
/// - `voting_options` is never empty
/// - unrestricted ballots have no excluded team and offer every team
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub id: String,
    pub owner_label: String,
    pub cohort: Cohort,
    pub excluded_team: Option<String>,
    /// In roster order. Names are unique.
    pub voting_options: Vec<String>,
    pub assigned_voters: Vec<String>,
}

impl Ballot {
    /// The number of ranks on this ballot.
    pub fn options_count(&self) -> u32 {
        self.voting_options.len() as u32
    }

    pub fn offers(&self, project: &str) -> bool {
        self.voting_options.iter().any(|p| p == project)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.excluded_team.is_none()
    }
}

/// The display form of a rank, carrying its point value.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct RankLabel {
    pub rank: u32,
    pub points: u32,
    pub text: String,
}

impl Display for RankLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// One voter's choice for one project in one category.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub timestamp: Option<String>,
    pub voter_email: Option<String>,
    pub ballot: String,
    pub cohort: Cohort,
    pub category: Category,
    pub project: String,
    pub rank: u32,
    pub points: u32,
}

// ******** Output data structures *********

/// The points collected for one project in one category, within one cohort.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectCategoryScore {
    pub project: String,
    pub category: Category,
    pub values: Vec<u32>,
}

impl ProjectCategoryScore {
    /// The arithmetic mean of the points. An empty group is worth zero.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            let sum: u64 = self.values.iter().map(|v| *v as u64).sum();
            sum as f64 / self.values.len() as f64
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScore {
    pub project: String,
    pub per_category_contribution: BTreeMap<Category, f64>,
    pub total: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    pub project: String,
    pub per_cohort_contribution: BTreeMap<Cohort, f64>,
    pub total: f64,
}

// ********* Configuration **********

/// The weight of each category in a cohort's score.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub impact: f64,
    pub readiness: f64,
    pub presentation: f64,
}

impl CategoryWeights {
    pub const DEFAULT: CategoryWeights = CategoryWeights {
        impact: 0.4,
        readiness: 0.4,
        presentation: 0.2,
    };

    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Impact => self.impact,
            Category::Readiness => self.readiness,
            Category::Presentation => self.presentation,
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        CategoryWeights::DEFAULT
    }
}

/// How much a cohort counts in the final score, and the factor that brings
/// its points onto the reference range.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CohortRule {
    pub weight: f64,
    pub scale: f64,
}

/// The configuration of the final merge.
///
/// The participants cohort is the reference range. The judges and public
/// ballots offer one more option than a team ballot, hence the 4/5 scale.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MergeRules {
    pub cohorts: BTreeMap<Cohort, CohortRule>,
}

impl MergeRules {
    pub const PARTICIPANTS: CohortRule = CohortRule {
        weight: 0.4,
        scale: 1.0,
    };
    pub const JUDGES: CohortRule = CohortRule {
        weight: 0.4,
        scale: 0.8,
    };
    pub const PUBLIC: CohortRule = CohortRule {
        weight: 0.2,
        scale: 0.8,
    };

    pub fn weights(&self) -> BTreeMap<Cohort, f64> {
        self.cohorts
            .iter()
            .map(|(c, rule)| (*c, rule.weight))
            .collect()
    }

    pub fn scales(&self) -> BTreeMap<Cohort, f64> {
        self.cohorts
            .iter()
            .map(|(c, rule)| (*c, rule.scale))
            .collect()
    }
}

impl Default for MergeRules {
    fn default() -> Self {
        MergeRules {
            cohorts: [
                (Cohort::Participants, MergeRules::PARTICIPANTS),
                (Cohort::Judges, MergeRules::JUDGES),
                (Cohort::Public, MergeRules::PUBLIC),
            ]
            .into_iter()
            .collect(),
        }
    }
}

/// All the parameters of a round tally.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TallyRules {
    pub category_weights: CategoryWeights,
    pub merge: MergeRules,
}

// ********* Errors **********

/// Errors about the shape of the draw. These are fatal.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BallotError {
    #[snafu(display("no teams were supplied for the draw"))]
    EmptyDraw {},
    #[snafu(display("team {team} would get a ballot with no options: voting needs at least 2 teams"))]
    DegenerateBallot { team: String },
    #[snafu(display("team name {name} appears more than once in the draw"))]
    DuplicateTeam { name: String },
}

#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LabelError {
    #[snafu(display("label {label:?} does not start with a rank"))]
    UnparsableLabel { label: String },
    #[snafu(display("rank {rank} is outside of 1..={n}"))]
    RankOutOfRange { rank: u32, n: u32 },
}

/// Errors about a single submitted answer. The answer is dropped and the
/// rest of the batch carries on.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RecordError {
    #[snafu(display("answer for {project} on ballot {ballot}: {source}"))]
    Label {
        source: LabelError,
        ballot: String,
        project: String,
    },
    #[snafu(display("project {project} is not an option of ballot {ballot}"))]
    UnknownProject { project: String, ballot: String },
    #[snafu(display("no ballot with id {ballot}"))]
    UnknownBallot { ballot: String },
    #[snafu(display("unknown category {category:?}"))]
    UnknownCategory { category: String },
}

/// Informational: the voter can still vote.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DirectoryError {
    #[snafu(display("no address found for voter {voter} (ballot {ballot})"))]
    MissingAddress { voter: String, ballot: String },
}
