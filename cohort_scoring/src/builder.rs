use log::{debug, info, warn};
use snafu::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::codec;
pub use crate::config::*;

/// Ballot id of the judges cohort.
pub const JUDGES_BALLOT: &str = "judges";
/// Ballot id of the public cohort.
pub const PUBLIC_BALLOT: &str = "public";

/// The ballots of one voting round and who votes on which ballot.
///
/// ```
/// use cohort_scoring::builder::build_ballots;
/// use cohort_scoring::Team;
/// # use cohort_scoring::BallotError;
///
/// let set = build_ballots(&[
///     Team::new("Anna's team", &["Anna", "Arthur"]),
///     Team::new("Bob's team", &["Bob"]),
/// ])?;
/// assert_eq!(set.ballots.len(), 4);
///
/// # Ok::<(), BallotError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotSet {
    /// Per-team ballots in roster order, then the judges and the public ballots.
    pub ballots: Vec<Ballot>,
    /// Voter name -> ids of the ballots they were assigned to.
    /// A voter listed in several teams gets several ballots.
    pub assignments: BTreeMap<String, BTreeSet<String>>,
}

impl BallotSet {
    pub fn ballot(&self, id: &str) -> Option<&Ballot> {
        self.ballots.iter().find(|b| b.id == id)
    }

    pub fn ballots_of(&self, voter: &str) -> Vec<&Ballot> {
        match self.assignments.get(voter.trim()) {
            Some(ids) => ids.iter().filter_map(|id| self.ballot(id)).collect(),
            None => Vec::new(),
        }
    }
}

impl Ballot {
    /// The labels of the rank columns, best rank first.
    pub fn rank_labels(&self) -> Vec<RankLabel> {
        codec::labels(self.options_count())
    }
}

pub fn team_ballot_id(team: &str) -> String {
    format!("team:{}", team)
}

/// The marker standing for the voters of an unrestricted ballot.
pub fn cohort_marker(cohort: Cohort) -> String {
    format!("@{}", cohort)
}

/// Builds one ballot per team, plus the judges and the public ballots.
///
/// Every team votes on all the other teams. This requires at least two teams.
pub fn build_ballots(teams: &[Team]) -> Result<BallotSet, BallotError> {
    let names = check_teams(teams)?;
    info!("build_ballots: {} teams", names.len());

    let mut ballots: Vec<Ballot> = Vec::new();
    let mut assignments: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (team, name) in teams.iter().zip(names.iter()) {
        let voting_options: Vec<String> =
            names.iter().filter(|n| *n != name).cloned().collect();
        ensure!(
            !voting_options.is_empty(),
            DegenerateBallotSnafu { team: name.clone() }
        );

        let members = clean_members(team);
        if members.is_empty() {
            warn!("build_ballots: team {} has no members", name);
        }
        let id = team_ballot_id(name);
        for m in members.iter() {
            let e = assignments.entry(m.clone()).or_default();
            if e.iter().any(|other| *other != id) {
                warn!(
                    "build_ballots: voter {} is listed in several teams, also assigned to {}",
                    m, id
                );
            }
            e.insert(id.clone());
        }
        debug!(
            "build_ballots: ballot {}: options {:?} voters {:?}",
            id, voting_options, members
        );
        ballots.push(Ballot {
            id,
            owner_label: name.clone(),
            cohort: Cohort::Participants,
            excluded_team: Some(name.clone()),
            voting_options,
            assigned_voters: members,
        });
    }

    ballots.extend(unrestricted(&names));
    Ok(BallotSet {
        ballots,
        assignments,
    })
}

/// The judges and public ballots alone.
///
/// Unlike the per-team ballots, they can be built with a single team.
pub fn unrestricted_ballots(teams: &[Team]) -> Result<Vec<Ballot>, BallotError> {
    let names = check_teams(teams)?;
    Ok(unrestricted(&names))
}

fn unrestricted(names: &[String]) -> Vec<Ballot> {
    [
        (JUDGES_BALLOT, "Judges", Cohort::Judges),
        (PUBLIC_BALLOT, "Public", Cohort::Public),
    ]
    .iter()
    .map(|(id, label, cohort)| Ballot {
        id: id.to_string(),
        owner_label: label.to_string(),
        cohort: *cohort,
        excluded_team: None,
        voting_options: names.to_vec(),
        assigned_voters: vec![cohort_marker(*cohort)],
    })
    .collect()
}

// Returns the trimmed team names, in order.
fn check_teams(teams: &[Team]) -> Result<Vec<String>, BallotError> {
    ensure!(!teams.is_empty(), EmptyDrawSnafu {});
    let mut seen: HashSet<String> = HashSet::new();
    let mut names: Vec<String> = Vec::new();
    for t in teams.iter() {
        let name = t.name.trim().to_string();
        ensure!(
            seen.insert(name.clone()),
            DuplicateTeamSnafu { name: name.clone() }
        );
        names.push(name);
    }
    Ok(names)
}

// Trimmed, without blanks or repeats, in roster order.
fn clean_members(team: &Team) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for m in team.members.iter() {
        let m = m.trim();
        if m.is_empty() {
            warn!("build_ballots: team {}: dropping a blank member", team.name);
        } else if res.iter().any(|r| r == m) {
            debug!("build_ballots: team {}: {} is listed twice", team.name, m);
        } else {
            res.push(m.to_string());
        }
    }
    res
}
