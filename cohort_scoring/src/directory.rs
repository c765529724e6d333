//! Matching voters to their contact address.
//!
//! The lookup itself (including any fuzzy matching) is done elsewhere. This
//! module only takes an already resolved `name -> address` map and applies it to
//! the voters of one round.

use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};

use crate::builder::BallotSet;
use crate::config::*;

/// The outcome of the lookup for one round.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoterResolution {
    /// Voter name -> address.
    pub addresses: BTreeMap<String, String>,
    /// Address (lowercase) -> ids of the ballots of that voter.
    pub ballots_by_address: BTreeMap<String, BTreeSet<String>>,
    pub missing: Vec<DirectoryError>,
}

impl VoterResolution {
    /// The ballots a voter may answer, found from the address they submitted with.
    ///
    /// `None` when the address is not known. Such a voter can still vote, but
    /// nothing can be said about their team.
    pub fn ballots_for_address(&self, address: &str) -> Option<&BTreeSet<String>> {
        self.ballots_by_address.get(&address.trim().to_lowercase())
    }
}

/// Resolves all the voters of the per-team ballots.
///
/// Names are matched exactly, after trimming.
pub fn resolve_voters(
    ballot_set: &BallotSet,
    directory: &BTreeMap<String, String>,
) -> VoterResolution {
    let directory: BTreeMap<&str, &str> = directory
        .iter()
        .map(|(name, address)| (name.trim(), address.trim()))
        .filter(|(_, address)| !address.is_empty())
        .collect();
    let mut res = VoterResolution::default();
    for ballot in ballot_set.ballots.iter().filter(|b| !b.is_unrestricted()) {
        for voter in ballot.assigned_voters.iter() {
            match directory.get(voter.as_str()) {
                Some(address) => {
                    res.addresses.insert(voter.clone(), address.to_string());
                    res.ballots_by_address
                        .entry(address.to_lowercase())
                        .or_default()
                        .insert(ballot.id.clone());
                }
                None => {
                    let e = DirectoryError::MissingAddress {
                        voter: voter.clone(),
                        ballot: ballot.id.clone(),
                    };
                    warn!("resolve_voters: {}", e);
                    res.missing.push(e);
                }
            }
        }
    }
    info!(
        "resolve_voters: {} voters resolved, {} missing",
        res.addresses.len(),
        res.missing.len()
    );
    res
}
