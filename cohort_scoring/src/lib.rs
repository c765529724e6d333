/*!
Ballot assignment and cohort scoring for ranked project votes.

A round goes through these steps:
1. [builder::build_ballots] gives every team a ballot that lists all the
   other teams, plus one judges ballot and one public ballot that list everyone.
2. Each submitted answer carries a rank label such as `1st (4 pts)`
   ([codec]). [intake::decode_answers] turns the answers into [VoteRecord]s and
   sets aside the ones that cannot be used.
3. [aggregate::aggregate] computes a weighted score per project within one cohort.
4. [merge::merge] combines the cohorts into the final ranking.

[tally::tally_round] runs steps 2 to 4 in one call.

```
use cohort_scoring::builder::build_ballots;
use cohort_scoring::intake::SubmittedAnswer;
use cohort_scoring::tally::tally_round;
use cohort_scoring::{Team, TallyRules};
# use cohort_scoring::BallotError;

let set = build_ballots(&[
    Team::new("A", &["alice"]),
    Team::new("B", &["bob"]),
])?;
let answers = vec![SubmittedAnswer {
    timestamp: None,
    voter_email: Some("alice@example.com".to_string()),
    ballot: "team:A".to_string(),
    category: "impact".to_string(),
    project: "B".to_string(),
    label: "1st (1 pt)".to_string(),
}];
let summary = tally_round(&set.ballots, &answers, &TallyRules::default());
assert_eq!(summary.final_scores[0].project, "B");
# Ok::<(), BallotError>(())
```
*/

mod config;

pub mod aggregate;
pub mod builder;
pub mod codec;
pub mod directory;
pub mod intake;
pub mod manual;
pub mod merge;
pub mod tally;

pub use crate::config::*;
