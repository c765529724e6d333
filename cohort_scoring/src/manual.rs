/*!

This is the long-form manual for `cohort_scoring` and `cohorttally`.

## Ballots

Every team of the round gets its own ballot. It lists every other team, so that
nobody votes for their own project. Two more ballots list every team: one for
the judges and one for the public. Ballot ids are `team:<team name>`, `judges`
and `public`.

Each ballot is a grid: one row per project and category, one column per rank.
With `N` options, the columns are labelled `1st (N pts)` down to `Nth (1 pt)`.
`cohorttally --emit-ballots` writes these definitions so that a form can be
generated from them.

## Response files

One file per ballot, as exported by the form provider. The first row is the
header. The vote columns are named `<category> [<project>]`, for example:

```text
Timestamp,Email Address,Impact [Bravo],Impact [Charlie],Presentation [Bravo],Presentation [Charlie]
2024-03-02 10:01:00,alice@example.com,1st (2 pts),2nd (1 pt),2nd (1 pt),1st (2 pts)
```

The categories are `impact`, `readiness` and `presentation` (case does not
matter). Empty cells are ignored. A cell that cannot be read is skipped and
counted, the rest of the file is still used.

Supported providers:
* `csv`
* `xlsx` Excel workbook. The worksheet is chosen with `excelWorksheetName`, the
  first worksheet is used otherwise.

## Scoring

Within a cohort, the score of a project is the weighted sum of the mean points
it received in each category: impact 0.4, readiness 0.4, presentation 0.2.
A category with no vote counts as zero.

The final score sums the cohort scores, each multiplied by a weight and a scale
factor. The scale factor brings ballots with more options onto the range of
the team ballots.

| cohort       | weight | scale |
|--------------|--------|-------|
| participants | 0.4    | 1.0   |
| judges       | 0.4    | 0.8   |
| public       | 0.2    | 0.8   |

In the configuration file, the cohorts that are not listed under `cohorts` keep
the values above. In [MergeRules](crate::MergeRules), a cohort without an entry
contributes nothing and the other weights are not renormalized.

## Configuration

The round is described by a JSON file:

```json
{
  "outputSettings": { "roundName": "Spring hackathon", "roundDate": "2024-03-02" },
  "teams": [
    { "name": "Alpha", "members": ["Alice Martin", "Adam Smith"] },
    { "name": "Bravo", "members": ["Bob Stone"] }
  ],
  "directory": { "Alice Martin": "alice@example.com" },
  "cohorts": { "public": { "weight": 0.2, "scale": 0.8 } },
  "categoryWeights": { "impact": 0.4, "readiness": 0.4, "presentation": 0.2 },
  "responseSources": [
    { "ballot": "team:Alpha", "provider": "csv", "filePath": "alpha.csv" }
  ]
}
```

Fields of a response source:
 - `ballot` (string): the id of the ballot the form was made from.
 - `provider` (string): `csv` or `xlsx`.
 - `filePath` (string): relative to the configuration file.
 - `excelWorksheetName` (string, optional).
 - `timestampColumnIndex` (number or column letter, optional, default 1).
 - `emailColumnIndex` (number or column letter, optional).
 - `firstVoteColumnIndex` (number or column letter, optional): the vote
   columns start here. By default, every column with a `<category> [<project>]`
   header is used.

Column indexes start at 1, or `A` in the Excel notation.
 */
