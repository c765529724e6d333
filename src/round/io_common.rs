use std::path::Path;

use crate::round::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Splits a response grid header such as `Impact [Project B]` into the
/// category and the project.
pub fn split_grid_header(header: &str) -> Option<(String, String)> {
    let h = header.trim();
    let body = h.strip_suffix(']')?;
    let idx = body.rfind('[')?;
    let category = body[..idx].trim();
    let project = body[idx + 1..].trim();
    if category.is_empty() || project.is_empty() {
        None
    } else {
        Some((category.to_string(), project.to_string()))
    }
}

// Vote columns are never taken for the email column, whatever the project name.
fn find_email_column(header: &[String]) -> Option<usize> {
    header.iter().position(|h| {
        split_grid_header(h).is_none() && h.trim().to_lowercase().contains("email")
    })
}

/// Turns the rows of an exported response sheet into answers.
///
/// The first row is the header. Every other row is one response; every vote
/// cell of that row becomes one answer.
pub fn grid_to_answers(
    path: &str,
    rows: &[Vec<String>],
    cfs: &ResponseSource,
) -> RoundResult<Vec<SubmittedAnswer>> {
    let header = rows.first().context(EmptySheetSnafu { path })?;
    debug!("grid_to_answers: header: {:?}", header);

    let timestamp_idx = cfs.timestamp_column_index()?;
    let email_idx = match cfs.email_column_index()? {
        Some(idx) => Some(idx),
        None => find_email_column(header),
    };
    let first_vote_idx = cfs.first_vote_column_index()?.unwrap_or(0);

    let mut vote_columns: Vec<(usize, String, String)> = Vec::new();
    for (idx, h) in header.iter().enumerate().skip(first_vote_idx) {
        if Some(idx) == email_idx || idx == timestamp_idx {
            continue;
        }
        match split_grid_header(h) {
            Some((category, project)) => vote_columns.push((idx, category, project)),
            None => {
                warn!(
                    "grid_to_answers: {}: column {} ({:?}) is not a vote column, ignoring it",
                    simplify_file_name(path),
                    idx + 1,
                    h
                );
            }
        }
    }
    debug!("grid_to_answers: vote columns: {:?}", vote_columns);
    ensure!(!vote_columns.is_empty(), NoVoteColumnSnafu { path });

    let cell = |row: &Vec<String>, idx: usize| -> Option<String> {
        row.get(idx)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut res: Vec<SubmittedAnswer> = Vec::new();
    for (lineno, row) in rows.iter().enumerate().skip(1) {
        if row.iter().all(|s| s.trim().is_empty()) {
            debug!("grid_to_answers: line {}: empty row", lineno + 1);
            continue;
        }
        let timestamp = cell(row, timestamp_idx);
        let voter_email = email_idx.and_then(|idx| cell(row, idx));
        for (idx, category, project) in vote_columns.iter() {
            res.push(SubmittedAnswer {
                timestamp: timestamp.clone(),
                voter_email: voter_email.clone(),
                ballot: cfs.ballot.clone(),
                category: category.clone(),
                project: project.clone(),
                label: row.get(*idx).cloned().unwrap_or_default(),
            });
        }
    }
    info!(
        "grid_to_answers: {}: {} responses, {} answers",
        simplify_file_name(path),
        rows.len() - 1,
        res.len()
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn grid_headers() {
        assert_eq!(
            split_grid_header("Impact [Project B]"),
            Some(("Impact".to_string(), "Project B".to_string()))
        );
        assert_eq!(
            split_grid_header("  readiness [ Bravo ]  "),
            Some(("readiness".to_string(), "Bravo".to_string()))
        );
        assert_eq!(split_grid_header("Timestamp"), None);
        assert_eq!(split_grid_header("[B]"), None);
    }

    #[test]
    fn answers_from_rows() {
        let rows = vec![
            row(&["Timestamp", "Email Address", "Impact [B]", "Impact [C]", "Comments"]),
            row(&["2024-03-02 10:00", "alice@example.com", "1st (2 pts)", "", "great"]),
            row(&["", "", "", "", ""]),
            row(&["2024-03-02 10:05", "adam@example.com", "2nd (1 pt)"]),
        ];
        let cfs = ResponseSource::new("team:A", "csv", "a.csv");
        let answers = grid_to_answers("a.csv", &rows, &cfs).unwrap();
        assert_eq!(answers.len(), 4);
        assert_eq!(answers[0].project, "B");
        assert_eq!(answers[0].category, "Impact");
        assert_eq!(answers[0].label, "1st (2 pts)");
        assert_eq!(answers[0].voter_email, Some("alice@example.com".to_string()));
        assert_eq!(answers[0].timestamp, Some("2024-03-02 10:00".to_string()));
        assert_eq!(answers[1].label, "");
        // Short rows leave the missing cells empty.
        assert_eq!(answers[3].label, "");
        assert_eq!(answers[3].ballot, "team:A");
    }

    #[test]
    fn project_named_like_the_email_column() {
        let rows = vec![
            row(&["Timestamp", "Impact [Mailbot]", "Impact [Email Helper]"]),
            row(&["2024-03-02 10:00", "2nd (1 pt)", "1st (2 pts)"]),
        ];
        let cfs = ResponseSource::new("public", "csv", "public.csv");
        let answers = grid_to_answers("public.csv", &rows, &cfs).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[1].project, "Email Helper");
        assert_eq!(answers[1].label, "1st (2 pts)");
        assert!(answers.iter().all(|a| a.voter_email.is_none()));
    }

    #[test]
    fn no_vote_column() {
        let rows = vec![row(&["Timestamp", "Name"]), row(&["x", "y"])];
        let cfs = ResponseSource::new("team:A", "csv", "a.csv");
        assert!(grid_to_answers("a.csv", &rows, &cfs).is_err());
    }
}
