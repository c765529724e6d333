use log::{debug, info, warn};

use cohort_scoring::builder::{build_ballots, BallotSet};
use cohort_scoring::directory::{resolve_voters, VoterResolution};
use cohort_scoring::intake::SubmittedAnswer;
use cohort_scoring::tally::{tally_round, RoundSummary};
use cohort_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

use crate::round::config_reader::*;
use crate::round::io_common::grid_to_answers;

#[derive(Debug, Snafu)]
pub enum RoundError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the output"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet named {name} in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("{path}: the sheet is empty"))]
    EmptySheet { path: String },
    #[snafu(display("{path}: line {lineno}: unexpected cell {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("{path}: could not read line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("{path}: no column looks like 'category [project]'"))]
    NoVoteColumn { path: String },
    #[snafu(display("Invalid column index {value}"))]
    ParsingColumnIndex { value: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Cannot build the ballots of the round"))]
    Ballots { source: BallotError },
    #[snafu(display("Response source {path} refers to unknown ballot {ballot}"))]
    UnknownSourceBallot { ballot: String, path: String },
    #[snafu(display("Provider not implemented: {provider}"))]
    UnknownProvider { provider: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RoundResult<T> = Result<T, RoundError>;

fn format_score(x: f64) -> String {
    format!("{:.4}", x)
}

fn final_scores_to_json(scores: &[FinalScore]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for (idx, score) in scores.iter().enumerate() {
        let mut row: JSMap<String, JSValue> = JSMap::new();
        row.insert("rank".to_string(), json!((idx + 1).to_string()));
        row.insert("project".to_string(), json!(score.project));
        for cohort in Cohort::ALL {
            let value = score
                .per_cohort_contribution
                .get(&cohort)
                .cloned()
                .unwrap_or(0.0);
            row.insert(cohort.to_string(), json!(format_score(value)));
        }
        row.insert("total".to_string(), json!(format_score(score.total)));
        l.push(JSValue::Object(row));
    }
    l
}

fn build_summary_js(config: &RoundConfig, summary: &RoundSummary) -> JSValue {
    let c = OutputConfig {
        round: config.output_settings.round_name.clone(),
        date: config.output_settings.round_date.clone(),
    };
    json!({
        "config": c,
        "results": final_scores_to_json(&summary.final_scores),
        "records": summary.records.to_string(),
        "skipped": summary.skipped.len().to_string(),
    })
}

fn build_ballots_js(ballot_set: &BallotSet, resolution: &VoterResolution) -> RoundResult<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for ballot in ballot_set.ballots.iter() {
        let mut js = serde_json::to_value(ballot).context(WritingJsonSnafu {})?;
        let labels: Vec<String> = ballot.rank_labels().iter().map(|l| l.text.clone()).collect();
        js["rankLabels"] = json!(labels);
        let addresses: Vec<&String> = ballot
            .assigned_voters
            .iter()
            .filter_map(|v| resolution.addresses.get(v))
            .collect();
        js["voterAddresses"] = json!(addresses);
        l.push(js);
    }
    Ok(json!({ "ballots": l }))
}

fn write_output(dest: &str, js: &JSValue) -> RoundResult<()> {
    let pretty = serde_json::to_string_pretty(js).context(WritingJsonSnafu {})?;
    if dest == "stdout" {
        println!("{}", pretty);
    } else {
        info!("Writing {}", dest);
        fs::write(dest, pretty).context(WritingFileSnafu { path: dest })?;
    }
    Ok(())
}

fn read_responses(
    root_path: &Path,
    cfs: &ResponseSource,
    ballot_set: &BallotSet,
) -> RoundResult<Vec<SubmittedAnswer>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read response file {:?}", p2);
    ensure!(
        ballot_set.ballot(&cfs.ballot).is_some(),
        UnknownSourceBallotSnafu {
            ballot: cfs.ballot.clone(),
            path: p2.clone()
        }
    );
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_responses(&p2, cfs),
        "xlsx" => io_xlsx::read_xlsx_responses(&p2, cfs),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

// Answers on a team ballot that come from a known address of another team.
fn check_voters(answers: &[SubmittedAnswer], resolution: &VoterResolution) {
    for a in answers.iter() {
        if let Some(email) = &a.voter_email {
            if let Some(ballots) = resolution.ballots_for_address(email) {
                if a.ballot.starts_with("team:") && !ballots.contains(&a.ballot) {
                    warn!(
                        "check_voters: {} answered ballot {} but is assigned to {:?}",
                        email, a.ballot, ballots
                    );
                }
            }
        }
    }
}

/// The options of one run of the program.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunOptions {
    pub out: Option<String>,
    pub reference: Option<String>,
    pub emit_ballots: Option<String>,
}

/// Runs a full round: ballots, responses, scores and summary.
///
/// Returns the summary in JSON.
pub fn run_round(config_path: &str, options: &RunOptions) -> RoundResult<JSValue> {
    let config = read_config(config_path)?;
    info!("config: {:?}", config.output_settings);
    let rules = config.tally_rules();
    debug!("rules: {:?}", rules);

    let ballot_set = build_ballots(&config.teams).context(BallotsSnafu {})?;
    let resolution = match &config.directory {
        Some(directory) => resolve_voters(&ballot_set, directory),
        None => VoterResolution::default(),
    };

    if let Some(dest) = &options.emit_ballots {
        write_output(dest, &build_ballots_js(&ballot_set, &resolution)?)?;
    }

    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    let mut answers: Vec<SubmittedAnswer> = Vec::new();
    for cfs in config.response_sources.iter() {
        let mut file_answers = read_responses(root_p, cfs, &ballot_set)?;
        answers.append(&mut file_answers);
    }
    if config.response_sources.is_empty() {
        warn!("No response sources in {}", config_path);
    }
    check_voters(&answers, &resolution);

    let summary = tally_round(&ballot_set.ballots, &answers, &rules);
    for s in summary.skipped.iter() {
        debug!("skipped answer {}: {}", s.index, s.error);
    }
    info!(
        "{} records counted, {} answers skipped",
        summary.records,
        summary.skipped.len()
    );
    for (idx, score) in summary.final_scores.iter().enumerate() {
        info!(
            "{:>3} {:<30} {}",
            idx + 1,
            score.project,
            format_score(score.total)
        );
    }

    let result_js = build_summary_js(&config, &summary);
    let dest = options
        .out
        .clone()
        .or_else(|| config.output_settings.output_path.clone())
        .unwrap_or_else(|| "stdout".to_string());
    write_output(&dest, &result_js)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &options.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
        let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}
