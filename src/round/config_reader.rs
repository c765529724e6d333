use crate::round::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::BTreeMap;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "roundName")]
    pub round_name: String,
    #[serde(rename = "roundDate")]
    pub round_date: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub round: String,
    pub date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSource {
    pub ballot: String,
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "timestampColumnIndex")]
    _timestamp_column_index: Option<JSValue>,
    #[serde(rename = "emailColumnIndex")]
    _email_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
}

impl ResponseSource {
    #[cfg(test)]
    pub fn new(ballot: &str, provider: &str, file_path: &str) -> ResponseSource {
        ResponseSource {
            ballot: ballot.to_string(),
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            excel_worksheet_name: None,
            _timestamp_column_index: None,
            _email_column_index: None,
            _first_vote_column_index: None,
        }
    }

    /// 0-based. The first column by default.
    pub fn timestamp_column_index(&self) -> RoundResult<usize> {
        Ok(read_column_index(&self._timestamp_column_index)?.unwrap_or(0))
    }

    /// 0-based.
    pub fn email_column_index(&self) -> RoundResult<Option<usize>> {
        read_column_index(&self._email_column_index)
    }

    /// 0-based.
    pub fn first_vote_column_index(&self) -> RoundResult<Option<usize>> {
        read_column_index(&self._first_vote_column_index)
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CohortSettings {
    pub participants: Option<CohortRule>,
    pub judges: Option<CohortRule>,
    pub public: Option<CohortRule>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub teams: Vec<Team>,
    pub directory: Option<BTreeMap<String, String>>,
    pub cohorts: Option<CohortSettings>,
    #[serde(rename = "categoryWeights")]
    pub category_weights: Option<CategoryWeights>,
    #[serde(rename = "responseSources", default)]
    pub response_sources: Vec<ResponseSource>,
}

impl RoundConfig {
    /// The engine parameters. Anything not in the file keeps its default.
    pub fn tally_rules(&self) -> TallyRules {
        let mut merge = MergeRules::default();
        if let Some(cs) = &self.cohorts {
            for (cohort, rule) in [
                (Cohort::Participants, cs.participants),
                (Cohort::Judges, cs.judges),
                (Cohort::Public, cs.public),
            ] {
                if let Some(rule) = rule {
                    merge.cohorts.insert(cohort, rule);
                }
            }
        }
        TallyRules {
            category_weights: self.category_weights.unwrap_or_default(),
            merge,
        }
    }
}

pub fn read_config(path: &str) -> RoundResult<RoundConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: RoundConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> RoundResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

// Column indexes are 1-based numbers or Excel letters.
fn read_column_index(x: &Option<JSValue>) -> RoundResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => match n.as_u64() {
            Some(i) if i >= 1 => Ok(Some((i - 1) as usize)),
            _ => ParsingColumnIndexSnafu {
                value: n.to_string(),
            }
            .fail(),
        },
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            let col = s
                .to_ascii_uppercase()
                .chars()
                .try_fold(0usize, |acc, c| {
                    acc.checked_mul(26)?
                        .checked_add(c as usize - 'A' as usize + 1)
                })
                .context(ParsingColumnIndexSnafu { value: s.clone() })?;
            Ok(Some(col - 1))
        }
        Some(JSValue::String(s)) => match s.trim().parse::<usize>() {
            Ok(i) if i >= 1 => Ok(Some(i - 1)),
            _ => ParsingColumnIndexSnafu { value: s.clone() }.fail(),
        },
        Some(v) => ParsingColumnIndexSnafu {
            value: v.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn column_indexes() {
        assert_eq!(read_column_index(&None).unwrap(), None);
        assert_eq!(read_column_index(&Some(json!(3))).unwrap(), Some(2));
        assert_eq!(read_column_index(&Some(json!("3"))).unwrap(), Some(2));
        assert_eq!(read_column_index(&Some(json!("A"))).unwrap(), Some(0));
        assert_eq!(read_column_index(&Some(json!("c"))).unwrap(), Some(2));
        assert_eq!(read_column_index(&Some(json!("AA"))).unwrap(), Some(26));
        assert!(read_column_index(&Some(json!(0))).is_err());
        assert!(read_column_index(&Some(json!("B2"))).is_err());
        assert!(read_column_index(&Some(json!(true))).is_err());
        assert!(matches!(
            read_column_index(&Some(json!("ZZZZZZZZZZZZZZZ"))),
            Err(RoundError::ParsingColumnIndex { .. })
        ));
    }

    #[test]
    fn rules_from_config() {
        let config: RoundConfig = serde_json::from_value(json!({
            "outputSettings": {"roundName": "test"},
            "teams": [{"name": "A", "members": ["alice"]}],
            "cohorts": {"public": {"weight": 0.0, "scale": 1.0}},
            "categoryWeights": {"impact": 1.0, "readiness": 0.0, "presentation": 0.0}
        }))
        .unwrap();
        let rules = config.tally_rules();
        assert_eq!(rules.category_weights.impact, 1.0);
        assert_eq!(
            rules.merge.cohorts[&Cohort::Public],
            CohortRule {
                weight: 0.0,
                scale: 1.0
            }
        );
        assert_eq!(rules.merge.cohorts[&Cohort::Judges], MergeRules::JUDGES);
        assert!(config.response_sources.is_empty());
    }
}
