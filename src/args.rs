use clap::Parser;

/// Builds the ballots of a team voting round and tallies the ranked votes of all the cohorts.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file describing the round: teams, cohorts and response files.
    /// For more information about the file format, read the documentation of the
    /// `cohort_scoring::manual` module.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path or 'stdout') If specified, the summary of the round will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided, cohorttally will
    /// check that the tallied output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path or 'stdout') If specified, the ballot definitions (options, voters and rank labels) will
    /// be written in JSON format to the given location, for generating the voting forms.
    #[clap(long, value_parser)]
    pub emit_ballots: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
