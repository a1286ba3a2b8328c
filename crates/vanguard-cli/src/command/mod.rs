use clap::Parser;

use self::{
    explore::ExploreArg, generate_records::GenerateRecordsArg, query::QueryArg, report::ReportArg,
    serve::ServeArg,
};

mod explore;
mod generate_records;
mod query;
mod report;
mod serve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Mode {
    /// Serve the statistics API over HTTP
    Serve(#[clap(flatten)] ServeArg),
    /// Run a single statistics query and print the JSON result
    Query(#[clap(flatten)] QueryArg),
    /// Walk through the dashboard views and print each view's result
    Report(#[clap(flatten)] ReportArg),
    /// Read filters from stdin and print the filtered count for the latest one
    Explore(#[clap(flatten)] ExploreArg),
    /// Generate a synthetic record file
    GenerateRecords(#[clap(flatten)] GenerateRecordsArg),
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { mode } = CommandArgs::parse();
    match mode {
        Mode::Serve(arg) => serve::run(&arg),
        Mode::Query(arg) => query::run(arg),
        Mode::Report(arg) => report::run(arg),
        Mode::Explore(arg) => explore::run(&arg),
        Mode::GenerateRecords(arg) => generate_records::run(&arg),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_query_with_filter() {
        let args = CommandArgs::try_parse_from([
            "vanguard",
            "query",
            "descriptive",
            "--min-light",
            "1800",
            "--max-triumph",
            "9000",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Query(_)));
    }

    #[test]
    fn test_rejects_unknown_view() {
        let result = CommandArgs::try_parse_from(["vanguard", "report", "--view", "settings"]);
        assert!(result.is_err());
    }
}
