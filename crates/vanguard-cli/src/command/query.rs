use std::path::PathBuf;

use anyhow::bail;
use vanguard_analysis::{
    profile::Reference,
    query::{Query, QueryKind},
};

use crate::{
    source::{self, EngineArg, FilterArg, SourceArg},
    util::Output,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Kind {
    Descriptive,
    Distribution,
    ClassComparison,
    Correlation,
    HypothesisTests,
    FilteredCount,
    Profile,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct QueryArg {
    /// Statistics to compute
    #[arg(value_enum)]
    kind: Kind,
    /// Player to profile (required by `profile`)
    #[arg(long)]
    player_id: Option<String>,
    /// Population a profiled player is ranked against: `full` or `filtered`
    #[arg(long, default_value_t = Reference::Full)]
    reference: Reference,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    filter: FilterArg,
    #[clap(flatten)]
    source: SourceArg,
    #[clap(flatten)]
    engine: EngineArg,
}

impl QueryArg {
    fn query_kind(&self) -> anyhow::Result<QueryKind> {
        let kind = match self.kind {
            Kind::Descriptive => QueryKind::Descriptive,
            Kind::Distribution => QueryKind::Distribution,
            Kind::ClassComparison => QueryKind::ClassComparison,
            Kind::Correlation => QueryKind::Correlation,
            Kind::HypothesisTests => QueryKind::HypothesisTests,
            Kind::FilteredCount => QueryKind::FilteredCount,
            Kind::Profile => {
                let Some(player_id) = self.player_id.clone() else {
                    bail!("--player-id is required for profile queries");
                };
                QueryKind::Profile {
                    player_id,
                    reference: self.reference,
                }
            }
        };
        Ok(kind)
    }
}

pub(crate) fn run(arg: QueryArg) -> anyhow::Result<()> {
    let query = Query::new(arg.query_kind()?, arg.filter.spec());
    let engine = source::build_engine(&arg.source, &arg.engine)?;
    let response = engine.run(&query)?;
    Output::save_json(&response, arg.output)
}
