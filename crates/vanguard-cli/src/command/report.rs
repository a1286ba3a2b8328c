use std::path::PathBuf;

use vanguard_analysis::dashboard::{Navigator, View};

use crate::{
    source::{self, EngineArg, FilterArg, SourceArg},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    /// Views to visit in order (every view if omitted)
    #[arg(long = "view", value_name = "VIEW")]
    views: Vec<View>,
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

pub(crate) fn run(arg: ReportArg) -> anyhow::Result<()> {
    let engine = source::build_engine(&arg.source, &arg.engine)?;
    let filter = arg.filter.spec();
    let views = if arg.views.is_empty() {
        View::ALL.to_vec()
    } else {
        arg.views
    };

    let mut output = Output::from_output_path(arg.output)?;
    let mut navigator = Navigator::new();
    for view in views {
        let transition = navigator.navigate(view);
        output.write_line(&format!(
            "## {} [{}]",
            transition.breadcrumb(),
            navigator.progress()
        ))?;
        let response = engine.run(&view.query(filter))?;
        output.write_json(&response)?;
    }

    let progress = navigator.progress();
    if progress.is_complete() {
        eprintln!("Visited every view ({progress})");
    } else {
        eprintln!("Visited {progress} views");
    }
    Ok(())
}
