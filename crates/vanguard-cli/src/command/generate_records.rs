use std::path::PathBuf;

use chrono::Utc;
use vanguard_analysis::{
    record::RecordCollection,
    sample::{self, SampleConfig},
};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateRecordsArg {
    /// Number of records to generate
    #[arg(long, default_value_t = 1000)]
    num_records: usize,
    /// Random seed
    #[arg(long, default_value_t = SampleConfig::default().seed)]
    seed: u64,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateRecordsArg) -> anyhow::Result<()> {
    let GenerateRecordsArg {
        num_records,
        seed,
        output,
    } = arg;
    eprintln!("Generating {num_records} records (seed {seed})...");
    let collection = RecordCollection {
        generated_at: Some(Utc::now()),
        records: sample::generate(SampleConfig {
            num_records: *num_records,
            seed: *seed,
        }),
    };
    let mut output = Output::from_output_path(output.clone())?;
    output.write_json(&collection)?;
    eprintln!("Records written to {}", output.display_path());
    Ok(())
}
