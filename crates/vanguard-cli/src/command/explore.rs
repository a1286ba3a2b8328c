//! Interactive filtering over stdin.
//!
//! Each input line holds filter parameters such as
//! `min_light=1800 max_triumph=90000`. Lines are answered by a worker thread
//! in the order they arrive, and a result is printed only if no newer line was
//! read while it was being computed.

use std::{
    io::{self, BufRead as _},
    sync::{Arc, mpsc},
    thread,
};

use anyhow::Context as _;
use vanguard_analysis::{
    dashboard::{Generation, Generations},
    filter::{FilterError, FilterSpec},
    query::{Query, QueryKind, StatisticsEngine},
};

use crate::{
    source::{self, EngineArg, SourceArg},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExploreArg {
    #[clap(flatten)]
    source: SourceArg,
    #[clap(flatten)]
    engine: EngineArg,
}

pub(crate) fn run(arg: &ExploreArg) -> anyhow::Result<()> {
    let engine = source::build_engine(&arg.source, &arg.engine)?;
    let generations = Arc::new(Generations::new());
    let (sender, receiver) = mpsc::channel::<(Generation, FilterSpec)>();

    let worker = {
        let generations = Arc::clone(&generations);
        thread::spawn(move || answer_requests(&engine, &generations, &receiver))
    };

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read filter from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let filter = match parse_filter_line(&line) {
            Ok(filter) => filter,
            Err(err) => {
                eprintln!("Invalid filter: {err}");
                continue;
            }
        };
        let generation = generations.issue();
        if sender.send((generation, filter)).is_err() {
            break;
        }
    }
    drop(sender);

    match worker.join() {
        Ok(result) => result,
        Err(_) => anyhow::bail!("Explore worker panicked"),
    }
}

fn answer_requests(
    engine: &StatisticsEngine,
    generations: &Generations,
    receiver: &mpsc::Receiver<(Generation, FilterSpec)>,
) -> anyhow::Result<()> {
    let mut output = Output::stdout();
    for (generation, filter) in receiver {
        let result = engine.run(&Query::new(QueryKind::FilteredCount, filter));
        if !generations.accept(generation) {
            continue;
        }
        match result {
            Ok(response) => output.write_json_line(&response)?,
            Err(err) => eprintln!("Query {generation} failed: {err}"),
        }
    }
    Ok(())
}

/// Parses whitespace-separated `name=value` pairs into a filter.
fn parse_filter_line(line: &str) -> Result<FilterSpec, FilterError> {
    let params = line
        .split_whitespace()
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")));
    FilterSpec::from_query_params(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_line() {
        let filter = parse_filter_line("min_light=1800  max_triumph=90000").unwrap();
        assert_eq!(filter.light_level.min, Some(1800.0));
        assert_eq!(filter.light_level.max, None);
        assert_eq!(filter.triumph_score.max, Some(90000.0));
        assert!(filter.play_time.is_unbounded());
    }

    #[test]
    fn test_parse_filter_line_rejects_bad_value() {
        let err = parse_filter_line("min_playtime=soon").unwrap_err();
        assert_eq!(err.field(), "min_playtime");
    }
}
