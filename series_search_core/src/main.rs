use std::{
    io::{self, Write},
    time::Duration,
};

use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use tokio::runtime::Builder;

use series_search_core::{
    CancellationSignal, MAX_PERMITS_THREADS, MemorySeries, Range, SearchOptions, configuration::Configuration,
    search_with_options,
};

#[derive(Parser, Debug)]
#[command(name = "series_search_core", version, about = "Parallel value search over a numeric series")]
struct Args {
    /// File with one number per line; blank lines are skipped
    #[arg(long, value_name = "PATH")]
    input: String,

    /// Lower inclusive bound
    #[arg(long, allow_hyphen_values = true)]
    lower: f64,

    /// Upper inclusive bound (default: same as --lower, i.e. an equality search)
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// First row to search; negative counts from the end (default: first row)
    #[arg(long, allow_hyphen_values = true)]
    start: Option<isize>,

    /// Last row to search; negative counts from the end (default: last row)
    #[arg(long, allow_hyphen_values = true)]
    end: Option<isize>,

    /// Number of concurrent search workers (default: available cores)
    #[arg(long = "concurrent-threads", aliases = ["concurrent_threads", "workers"], value_name = "N")]
    concurrent_threads: Option<usize>,

    /// Cancel the search after this many milliseconds
    #[arg(long = "timeout-ms", alias = "timeout_ms", value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Stop all workers as soon as one fails
    #[arg(long = "fail-fast", alias = "fail_fast", action = ArgAction::SetTrue)]
    fail_fast: bool,

    /// Logging level off, error, warn, info, debug, trace (default: error)
    #[arg(long = "log-level", alias = "log_level", value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

fn parse_values(contents: &str) -> io::Result<Vec<f64>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.trim().parse::<f64>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: {:?} is not a number ({})", idx + 1, line, e),
                )
            })
        })
        .collect()
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = Configuration {
        concurrent_threads: args.concurrent_threads,
        fail_fast: Some(args.fail_fast),
        log_level: args.log_level,
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.unwrap_or(LevelFilter::Error))
        .init();

    if let Some(threads) = config.concurrent_threads {
        _ = MAX_PERMITS_THREADS.set(threads.max(1));
    }

    let rt = Builder::new_multi_thread().enable_all().build()?;

    rt.block_on(async {
        let contents = tokio::fs::read_to_string(&args.input).await?;
        let values = parse_values(&contents)?;
        info!("loaded {} rows from {}", values.len(), args.input);

        let series = MemorySeries::new(values).with_name(args.input.clone());

        let signal = match args.timeout_ms {
            Some(ms) => CancellationSignal::with_timeout(Duration::from_millis(ms)),
            None => CancellationSignal::new(),
        };

        let outcome = search_with_options(
            &signal,
            &series,
            args.lower,
            args.upper.unwrap_or(args.lower),
            Some(Range::new(args.start, args.end)),
            SearchOptions::from(&config),
        )
        .await;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for row in &outcome.rows {
            writeln!(out, "{}", row)?;
        }
        out.flush()?;

        match outcome.error {
            Some(e) => Err(io::Error::other(e)),
            None => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_skips_blank_lines() {
        let values = parse_values("5\n3\n\n 9.5 \n-3\n").unwrap();
        assert_eq!(values, vec![5.0, 3.0, 9.5, -3.0]);
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_values("1\n2\nthree\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn cli_accepts_negative_bounds() {
        let args = Args::parse_from([
            "series_search_core",
            "--input",
            "values.txt",
            "--lower",
            "-2.5",
            "--start",
            "-3",
            "--concurrent-threads",
            "4",
        ]);

        assert_eq!(args.lower, -2.5);
        assert_eq!(args.upper, None);
        assert_eq!(args.start, Some(-3));
        assert_eq!(args.concurrent_threads, Some(4));
        assert!(!args.fail_fast);
    }

    #[test]
    fn cli_accepts_workers_and_a_bare_fail_fast_flag() {
        let args = Args::parse_from([
            "series_search_core",
            "--input",
            "values.txt",
            "--lower",
            "3",
            "--upper",
            "7",
            "--workers",
            "4",
            "--fail-fast",
        ]);

        assert_eq!(args.concurrent_threads, Some(4));
        assert!(args.fail_fast);
        assert_eq!(args.upper, Some(7.0));
    }
}
