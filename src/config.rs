use std::path::PathBuf;

use clap::Parser;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_DATA_FILE: &str = "final_merged_data.csv";

/// Michelin restaurants vs. economic indicators, interactive explorer.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Restaurant table to open at startup (.csv or .parquet)
    #[arg(long, short, env = "MICHELIN_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let args = Args::try_parse_from(["michelin-explorer"]).unwrap();
        // MICHELIN_DATA may be set in the environment running the tests.
        if std::env::var_os("MICHELIN_DATA").is_none() {
            assert_eq!(args.data, PathBuf::from(DEFAULT_DATA_FILE));
        }
    }

    #[test]
    fn test_explicit_path() {
        let args = Args::try_parse_from(["michelin-explorer", "--data", "x.parquet"]).unwrap();
        assert_eq!(args.data, PathBuf::from("x.parquet"));
    }
}
