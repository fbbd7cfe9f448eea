use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beamcase")]
#[command(about = "Evaluate load combinations against a beam and write diagram reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every combination and write <name>.csv, <name>.txt and summary.csv
    Run {
        /// Run file (defaults to the built-in reference beam and table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "csvs")]
        out: PathBuf,

        /// Process scenarios in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Write the default run file
    Init {
        /// Where to write it
        #[arg(default_value = "beamcase.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the combinations of a run file
    Combos {
        /// Run file (defaults to the built-in table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the combinations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render one SVG per scenario with gnuplot
    Plot {
        /// Directory holding <name>.csv and <name>.txt
        #[arg(long = "csv-dir", default_value = "csvs")]
        csv_dir: PathBuf,

        /// Output directory for SVG files
        #[arg(short, long, default_value = "plots")]
        out: PathBuf,

        /// gnuplot script
        #[arg(long, default_value = "scripts/generator.gnuplot")]
        script: PathBuf,

        /// Plotting program
        #[arg(long, default_value = "gnuplot")]
        program: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["beamcase", "run"]);
        match cli.command {
            Commands::Run { config, out, parallel } => {
                assert!(config.is_none());
                assert_eq!(out, PathBuf::from("csvs"));
                assert!(!parallel);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::parse_from(["beamcase", "plot", "-vv", "--csv-dir", "out"]);
        assert_eq!(cli.verbosity, 2);
        assert!(matches!(cli.command, Commands::Plot { ref csv_dir, .. } if csv_dir == &PathBuf::from("out")));
    }
}
