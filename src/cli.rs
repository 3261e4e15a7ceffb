use std::path::PathBuf;

use clap::Parser;

/// Explore a vehicle CO2 emissions dataset.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "co2-explorer", version, about)]
pub struct Args {
    /// CSV file to open; overrides `dataset_path` from the settings file
    #[arg(value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Settings file [default: $CO2_DASHBOARD_CONFIG, then ./co2-dashboard.json]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn dataset_path_is_optional() {
        let args = Args::try_parse_from(["co2-explorer"]).expect("parse");
        assert_eq!(args.dataset, None);
        assert_eq!(args.config, None);

        let args = Args::try_parse_from(["co2-explorer", "data/co2.csv", "--config", "dash.json"])
            .expect("parse");
        assert_eq!(args.dataset, Some(PathBuf::from("data/co2.csv")));
        assert_eq!(args.config, Some(PathBuf::from("dash.json")));
    }

    #[test]
    fn help_is_not_taken_for_a_dataset() {
        let err = Args::try_parse_from(["co2-explorer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let err = Args::try_parse_from(["co2-explorer", "a.csv", "b.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
