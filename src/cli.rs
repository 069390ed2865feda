use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{database::{EngineConfig, Invocation}, error::Result};

#[derive(Parser, Debug)]
#[command(name = "qsim")]
#[command(about = "Ask natural-language questions of an endpoint inventory")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Question to evaluate
    #[arg(long, short = 'q')]
    pub question: Option<String>,

    /// Emit JSON output (always on)
    #[arg(long)]
    pub json: bool,

    /// Save the question under NAME
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,

    /// List saved questions
    #[arg(long)]
    pub list_saved: bool,

    /// Run a saved question
    #[arg(long, value_name = "NAME")]
    pub run_saved: Option<String>,

    /// Include an extra rendering alongside the JSON
    #[arg(long, value_enum)]
    pub out: Option<OutFormat>,

    /// Write the JSON payload to PATH (relative paths go under the downloads dir)
    #[arg(long, value_name = "PATH")]
    pub out_file: Option<PathBuf>,

    /// JSON array of machine records to query instead of the sample machines
    #[arg(long, value_name = "PATH")]
    pub inventory: Option<PathBuf>,

    /// Saved-question registry file
    #[arg(long, value_name = "PATH")]
    pub saved_file: Option<PathBuf>,

    /// Engine configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutFormat {
    Csv,
}

impl Cli {
    /// Configuration file (defaults when absent) with the path flags applied on top.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if let Some(path) = &self.inventory {
            config.inventory_path = Some(path.clone());
        }
        if let Some(path) = &self.saved_file {
            config.saved_path = path.clone();
        }
        Ok(config)
    }

    pub fn invocation(&self) -> Invocation {
        Invocation {
            question: self.question.clone(),
            save: self.save.clone(),
            run_saved: self.run_saved.clone(),
            list_saved: self.list_saved,
            csv: self.out == Some(OutFormat::Csv),
            out_file: self.out_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_invocation() {
        let cli = Cli::parse_from([
            "qsim", "-q", "Get role from all", "--save", "roles", "--out", "csv", "--out-file", "roles.json",
        ]);
        let invocation = cli.invocation();

        assert_eq!(invocation.question.as_deref(), Some("Get role from all"));
        assert_eq!(invocation.save.as_deref(), Some("roles"));
        assert!(invocation.csv);
        assert_eq!(invocation.out_file, Some(PathBuf::from("roles.json")));
        assert!(!invocation.list_saved);
    }

    #[test]
    fn path_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("qsim.json");
        let stored = EngineConfig { downloads_dir: PathBuf::from("/exports"), ..Default::default() };
        stored.save(&config_path).unwrap();

        let cli = Cli::parse_from(vec![
            "qsim".to_string(),
            "--list-saved".to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
            "--saved-file".to_string(),
            "mine.json".to_string(),
        ]);
        let config = cli.engine_config().unwrap();

        assert_eq!(config.downloads_dir, PathBuf::from("/exports"));
        assert_eq!(config.saved_path, PathBuf::from("mine.json"));
        assert!(config.inventory_path.is_none());
    }

    #[test]
    fn unknown_out_format_is_rejected() {
        assert!(Cli::try_parse_from(["qsim", "-q", "x", "--out", "xml"]).is_err());
    }
}
