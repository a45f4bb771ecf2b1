//! Configuration loading from trialbench.toml
//!
//! trialbench configuration can be specified in a `trialbench.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory. Every section and field has a default.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use trialbench_core::measure::check_pinnable;
use trialbench_core::{ThreadLauncher, TrialOptions};

/// File name searched for by [`TrialbenchConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "trialbench.toml";

/// trialbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrialbenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Runner configuration for trial execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of trials used by `TrialRunner::run`
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Log the start and end of every trial
    #[serde(default = "default_true")]
    pub logging: bool,
    /// Yield the trial thread between reset and timing (best-effort)
    #[serde(default = "default_true")]
    pub settle_before_timing: bool,
    /// Stack size for trial threads in bytes (platform default if unset)
    #[serde(default)]
    pub stack_size: Option<usize>,
    /// Pin trial threads to this CPU (Linux only)
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            logging: true,
            settle_before_timing: true,
            stack_size: None,
            pin_cpu: None,
        }
    }
}

fn default_trials() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl RunnerConfig {
    /// Per-trial options derived from this configuration
    pub fn trial_options(&self) -> TrialOptions {
        TrialOptions {
            logging: self.logging,
            settle_before_timing: self.settle_before_timing,
        }
    }

    /// Check values that would otherwise only fail once trials launch
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(cpu) = self.pin_cpu {
            check_pinnable(cpu).context("invalid [runner] pin_cpu")?;
        }
        Ok(())
    }

    /// Thread launcher derived from this configuration.
    ///
    /// An out-of-range `pin_cpu` is not rejected here; trials launched with it
    /// fail with a launch error. [`validate`](Self::validate) catches it earlier.
    pub fn launcher(&self) -> ThreadLauncher {
        let mut launcher = ThreadLauncher::new();
        if let Some(bytes) = self.stack_size {
            launcher = launcher.with_stack_size(bytes);
        }
        if let Some(cpu) = self.pin_cpu {
            launcher = launcher.with_pinned_cpu(cpu);
        }
        launcher
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Enable debug-level output
    #[serde(default)]
    pub verbose: bool,
}

impl TrialbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.runner.validate()?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# trialbench configuration

[runner]
# Trials per measurement
trials = 5
# Log the start and end of every trial
logging = true
# Yield the trial thread before timing starts (best-effort, no guaranteed effect)
settle_before_timing = true
# Stack size for trial threads in bytes (uncomment to enable)
# stack_size = 8388608
# Pin trial threads to a CPU, Linux only (uncomment to enable)
# pin_cpu = 0

[logging]
# Debug-level output
verbose = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrialbenchConfig::default();
        assert_eq!(config.runner.trials, 5);
        assert!(config.runner.logging);
        assert!(config.runner.settle_before_timing);
        assert!(config.runner.pin_cpu.is_none());
        assert!(!config.logging.verbose);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            trials = 11
            logging = false
            pin_cpu = 2
        "#;

        let config: TrialbenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.trials, 11);
        assert!(!config.runner.logging);
        assert_eq!(config.runner.pin_cpu, Some(2));
        // Defaults should still apply
        assert!(config.runner.settle_before_timing);
        assert!(!config.logging.verbose);
    }

    #[test]
    fn test_trial_options_follow_config() {
        let runner = RunnerConfig {
            logging: false,
            settle_before_timing: false,
            ..RunnerConfig::default()
        };
        let options = runner.trial_options();
        assert!(!options.logging);
        assert!(!options.settle_before_timing);
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = TrialbenchConfig::default_toml();
        let config: TrialbenchConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.runner.trials, 5);
        assert!(config.runner.stack_size.is_none());
    }

    #[test]
    fn test_validate_rejects_unpinnable_cpu() {
        let config: TrialbenchConfig = toml::from_str("[runner]\npin_cpu = 4096").unwrap();
        if trialbench_core::measure::PINNABLE_CPUS <= 4096 {
            let err = config.runner.validate().unwrap_err();
            assert!(err.to_string().contains("pin_cpu"));
        }

        let pinned = RunnerConfig {
            pin_cpu: Some(0),
            ..RunnerConfig::default()
        };
        assert!(pinned.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_unpinnable_cpu() {
        if trialbench_core::measure::PINNABLE_CPUS == usize::MAX {
            return;
        }
        let path = std::env::temp_dir().join(format!(
            "trialbench-pin-{}-{}.toml",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, "[runner]\npin_cpu = 4096\n").unwrap();

        let loaded = TrialbenchConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(loaded.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(TrialbenchConfig::load("/nonexistent/trialbench.toml").is_err());
    }
}
