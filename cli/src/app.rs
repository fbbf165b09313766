//! Application context — unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, rendering mode, configuration
//! store and prompt policy. Adding a new cross-cutting concern requires only
//! one field change here; no command signature changes.

use anyhow::Result;

use crate::infra::api::DigitalOceanClient;
use crate::infra::config::YamlConfigStore;
use crate::infra::prompt::DialoguerPrompter;
use crate::domain::ShellConfig;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `DOSH_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration file access.
    pub config_store: YamlConfigStore,
    /// When `true`, answer confirmations with "yes". Selections and other
    /// value prompts still ask.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `DOSH_YES`
    /// environment variables are present.
    pub assume_yes: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("DOSH_YES").is_ok();
        let assume_yes = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store: YamlConfigStore::new(),
            assume_yes,
        }
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Stored configuration with `.env` and environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn config(&self) -> Result<ShellConfig> {
        self.config_store.load_effective()
    }

    /// API client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` when credentials are unset.
    pub fn client(&self, config: &ShellConfig) -> Result<DigitalOceanClient> {
        DigitalOceanClient::from_config(config)
    }

    #[must_use]
    pub fn prompter(&self) -> DialoguerPrompter {
        DialoguerPrompter::new(self.assume_yes)
    }
}
