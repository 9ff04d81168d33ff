//! Run configuration
//!
//! A [`RunnerConfig`] is assembled once per invocation, either from the
//! enumerated [`RunnerOption`] set or through [`RunnerConfigBuilder`]. The
//! store handle is the only required setting; construction fails without it,
//! so a run never starts half-configured.
//!
//! # Example
//!
//! ```ignore
//! let config = RunnerConfig::builder()
//!     .component_name("dedup-filter")
//!     .instance_id(instance_id)
//!     .storer(store.clone())
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use std::sync::Arc;
use vulnflow_core::{InstanceId, Logger, Storer};

/// Environment variable seeding the component name
pub const ENV_COMPONENT_NAME: &str = "VULNFLOW_COMPONENT_NAME";

/// Environment variable seeding the instance id
pub const ENV_INSTANCE_ID: &str = "VULNFLOW_INSTANCE_ID";

/// Component name used when none is configured
pub const DEFAULT_COMPONENT_NAME: &str = "unnamed-component";

/// The recognized configuration options
pub enum RunnerOption {
    /// Structured logger sink
    Logger(Logger),
    /// Display label used in logs and errors
    ComponentName(String),
    /// Instance scoping every store operation
    InstanceId(InstanceId),
    /// Store handle
    Storer(Arc<dyn Storer>),
}

impl std::fmt::Debug for RunnerOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerOption::Logger(_) => f.write_str("Logger(..)"),
            RunnerOption::ComponentName(name) => f.debug_tuple("ComponentName").field(name).finish(),
            RunnerOption::InstanceId(id) => f.debug_tuple("InstanceId").field(id).finish(),
            RunnerOption::Storer(_) => f.write_str("Storer(..)"),
        }
    }
}

/// Inject a logger
pub fn runner_with_logger(logger: Logger) -> RunnerOption {
    RunnerOption::Logger(logger)
}

/// Set the component name
pub fn runner_with_component_name(name: impl Into<String>) -> RunnerOption {
    RunnerOption::ComponentName(name.into())
}

/// Scope the run to an instance
pub fn runner_with_instance_id(instance_id: InstanceId) -> RunnerOption {
    RunnerOption::InstanceId(instance_id)
}

/// Supply the store handle
pub fn runner_with_storer(storer: Arc<dyn Storer>) -> RunnerOption {
    RunnerOption::Storer(storer)
}

/// Validated configuration for one run
#[derive(Clone)]
pub struct RunnerConfig {
    logger: Option<Logger>,
    component_name: String,
    instance_id: InstanceId,
    storer: Arc<dyn Storer>,
}

impl RunnerConfig {
    /// Create a builder with no settings
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::new()
    }

    /// Build a configuration from options; later options override earlier ones
    pub fn from_options(options: impl IntoIterator<Item = RunnerOption>) -> Result<Self> {
        RunnerConfigBuilder::new().options(options).build()
    }

    /// Injected logger, if any
    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Component name
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Instance id
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Store handle
    pub fn storer(&self) -> &Arc<dyn Storer> {
        &self.storer
    }
}

impl std::fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("logger", &self.logger.is_some())
            .field("component_name", &self.component_name)
            .field("instance_id", &self.instance_id)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RunnerConfig`]
#[derive(Default)]
pub struct RunnerConfigBuilder {
    logger: Option<Logger>,
    component_name: Option<String>,
    instance_id: Option<InstanceId>,
    storer: Option<Arc<dyn Storer>>,
}

impl RunnerConfigBuilder {
    /// Create a builder with no settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed component name and instance id from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_vars(|key| std::env::var(key).ok())
    }

    /// Seed component name and instance id from `lookup`
    ///
    /// Unset or blank variables are ignored; an unparsable instance id is a
    /// configuration error.
    pub fn from_env_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::new();
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(name) = present(ENV_COMPONENT_NAME) {
            builder.component_name = Some(name.trim().to_string());
        }
        if let Some(raw) = present(ENV_INSTANCE_ID) {
            let id = raw
                .parse::<InstanceId>()
                .map_err(|e| Error::Config(format!("{}: {}", ENV_INSTANCE_ID, e)))?;
            builder.instance_id = Some(id);
        }
        Ok(builder)
    }

    /// Apply a single option
    pub fn apply(mut self, option: RunnerOption) -> Self {
        match option {
            RunnerOption::Logger(logger) => self.logger = Some(logger),
            RunnerOption::ComponentName(name) => self.component_name = Some(name),
            RunnerOption::InstanceId(id) => self.instance_id = Some(id),
            RunnerOption::Storer(storer) => self.storer = Some(storer),
        }
        self
    }

    /// Apply options in order
    pub fn options(self, options: impl IntoIterator<Item = RunnerOption>) -> Self {
        options.into_iter().fold(self, Self::apply)
    }

    /// Inject a logger
    pub fn logger(self, logger: Logger) -> Self {
        self.apply(RunnerOption::Logger(logger))
    }

    /// Set the component name
    pub fn component_name(self, name: impl Into<String>) -> Self {
        self.apply(RunnerOption::ComponentName(name.into()))
    }

    /// Scope the run to an instance
    pub fn instance_id(self, instance_id: InstanceId) -> Self {
        self.apply(RunnerOption::InstanceId(instance_id))
    }

    /// Supply the store handle
    pub fn storer(self, storer: Arc<dyn Storer>) -> Self {
        self.apply(RunnerOption::Storer(storer))
    }

    /// Validate and build
    ///
    /// Fails when no store is supplied or the component name is blank. A
    /// missing instance id is generated here, once.
    pub fn build(self) -> Result<RunnerConfig> {
        let storer = self
            .storer
            .ok_or_else(|| Error::Config("a storer is required".to_string()))?;

        let component_name = match self.component_name {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::Config("component name must not be blank".to_string()))
            }
            Some(name) => name,
            None => DEFAULT_COMPONENT_NAME.to_string(),
        };

        Ok(RunnerConfig {
            logger: self.logger,
            component_name,
            instance_id: self.instance_id.unwrap_or_default(),
            storer,
        })
    }
}
