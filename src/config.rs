use crate::error::{Error, Result};
use crate::executor::PanicStrategy;

/// Upper bound on the number of worker threads a pool may be built with.
pub const MAX_THREADS: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: Option<usize>,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub panic_strategy: PanicStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "taskpool-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Shorthand for a default config with an explicit worker count.
    pub fn with_threads(n: usize) -> Self {
        Self {
            num_threads: Some(n),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(Error::config("num_threads must be > 0"));
            }
            if n > MAX_THREADS {
                return Err(Error::config(format!(
                    "num_threads too large (max {})",
                    MAX_THREADS
                )));
            }
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        if let Some(0) = self.stack_size {
            return Err(Error::config("stack_size must be > 0"));
        }

        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.worker_threads() >= 1);
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .num_threads(4)
            .thread_name_prefix("io")
            .panic_strategy(PanicStrategy::Isolate)
            .build()
            .unwrap();

        assert_eq!(config.worker_threads(), 4);
        assert_eq!(config.thread_name_prefix, "io");
        assert_eq!(config.panic_strategy, PanicStrategy::Isolate);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = Config::builder().num_threads(0).build().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_too_many_threads_rejected() {
        let err = Config::with_threads(MAX_THREADS + 1).validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(Config::builder().thread_name_prefix("").build().is_err());
    }
}
