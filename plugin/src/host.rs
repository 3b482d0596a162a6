use pd_core::config::RawConfig;
use pd_core::error::AppError;

type Factory<P> = Box<dyn FnMut(&RawConfig) -> Result<P, AppError>>;

/// Owns the plugin's provider instance.
///
/// The provider is built from the config of the first request that succeeds in building one and
/// is then reused for the life of the process. Config on later requests is ignored, including a
/// different token or base URL.
pub struct PluginHost<P> {
    factory: Factory<P>,
    provider: Option<P>,
}

impl<P> PluginHost<P> {
    pub fn new(factory: impl FnMut(&RawConfig) -> Result<P, AppError> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            provider: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    /// Returns the cached provider, building it from `config` on first use.
    ///
    /// A failed build is not cached; the next request retries with its own config.
    pub fn ensure_provider(&mut self, config: &RawConfig) -> Result<&P, AppError> {
        let provider = match self.provider.take() {
            Some(p) => p,
            None => {
                let p = (self.factory)(config)?;
                tracing::info!("provider initialized");
                p
            }
        };
        Ok(self.provider.insert(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn factory_runs_once_and_later_config_is_ignored() {
        let builds = Rc::new(Cell::new(0));
        let counter = Rc::clone(&builds);
        let mut host = PluginHost::new(move |cfg: &RawConfig| {
            counter.set(counter.get() + 1);
            Ok(cfg.get("apiToken").cloned().unwrap_or_default())
        });
        assert!(!host.is_initialized());

        let mut first = RawConfig::new();
        first.insert("apiToken".into(), json!("one"));
        let mut second = RawConfig::new();
        second.insert("apiToken".into(), json!("two"));

        assert_eq!(host.ensure_provider(&first).unwrap(), &json!("one"));
        assert_eq!(host.ensure_provider(&second).unwrap(), &json!("one"));
        assert_eq!(builds.get(), 1);
        assert!(host.is_initialized());
    }

    #[test]
    fn failed_build_is_retried() {
        let mut host = PluginHost::new(|cfg: &RawConfig| {
            cfg.get("apiToken")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| AppError::config("pagerduty apiToken is required"))
        });

        assert!(host.ensure_provider(&RawConfig::new()).is_err());
        assert!(!host.is_initialized());

        let mut cfg = RawConfig::new();
        cfg.insert("apiToken".into(), json!("t"));
        assert_eq!(host.ensure_provider(&cfg).unwrap(), "t");
    }
}
