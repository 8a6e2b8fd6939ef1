use crate::{
    config::AppConfig,
    flows::Backends,
    session::SessionMachine,
    store::{FileScope, Origin},
};
use anyhow::{Context, Result};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
}

/// One open tab: its session machine plus the gateways its pages use.
#[derive(Debug)]
pub struct Tab {
    pub machine: SessionMachine,
    pub backends: Backends,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Opens this invocation's tab over the on-disk scopes and hydrates it.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn open_tab(&self) -> Result<Tab> {
        let origin = Origin::new(Arc::new(FileScope::new(self.config.durable_path())));
        let store = origin.open_tab(Arc::new(FileScope::new(self.config.tab_path())));
        store.hydrate();

        let backends = Backends::from_config(&self.config).context("failed to build HTTP client")?;

        Ok(Tab {
            machine: SessionMachine::new(Arc::new(store)),
            backends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;

    fn globals(dir: &tempfile::TempDir, tab: &str) -> GlobalArgs {
        GlobalArgs::new(
            AppConfig::load(ConfigOverrides {
                state_dir: Some(dir.path().display().to_string()),
                tab: Some(tab.to_string()),
                ..ConfigOverrides::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_tabs_share_durable_state() {
        let dir = tempfile::tempdir().unwrap();
        let first = globals(&dir, "one").open_tab().unwrap();
        first.machine.store().set_token("abc");
        first.machine.store().store_reset_token("XYZ");

        let second = globals(&dir, "two").open_tab().unwrap();
        assert!(second.machine.store().is_authenticated());
        assert!(second.machine.store().reset_marker().is_none());

        let again = globals(&dir, "one").open_tab().unwrap();
        assert!(again.machine.store().reset_marker().is_some());
    }
}
