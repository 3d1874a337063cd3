/// Capabilities borrowed from the host browser
use crate::error::HostError;
use crate::tab_data::HostTab;

/// Tab inventory and control for the current window
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// All tabs in the current window, in window order
    async fn current_window_tabs(&self) -> Result<Vec<HostTab>, HostError>;

    /// The tab running this code, if the host can tell
    async fn invoking_tab(&self) -> Result<Option<HostTab>, HostError>;

    async fn close_tab(&self, tab_id: i32) -> Result<(), HostError>;

    async fn open_tab(&self, url: &str) -> Result<(), HostError>;
}

/// Wall clock in epoch milliseconds
pub trait Clock {
    fn now_millis(&self) -> f64;
}

impl<H: TabHost> TabHost for &H {
    async fn current_window_tabs(&self) -> Result<Vec<HostTab>, HostError> {
        (**self).current_window_tabs().await
    }

    async fn invoking_tab(&self) -> Result<Option<HostTab>, HostError> {
        (**self).invoking_tab().await
    }

    async fn close_tab(&self, tab_id: i32) -> Result<(), HostError> {
        (**self).close_tab(tab_id).await
    }

    async fn open_tab(&self, url: &str) -> Result<(), HostError> {
        (**self).open_tab(url).await
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_millis(&self) -> f64 {
        self.0
    }
}
