/// Tab group lifecycle: capture, remove, delete, restore

use crate::error::{HostError, TabGroupError};
use crate::host::{Clock, TabHost};
use crate::storage::{StorageBackend, TabGroupList, TabGroupStore};
use crate::tab_data::{CapturedAt, GroupId, Locator, TabGroup, TabId};
use log::{debug, info, warn};

/// Outcome of capturing the current window
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub group_id: GroupId,
    pub captured: usize,
    pub closed: usize,
    /// False when the host could not name the invoking tab; nothing was closed
    pub invoker_known: bool,
    pub failures: Vec<HostError>,
}

/// Outcome of restoring a group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestoreReport {
    pub opened: usize,
    /// Records skipped for lack of a url
    pub skipped: Vec<TabId>,
    pub failures: Vec<HostError>,
}

/// The only component that mutates the saved group list.
///
/// Every operation is one load, mutate, save cycle. Callers must not start a
/// second operation before the first resolves, and must re-read the list
/// before addressing anything by position again.
pub struct TabGroupManager<B, H, C> {
    store: TabGroupStore<B>,
    host: H,
    clock: C,
}

impl<B, H, C> TabGroupManager<B, H, C>
where
    B: StorageBackend,
    H: TabHost,
    C: Clock,
{
    pub fn new(store: TabGroupStore<B>, host: H, clock: C) -> Self {
        TabGroupManager { store, host, clock }
    }

    /// Fresh copy of the saved list
    pub async fn groups(&self) -> Result<TabGroupList, TabGroupError> {
        self.store.load().await
    }

    /// Save every tab of the current window as a new group, then close all of
    /// them except the invoking tab.
    pub async fn capture_current_window(&self) -> Result<CaptureReport, TabGroupError> {
        let tabs = self.host.current_window_tabs().await?;
        if tabs.is_empty() {
            return Err(TabGroupError::NothingToCapture);
        }
        let invoker = self.host.invoking_tab().await?;

        let group = TabGroup::capture(&tabs, CapturedAt::from_millis(self.clock.now_millis()));
        let group_id = group.id.clone();

        let mut list = self.store.load().await?;
        list.add_group(group);
        self.store.save(&list).await?;
        info!("captured {} tabs into group {}", tabs.len(), group_id);

        let mut report = CaptureReport {
            group_id,
            captured: tabs.len(),
            closed: 0,
            invoker_known: invoker.is_some(),
            failures: Vec::new(),
        };

        let Some(invoker) = invoker else {
            warn!("invoking tab unknown, leaving window tabs open");
            return Ok(report);
        };

        for tab in tabs.iter().filter(|t| t.id != invoker.id) {
            match self.host.close_tab(tab.id).await {
                Ok(()) => report.closed += 1,
                Err(e) => {
                    warn!("could not close tab {}: {}", tab.id, e);
                    report.failures.push(e);
                }
            }
        }

        Ok(report)
    }

    /// Drop one tab from a group; an emptied group is dropped with it.
    pub async fn remove_tab(
        &self,
        group: impl Into<Locator<GroupId>>,
        tab: impl Into<Locator<TabId>>,
    ) -> Result<(), TabGroupError> {
        let mut list = self.store.load().await?;
        let group_pos = list.group_position(&group.into())?;
        let tab_pos = list.tab_position(group_pos, &tab.into())?;

        if list.remove_tab_at(group_pos, tab_pos) {
            debug!("last tab removed, group at {} dropped", group_pos);
        }
        self.store.save(&list).await
    }

    /// Drop a whole group, whatever it holds
    pub async fn delete_group(
        &self,
        group: impl Into<Locator<GroupId>>,
    ) -> Result<(), TabGroupError> {
        let mut list = self.store.load().await?;
        let group_pos = list.group_position(&group.into())?;

        let removed = list.remove_group_at(group_pos);
        self.store.save(&list).await?;
        info!("deleted group {} ({} tabs)", removed.id, removed.tabs.len());
        Ok(())
    }

    /// Reopen every tab of a group, then drop the group
    pub async fn restore_group(
        &self,
        group: impl Into<Locator<GroupId>>,
    ) -> Result<RestoreReport, TabGroupError> {
        let mut list = self.store.load().await?;
        let group_pos = list.group_position(&group.into())?;
        let mut report = RestoreReport::default();

        for record in &list.groups[group_pos].tabs {
            let Some(url) = record.restorable_url() else {
                warn!("{}", TabGroupError::MalformedRecord(record.id.to_string()));
                report.skipped.push(record.id.clone());
                continue;
            };
            match self.host.open_tab(url).await {
                Ok(()) => report.opened += 1,
                Err(e) => {
                    warn!("could not open {}: {}", url, e);
                    report.failures.push(e);
                }
            }
        }

        let restored = list.remove_group_at(group_pos);
        self.store.save(&list).await?;
        info!(
            "restored group {}: {} opened, {} skipped, {} failed",
            restored.id,
            report.opened,
            report.skipped.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Open a single saved tab and drop it from its group
    pub async fn open_tab(
        &self,
        group: impl Into<Locator<GroupId>>,
        tab: impl Into<Locator<TabId>>,
    ) -> Result<(), TabGroupError> {
        let mut list = self.store.load().await?;
        let group_pos = list.group_position(&group.into())?;
        let tab_pos = list.tab_position(group_pos, &tab.into())?;

        let record = &list.groups[group_pos].tabs[tab_pos];
        let url = record
            .restorable_url()
            .ok_or_else(|| TabGroupError::MalformedRecord(record.id.to_string()))?;
        self.host.open_tab(url).await?;

        list.remove_tab_at(group_pos, tab_pos);
        self.store.save(&list).await
    }
}
