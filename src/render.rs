/// View data for the popup, derived fresh from the saved list on every render

use crate::config::Config;
use crate::storage::TabGroupList;
use crate::tab_data::{CapturedAt, GroupId, TabGroup, TabId, TabRecord};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub index: usize,
    pub id: GroupId,
    /// Epoch milliseconds when the stored timestamp is readable
    pub captured_at_millis: Option<i64>,
    pub captured_at_label: String,
    pub tabs: Vec<TabView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub index: usize,
    pub id: TabId,
    pub title: String,
    pub url: Option<String>,
    pub favicon_url: Option<String>,
    pub restorable: bool,
}

/// Build the view of every saved group.
///
/// Positions are recomputed here and nowhere else.
pub fn render(list: &TabGroupList, config: &Config) -> Vec<GroupView> {
    list.groups
        .iter()
        .enumerate()
        .map(|(index, group)| group_view(index, group, config))
        .collect()
}

/// Footer line, e.g. "2 groups • 5 tabs"
pub fn summary(list: &TabGroupList) -> String {
    format!(
        "{} {} • {} {}",
        list.len(),
        if list.len() == 1 { "group" } else { "groups" },
        list.total_tabs(),
        if list.total_tabs() == 1 { "tab" } else { "tabs" }
    )
}

fn group_view(index: usize, group: &TabGroup, config: &Config) -> GroupView {
    GroupView {
        index,
        id: group.id.clone(),
        captured_at_millis: group.captured_at.as_ref().and_then(CapturedAt::as_millis),
        captured_at_label: group
            .captured_at
            .as_ref()
            .map_or_else(|| "Unknown time".to_string(), CapturedAt::to_string),
        tabs: group
            .tabs
            .iter()
            .enumerate()
            .map(|(index, record)| tab_view(index, record, config))
            .collect(),
    }
}

fn tab_view(index: usize, record: &TabRecord, config: &Config) -> TabView {
    let url = record.restorable_url();
    let title = if record.title.trim().is_empty() {
        url.unwrap_or("Untitled").to_string()
    } else {
        record.title.clone()
    };

    TabView {
        index,
        id: record.id.clone(),
        title,
        url: record.url.clone(),
        favicon_url: url.and_then(|u| favicon_url(u, config)),
        restorable: url.is_some(),
    }
}

/// Favicon lookup address for the page's hostname
pub fn favicon_url(page_url: &str, config: &Config) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}{}", config.favicon_service, host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_list() -> TabGroupList {
        serde_json::from_value(json!([
            { "id": "g1", "capturedAt": "2024-10-28T10:30:00.000Z", "tabs": [
                { "id": "t1", "title": "Rust", "url": "https://www.rust-lang.org/learn" },
                { "id": "t2", "title": "", "url": "https://docs.rs" }
            ] },
            { "id": "g2", "capturedAt": 1698508200000u64, "tabs": [
                { "id": "t3", "title": "Lost" }
            ] },
            { "id": "g3", "tabs": [{ "id": "t4", "url": "https://example.com" }] }
        ]))
        .unwrap()
    }

    #[test]
    fn test_render_positions_and_ids() {
        let views = render(&sample_list(), &Config::default());

        assert_eq!(views.len(), 3);
        assert_eq!(views[1].index, 1);
        assert_eq!(views[1].id, GroupId("g2".into()));
        assert_eq!(views[0].tabs[1].index, 1);
        assert_eq!(views[0].tabs[1].id, TabId("t2".into()));
    }

    #[test]
    fn test_render_timestamps() {
        let views = render(&sample_list(), &Config::default());

        assert_eq!(views[0].captured_at_label, "2024-10-28T10:30:00.000Z");
        assert_eq!(views[1].captured_at_millis, Some(1_698_508_200_000));
        assert_eq!(views[2].captured_at_millis, None);
        assert_eq!(views[2].captured_at_label, "Unknown time");
    }

    #[test]
    fn test_render_tab_details() {
        let views = render(&sample_list(), &Config::default());
        let rust = &views[0].tabs[0];
        let docs = &views[0].tabs[1];
        let lost = &views[1].tabs[0];

        assert_eq!(
            rust.favicon_url.as_deref(),
            Some("https://www.google.com/s2/favicons?domain=www.rust-lang.org")
        );
        assert_eq!(docs.title, "https://docs.rs");
        assert!(rust.restorable);
        assert!(!lost.restorable);
        assert_eq!(lost.favicon_url, None);
    }

    #[test]
    fn test_render_is_repeatable() {
        let list = sample_list();
        let config = Config::default();

        assert_eq!(render(&list, &config), render(&list, &config));
    }

    #[test]
    fn test_render_empty() {
        assert!(render(&TabGroupList::new(), &Config::default()).is_empty());
    }

    #[test]
    fn test_favicon_url_needs_a_host() {
        let config = Config::default();

        assert_eq!(favicon_url("not a url", &config), None);
        assert_eq!(favicon_url("mailto:someone@example.com", &config), None);
        assert_eq!(
            favicon_url("http://localhost:3000/x", &config).as_deref(),
            Some("https://www.google.com/s2/favicons?domain=localhost")
        );
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(&sample_list()), "3 groups • 4 tabs");
        assert_eq!(summary(&TabGroupList::new()), "0 groups • 0 tabs");
    }
}
