/// Popup UI for the Oasis extension

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::bridge::{ChromeStorage, ChromeTabs, JsClock};
use crate::config::Config;
use crate::error::TabGroupError;
use crate::operations::TabGroupManager;
use crate::render::{render, summary, GroupView, TabView};
use crate::storage::{TabGroupList, TabGroupStore};
use crate::tab_data::{GroupId, TabId};

type PopupManager = TabGroupManager<ChromeStorage, ChromeTabs, JsClock>;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Busy(String),
    Warning(String),
    Error(String),
}

/// A user request against the saved groups
#[derive(Clone, PartialEq)]
enum Action {
    Capture,
    OpenTab(GroupId, TabId),
    RemoveTab(GroupId, TabId),
    RestoreGroup(GroupId),
    DeleteGroup(GroupId),
}

impl Action {
    fn busy_message(&self) -> &'static str {
        match self {
            Action::Capture => "Saving tabs...",
            Action::OpenTab(..) => "Opening tab...",
            Action::RemoveTab(..) => "Removing tab...",
            Action::RestoreGroup(_) => "Restoring group...",
            Action::DeleteGroup(_) => "Deleting group...",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    #[prop_or_default]
    pub config: Config,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = use_state(|| AppState::Busy("Loading groups...".to_string()));
    let list = use_state(TabGroupList::new);

    // Load saved groups on mount
    {
        let state = state.clone();
        let list = list.clone();
        let config = props.config.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let manager = manager(&config);
                refresh(&manager, &list, &state, AppState::Idle).await;
            });
            || ()
        });
    }

    // Every control funnels through here. Controls stay disabled until the
    // list has been reloaded, so no operation ever works on stale positions.
    let on_action = {
        let state = state.clone();
        let list = list.clone();
        let config = props.config.clone();

        Callback::from(move |action: Action| {
            if matches!(*state, AppState::Busy(_)) {
                return;
            }
            state.set(AppState::Busy(action.busy_message().to_string()));

            let state = state.clone();
            let list = list.clone();
            let manager = manager(&config);

            spawn_local(async move {
                let outcome = match run_action(&manager, action).await {
                    Ok(Some(warning)) => AppState::Warning(warning),
                    Ok(None) => AppState::Idle,
                    Err(e) => AppState::Error(e.to_string()),
                };
                refresh(&manager, &list, &state, outcome).await;
            });
        })
    };

    let is_busy = matches!(*state, AppState::Busy(_));
    let views = render(&list, &props.config);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Oasis"}</h1>

            <Button
                onclick={on_action.reform(|_: MouseEvent| Action::Capture)}
                disabled={is_busy}
                variant={ButtonVariant::Primary}
                block={true}
            >
                {"💾 Save Tabs"}
            </Button>

            // Status display
            {match &*state {
                AppState::Busy(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Warning(msg) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Warning} title={msg.clone()} inline={true}>
                        </Alert>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            if views.is_empty() {
                <div class="empty-state">
                    <p>{"No saved tab groups yet."}</p>
                </div>
            } else {
                <div class="groups-list">
                    {for views.into_iter().map(|view| {
                        let key = view.id.to_string();
                        html! {
                            <GroupCard
                                key={key}
                                view={view}
                                busy={is_busy}
                                on_action={on_action.clone()}
                            />
                        }
                    })}
                </div>
            }

            <p class="footer-popup">
                {summary(&list)}
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct GroupCardProps {
    view: GroupView,
    busy: bool,
    on_action: Callback<Action>,
}

#[function_component(GroupCard)]
fn group_card(props: &GroupCardProps) -> Html {
    let view = &props.view;
    let group_id = view.id.clone();

    let on_restore = {
        let group_id = group_id.clone();
        props.on_action.reform(move |_: MouseEvent| Action::RestoreGroup(group_id.clone()))
    };
    let on_delete = {
        let group_id = group_id.clone();
        props.on_action.reform(move |_: MouseEvent| Action::DeleteGroup(group_id.clone()))
    };

    html! {
        <div class="group-card">
            <div class="group-header">
                <span>{format!("📅 {}", format_captured(view))}</span>
                <div class="group-actions">
                    <Button onclick={on_restore} disabled={props.busy} size={ButtonSize::Small}>
                        {"↗️"}
                    </Button>
                    <Button
                        onclick={on_delete}
                        disabled={props.busy}
                        variant={ButtonVariant::Danger}
                        size={ButtonSize::Small}
                    >
                        {"🗑️"}
                    </Button>
                </div>
            </div>
            {for view.tabs.iter().map(|tab| tab_row(&group_id, tab, props))}
        </div>
    }
}

fn tab_row(group_id: &GroupId, tab: &TabView, props: &GroupCardProps) -> Html {
    let on_open = {
        let (group_id, tab_id) = (group_id.clone(), tab.id.clone());
        props.on_action.reform(move |_: MouseEvent| Action::OpenTab(group_id.clone(), tab_id.clone()))
    };
    let on_remove = {
        let (group_id, tab_id) = (group_id.clone(), tab.id.clone());
        props.on_action.reform(move |_: MouseEvent| Action::RemoveTab(group_id.clone(), tab_id.clone()))
    };

    html! {
        <div key={tab.id.to_string()} class="tab-item">
            if let Some(favicon) = &tab.favicon_url {
                <img src={favicon.clone()} class="favicon" alt="" />
            }
            <button
                class="tab-link"
                title={tab.url.clone().unwrap_or_default()}
                disabled={props.busy || !tab.restorable}
                onclick={on_open}
            >
                {&tab.title}
            </button>
            <Button
                onclick={on_remove}
                disabled={props.busy}
                variant={ButtonVariant::Danger}
                size={ButtonSize::Small}
            >
                {"✗"}
            </Button>
        </div>
    }
}

// Helper functions

fn manager(config: &Config) -> PopupManager {
    TabGroupManager::new(
        TabGroupStore::new(ChromeStorage, config.storage_key.clone()),
        ChromeTabs,
        JsClock,
    )
}

/// Run one action; `Some` carries a warning about per-tab failures
async fn run_action(manager: &PopupManager, action: Action) -> Result<Option<String>, TabGroupError> {
    match action {
        Action::Capture => {
            let report = manager.capture_current_window().await?;
            Ok(if !report.failures.is_empty() {
                Some(format!("{} tabs could not be closed", report.failures.len()))
            } else if !report.invoker_known {
                Some("Tabs saved, but the current tab could not be identified so none were closed".to_string())
            } else {
                None
            })
        }
        Action::OpenTab(group_id, tab_id) => manager.open_tab(group_id, tab_id).await.map(|_| None),
        Action::RemoveTab(group_id, tab_id) => manager.remove_tab(group_id, tab_id).await.map(|_| None),
        Action::RestoreGroup(group_id) => {
            let report = manager.restore_group(group_id).await?;
            let problems = report.failures.len() + report.skipped.len();
            Ok((problems > 0).then(|| format!("{} tabs could not be reopened", problems)))
        }
        Action::DeleteGroup(group_id) => manager.delete_group(group_id).await.map(|_| None),
    }
}

/// Reload the saved list, then settle the popup into `outcome`
async fn refresh(
    manager: &PopupManager,
    list: &UseStateHandle<TabGroupList>,
    state: &UseStateHandle<AppState>,
    outcome: AppState,
) {
    match manager.groups().await {
        Ok(groups) => {
            list.set(groups);
            state.set(outcome);
        }
        Err(e) => {
            log::error!("failed to load tab groups: {}", e);
            state.set(AppState::Error(format!("Failed to load: {}", e)));
        }
    }
}

fn format_captured(view: &GroupView) -> String {
    match view.captured_at_millis {
        Some(millis) => {
            let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02}",
                date.get_full_year(),
                date.get_month() + 1,
                date.get_date(),
                date.get_hours(),
                date.get_minutes()
            )
        }
        None => view.captured_at_label.clone(),
    }
}
