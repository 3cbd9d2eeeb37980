use crate::access::capabilities_for;
use crate::api::ApiErrorKind;
use crate::components::ui::{
    Alert, AlertDescription, Badge, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardHeader, CardTitle, Input, Label, SelectNative, Spinner, Textarea,
};
use crate::models::{Comment, ListScope, Note, NoteCategory, NoteVisibility};
use crate::pager::{FetchPlan, Pager};
use crate::state::{handle_api_error, AppContext};
use crate::util::format_date_dmy;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;
use std::str::FromStr;
use strum::IntoEnumIterator;

const PAGE_SIZE: u32 = 10;

fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

#[component]
pub fn MyNotesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let pager: RwSignal<Pager<Note>> = RwSignal::new(Pager::new(PAGE_SIZE));
    let list_error: RwSignal<Option<String>> = RwSignal::new(None);
    let search: RwSignal<String> = RwSignal::new(String::new());

    // Moderators do not own notes; send them home. Signed-out visitors
    // go to the login page once the session has settled.
    Effect::new(move |_| {
        if app_state.0.user_loading.get() || app_state.0.user_refreshed_ms.get() == 0 {
            return;
        }
        match app_state.0.current_user.get() {
            Some(u) if u.is_admin() => {
                navigate.with_value(|nav| nav("/", Default::default()));
            }
            None => {
                let _ = window().location().set_href("/login");
            }
            _ => {}
        }
    });

    let run_plan = move |plan: FetchPlan| {
        list_error.set(None);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_note_page(&plan.query).await {
                Ok(page) => {
                    pager.update(|p| {
                        p.apply_page(plan.token, page);
                    });
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Error loading notes: {e}").into());
                    pager.update(|p| {
                        p.mark_failed(plan.token);
                    });
                    if !handle_api_error(&app_state.0, &e) {
                        list_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    // Initial page-0 fetch.
    Effect::new(move |_| {
        let plan = pager.write().refresh();
        run_plan(plan);
    });

    // Each search change resets the cursor and issues exactly one fetch.
    Effect::new(move |_| {
        let term = search.get();
        let unchanged = pager.with_untracked(|p| p.search().unwrap_or("") == term.trim());
        if unchanged {
            return;
        }
        let plan = pager.write().set_search(&term);
        run_plan(plan);
    });

    let on_category = move |category: NoteCategory| {
        let plan = pager.write().set_filter(category);
        run_plan(plan);
    };

    let on_shared_toggle = move |_| {
        let next = if pager.with_untracked(|p| p.scope()) == ListScope::SharedWithMe {
            ListScope::Own
        } else {
            ListScope::SharedWithMe
        };
        let plan = pager.write().set_scope(next);
        run_plan(plan);
    };

    let on_load_more = move |_| {
        let plan = pager.try_update(|p| p.load_more()).flatten();
        if let Some(plan) = plan {
            run_plan(plan);
        }
    };

    let on_delete = move |id: i64| {
        if !confirm("Are you sure you want to delete this note?") {
            return;
        }
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_note(id).await {
                Ok(()) => {
                    // Optimistic local removal; no refetch.
                    pager.update(|p| p.remove_where(|n| n.id == Some(id)));
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        list_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let shared_active = move || pager.with(|p| p.scope() == ListScope::SharedWithMe);
    let items = move || pager.with(|p| p.items().to_vec());
    let loading = move || pager.with(|p| p.is_loading());
    let has_more = move || pager.with(|p| p.has_more());

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <div class="space-y-1">
                    <h1 class="text-xl font-semibold">"My notes"</h1>
                    <p class="text-xs text-muted-foreground">
                        {move || {
                            if shared_active() {
                                "Notes other people shared with you.".to_string()
                            } else {
                                format!("{} total", pager.with(|p| p.total()))
                            }
                        }}
                    </p>
                </div>

                <Button on:click=move |_| {
                    navigate.with_value(|nav| nav("/notes/create", Default::default()));
                }>
                    "New note"
                </Button>
            </div>

            <form on:submit=|ev: web_sys::SubmitEvent| ev.prevent_default()>
                <Input placeholder="Search notes..." bind_value=search class="max-w-sm" />
            </form>

            <div class="flex flex-wrap items-center gap-2">
                {move || {
                    let selected = pager.with(|p| p.category());
                    let shared = pager.with(|p| p.scope() == ListScope::SharedWithMe);

                    let mut chips = NoteCategory::iter()
                        .map(|category| {
                            let class = if selected == Some(category) {
                                "border-primary text-foreground"
                            } else {
                                ""
                            };
                            view! {
                                <Button
                                    size=ButtonSize::Chip
                                    variant=ButtonVariant::Outline
                                    class=class
                                    on:click=move |_| on_category(category)
                                >
                                    {format!("{} {}", category.icon(), category.display_name())}
                                </Button>
                            }
                            .into_any()
                        })
                        .collect::<Vec<_>>();

                    chips.push(
                        view! {
                            <Button
                                size=ButtonSize::Chip
                                variant=ButtonVariant::Outline
                                class=if shared { "border-primary text-foreground" } else { "" }
                                on:click=on_shared_toggle
                            >
                                "🤝 Shared with me"
                            </Button>
                        }
                        .into_any(),
                    );

                    chips.into_iter().collect_view()
                }}
            </div>

            <Show when=move || list_error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    list_error.get().map(|e| {
                        view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                            </Alert>
                        }
                    })
                }}
            </Show>

            <Show
                when=move || !items().is_empty()
                fallback=move || view! {
                    <div class="rounded-md border border-border p-6 text-sm text-muted-foreground">
                        {move || if loading() { "Loading notes..." } else { "No notes found." }}
                    </div>
                }
            >
                <div class="grid grid-cols-1 gap-3 sm:grid-cols-2 lg:grid-cols-3">
                    {move || {
                        items()
                            .into_iter()
                            .map(|note| {
                                let id = note.id;
                                let title = note.title.clone();
                                let overview = note.overview.clone();
                                let category = note.category.unwrap_or(NoteCategory::Others);
                                let date = note
                                    .last_modified
                                    .as_deref()
                                    .map(format_date_dmy)
                                    .unwrap_or_default();
                                let open = move |_| {
                                    if let Some(id) = id {
                                        navigate.with_value(|nav| {
                                            nav(&format!("/notes/{id}"), Default::default());
                                        });
                                    }
                                };
                                view! {
                                    <div
                                        class="flex cursor-pointer flex-col gap-2 rounded-xl border bg-card p-4 shadow-sm transition-colors hover:bg-accent/30"
                                        on:click=open
                                    >
                                        <div class="flex items-center justify-between gap-2">
                                            <Badge>{format!("{} {}", category.icon(), category.display_name())}</Badge>
                                            <button
                                                class="text-xs text-muted-foreground hover:text-destructive"
                                                on:click=move |ev: web_sys::MouseEvent| {
                                                    ev.stop_propagation();
                                                    if let Some(id) = id {
                                                        on_delete(id);
                                                    }
                                                }
                                            >
                                                "Delete"
                                            </button>
                                        </div>
                                        <div class="truncate text-sm font-medium">{title}</div>
                                        <div class="line-clamp-2 text-xs text-muted-foreground">{overview}</div>
                                        <div class="text-xs text-muted-foreground">{date}</div>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>
            </Show>

            <Show when=has_more fallback=|| ().into_view()>
                <div class="flex justify-center pt-2">
                    <Button
                        variant=ButtonVariant::Outline
                        attr:disabled=loading
                        on:click=on_load_more
                    >
                        <span class="inline-flex items-center gap-2">
                            <Show when=loading fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if loading() { "Loading..." } else { "Load more" }}
                        </span>
                    </Button>
                </div>
            </Show>
        </div>
    }
}

#[component]
pub fn CreateNotePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let title: RwSignal<String> = RwSignal::new(String::new());
    let overview: RwSignal<String> = RwSignal::new(String::new());
    let summary: RwSignal<String> = RwSignal::new(String::new());
    let visibility: RwSignal<String> = RwSignal::new("PRIVATE".to_string());
    let category: RwSignal<String> = RwSignal::new("OTHERS".to_string());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let title_val = title.get();
        if title_val.trim().is_empty() {
            error.set(Some("Title is required".to_string()));
            return;
        }

        let note = Note {
            title: title_val,
            overview: overview.get(),
            summary: summary.get(),
            visibility: NoteVisibility::from_str(&visibility.get()).ok(),
            category: NoteCategory::from_str(&category.get()).ok(),
            ..Default::default()
        };

        let api_client = app_state.0.api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.create_note(&note).await {
                Ok(created) => {
                    if let Some(id) = created.id {
                        navigate.with_value(|nav| {
                            nav(&format!("/notes/{id}"), Default::default());
                        });
                    } else {
                        navigate.with_value(|nav| nav("/notes", Default::default()));
                    }
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        error.set(Some(e.message));
                    }
                }
            }
            loading.set(false);
        });
    };

    let visibility_options = NoteVisibility::iter()
        .map(|v| {
            let label = match v {
                NoteVisibility::Public => "Public",
                NoteVisibility::Private => "Private",
            };
            (v.to_string(), label.to_string())
        })
        .collect::<Vec<_>>();

    let category_options = NoteCategory::iter()
        .map(|c| (c.to_string(), c.display_name().to_string()))
        .collect::<Vec<_>>();

    view! {
        <div class="mx-auto w-full max-w-lg">
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"New note"</CardTitle>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="title" class="text-xs">"Title"</Label>
                            <Input id="title" placeholder="Note title" bind_value=title required=true />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="overview" class="text-xs">"Overview"</Label>
                            <Textarea id="overview" rows=2 placeholder="One-paragraph overview" bind_value=overview />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="summary" class="text-xs">"Summary"</Label>
                            <Textarea id="summary" rows=6 placeholder="The full summary" bind_value=summary />
                        </div>

                        <div class="grid grid-cols-2 gap-3">
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="category" class="text-xs">"Category"</Label>
                                <SelectNative id="category" options=category_options bind_value=category />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="visibility" class="text-xs">"Visibility"</Label>
                                <SelectNative id="visibility" options=visibility_options bind_value=visibility />
                            </div>
                        </div>

                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

                        <div class="flex items-center gap-2 pt-1">
                            <Button attr:disabled=move || loading.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Creating..." } else { "Create note" }}
                                </span>
                            </Button>
                            <Button
                                variant=ButtonVariant::Ghost
                                on:click=move |ev: web_sys::MouseEvent| {
                                    ev.prevent_default();
                                    navigate.with_value(|nav| nav("/profile", Default::default()));
                                }
                            >
                                "Cancel"
                            </Button>
                        </div>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NoteRouteParams {
    pub id: Option<String>,
}

#[component]
pub fn NoteDetailPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<NoteRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    let note: RwSignal<Option<Note>> = RwSignal::new(None);
    let note_loading: RwSignal<bool> = RwSignal::new(true);
    let note_error: RwSignal<Option<String>> = RwSignal::new(None);

    let comments: RwSignal<Pager<Comment>> = RwSignal::new(Pager::new(PAGE_SIZE));
    let comments_error: RwSignal<Option<String>> = RwSignal::new(None);
    let comment_text: RwSignal<String> = RwSignal::new(String::new());

    let is_editing: RwSignal<bool> = RwSignal::new(false);
    let edit_title: RwSignal<String> = RwSignal::new(String::new());
    let edit_overview: RwSignal<String> = RwSignal::new(String::new());
    let edit_summary: RwSignal<String> = RwSignal::new(String::new());
    let edit_visibility: RwSignal<String> = RwSignal::new("PRIVATE".to_string());
    let edit_category: RwSignal<String> = RwSignal::new("OTHERS".to_string());
    let edit_error: RwSignal<Option<String>> = RwSignal::new(None);

    let share_username: RwSignal<String> = RwSignal::new(String::new());
    let share_message: RwSignal<Option<String>> = RwSignal::new(None);
    let share_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Params are reactive; read tracked in effects/views.
    let note_id = move || {
        params
            .get()
            .ok()
            .and_then(|p| p.id)
            .and_then(|s| s.parse::<i64>().ok())
    };

    // Load the note whenever the route id changes.
    Effect::new(move |_| {
        let Some(id) = note_id() else {
            return;
        };

        note_loading.set(true);
        note_error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_note(id).await {
                Ok(n) => note.set(Some(n)),
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        let msg = if e.kind == ApiErrorKind::NotFound {
                            "Note not found".to_string()
                        } else {
                            e.message
                        };
                        note_error.set(Some(msg));
                    }
                }
            }
            note_loading.set(false);
        });
    });

    let run_comments_plan = move |id: i64, plan: FetchPlan| {
        comments_error.set(None);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client
                .get_comments(id, plan.query.page, plan.query.page_size)
                .await
            {
                Ok(page) => {
                    comments.update(|p| {
                        p.apply_page(plan.token, page);
                    });
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Error loading comments: {e}").into());
                    comments.update(|p| {
                        p.mark_failed(plan.token);
                    });
                    if !handle_api_error(&app_state.0, &e) {
                        comments_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    // Comments belong to the loaded note; (re)load when its id changes.
    let loaded_note_id = Memo::new(move |_| note.get().and_then(|n| n.id));
    Effect::new(move |_| {
        let Some(id) = loaded_note_id.get() else {
            return;
        };
        let plan = comments.write().refresh();
        run_comments_plan(id, plan);
    });

    let caps = Memo::new(move |_| {
        let user = app_state.0.current_user.get();
        capabilities_for(note.get().and_then(|n| n.user_id), user.as_ref())
    });

    let start_edit = move |_| {
        let Some(n) = note.get_untracked() else {
            return;
        };
        edit_title.set(n.title);
        edit_overview.set(n.overview);
        edit_summary.set(n.summary);
        edit_visibility.set(
            n.visibility
                .unwrap_or(NoteVisibility::Private)
                .to_string(),
        );
        edit_category.set(n.category.unwrap_or(NoteCategory::Others).to_string());
        edit_error.set(None);
        is_editing.set(true);
    };

    let on_save = move |_| {
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        let title_val = edit_title.get_untracked();
        if title_val.trim().is_empty() {
            edit_error.set(Some("Title is required".to_string()));
            return;
        }

        let updated = Note {
            title: title_val,
            overview: edit_overview.get_untracked(),
            summary: edit_summary.get_untracked(),
            visibility: NoteVisibility::from_str(&edit_visibility.get_untracked()).ok(),
            category: NoteCategory::from_str(&edit_category.get_untracked()).ok(),
            ..Default::default()
        };

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.update_note(id, &updated).await {
                Ok(saved) => {
                    note.set(Some(saved));
                    is_editing.set(false);
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        edit_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_delete_note = move |_| {
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        if !confirm("Are you sure you want to delete this note?") {
            return;
        }
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_note(id).await {
                Ok(()) => {
                    navigate.with_value(|nav| nav("/notes", Default::default()));
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        note_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_share = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        let username = share_username.get_untracked();
        if username.trim().is_empty() {
            return;
        }

        share_message.set(None);
        share_error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.share_note_with_username(id, username.trim()).await {
                Ok(updated) => {
                    note.set(Some(updated));
                    share_message.set(Some(format!("Shared with {}", username.trim())));
                    share_username.set(String::new());
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::NotFound {
                        share_error.set(Some("User not found".to_string()));
                    } else if !handle_api_error(&app_state.0, &e) {
                        share_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_submit_comment = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        let content = comment_text.get_untracked();
        if content.trim().is_empty() {
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.create_comment(id, content.trim()).await {
                Ok(_) => {
                    comment_text.set(String::new());
                    let plan = comments.write().refresh();
                    run_comments_plan(id, plan);
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        comments_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_delete_comment = move |comment_id: i64| {
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        if !confirm("Delete this comment?") {
            return;
        }
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_comment(id, comment_id).await {
                Ok(()) => {
                    comments.update(|p| p.remove_where(|c| c.id == Some(comment_id)));
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        comments_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_report_comment = move |comment_id: i64| {
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.report_comment(id, comment_id).await {
                Ok(_) => {
                    let plan = comments.write().refresh();
                    run_comments_plan(id, plan);
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        comments_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_load_more_comments = move |_| {
        let Some(id) = note.get_untracked().and_then(|n| n.id) else {
            return;
        };
        let plan = comments.try_update(|p| p.load_more()).flatten();
        if let Some(plan) = plan {
            run_comments_plan(id, plan);
        }
    };

    let comment_items = move || comments.with(|p| p.items().to_vec());
    let comments_loading = move || comments.with(|p| p.is_loading());
    let comments_have_more = move || comments.with(|p| p.has_more());

    view! {
        <div class="mx-auto w-full max-w-2xl space-y-6">
            <Show when=move || note_error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    note_error.get().map(|e| {
                        view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-sm">{e}</AlertDescription>
                            </Alert>
                        }
                    })
                }}
            </Show>

            <Show
                when=move || note.get().is_some()
                fallback=move || view! {
                    <Show when=move || note_loading.get() fallback=|| ().into_view()>
                        <div class="flex items-center gap-2 text-sm text-muted-foreground">
                            <Spinner />
                            "Loading note..."
                        </div>
                    </Show>
                }
            >
                {move || {
                    let visibility_options = NoteVisibility::iter()
                        .map(|v| {
                            let label = match v {
                                NoteVisibility::Public => "Public",
                                NoteVisibility::Private => "Private",
                            };
                            (v.to_string(), label.to_string())
                        })
                        .collect::<Vec<_>>();
                    let category_options = NoteCategory::iter()
                        .map(|c| (c.to_string(), c.display_name().to_string()))
                        .collect::<Vec<_>>();

                    let n = note.get().unwrap_or_default();
                    let category = n.category.unwrap_or(NoteCategory::Others);
                    let visibility = n.visibility.unwrap_or(NoteVisibility::Private);
                    let date = n
                        .last_modified
                        .as_deref()
                        .map(format_date_dmy)
                        .unwrap_or_default();
                    let shared_count = n.shared_with_user_ids.len();
                    view! {
                        <Card>
                            <CardHeader class="w-full">
                                <div class="flex w-full items-start justify-between gap-3">
                                    <div class="space-y-2">
                                        <CardTitle class="text-xl">{n.title.clone()}</CardTitle>
                                        <div class="flex flex-wrap items-center gap-2">
                                            <Badge>{format!("{} {}", category.icon(), category.display_name())}</Badge>
                                            <Badge>
                                                {match visibility {
                                                    NoteVisibility::Public => "Public",
                                                    NoteVisibility::Private => "Private",
                                                }}
                                            </Badge>
                                            <Show when=move || { shared_count > 0 } fallback=|| ().into_view()>
                                                <Badge>{format!("Shared with {shared_count}")}</Badge>
                                            </Show>
                                            <span class="text-xs text-muted-foreground">{date.clone()}</span>
                                        </div>
                                    </div>

                                    <div class="flex shrink-0 items-center gap-2">
                                        <Show when=move || caps.get().can_edit && !is_editing.get() fallback=|| ().into_view()>
                                            <Button size=ButtonSize::Sm variant=ButtonVariant::Outline on:click=start_edit>
                                                "Edit"
                                            </Button>
                                        </Show>
                                        <Show when=move || caps.get().can_delete fallback=|| ().into_view()>
                                            <Button size=ButtonSize::Sm variant=ButtonVariant::Destructive on:click=on_delete_note>
                                                "Delete"
                                            </Button>
                                        </Show>
                                    </div>
                                </div>
                            </CardHeader>

                            <CardContent>
                                <Show
                                    when=move || is_editing.get()
                                    fallback=move || {
                                        let n = note.get().unwrap_or_default();
                                        let overview = n.overview.clone();
                                        let has_overview = !overview.trim().is_empty();
                                        let summary = n.summary;
                                        view! {
                                            <div class="space-y-4">
                                                <Show when=move || has_overview fallback=|| ().into_view()>
                                                    <div class="space-y-1">
                                                        <div class="text-xs font-medium text-muted-foreground">"Overview"</div>
                                                        <p class="text-sm">{overview.clone()}</p>
                                                    </div>
                                                </Show>
                                                <div class="space-y-1">
                                                    <div class="text-xs font-medium text-muted-foreground">"Summary"</div>
                                                    <p class="whitespace-pre-wrap text-sm">{summary}</p>
                                                </div>
                                            </div>
                                        }
                                    }
                                >
                                    <div class="flex flex-col gap-3">
                                        <div class="flex flex-col gap-1.5">
                                            <Label html_for="edit_title" class="text-xs">"Title"</Label>
                                            <Input id="edit_title" bind_value=edit_title />
                                        </div>
                                        <div class="flex flex-col gap-1.5">
                                            <Label html_for="edit_overview" class="text-xs">"Overview"</Label>
                                            <Textarea id="edit_overview" rows=2 bind_value=edit_overview />
                                        </div>
                                        <div class="flex flex-col gap-1.5">
                                            <Label html_for="edit_summary" class="text-xs">"Summary"</Label>
                                            <Textarea id="edit_summary" rows=6 bind_value=edit_summary />
                                        </div>
                                        <div class="grid grid-cols-2 gap-3">
                                            <div class="flex flex-col gap-1.5">
                                                <Label html_for="edit_category" class="text-xs">"Category"</Label>
                                                <SelectNative id="edit_category" options=category_options.clone() bind_value=edit_category />
                                            </div>
                                            <div class="flex flex-col gap-1.5">
                                                <Label html_for="edit_visibility" class="text-xs">"Visibility"</Label>
                                                <SelectNative id="edit_visibility" options=visibility_options.clone() bind_value=edit_visibility />
                                            </div>
                                        </div>

                                        <Show when=move || edit_error.get().is_some() fallback=|| ().into_view()>
                                            {move || {
                                                edit_error.get().map(|e| {
                                                    view! {
                                                        <Alert class="border-destructive/30">
                                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                                        </Alert>
                                                    }
                                                })
                                            }}
                                        </Show>

                                        <div class="flex items-center gap-2">
                                            <Button size=ButtonSize::Sm on:click=on_save>"Save"</Button>
                                            <Button
                                                size=ButtonSize::Sm
                                                variant=ButtonVariant::Ghost
                                                on:click=move |_| is_editing.set(false)
                                            >
                                                "Cancel"
                                            </Button>
                                        </div>
                                    </div>
                                </Show>
                            </CardContent>
                        </Card>
                    }
                }}

                // Sharing is an owner action.
                <Show when=move || caps.get().can_edit fallback=|| ().into_view()>
                    <Card>
                        <CardHeader>
                            <CardTitle class="text-sm">"Share this note"</CardTitle>
                        </CardHeader>
                        <CardContent>
                            <form class="flex items-center gap-2" on:submit=on_share>
                                <Input
                                    placeholder="Username to share with"
                                    bind_value=share_username
                                    class="max-w-xs"
                                />
                                <Button size=ButtonSize::Sm>"Share"</Button>
                            </form>

                            <Show when=move || share_message.get().is_some() fallback=|| ().into_view()>
                                <p class="pt-2 text-xs text-muted-foreground">
                                    {move || share_message.get().unwrap_or_default()}
                                </p>
                            </Show>
                            <Show when=move || share_error.get().is_some() fallback=|| ().into_view()>
                                <p class="pt-2 text-xs text-destructive">
                                    {move || share_error.get().unwrap_or_default()}
                                </p>
                            </Show>
                        </CardContent>
                    </Card>
                </Show>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-sm">
                            {move || format!("Comments ({})", comments.with(|p| p.total()))}
                        </CardTitle>
                    </CardHeader>
                    <CardContent class="space-y-4">
                        <form class="flex flex-col gap-2" on:submit=on_submit_comment>
                            <Textarea rows=2 placeholder="Write a comment..." bind_value=comment_text />
                            <div>
                                <Button size=ButtonSize::Sm>"Comment"</Button>
                            </div>
                        </form>

                        <Show when=move || comments_error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                comments_error.get().map(|e| {
                                    view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

                        <Show
                            when=move || !comment_items().is_empty()
                            fallback=move || view! {
                                <div class="text-xs text-muted-foreground">
                                    {move || if comments_loading() { "Loading comments..." } else { "No comments yet." }}
                                </div>
                            }
                        >
                            <div class="flex flex-col gap-3">
                                {move || {
                                    let user = app_state.0.current_user.get();
                                    comment_items()
                                        .into_iter()
                                        .map(|comment| {
                                            let comment_id = comment.id;
                                            let author = comment
                                                .display_name
                                                .clone()
                                                .filter(|d| !d.trim().is_empty())
                                                .or_else(|| comment.username.clone())
                                                .unwrap_or_else(|| "Unknown".to_string());
                                            let date = comment
                                                .created_at
                                                .as_deref()
                                                .map(format_date_dmy)
                                                .unwrap_or_default();
                                            let comment_caps =
                                                capabilities_for(comment.user_id, user.as_ref());
                                            let own = user
                                                .as_ref()
                                                .and_then(|u| u.id)
                                                .is_some_and(|uid| comment.user_id == Some(uid));
                                            let reported = comment.is_reported;
                                            view! {
                                                <div class="rounded-md border px-3 py-2">
                                                    <div class="flex items-center justify-between gap-2">
                                                        <div class="text-xs font-medium">{author}</div>
                                                        <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                                            <span>{date}</span>
                                                            <Show when=move || reported fallback=|| ().into_view()>
                                                                <span class="text-destructive">"Reported"</span>
                                                            </Show>
                                                            <Show when=move || !own && !reported fallback=|| ().into_view()>
                                                                <button
                                                                    class="hover:text-destructive"
                                                                    on:click=move |_| {
                                                                        if let Some(id) = comment_id {
                                                                            on_report_comment(id);
                                                                        }
                                                                    }
                                                                >
                                                                    "Report"
                                                                </button>
                                                            </Show>
                                                            <Show when=move || comment_caps.can_delete fallback=|| ().into_view()>
                                                                <button
                                                                    class="hover:text-destructive"
                                                                    on:click=move |_| {
                                                                        if let Some(id) = comment_id {
                                                                            on_delete_comment(id);
                                                                        }
                                                                    }
                                                                >
                                                                    "Delete"
                                                                </button>
                                                            </Show>
                                                        </div>
                                                    </div>
                                                    <p class="pt-1 text-sm">{comment.content.clone()}</p>
                                                </div>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </div>
                        </Show>

                        <Show when=comments_have_more fallback=|| ().into_view()>
                            <div class="flex justify-center">
                                <Button
                                    size=ButtonSize::Sm
                                    variant=ButtonVariant::Outline
                                    attr:disabled=comments_loading
                                    on:click=on_load_more_comments
                                >
                                    {move || if comments_loading() { "Loading..." } else { "Load more comments" }}
                                </Button>
                            </div>
                        </Show>
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}
