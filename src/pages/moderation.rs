use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader,
    CardTitle, Spinner,
};
use crate::models::Comment;
use crate::pager::{FetchPlan, Pager};
use crate::state::{handle_api_error, AppContext};
use crate::util::format_date_dmy;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

const PAGE_SIZE: u32 = 10;

/// Admin moderation queue over reported comments. Same pager core as the
/// note list; unreport/delete invalidate the whole queue and re-fetch
/// from page 0.
#[component]
pub fn ReportedCommentsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let pager: RwSignal<Pager<Comment>> = RwSignal::new(Pager::new(PAGE_SIZE));
    let list_error: RwSignal<Option<String>> = RwSignal::new(None);
    let action_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Only admins belong here; everyone else goes to the safe default.
    Effect::new(move |_| {
        if app_state.0.user_loading.get() || app_state.0.user_refreshed_ms.get() == 0 {
            return;
        }
        match app_state.0.current_user.get() {
            Some(u) if !u.is_admin() => {
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
            match api_client
                .get_reported_comments(plan.query.page, plan.query.page_size)
                .await
            {
                Ok(page) => {
                    pager.update(|p| {
                        p.apply_page(plan.token, page);
                    });
                }
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("Error loading reported comments: {e}").into(),
                    );
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

    Effect::new(move |_| {
        let plan = pager.write().refresh();
        run_plan(plan);
    });

    let on_load_more = move |_| {
        let plan = pager.try_update(|p| p.load_more()).flatten();
        if let Some(plan) = plan {
            run_plan(plan);
        }
    };

    let refresh_queue = move || {
        let plan = pager.write().refresh();
        run_plan(plan);
    };

    let on_ignore = move |comment_id: i64| {
        action_error.set(None);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.unreport_comment(comment_id).await {
                Ok(_) => refresh_queue(),
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        action_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_delete = move |comment_id: i64| {
        if !window()
            .confirm_with_message(
                "Are you sure you want to delete this comment? This action cannot be undone.",
            )
            .unwrap_or(false)
        {
            return;
        }

        action_error.set(None);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_reported_comment(comment_id).await {
                Ok(()) => refresh_queue(),
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        action_error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let items = move || pager.with(|p| p.items().to_vec());
    let loading = move || pager.with(|p| p.is_loading());
    let has_more = move || pager.with(|p| p.has_more());

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"Reported comments"</h1>
                <p class="text-xs text-muted-foreground">
                    {move || format!("{} reported", pager.with(|p| p.total()))}
                </p>
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

            <Show when=move || action_error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    action_error.get().map(|e| {
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
                    <Card>
                        <CardContent>
                            <div class="flex items-center gap-2 text-sm text-muted-foreground">
                                <Show when=loading fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading() {
                                    "Loading reported comments..."
                                } else {
                                    "The moderation queue is empty."
                                }}
                            </div>
                        </CardContent>
                    </Card>
                }
            >
                <div class="flex flex-col gap-3">
                    {move || {
                        items()
                            .into_iter()
                            .map(|comment| {
                                let comment_id = comment.id;
                                let note_id = comment.note_id;
                                let user_id = comment.user_id;
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
                                view! {
                                    <Card>
                                        <CardHeader class="w-full">
                                            <div class="flex w-full items-center justify-between gap-2">
                                                <CardTitle class="text-sm">
                                                    <button
                                                        class="hover:underline"
                                                        on:click=move |_| {
                                                            if let Some(id) = user_id {
                                                                navigate.with_value(|nav| {
                                                                    nav(
                                                                        &format!("/profile?userId={id}"),
                                                                        Default::default(),
                                                                    );
                                                                });
                                                            }
                                                        }
                                                    >
                                                        {author}
                                                    </button>
                                                </CardTitle>
                                                <span class="text-xs text-muted-foreground">{date}</span>
                                            </div>
                                        </CardHeader>
                                        <CardContent class="space-y-3">
                                            <p class="text-sm">{comment.content.clone()}</p>

                                            <div class="flex items-center gap-2">
                                                <Button
                                                    size=ButtonSize::Sm
                                                    variant=ButtonVariant::Outline
                                                    on:click=move |_| {
                                                        if let Some(id) = note_id {
                                                            navigate.with_value(|nav| {
                                                                nav(&format!("/notes/{id}"), Default::default());
                                                            });
                                                        }
                                                    }
                                                >
                                                    "View note"
                                                </Button>
                                                <Button
                                                    size=ButtonSize::Sm
                                                    variant=ButtonVariant::Ghost
                                                    on:click=move |_| {
                                                        if let Some(id) = comment_id {
                                                            on_ignore(id);
                                                        }
                                                    }
                                                >
                                                    "Ignore report"
                                                </Button>
                                                <Button
                                                    size=ButtonSize::Sm
                                                    variant=ButtonVariant::Destructive
                                                    on:click=move |_| {
                                                        if let Some(id) = comment_id {
                                                            on_delete(id);
                                                        }
                                                    }
                                                >
                                                    "Delete comment"
                                                </Button>
                                            </div>
                                        </CardContent>
                                    </Card>
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
                        {move || if loading() { "Loading..." } else { "Load more" }}
                    </Button>
                </div>
            </Show>
        </div>
    }
}
