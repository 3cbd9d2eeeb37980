use crate::components::ui::{
    Alert, AlertDescription, Badge, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::models::User;
use crate::state::{handle_api_error, AppContext};
use crate::util::is_valid_email;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use wasm_bindgen::JsCast;

const MAX_IMAGE_BYTES: f64 = 5.0 * 1024.0 * 1024.0;

/// Own profile (view + edit + image upload) and, for admins following a
/// `?userId=` link from the moderation queue, a read-only view of another
/// account with ban/unban controls.
#[component]
pub fn ProfilePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let query = use_query_map();

    let subject: RwSignal<Option<User>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let success: RwSignal<Option<String>> = RwSignal::new(None);

    let is_editing: RwSignal<bool> = RwSignal::new(false);
    let edit_display_name: RwSignal<String> = RwSignal::new(String::new());
    let edit_email: RwSignal<String> = RwSignal::new(String::new());

    let inspected_id = move || {
        query
            .get()
            .get("userId")
            .and_then(|s| s.parse::<i64>().ok())
    };

    let session_settled =
        move || !app_state.0.user_loading.get() && app_state.0.user_refreshed_ms.get() > 0;

    // Whose profile is on screen: mine, or (admin only) the inspected one.
    Effect::new(move |_| {
        if !session_settled() {
            return;
        }

        let Some(me) = app_state.0.current_user.get() else {
            let _ = window().location().set_href("/login");
            return;
        };

        match inspected_id() {
            Some(id) if Some(id) != me.id => {
                if !me.is_admin() {
                    navigate.with_value(|nav| nav("/", Default::default()));
                    return;
                }
                if subject.get_untracked().and_then(|u| u.id) == Some(id) {
                    return;
                }

                loading.set(true);
                error.set(None);
                let api_client = app_state.0.api_client.get_untracked();
                spawn_local(async move {
                    match api_client.get_user(id).await {
                        Ok(user) => subject.set(Some(user)),
                        Err(e) => {
                            if !handle_api_error(&app_state.0, &e) {
                                error.set(Some(e.message));
                            }
                        }
                    }
                    loading.set(false);
                });
            }
            _ => {
                subject.set(Some(me));
                loading.set(false);
            }
        }
    });

    let viewing_self = Memo::new(move |_| {
        let me = app_state.0.current_user.get().and_then(|u| u.id);
        let shown = subject.get().and_then(|u| u.id);
        me.is_some() && me == shown
    });

    let toggle_edit = move |_| {
        if is_editing.get_untracked() {
            // Cancel editing.
            error.set(None);
            success.set(None);
            is_editing.set(false);
            return;
        }
        let Some(u) = subject.get_untracked() else {
            return;
        };
        edit_display_name.set(u.display_name.unwrap_or_default());
        edit_email.set(u.email);
        error.set(None);
        success.set(None);
        is_editing.set(true);
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = subject.get_untracked() else {
            return;
        };

        error.set(None);
        success.set(None);

        let email = edit_email.get_untracked();
        if email.trim().is_empty() {
            error.set(Some("Email is required".to_string()));
            return;
        }
        if !is_valid_email(&email) {
            error.set(Some("Invalid email format".to_string()));
            return;
        }

        // Display name is optional; empty keeps the current value.
        let display_name = {
            let v = edit_display_name.get_untracked();
            if v.trim().is_empty() {
                current.display_name.clone()
            } else {
                Some(v)
            }
        };

        let updated = User {
            display_name,
            email: email.trim().to_string(),
            ..current
        };

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.update_user(&updated).await {
                Ok(user) => {
                    subject.set(Some(user.clone()));
                    app_state.0.current_user.set(Some(user));
                    is_editing.set(false);
                    success.set(Some("Profile updated successfully".to_string()));
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_file_selected = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|fs| fs.get(0)) else {
            return;
        };

        if !file.type_().starts_with("image/") {
            error.set(Some("Please select an image file".to_string()));
            return;
        }
        if file.size() > MAX_IMAGE_BYTES {
            error.set(Some("Image size must be less than 5MB".to_string()));
            return;
        }

        error.set(None);
        success.set(None);

        let name = file.name();
        let mime = file.type_();
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let Ok(buf) = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await else {
                error.set(Some("Could not read the selected file".to_string()));
                return;
            };
            let bytes = js_sys::Uint8Array::new(&buf).to_vec();

            match api_client.upload_profile_image(&name, &mime, bytes).await {
                Ok(user) => {
                    subject.set(Some(user.clone()));
                    app_state.0.current_user.set(Some(user));
                    success.set(Some("Image uploaded successfully".to_string()));
                }
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let on_logout = move |_| {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            // Navigate regardless; the cookie is gone either way.
            let _ = api_client.logout().await;
            app_state.0.clear_session();
            let _ = window().location().set_href("/login");
        });
    };

    let on_toggle_ban = move |_| {
        let Some(target) = subject.get_untracked() else {
            return;
        };
        let Some(id) = target.id else {
            return;
        };
        let banned = target.is_banned();

        error.set(None);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = if banned {
                api_client.unban_user(id).await
            } else {
                api_client.ban_user(id).await
            };
            match result {
                Ok(user) => subject.set(Some(user)),
                Err(e) => {
                    if !handle_api_error(&app_state.0, &e) {
                        error.set(Some(e.message));
                    }
                }
            }
        });
    };

    let image_url = move || {
        let api_client = app_state.0.api_client.get_untracked();
        subject
            .get()
            .and_then(|u| u.image)
            .map(|path| api_client.asset_url(&path))
    };

    view! {
        <div class="mx-auto w-full max-w-lg space-y-4">
            <Show
                when=move || subject.get().is_some()
                fallback=move || view! {
                    <Show when=move || loading.get() fallback=|| ().into_view()>
                        <div class="flex items-center gap-2 text-sm text-muted-foreground">
                            <Spinner />
                            "Loading profile..."
                        </div>
                    </Show>
                }
            >
                <Card>
                    <CardHeader class="w-full">
                        <div class="flex w-full items-center justify-between gap-3">
                            <CardTitle class="text-lg">
                                {move || {
                                    subject
                                        .get()
                                        .map(|u| u.shown_name().to_string())
                                        .unwrap_or_default()
                                }}
                            </CardTitle>
                            <div class="flex items-center gap-2">
                                {move || {
                                    subject
                                        .get()
                                        .map(|u| {
                                            let role = if u.is_admin() { "Admin" } else { "User" };
                                            view! { <Badge>{role}</Badge> }
                                        })
                                }}
                                {move || {
                                    subject.get().and_then(|u| {
                                        u.is_banned().then(|| {
                                            view! { <Badge class="text-destructive">"Banned"</Badge> }
                                        })
                                    })
                                }}
                            </div>
                        </div>
                    </CardHeader>

                    <CardContent class="space-y-4">
                        <div class="flex items-center gap-4">
                            {move || match image_url() {
                                Some(url) => view! {
                                    <img
                                        src=url
                                        alt="Profile picture"
                                        class="size-16 rounded-full border object-cover"
                                    />
                                }
                                .into_any(),
                                None => view! {
                                    <div class="flex size-16 items-center justify-center rounded-full border bg-muted text-lg">
                                        {move || {
                                            subject
                                                .get()
                                                .map(|u| {
                                                    u.shown_name()
                                                        .chars()
                                                        .next()
                                                        .unwrap_or('?')
                                                        .to_uppercase()
                                                        .to_string()
                                                })
                                                .unwrap_or_default()
                                        }}
                                    </div>
                                }
                                .into_any(),
                            }}

                            <Show when=move || viewing_self.get() fallback=|| ().into_view()>
                                <label class="cursor-pointer text-xs text-primary underline underline-offset-4">
                                    "Change picture"
                                    <input
                                        type="file"
                                        accept="image/*"
                                        class="hidden"
                                        on:change=on_file_selected
                                    />
                                </label>
                            </Show>
                        </div>

                        <Show when=move || success.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                success.get().map(|m| {
                                    view! {
                                        <Alert>
                                            <AlertDescription class="text-xs">{m}</AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

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

                        <Show
                            when=move || is_editing.get() && viewing_self.get()
                            fallback=move || view! {
                                <div class="space-y-2 text-sm">
                                    <div class="flex items-center justify-between gap-2">
                                        <span class="text-muted-foreground">"Username"</span>
                                        <span>{move || subject.get().map(|u| u.username).unwrap_or_default()}</span>
                                    </div>
                                    <div class="flex items-center justify-between gap-2">
                                        <span class="text-muted-foreground">"Email"</span>
                                        <span>{move || subject.get().map(|u| u.email).unwrap_or_default()}</span>
                                    </div>
                                </div>
                            }
                        >
                            <form class="flex flex-col gap-3" on:submit=on_save>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="display_name" class="text-xs">"Display name"</Label>
                                    <Input
                                        id="display_name"
                                        placeholder="How your name appears to others"
                                        bind_value=edit_display_name
                                    />
                                </div>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="email" class="text-xs">"Email"</Label>
                                    <Input id="email" r#type="email" bind_value=edit_email required=true />
                                </div>
                                <div>
                                    <Button size=ButtonSize::Sm>"Save changes"</Button>
                                </div>
                            </form>
                        </Show>
                    </CardContent>
                </Card>

                <div class="flex items-center gap-2">
                    <Show when=move || viewing_self.get() fallback=|| ().into_view()>
                        <Button size=ButtonSize::Sm variant=ButtonVariant::Outline on:click=toggle_edit>
                            {move || if is_editing.get() { "Cancel" } else { "Edit profile" }}
                        </Button>
                        <Button size=ButtonSize::Sm variant=ButtonVariant::Ghost on:click=on_logout>
                            "Log out"
                        </Button>
                    </Show>

                    // Moderation: only shown to admins inspecting someone else.
                    <Show
                        when=move || {
                            !viewing_self.get() && app_state.0.is_admin() && subject.get().is_some()
                        }
                        fallback=|| ().into_view()
                    >
                        <Button
                            size=ButtonSize::Sm
                            variant=ButtonVariant::Destructive
                            on:click=on_toggle_ban
                        >
                            {move || {
                                let banned = subject
                                    .get()
                                    .map(|u| u.is_banned())
                                    .unwrap_or(false);
                                if banned { "Unban user" } else { "Ban user" }
                            }}
                        </Button>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
