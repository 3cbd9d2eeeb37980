use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::models::User;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};

mod moderation;
mod notes;
mod profile;

pub use moderation::ReportedCommentsPage;
pub use notes::{CreateNotePage, MyNotesPage, NoteDetailPage};
pub use profile::ProfilePage;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMode {
    Login,
    Register,
}

/// Login and registration share one component; the route picks the mode.
#[component]
pub fn AuthPage(mode: AuthMode) -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let repeat_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let registered: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        error.set(None);

        let username_val = username.get();
        let password_val = password.get();
        let api_client = app_state.0.api_client.get_untracked();

        match mode {
            AuthMode::Login => {
                if username_val.trim().is_empty() || password_val.is_empty() {
                    error.set(Some("Username and password are required".to_string()));
                    return;
                }

                loading.set(true);
                spawn_local(async move {
                    match api_client.login(&username_val, &password_val).await {
                        Ok(body) => {
                            // The server marks soft failures in the body.
                            let status = body.get("status").and_then(|s| s.as_str());
                            if status.is_some_and(|s| s != "SUCCESS") {
                                error.set(Some("Bad credentials".to_string()));
                            } else {
                                // Cookies are set; load the session user and move on.
                                app_state.0.refresh_current_user(true);
                                navigate.with_value(|nav| nav("/profile", Default::default()));
                            }
                        }
                        Err(e) => {
                            if e.kind == crate::api::ApiErrorKind::Forbidden {
                                // Banned accounts are refused with a 403.
                                let _ = window().location().set_href("/banned");
                            } else {
                                error.set(Some("Bad credentials".to_string()));
                            }
                        }
                    }
                    loading.set(false);
                });
            }
            AuthMode::Register => {
                let email_val = email.get();
                let repeat_val = repeat_password.get();

                if username_val.trim().is_empty()
                    || email_val.trim().is_empty()
                    || password_val.is_empty()
                {
                    error.set(Some("All fields are required".to_string()));
                    return;
                }
                if password_val != repeat_val {
                    error.set(Some("Passwords do not match".to_string()));
                    return;
                }
                if password_val.len() < 8 {
                    error.set(Some("Password must be at least 8 characters".to_string()));
                    return;
                }

                let user = User {
                    username: username_val,
                    email: email_val,
                    password: password_val,
                    ..Default::default()
                };

                loading.set(true);
                spawn_local(async move {
                    match api_client.register(&user).await {
                        Ok(_) => registered.set(true),
                        Err(e) => {
                            if e.message.to_lowercase().contains("already exists") {
                                error.set(Some(e.message));
                            } else {
                                error.set(Some(
                                    "Registration error. Please try again.".to_string(),
                                ));
                            }
                        }
                    }
                    loading.set(false);
                });
            }
        }
    };

    let title = match mode {
        AuthMode::Login => "Log in",
        AuthMode::Register => "Create account",
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Planner"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">{title}</CardTitle>
                        <CardDescription class="text-xs">
                            {match mode {
                                AuthMode::Login => "Use your username and password to continue.",
                                AuthMode::Register => "Notes, comments and sharing, in one place.",
                            }}
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <Show
                            when=move || !registered.get()
                            fallback=move || view! {
                                <Alert>
                                    <AlertDescription class="text-xs">
                                        "Registered successfully. You can now "
                                        <a class="text-primary underline underline-offset-4" href="/login">"log in"</a>
                                        "."
                                    </AlertDescription>
                                </Alert>
                            }
                        >
                            <form class="flex flex-col gap-3" on:submit=on_submit>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="username" class="text-xs">"Username"</Label>
                                    <Input
                                        id="username"
                                        placeholder="yourname"
                                        bind_value=username
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <Show when=move || mode == AuthMode::Register fallback=|| ().into_view()>
                                    <div class="flex flex-col gap-1.5">
                                        <Label html_for="email" class="text-xs">"Email"</Label>
                                        <Input
                                            id="email"
                                            r#type="email"
                                            placeholder="you@example.com"
                                            bind_value=email
                                            required=true
                                            class="h-8 text-sm"
                                        />
                                    </div>
                                </Show>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="password" class="text-xs">"Password"</Label>
                                    <Input
                                        id="password"
                                        r#type="password"
                                        placeholder="••••••••"
                                        bind_value=password
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <Show when=move || mode == AuthMode::Register fallback=|| ().into_view()>
                                    <div class="flex flex-col gap-1.5">
                                        <Label html_for="repeat_password" class="text-xs">"Repeat password"</Label>
                                        <Input
                                            id="repeat_password"
                                            r#type="password"
                                            placeholder="••••••••"
                                            bind_value=repeat_password
                                            required=true
                                            class="h-8 text-sm"
                                        />
                                    </div>
                                </Show>

                                <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                    {move || {
                                        error.get().map(|e| {
                                            view! {
                                                <Alert class="border-destructive/30">
                                                    <AlertDescription class="text-destructive text-xs">
                                                        {e}
                                                    </AlertDescription>
                                                </Alert>
                                            }
                                        })
                                    }}
                                </Show>

                                <Button
                                    class="w-full"
                                    size=ButtonSize::Sm
                                    attr:disabled=move || loading.get()
                                >
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || loading.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        {move || match (mode, loading.get()) {
                                            (AuthMode::Login, true) => "Signing in...",
                                            (AuthMode::Login, false) => "Continue",
                                            (AuthMode::Register, true) => "Creating...",
                                            (AuthMode::Register, false) => "Continue",
                                        }}
                                    </span>
                                </Button>

                                <div class="pt-1 text-xs text-muted-foreground">
                                    {match mode {
                                        AuthMode::Login => view! {
                                            <span>
                                                "No account? "
                                                <a class="text-primary underline underline-offset-4" href="/register">"Sign up"</a>
                                            </span>
                                        },
                                        AuthMode::Register => view! {
                                            <span>
                                                "Already have an account? "
                                                <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                                            </span>
                                        },
                                    }}
                                </div>
                            </form>
                        </Show>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

/// Shared chrome for signed-in pages. Refreshing the session user here,
/// on every navigation, is what lets the rest of the app read
/// `current_user` without ever re-querying it.
#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let location = use_location();

    // Session refresh on navigation boundaries.
    Effect::new(move |_| {
        let _ = location.pathname.get();
        app_state.0.refresh_current_user(false);
    });

    // Banned accounts only ever see the banned page.
    Effect::new(move |_| {
        let banned = app_state
            .0
            .current_user
            .get()
            .map(|u| u.is_banned())
            .unwrap_or(false);
        if banned && location.pathname.get_untracked() != "/banned" {
            let _ = window().location().set_href("/banned");
        }
    });

    let is_authenticated = move || app_state.0.is_authenticated();
    let is_admin = move || app_state.0.is_admin();

    let children = StoredValue::new(children);

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b">
                <div class="mx-auto flex w-full max-w-[1080px] items-center justify-between px-4 py-3">
                    <a href="/" class="text-sm font-semibold text-foreground">"Planner"</a>

                    <nav class="flex items-center gap-4 text-sm">
                        <Show when=move || is_authenticated() && !is_admin() fallback=|| ().into_view()>
                            <a class="text-muted-foreground hover:text-foreground" href="/notes">"My notes"</a>
                        </Show>
                        <Show when=is_admin fallback=|| ().into_view()>
                            <a class="text-muted-foreground hover:text-foreground" href="/admin/reported-comments">
                                "Reported comments"
                            </a>
                        </Show>
                        <Show
                            when=is_authenticated
                            fallback=|| view! {
                                <a class="text-muted-foreground hover:text-foreground" href="/login">"Log in"</a>
                            }
                        >
                            <a class="text-muted-foreground hover:text-foreground" href="/profile">"Profile"</a>
                        </Show>
                    </nav>
                </div>
            </header>

            <main class="mx-auto w-full max-w-[1080px] px-4 py-8">
                {move || children.with_value(|c| c())}
            </main>
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let is_authenticated = move || app_state.0.is_authenticated();
    let is_admin = move || app_state.0.is_admin();

    let go = move |target: &'static str| {
        navigate.with_value(|nav| nav(target, Default::default()));
    };

    view! {
        <div class="mx-auto flex max-w-xl flex-col items-center gap-4 py-16 text-center">
            <h1 class="text-2xl font-semibold">"Planner"</h1>
            <p class="text-sm text-muted-foreground">
                "Write study notes, share them with classmates and discuss them in the comments."
            </p>

            <div class="flex items-center gap-2 pt-2">
                <Show
                    when=is_authenticated
                    fallback=move || view! {
                        <Button on:click=move |_| go("/login")>"Log in"</Button>
                        <Button variant=ButtonVariant::Outline on:click=move |_| go("/register")>
                            "Sign up"
                        </Button>
                    }
                >
                    <Show
                        when=is_admin
                        fallback=move || view! {
                            <Button on:click=move |_| go("/notes")>"Go to my notes"</Button>
                        }
                    >
                        <Button on:click=move |_| go("/admin/reported-comments")>
                            "Review reported comments"
                        </Button>
                    </Show>
                </Show>
            </div>
        </div>
    }
}

#[component]
pub fn ErrorPage() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());

    view! {
        <div class="flex min-h-screen flex-col items-center justify-center gap-3 bg-background px-4 text-center">
            <h1 class="text-2xl font-semibold">"Something went wrong"</h1>
            <p class="max-w-md text-sm text-muted-foreground">
                "The server could not complete your request. Please try again in a moment."
            </p>
            <Button on:click=move |_| {
                navigate.with_value(|nav| nav("/", Default::default()));
            }>
                "Back to home"
            </Button>
        </div>
    }
}

#[component]
pub fn BannedPage() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());

    view! {
        <div class="flex min-h-screen flex-col items-center justify-center gap-3 bg-background px-4 text-center">
            <h1 class="text-2xl font-semibold">"Account suspended"</h1>
            <p class="max-w-md text-sm text-muted-foreground">
                "Your account has been banned by a moderator. If you believe this is a mistake, contact support."
            </p>
            <Button on:click=move |_| {
                navigate.with_value(|nav| nav("/", Default::default()));
            }>
                "Back to home"
            </Button>
        </div>
    }
}
