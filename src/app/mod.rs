use crate::pages::{
    AppLayout, AuthMode, AuthPage, BannedPage, CreateNotePage, ErrorPage, HomePage, MyNotesPage,
    NoteDetailPage, ProfilePage, ReportedCommentsPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=|| view! { <AuthPage mode=AuthMode::Login /> } />
                <Route path=path!("register") view=|| view! { <AuthPage mode=AuthMode::Register /> } />
                <Route path=path!("error") view=ErrorPage />
                <Route path=path!("banned") view=BannedPage />
                <Route path=path!("notes") view=move || view! {
                    <AppLayout>
                        <MyNotesPage />
                    </AppLayout>
                } />
                <Route path=path!("notes/create") view=move || view! {
                    <AppLayout>
                        <CreateNotePage />
                    </AppLayout>
                } />
                <Route path=path!("notes/:id") view=move || view! {
                    <AppLayout>
                        <NoteDetailPage />
                    </AppLayout>
                } />
                <Route path=path!("profile") view=move || view! {
                    <AppLayout>
                        <ProfilePage />
                    </AppLayout>
                } />
                <Route path=path!("admin/reported-comments") view=move || view! {
                    <AppLayout>
                        <ReportedCommentsPage />
                    </AppLayout>
                } />
                <Route path=path!("") view=move || view! {
                    <AppLayout>
                        <HomePage />
                    </AppLayout>
                } />
            </Routes>
        </Router>
    }
}
