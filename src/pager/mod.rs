use crate::models::{ListScope, NoteCategory, Page};

/// The cursor a single fetch should request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub category: Option<NoteCategory>,
    pub search: Option<String>,
    pub scope: ListScope,
}

/// What to do when an action arrives while a fetch is outstanding.
///
/// The source app never defined this; it is an explicit choice here.
/// Filter/search/scope mutations always supersede (newest intent wins);
/// this policy only governs `load_more`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum BusyPolicy {
    /// Ignore the action entirely (no fetch, no state change).
    #[default]
    Reject,
    /// Bump the generation and replace the in-flight fetch.
    Supersede,
}

/// Identifies one planned fetch. A completed response must present its
/// token back to [`Pager::apply_page`]; tokens from a superseded
/// generation are discarded without touching state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FetchToken {
    generation: u64,
    page: u32,
}

/// One fetch the caller should now issue.
#[derive(Clone, Debug)]
pub(crate) struct FetchPlan {
    pub token: FetchToken,
    pub query: ListQuery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApplyOutcome {
    Applied,
    /// The response belonged to a superseded fetch; state unchanged.
    Stale,
}

/// Append-only, offset-paginated view of server-side filtered results.
///
/// Drives both the note list and the reported-comments queue. All
/// operations are synchronous and deterministic: mutations return a
/// [`FetchPlan`] (or `None` for a no-op) and the async glue feeds the
/// response back through [`apply_page`](Self::apply_page) /
/// [`mark_failed`](Self::mark_failed).
///
/// `page` holds the last *applied* page index; a planned fetch commits
/// its index only on success, so a failed load-more never skips a page.
#[derive(Clone, Debug)]
pub(crate) struct Pager<T> {
    page: u32,
    page_size: u32,
    category: Option<NoteCategory>,
    search: Option<String>,
    scope: ListScope,

    items: Vec<T>,
    total: u64,
    has_more: bool,
    loading: bool,
    generation: u64,

    busy_policy: BusyPolicy,
}

impl<T: Clone> Pager<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size,
            category: None,
            search: None,
            scope: ListScope::Own,
            items: Vec::new(),
            total: 0,
            // Optimistic until the first response says otherwise.
            has_more: true,
            loading: false,
            generation: 0,
            busy_policy: BusyPolicy::default(),
        }
    }

    pub fn with_busy_policy(mut self, policy: BusyPolicy) -> Self {
        self.busy_policy = policy;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn category(&self) -> Option<NoteCategory> {
        self.category
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    fn query_for(&self, page: u32) -> ListQuery {
        ListQuery {
            page,
            page_size: self.page_size,
            category: self.category,
            search: self.search.clone(),
            scope: self.scope,
        }
    }

    /// Start a fresh filter session: page 0, empty buffer, new generation.
    fn reset_and_plan(&mut self) -> FetchPlan {
        self.generation += 1;
        self.page = 0;
        self.items.clear();
        self.total = 0;
        self.has_more = true;
        self.loading = true;

        FetchPlan {
            token: FetchToken {
                generation: self.generation,
                page: 0,
            },
            query: self.query_for(0),
        }
    }

    /// Select a category filter. Selecting the active category clears it
    /// (toggle-off). Always returns to the general (own) list, resets the
    /// cursor and buffer, and plans a page-0 fetch.
    pub fn set_filter(&mut self, category: NoteCategory) -> FetchPlan {
        self.scope = ListScope::Own;
        if self.category == Some(category) {
            self.category = None;
        } else {
            self.category = Some(category);
        }
        self.reset_and_plan()
    }

    /// Store a search term (trimmed; empty means absent), reset, fetch.
    pub fn set_search(&mut self, term: &str) -> FetchPlan {
        let term = term.trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self.reset_and_plan()
    }

    /// Switch between the general list and the shared-with-me list.
    /// The shared endpoint has no category parameter, so entering it
    /// clears the category filter.
    pub fn set_scope(&mut self, scope: ListScope) -> FetchPlan {
        self.scope = scope;
        if scope == ListScope::SharedWithMe {
            self.category = None;
        }
        self.reset_and_plan()
    }

    /// Re-fetch page 0 under the current filters (used after moderation
    /// actions that invalidate the whole queue).
    pub fn refresh(&mut self) -> FetchPlan {
        self.reset_and_plan()
    }

    /// Plan the next page. No-op when the server said there is no more,
    /// and (under `BusyPolicy::Reject`) while a fetch is outstanding.
    pub fn load_more(&mut self) -> Option<FetchPlan> {
        if !self.has_more {
            return None;
        }

        if self.loading {
            match self.busy_policy {
                BusyPolicy::Reject => return None,
                BusyPolicy::Supersede => self.generation += 1,
            }
        }

        let next = self.page + 1;
        self.loading = true;
        Some(FetchPlan {
            token: FetchToken {
                generation: self.generation,
                page: next,
            },
            query: self.query_for(next),
        })
    }

    /// Install a completed response. Page 0 replaces the buffer; any
    /// later page appends (never reorders, never dedupes). The planned
    /// page index — not the server echo — decides replace vs append.
    pub fn apply_page(&mut self, token: FetchToken, page: Page<T>) -> ApplyOutcome {
        if token.generation != self.generation {
            return ApplyOutcome::Stale;
        }

        if token.page == 0 {
            self.items = page.content;
        } else {
            self.items.extend(page.content);
        }
        self.page = token.page;
        self.total = page.total_elements;
        self.has_more = !page.last;
        self.loading = false;
        ApplyOutcome::Applied
    }

    /// A failed fetch leaves buffer and cursor untouched.
    pub fn mark_failed(&mut self, token: FetchToken) -> ApplyOutcome {
        if token.generation != self.generation {
            return ApplyOutcome::Stale;
        }
        self.loading = false;
        ApplyOutcome::Applied
    }

    /// Optimistic local removal after a successful delete; no refetch.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) {
        self.items.retain(|item| !pred(item));
        self.total = self.total.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(ids: std::ops::Range<i64>, last: bool) -> Page<i64> {
        let content: Vec<i64> = ids.collect();
        Page {
            empty: content.is_empty(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size: content.len() as u32,
            first: false,
            last,
            content,
        }
    }

    #[test]
    fn test_load_more_pages_strictly_increase() {
        let mut p: Pager<i64> = Pager::new(10);

        let plan = p.refresh();
        assert_eq!(plan.query.page, 0);
        p.apply_page(plan.token, page_of(0..10, false));
        assert_eq!(p.page(), 0);

        let plan = p.load_more().expect("has_more, should plan");
        assert_eq!(plan.query.page, 1);
        p.apply_page(plan.token, page_of(10..20, false));
        assert_eq!(p.page(), 1);

        let plan = p.load_more().expect("has_more, should plan");
        assert_eq!(plan.query.page, 2);
        p.apply_page(plan.token, page_of(20..25, true));
        assert_eq!(p.page(), 2);
        assert_eq!(p.items().len(), 25);
    }

    #[test]
    fn test_load_more_noop_when_exhausted() {
        let mut p: Pager<i64> = Pager::new(10);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..3, true));

        assert!(!p.has_more());
        assert!(p.load_more().is_none());
        assert_eq!(p.page(), 0);
        assert_eq!(p.items().len(), 3);
    }

    #[test]
    fn test_two_pages_append_then_exhaust() {
        // pageSize=10; page 0 returns 10 with last=false; page 1 returns
        // 5 with last=true -> 15 items, no more.
        let mut p: Pager<i64> = Pager::new(10);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..10, false));

        let plan = p.load_more().expect("should plan page 1");
        p.apply_page(plan.token, page_of(10..15, true));

        assert_eq!(p.items().len(), 15);
        assert!(!p.has_more());
    }

    #[test]
    fn test_filter_toggle_off() {
        let mut p: Pager<i64> = Pager::new(10);

        let plan = p.set_filter(NoteCategory::Maths);
        assert_eq!(p.category(), Some(NoteCategory::Maths));
        assert_eq!(plan.query.category, Some(NoteCategory::Maths));
        assert_eq!(plan.query.page, 0);
        p.apply_page(plan.token, page_of(0..10, false));

        // Same category again: cleared, buffer emptied before the fetch
        // resolves.
        let plan = p.set_filter(NoteCategory::Maths);
        assert_eq!(p.category(), None);
        assert!(p.items().is_empty());
        assert_eq!(plan.query.category, None);
        assert_eq!(plan.query.page, 0);
    }

    #[test]
    fn test_filter_issues_single_page_zero_fetch() {
        let mut p: Pager<i64> = Pager::new(10);
        assert_eq!(p.category(), None);
        let plan = p.set_filter(NoteCategory::Maths);
        assert_eq!(plan.query.category, Some(NoteCategory::Maths));
        assert_eq!(plan.query.page, 0);
    }

    #[test]
    fn test_search_resets_page_and_buffer() {
        let mut p: Pager<i64> = Pager::new(10);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..10, false));
        let plan = p.load_more().unwrap();
        p.apply_page(plan.token, page_of(10..20, false));
        assert_eq!(p.page(), 1);

        let plan = p.set_search("  pythagoras  ");
        assert_eq!(p.search(), Some("pythagoras"));
        assert_eq!(plan.query.page, 0);
        assert!(p.items().is_empty());

        // Empty string normalizes to absent.
        let plan = p.set_search("   ");
        assert_eq!(p.search(), None);
        assert_eq!(plan.query.search, None);
    }

    #[test]
    fn test_scope_switch_clears_category() {
        let mut p: Pager<i64> = Pager::new(10);
        p.set_filter(NoteCategory::Art);
        let plan = p.set_scope(ListScope::SharedWithMe);
        assert_eq!(p.scope(), ListScope::SharedWithMe);
        assert_eq!(p.category(), None);
        assert_eq!(plan.query.scope, ListScope::SharedWithMe);
        assert_eq!(plan.query.page, 0);
        assert!(p.items().is_empty());
    }

    #[test]
    fn test_stale_response_discarded_after_filter_change() {
        let mut p: Pager<i64> = Pager::new(10);
        let old_plan = p.refresh();

        // Filter changes while the old fetch is still in flight.
        let new_plan = p.set_filter(NoteCategory::Science);

        // The old response lands late: discarded, no state change.
        let outcome = p.apply_page(old_plan.token, page_of(0..10, false));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(p.items().is_empty());
        assert!(p.is_loading());

        // The new response wins.
        let outcome = p.apply_page(new_plan.token, page_of(50..55, true));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(p.items(), &[50, 51, 52, 53, 54]);
        assert!(!p.is_loading());
    }

    #[test]
    fn test_load_more_rejected_while_loading() {
        let mut p: Pager<i64> = Pager::new(10);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..10, false));

        let first = p.load_more();
        assert!(first.is_some());
        // Second call before the first resolves: rejected.
        assert!(p.load_more().is_none());
    }

    #[test]
    fn test_load_more_supersede_policy() {
        let mut p: Pager<i64> = Pager::new(10).with_busy_policy(BusyPolicy::Supersede);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..10, false));

        let first = p.load_more().expect("plans");
        let second = p.load_more().expect("supersedes");

        assert_eq!(p.apply_page(first.token, page_of(10..20, false)), ApplyOutcome::Stale);
        assert_eq!(
            p.apply_page(second.token, page_of(10..20, false)),
            ApplyOutcome::Applied
        );
        assert_eq!(p.items().len(), 20);
    }

    #[test]
    fn test_failure_leaves_buffer_and_page_unchanged() {
        let mut p: Pager<i64> = Pager::new(10);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..10, false));

        let plan = p.load_more().unwrap();
        p.mark_failed(plan.token);

        assert_eq!(p.items().len(), 10);
        assert_eq!(p.page(), 0);
        assert!(!p.is_loading());

        // The next load_more retries the same page instead of skipping it.
        let plan = p.load_more().unwrap();
        assert_eq!(plan.query.page, 1);
    }

    #[test]
    fn test_optimistic_remove() {
        let mut p: Pager<i64> = Pager::new(10);
        let plan = p.refresh();
        let mut page = page_of(0..10, false);
        page.total_elements = 25;
        p.apply_page(plan.token, page);

        p.remove_where(|&id| id == 4);
        assert_eq!(p.items().len(), 9);
        assert!(!p.items().contains(&4));
        assert_eq!(p.total(), 24);
    }

    #[test]
    fn test_buffer_length_non_decreasing_under_load_more() {
        let mut p: Pager<i64> = Pager::new(5);
        let plan = p.refresh();
        p.apply_page(plan.token, page_of(0..5, false));

        let mut prev = p.items().len();
        for k in 1..4u32 {
            let plan = p.load_more().expect("has more");
            let start = (k * 5) as i64;
            p.apply_page(plan.token, page_of(start..start + 5, k == 3));
            assert!(p.items().len() >= prev);
            prev = p.items().len();
        }
        assert_eq!(prev, 20);
        assert!(!p.has_more());
    }
}
