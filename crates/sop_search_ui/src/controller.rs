//! Search controller: binds input events to one `/search` round trip and
//! updates the page.
//!
//! States: `Idle → Loading → {Answer, Error} → Idle` (via reset). Each
//! submission gets a token; only the response to the latest one is applied.

use sop_search_client::{
    ClientError, Domain, QueryRequest, SearchBackend, SearchOutcome, SearchResponse, Source,
};
use tracing::{debug, error, info};

use crate::page::{Focus, ScrollTarget, SearchPage};
use crate::render;

/// Shown when the query input is blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question";

/// Shown for any transport or parse failure.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// A submission that passed validation and is waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub token: u64,
    pub request: QueryRequest,
}

#[derive(Debug)]
pub struct SearchController {
    page: SearchPage,
    latest_token: u64,
    in_flight: Option<u64>,
}

impl SearchController {
    pub fn new(domain: &Domain) -> Self {
        Self {
            page: SearchPage::new(domain),
            latest_token: 0,
            in_flight: None,
        }
    }

    pub fn page(&self) -> &SearchPage {
        &self.page
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn set_query(&mut self, query: &str) {
        self.page.query_input = query.to_string();
    }

    pub fn set_domain(&mut self, domain: &Domain) {
        self.page.domain = domain.as_str().to_string();
    }

    /// Validate the input and enter the loading state. Returns `None` (after
    /// showing the validation error) when the query is blank.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        let query = self.page.query_input.trim().to_string();
        let domain = self.page.selected_domain();

        if query.is_empty() {
            self.show_error(EMPTY_QUERY_MESSAGE);
            return None;
        }

        self.show_loading(&domain);
        self.latest_token += 1;
        self.in_flight = Some(self.latest_token);
        info!(token = self.latest_token, %domain, "submitting search");
        Some(PendingSearch {
            token: self.latest_token,
            request: QueryRequest::new(query, &domain),
        })
    }

    /// Apply the result of a submission. Returns `false` when `token` is no
    /// longer the in-flight request and the result was dropped.
    pub fn complete_search(
        &mut self,
        token: u64,
        result: Result<SearchResponse, ClientError>,
    ) -> bool {
        if self.in_flight != Some(token) {
            debug!(token, latest = self.latest_token, "discarding stale search response");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(response) => match response.outcome() {
                SearchOutcome::Failed(message) => self.show_error(&message),
                SearchOutcome::Answered { answer, sources } => {
                    self.display_results(&answer, sources)
                }
            },
            Err(e) => {
                error!(error = %e, "search request failed");
                self.show_error(GENERIC_ERROR_MESSAGE);
            }
        }
        true
    }

    /// Submit the current input through `backend` and render the outcome.
    pub async fn perform_search<B: SearchBackend>(&mut self, backend: &B) {
        let Some(pending) = self.begin_search() else {
            return;
        };
        let result = backend.search(&pending.request).await;
        self.complete_search(pending.token, result);
    }

    /// Fill the input with `query` and submit it, as an example-question button would.
    pub async fn search_suggestion<B: SearchBackend>(&mut self, query: &str, backend: &B) {
        self.set_query(query);
        self.perform_search(backend).await;
    }

    pub fn show_loading(&mut self, domain: &Domain) {
        let page = &mut self.page;
        page.results_visible = true;
        page.loading.visible = true;
        page.loading.text = render::loading_message(domain).to_string();
        page.answer.visible = false;
        page.sources.visible = false;
        page.new_search_visible = false;
        page.scrolled_to = Some(ScrollTarget::Results);
    }

    pub fn display_results(&mut self, answer: &str, sources: Vec<Source>) {
        let page = &mut self.page;
        page.loading.visible = false;

        let text = render::strip_answer_label(answer).trim().to_string();
        page.answer.visible = true;
        page.answer.is_error = false;
        page.answer.html = render::format_answer(&text);
        page.answer.text = text;

        if sources.is_empty() {
            page.sources.visible = false;
            page.sources.html.clear();
            page.sources.sources.clear();
        } else {
            page.sources.visible = true;
            page.sources.html = render::format_sources(&sources);
            page.sources.sources = sources;
        }

        page.new_search_visible = true;
    }

    pub fn show_error(&mut self, message: &str) {
        let page = &mut self.page;
        page.loading.visible = false;
        page.answer.visible = true;
        page.answer.is_error = true;
        page.answer.html = render::format_error(message);
        page.answer.text = message.to_string();
        page.sources.visible = false;
        page.new_search_visible = true;
        page.results_visible = true;
        page.scrolled_to = Some(ScrollTarget::Results);
    }

    /// Back to `Idle`: clear the input, hide results, drop any in-flight request.
    pub fn reset_search(&mut self) {
        if let Some(token) = self.in_flight.take() {
            debug!(token, "reset abandons in-flight search");
        }
        let page = &mut self.page;
        page.query_input.clear();
        page.results_visible = false;
        page.focus = Focus::SearchInput;
        page.scrolled_to = Some(ScrollTarget::SearchSection);
    }
}
