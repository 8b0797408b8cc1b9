//! View model of the search page. Each field mirrors one region of the host page.

use serde::Serialize;
use sop_search_client::{Domain, Source};

/// Element that holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Focus {
    SearchInput,
    None,
}

/// Region most recently scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollTarget {
    Results,
    SearchSection,
}

/// Visible state, derived from region visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageState {
    Idle,
    Loading,
    Answer,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadingIndicator {
    pub visible: bool,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnswerDisplay {
    pub visible: bool,
    /// Rendered `answerContent` markup.
    pub html: String,
    /// Answer text (label stripped) or the error message.
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourcesDisplay {
    pub visible: bool,
    /// Rendered `sourcesContent` markup.
    pub html: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub domain: String,
    pub query_input: String,
    pub results_visible: bool,
    pub loading: LoadingIndicator,
    pub answer: AnswerDisplay,
    pub sources: SourcesDisplay,
    pub new_search_visible: bool,
    pub focus: Focus,
    pub scrolled_to: Option<ScrollTarget>,
}

impl SearchPage {
    /// Fresh page: results hidden, input focused.
    pub fn new(domain: &Domain) -> Self {
        Self {
            domain: domain.as_str().to_string(),
            query_input: String::new(),
            results_visible: false,
            loading: LoadingIndicator::default(),
            answer: AnswerDisplay::default(),
            sources: SourcesDisplay::default(),
            new_search_visible: false,
            focus: Focus::SearchInput,
            scrolled_to: None,
        }
    }

    pub fn selected_domain(&self) -> Domain {
        Domain::from(self.domain.as_str())
    }

    pub fn state(&self) -> PageState {
        if !self.results_visible {
            PageState::Idle
        } else if self.loading.visible {
            PageState::Loading
        } else if self.answer.visible && self.answer.is_error {
            PageState::Error
        } else if self.answer.visible {
            PageState::Answer
        } else {
            PageState::Idle
        }
    }

    /// Markup of the results section as currently visible.
    pub fn results_html(&self) -> String {
        if !self.results_visible {
            return String::new();
        }
        let mut out = String::from("<section id=\"resultsSection\">\n");
        if self.loading.visible {
            out.push_str(&format!(
                "<div id=\"loadingState\"><p>{}</p></div>\n",
                crate::render::escape_html(&self.loading.text)
            ));
        }
        if self.answer.visible {
            out.push_str("<div id=\"answerDisplay\"><div id=\"answerContent\">");
            out.push_str(&self.answer.html);
            out.push_str("</div></div>\n");
        }
        if self.sources.visible {
            out.push_str("<div id=\"sourcesDisplay\"><div id=\"sourcesContent\">");
            out.push_str(&self.sources.html);
            out.push_str("</div></div>\n");
        }
        if self.new_search_visible {
            out.push_str(
                "<div id=\"newSearchSection\"><button id=\"newSearchButton\">New search</button></div>\n",
            );
        }
        out.push_str("</section>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_page_is_idle_and_focused() {
        let page = SearchPage::new(&Domain::Sop);
        assert_eq!(page.state(), PageState::Idle);
        assert_eq!(page.focus, Focus::SearchInput);
        assert_eq!(page.results_html(), "");
    }

    #[test]
    fn loading_markup_escapes_text() {
        let mut page = SearchPage::new(&Domain::Sop);
        page.results_visible = true;
        page.loading = LoadingIndicator {
            visible: true,
            text: "<b>".into(),
        };
        assert_eq!(page.state(), PageState::Loading);
        assert!(page.results_html().contains("<p>&lt;b&gt;</p>"));
    }
}
