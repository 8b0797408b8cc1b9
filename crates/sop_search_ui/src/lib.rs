//! SOP Assistant search UI: page view model, rendering and the search controller.
//! Drives the `sop-search` terminal front end; the page can also be emitted as HTML.

pub mod controller;
pub mod page;
pub mod render;

pub use controller::{
    PendingSearch, SearchController, EMPTY_QUERY_MESSAGE, GENERIC_ERROR_MESSAGE,
};
pub use page::{Focus, PageState, ScrollTarget, SearchPage};
