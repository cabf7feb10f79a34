//! Read-only queries over both lists: tag reports, expansion and listings.

use anyhow::Result;
use plaintodo_core::listing::filter;
use plaintodo_core::tag::expand_tag;
use plaintodo_core::{ListId, NumberedLine, Report};

use crate::store::{LineStore, load_list};

/// Service façade for tag reports and filtered listings.
pub struct ReportService<S> {
    store: S,
}

/// One list's filtered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// List the lines come from.
    pub list: ListId,
    /// Matching lines with their original numbers.
    pub lines: Vec<NumberedLine>,
}

impl<S> ReportService<S> {
    /// Query the lists held by `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: LineStore> ReportService<S> {
    /// Tally tags across both lists as they are now.
    ///
    /// # Errors
    /// Returns an error if either list cannot be read.
    pub fn report(&self) -> Result<Report> {
        let pending = load_list(&self.store, ListId::Pending)?;
        let completed = load_list(&self.store, ListId::Completed)?;
        Ok(Report::aggregate(&pending, &completed))
    }

    /// Expand `partial` to a tag known from either list.
    ///
    /// # Errors
    /// Returns an error if either list cannot be read.
    pub fn expand_tag(&self, partial: &str) -> Result<String> {
        let report = self.report()?;
        Ok(expand_tag(partial, report.tags()))
    }

    /// Numbered lines of `list`, restricted to lines carrying `tag` if given.
    /// The tag is expanded first.
    ///
    /// # Errors
    /// Returns an error if a list cannot be read.
    pub fn listing(&self, list: ListId, tag: Option<&str>) -> Result<Listing> {
        let tag = tag.map(|tag| self.expand_tag(tag)).transpose()?;
        let tasks = load_list(&self.store, list)?;
        Ok(Listing {
            list,
            lines: filter(&tasks, tag.as_deref()),
        })
    }

    /// Listings of both lists, pending first.
    ///
    /// # Errors
    /// Returns an error if a list cannot be read.
    pub fn listing_all(&self, tag: Option<&str>) -> Result<Vec<Listing>> {
        ListId::ALL
            .into_iter()
            .map(|list| self.listing(list, tag))
            .collect()
    }
}
