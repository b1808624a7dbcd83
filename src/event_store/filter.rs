//! Listing filters and pagination
//!
//! Filters combine with logical AND; text matches are case-insensitive
//! substring matches.

use crate::types::Event;

/// Default page size for listings
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a caller may ask for
pub const MAX_PER_PAGE: u32 = 100;

/// Filter set for [`super::EventStore::list`]
///
/// Needles are lowercased once at construction; blank needles mean
/// "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    workflow_name: Option<String>,
    resolved: Option<bool>,
    text: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substring match on `workflow_name`
    pub fn workflow_name(mut self, needle: Option<&str>) -> Self {
        self.workflow_name = normalize_needle(needle);
        self
    }

    /// Exact match on the resolve state
    pub fn resolved(mut self, resolved: Option<bool>) -> Self {
        self.resolved = resolved;
        self
    }

    /// Free-text match on `error_message` OR `error_stack`
    pub fn text(mut self, needle: Option<&str>) -> Self {
        self.text = normalize_needle(needle);
        self
    }

    /// Interpret the `resolved` query parameter. Only the literals `true`
    /// and `false` filter; anything else is ignored.
    pub fn parse_resolved(raw: Option<&str>) -> Option<bool> {
        match raw {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.workflow_name.is_none() && self.resolved.is_none() && self.text.is_none()
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref needle) = self.workflow_name {
            if !contains_ignore_case(event.workflow_name.as_deref(), needle) {
                return false;
            }
        }

        if let Some(want) = self.resolved {
            if event.resolved != want {
                return false;
            }
        }

        if let Some(ref needle) = self.text {
            if !contains_ignore_case(Some(&event.error_message), needle)
                && !contains_ignore_case(event.error_stack.as_deref(), needle)
            {
                return false;
            }
        }

        true
    }
}

fn normalize_needle(needle: Option<&str>) -> Option<String> {
    needle
        .filter(|n| !n.is_empty())
        .map(|n| n.to_lowercase())
}

/// `needle` must already be lowercase
fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Clamped page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    per_page: u32,
}

impl Page {
    /// Clamp `page` to at least 1 and `per_page` into `1..=MAX_PER_PAGE`
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            per_page: per_page.clamp(1, MAX_PER_PAGE as i64) as u32,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items to skip
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.per_page as usize)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE as i64)
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq)]
pub struct EventSlice {
    pub items: Vec<Event>,
    /// Size of the whole filtered set, not just this page
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewEvent;
    use crate::validation::validate_new_event;
    use chrono::Utc;

    fn event(name: Option<&str>, message: &str, stack: Option<&str>, resolved: bool) -> Event {
        let mut candidate = NewEvent::with_message(message);
        candidate.workflow_name = name.map(str::to_string);
        candidate.error_stack = stack.map(str::to_string);
        let mut event = validate_new_event(candidate).unwrap().into_event(1, Utc::now());
        if resolved {
            event.mark_resolved(Utc::now());
        }
        event
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = EventFilter::new().workflow_name(Some("")).text(Some(""));
        assert!(filter.is_empty());
        assert!(filter.matches(&event(None, "x", None, false)));
        assert!(filter.matches(&event(Some("A"), "y", None, true)));
    }

    #[test]
    fn test_workflow_name_is_case_insensitive_substring() {
        let filter = EventFilter::new().workflow_name(Some("sync"));
        assert!(filter.matches(&event(Some("Sync Orders"), "x", None, false)));
        assert!(filter.matches(&event(Some("nightly RESYNC"), "x", None, false)));
        assert!(!filter.matches(&event(Some("Billing"), "x", None, false)));
        assert!(!filter.matches(&event(None, "x", None, false)));
    }

    #[test]
    fn test_text_matches_message_or_stack() {
        let filter = EventFilter::new().text(Some("TimeOut"));
        assert!(filter.matches(&event(None, "timeout calling API", None, false)));
        assert!(filter.matches(&event(None, "request failed", Some("Error: Timeout at fetch"), false)));
        assert!(!filter.matches(&event(None, "request failed", Some("ECONNRESET"), false)));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filter = EventFilter::new()
            .workflow_name(Some("orders"))
            .resolved(Some(false))
            .text(Some("timeout"));
        assert!(filter.matches(&event(Some("Orders"), "timeout", None, false)));
        assert!(!filter.matches(&event(Some("Orders"), "timeout", None, true)));
        assert!(!filter.matches(&event(Some("Billing"), "timeout", None, false)));
        assert!(!filter.matches(&event(Some("Orders"), "crash", None, false)));
    }

    #[test]
    fn test_parse_resolved_only_accepts_literals() {
        assert_eq!(EventFilter::parse_resolved(Some("true")), Some(true));
        assert_eq!(EventFilter::parse_resolved(Some("false")), Some(false));
        assert_eq!(EventFilter::parse_resolved(Some("TRUE")), None);
        assert_eq!(EventFilter::parse_resolved(Some("yes")), None);
        assert_eq!(EventFilter::parse_resolved(None), None);
    }

    #[test]
    fn test_page_clamping() {
        let page = Page::new(0, 500);
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), MAX_PER_PAGE);

        let page = Page::new(-4, 0);
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), 1);

        let page = Page::new(3, 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(Page::default().per_page(), DEFAULT_PER_PAGE);
    }
}
