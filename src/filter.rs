//! Client-side filter engine.
//!
//! A `FilterSpec` is evaluated against every item of the in-memory collection
//! to derive a filtered view. Evaluation is a pure function of the items and
//! the spec; relative order of matching items is preserved.

use std::borrow::Cow;

use indexmap::IndexMap;
use itertools::Itertools;

/// Filterable facets of a catalogue item.
///
/// `category` looks up a categorical field by key (`"gender"`, `"town"`, ...).
/// `numeric` returns the raw text of the numeric-or-absent field, left
/// unparsed so the range predicate decides what counts as a number.
pub trait Facets {
    fn display_name(&self) -> &str;

    fn free_text(&self) -> Option<&str> {
        None
    }

    fn category(&self, key: &str) -> Option<Cow<'_, str>>;

    fn numeric(&self) -> Option<&str> {
        None
    }
}

/// User-configurable set of predicates. Default is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring match over display name and free text.
    pub search_term: String,
    /// Categorical key to required value, exact and case-sensitive.
    pub categories: IndexMap<String, String>,
    pub min_bound: Option<i64>,
    pub max_bound: Option<i64>,
}

/// A single mutation of the filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    SearchTerm(String),
    /// `None` clears the constraint back to "any".
    Category { key: String, value: Option<String> },
    MinBound(Option<i64>),
    MaxBound(Option<i64>),
    Reset,
}

impl FilterSpec {
    pub fn is_unconstrained(&self) -> bool {
        self.search_term.is_empty()
            && self.categories.is_empty()
            && self.min_bound.is_none()
            && self.max_bound.is_none()
    }

    pub fn apply_change(&mut self, change: FilterChange) {
        match change {
            FilterChange::SearchTerm(term) => self.search_term = term,
            FilterChange::Category { key, value } => match value {
                Some(value) => {
                    self.categories.insert(key, value);
                }
                None => {
                    self.categories.shift_remove(&key);
                }
            },
            FilterChange::MinBound(bound) => self.min_bound = bound,
            FilterChange::MaxBound(bound) => self.max_bound = bound,
            FilterChange::Reset => *self = FilterSpec::default(),
        }
    }
}

/// Whether a single item satisfies every active predicate of the spec.
pub fn matches<T: Facets>(item: &T, spec: &FilterSpec) -> bool {
    if !spec.search_term.is_empty() {
        let term = spec.search_term.to_lowercase();
        let name_hit = item.display_name().to_lowercase().contains(&term);
        let text_hit = item
            .free_text()
            .is_some_and(|text| text.to_lowercase().contains(&term));
        if !name_hit && !text_hit {
            return false;
        }
    }

    for (key, wanted) in &spec.categories {
        if item.category(key).as_deref() != Some(wanted.as_str()) {
            return false;
        }
    }

    if spec.min_bound.is_some() || spec.max_bound.is_some() {
        // An absent or non-numeric value is out of range, not a wildcard.
        let Some(value) = item
            .numeric()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
        else {
            return false;
        };
        if spec.min_bound.is_some_and(|min| value < min) {
            return false;
        }
        if spec.max_bound.is_some_and(|max| value > max) {
            return false;
        }
    }

    true
}

/// Derive the filtered view of a collection. Never fails.
pub fn apply_filters<T: Facets + Clone>(items: &[T], spec: &FilterSpec) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches(*item, spec))
        .cloned()
        .collect()
}

/// Unique, sorted values of one facet across a collection, for populating
/// selection controls.
pub fn facet_values<T, F>(items: &[T], facet: F) -> Vec<String>
where
    F: for<'a> Fn(&'a T) -> Option<Cow<'a, str>>,
{
    items
        .iter()
        .filter_map(|item| facet(item).map(Cow::into_owned))
        .unique()
        .sorted()
        .collect()
}
