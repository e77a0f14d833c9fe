//! Ordered rule table and the first-match-wins merge it relies on.
//!
//! A provider describes its extraction as a static slice of [`Rule`]s. The
//! driver [`run_rules`] walks that slice in declared order and, for each rule,
//! visits every matching node in document order. Rule order therefore *is*
//! field priority: when two rules can fill the same field, the earlier one wins
//! because every scalar write goes through [`merge_field`].

use crate::document::{Document, Node};
use scraper::Selector;
use tracing::{debug, instrument, trace, warn};

/// One extraction rule: a CSS selector and the handler applied to each match.
pub struct Rule<C> {
    /// Short name used in logs.
    pub name: &'static str,
    pub selector: &'static str,
    pub apply: fn(&Node<'_>, &mut C),
}

/// Run every rule against `doc`, threading the same context through all of them.
///
/// # Arguments
///
/// * `doc` - The parsed page
/// * `rules` - Rules in priority order; earlier rules win shared fields
/// * `ctx` - Record under construction, passed to every handler
///
/// A rule whose selector does not parse is logged at `warn` and skipped; the
/// remaining rules still run.
#[instrument(level = "debug", skip_all, fields(base = %doc.base(), rules = rules.len()))]
pub fn run_rules<C>(doc: &Document, rules: &[Rule<C>], ctx: &mut C) {
    for rule in rules {
        let selector = match Selector::parse(rule.selector) {
            Ok(s) => s,
            Err(e) => {
                warn!(rule = rule.name, selector = rule.selector, error = %e, "Invalid rule selector; skipping");
                continue;
            }
        };

        let mut matches = 0usize;
        for node in doc.select_nodes(&selector) {
            (rule.apply)(&node, ctx);
            matches += 1;
        }
        if matches > 0 {
            debug!(rule = rule.name, matches, "Rule applied");
        } else {
            trace!(rule = rule.name, "Rule matched nothing");
        }
    }
}

/// A record field that can be "not yet set".
pub trait Field: Default {
    fn is_unset(&self) -> bool;
}

impl Field for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Field for Option<T> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

impl<T> Field for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

/// First-match-wins: keep `current` unless it is unset and `candidate` is not.
pub fn merge_field<T: Field>(current: T, candidate: T) -> T {
    if current.is_unset() && !candidate.is_unset() {
        candidate
    } else {
        current
    }
}

/// In-place [`merge_field`]. Returns whether `candidate` was taken.
pub fn fill<T: Field>(slot: &mut T, candidate: T) -> bool {
    let taken = slot.is_unset() && !candidate.is_unset();
    *slot = merge_field(std::mem::take(slot), candidate);
    taken
}
