//! Blacklist-based spam filtering

/// Decides whether a comment is excluded from replying
///
/// The filter is a pure predicate. Whether it applies at all
/// (`spam_filter_enabled`) is decided by the caller.
pub struct SpamFilter;

impl SpamFilter {
    /// True if any blacklist entry occurs in `text`, ignoring case
    ///
    /// Empty entries never match.
    pub fn is_blocked<I, S>(text: &str, blacklist: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::first_match(text, blacklist).is_some()
    }

    /// The first blacklist entry found in `text`, if any
    pub fn first_match<I, S>(text: &str, blacklist: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let haystack = text.to_lowercase();
        blacklist.into_iter().find_map(|entry| {
            let needle = entry.as_ref().trim().to_lowercase();
            (!needle.is_empty() && haystack.contains(&needle)).then_some(needle)
        })
    }
}
