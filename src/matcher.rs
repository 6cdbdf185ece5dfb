/// Counts non-overlapping occurrences of `phrase` in `haystack`.
///
/// The phrase is matched as a literal substring, so "kidskids" contains
/// "kids" twice and no word-boundary rules apply. Matching is
/// case-sensitive; callers lower-case both sides beforehand.
pub fn count_occurrences(haystack: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    haystack.matches(phrase).count()
}
