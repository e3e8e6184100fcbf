//! Pure text predicates over listing fields. Empty rule entries never match.

/// First blacklist entry contained in `company` (case-sensitive).
pub fn blacklisted_entry<'a>(company: &str, blacklist: &'a [String]) -> Option<&'a str> {
    blacklist
        .iter()
        .map(String::as_str)
        .filter(|entry| !entry.is_empty())
        .find(|entry| company.contains(entry))
}

/// First forbidden term contained in `title` (case-insensitive).
pub fn forbidden_term<'a>(title: &str, forbidden: &'a [String]) -> Option<&'a str> {
    first_contained(&title.to_lowercase(), forbidden)
}

/// First override term contained in `title` (case-insensitive).
pub fn title_override<'a>(title: &str, overrides: &'a [String]) -> Option<&'a str> {
    first_contained(&title.to_lowercase(), overrides)
}

/// First keyword contained in `description` (case-insensitive).
pub fn matched_keyword<'a>(description: &str, keywords: &'a [String]) -> Option<&'a str> {
    first_contained(&description.to_lowercase(), keywords)
}

fn first_contained<'a>(haystack_lower: &str, terms: &'a [String]) -> Option<&'a str> {
    terms
        .iter()
        .map(String::as_str)
        .filter(|term| !term.trim().is_empty())
        .find(|term| haystack_lower.contains(&term.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blacklist_is_case_sensitive() {
        let blacklist = terms(&["Staffing Agency X"]);
        assert_eq!(
            blacklisted_entry("Staffing Agency X LLC", &blacklist),
            Some("Staffing Agency X")
        );
        assert_eq!(blacklisted_entry("staffing agency x", &blacklist), None);
    }

    #[test]
    fn empty_entries_are_ignored() {
        let blacklist = terms(&["", "Bad Company Inc"]);
        assert_eq!(blacklisted_entry("Acme Corp", &blacklist), None);
        assert_eq!(forbidden_term("QA Engineer", &terms(&["  "])), None);
    }

    #[test]
    fn forbidden_title_ignores_case() {
        let forbidden = terms(&["help desk", "Mechanical"]);
        assert_eq!(forbidden_term("IT HELP DESK Analyst", &forbidden), Some("help desk"));
        assert_eq!(forbidden_term("mechanical designer", &forbidden), Some("Mechanical"));
        assert_eq!(forbidden_term("SDET", &forbidden), None);
    }

    #[test]
    fn keywords_ignore_case() {
        let keywords = terms(&["HTML", "python"]);
        assert_eq!(matched_keyword("Strong Python skills", &keywords), Some("python"));
        assert_eq!(matched_keyword("html and css", &keywords), Some("HTML"));
        assert_eq!(matched_keyword("", &keywords), None);
    }
}
