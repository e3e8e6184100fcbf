/// The in-page scanner JavaScript.
/// Backends inject this string into the page before sending scanner commands.
pub const SCANNER_JS: &str = include_str!("scanner.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn embeds_scanner() {
        assert!(!SCANNER_JS.is_empty());
        assert!(SCANNER_JS.contains("window.AutoApply"));
    }

    #[test]
    fn handles_every_protocol_action() {
        for action in [
            "cards", "snapshot", "locate", "click", "type", "select", "check", "scroll",
            "wait_for", "get_text",
        ] {
            assert!(
                SCANNER_JS.contains(&format!("{}:", action)),
                "scanner has no handler for {}",
                action
            );
        }
    }
}
