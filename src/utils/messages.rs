/// Pure functions for formatting error and success messages (Discord-agnostic)

/// Format a validation error message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format a success message with emoji
pub fn format_success(message: &str) -> String {
    format!("✅ {}", message)
}

/// Format a warning message with emoji
pub fn format_warning(message: &str) -> String {
    format!("⚠️ {}", message)
}

/// Build an error message for a sound file that does not exist
pub fn build_sound_not_found(path: &str) -> String {
    format_error(&format!("File {} not found.", path))
}

/// Build the reply for a successful mapping assignment
pub fn build_sound_assigned(member_name: &str, path: &str) -> String {
    format_success(&format!("Added {} with sound {}.", member_name, path))
}

/// Build the reply for a successful sound import
pub fn build_import_success(name: &str, path: &str) -> String {
    format_success(&format!(
        "Imported '{}' to {}. Use /adduser to assign it.",
        name, path
    ))
}

/// Build the numbered listing for a set of search results
pub fn build_search_listing(query: &str, urls: &[String]) -> String {
    let mut listing = format!(
        "Found {} sounds for '{}'. Re-run /importsound with `choice` to import one:\n",
        urls.len(),
        query
    );
    for (i, url) in urls.iter().enumerate() {
        listing.push_str(&format!("{}. <{}>\n", i + 1, url));
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        assert_eq!(format_error("Something failed"), "❌ Something failed");
    }

    #[test]
    fn test_format_success() {
        assert_eq!(format_success("It worked"), "✅ It worked");
    }

    #[test]
    fn test_format_warning() {
        assert_eq!(format_warning("Be careful"), "⚠️ Be careful");
    }

    #[test]
    fn test_build_sound_not_found() {
        let result = build_sound_not_found("./sounds/missing.mp3");
        assert!(result.contains("❌"));
        assert!(result.contains("./sounds/missing.mp3"));
    }

    #[test]
    fn test_build_sound_assigned() {
        assert_eq!(
            build_sound_assigned("alice", "./sounds/a.mp3"),
            "✅ Added alice with sound ./sounds/a.mp3."
        );
    }

    #[test]
    fn test_build_import_success() {
        let result = build_import_success("horn_0.mp3", "./sounds/horn_0.mp3");
        assert!(result.contains("✅"));
        assert!(result.contains("horn_0.mp3"));
        assert!(result.contains("/adduser"));
    }

    #[test]
    fn test_build_search_listing_numbers_from_one() {
        let urls = vec!["https://a/1.mp3".to_string(), "https://a/2.mp3".to_string()];
        let listing = build_search_listing("horn", &urls);
        assert!(listing.contains("Found 2 sounds for 'horn'"));
        assert!(listing.contains("1. <https://a/1.mp3>"));
        assert!(listing.contains("2. <https://a/2.mp3>"));
    }
}
