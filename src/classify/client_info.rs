//! Client name extraction from classified document text.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DocumentType, UNKNOWN_CLIENT};

/// Header lines on rating letters that look like names but are not.
const RDL_BOILERPLATE: [&str; 3] = [
    "DEPARTMENT OF VETERANS AFFAIRS",
    "VETERANS BENEFITS ADMINISTRATION",
    "REGIONAL OFFICE",
];

/// How many lines above the "VA File Number" marker may hold the name.
const RDL_NAME_WINDOW: usize = 5;

static RCS_CLIENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Client:\s*([A-Za-z\s\.]+)\s*\(").unwrap());

/// Extract the client name for a document of the given type.
///
/// Returns `UNKNOWN_CLIENT` for types without a name convention or when
/// the text does not contain one.
pub fn extract_client_name(text: &str, doc_type: DocumentType) -> String {
    let name = match doc_type {
        DocumentType::Rdl => rating_letter_name(text),
        DocumentType::Rcs => authorization_name(text),
        DocumentType::Review | DocumentType::Error => None,
    };
    name.unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// The veteran's name sits on an uppercase line shortly above "VA File Number".
fn rating_letter_name(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains("VA File Number") {
            continue;
        }
        let start = i.saturating_sub(RDL_NAME_WINDOW);
        let found = lines[start..i]
            .iter()
            .map(|candidate| candidate.trim())
            .find(|candidate| looks_like_name(candidate));
        if let Some(name) = found {
            return Some(name.to_string());
        }
    }

    None
}

fn looks_like_name(line: &str) -> bool {
    line.chars().count() > 3
        && line == line.to_uppercase()
        && !line.chars().any(|c| c.is_ascii_digit())
        && !RDL_BOILERPLATE.contains(&line)
}

fn authorization_name(text: &str) -> Option<String> {
    RCS_CLIENT_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_letter_name_above_file_number() {
        let text = "DEPARTMENT OF VETERANS AFFAIRS\n\
                    Veterans Benefits Administration\n\
                    Regional Office\n\
                    SARAH WILLIAMS\n\
                    VA File Number\n\
                    123 456 7890\n\
                    Rating Decision";
        assert_eq!(extract_client_name(text, DocumentType::Rdl), "SARAH WILLIAMS");
    }

    #[test]
    fn test_rating_letter_skips_boilerplate_and_digits() {
        let text = "REGIONAL OFFICE\n\
                    UNIT 42\n\
                    VETERANS BENEFITS ADMINISTRATION\n\
                    VA File Number";
        assert_eq!(extract_client_name(text, DocumentType::Rdl), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_rating_letter_name_window_is_five_lines() {
        let text = "FAR AWAY NAME\nl1\nl2\nl3\nl4\nl5\nVA File Number";
        assert_eq!(extract_client_name(text, DocumentType::Rdl), UNKNOWN_CLIENT);

        let text = "NEAR ENOUGH\nl1\nl2\nl3\nl4\nVA File Number";
        assert_eq!(extract_client_name(text, DocumentType::Rdl), "NEAR ENOUGH");
    }

    #[test]
    fn test_rating_letter_tries_later_markers() {
        let text = "VA File Number\nsomething\nLISA GARCIA\nVA File Number";
        assert_eq!(extract_client_name(text, DocumentType::Rdl), "LISA GARCIA");
    }

    #[test]
    fn test_authorization_client_pattern() {
        let text = "TM CLIENT AUTHORIZATION FORM\nClient: John A. Smith (ID: TM-1-2023)";
        assert_eq!(extract_client_name(text, DocumentType::Rcs), "John A. Smith");
    }

    #[test]
    fn test_authorization_without_client_line() {
        assert_eq!(
            extract_client_name("TM-RCS-2023-7", DocumentType::Rcs),
            UNKNOWN_CLIENT
        );
    }

    #[test]
    fn test_other_types_are_unknown() {
        let text = "SARAH WILLIAMS\nVA File Number\nClient: Mary Johnson (";
        assert_eq!(extract_client_name(text, DocumentType::Review), UNKNOWN_CLIENT);
        assert_eq!(extract_client_name(text, DocumentType::Error), UNKNOWN_CLIENT);
    }
}
