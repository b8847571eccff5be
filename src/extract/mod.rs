//! Email address extraction from page content
//!
//! Two independent passes run over the full text:
//! - the plain `local@domain.tld` form
//! - the `local [at] domain.tld` obfuscation, rewritten to `local@domain.tld`
//!
//! Every match carries a context window of up to 20 characters on each side,
//! which is what the owner resolver later reasons about. Matches are never
//! deduplicated, so the same address may appear several times.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Characters of surrounding text kept on each side of a match
pub const CONTEXT_RADIUS: usize = 20;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("static regex")
});

static OBFUSCATED_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+\s*\[\s*at\s*\]\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("static regex")
});

static AT_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[\s*at\s*\]\s*").expect("static regex"));

/// An email address found in page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContext {
    /// Address in `local@domain` form
    pub email: String,

    /// The match plus up to 20 characters on either side
    pub context: String,
}

/// Extracts every email address in `content` together with its context
///
/// Plain matches come first in document order, followed by obfuscated
/// matches in document order.
///
/// # Example
///
/// ```
/// use contact_scout::extract_emails;
///
/// let found = extract_emails("Contact us at user@example.com for info.");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].email, "user@example.com");
/// assert_eq!(found[0].context, "Contact us at user@example.com for info.");
/// ```
pub fn extract_emails(content: &str) -> Vec<EmailContext> {
    let plain = EMAIL_REGEX.find_iter(content).map(|m| EmailContext {
        email: m.as_str().to_string(),
        context: context_window(content, m.start(), m.end()),
    });

    let obfuscated = OBFUSCATED_EMAIL_REGEX.find_iter(content).map(|m| EmailContext {
        email: AT_MARKER_REGEX.replace_all(m.as_str(), "@").into_owned(),
        context: context_window(content, m.start(), m.end()),
    });

    plain.chain(obfuscated).collect()
}

/// Extracts emails from raw bytes
///
/// Content that is not valid UTF-8 yields no results.
pub fn extract_emails_from_bytes(content: &[u8]) -> Vec<EmailContext> {
    match std::str::from_utf8(content) {
        Ok(text) => extract_emails(text),
        Err(e) => {
            tracing::warn!("Skipping non-UTF-8 content ({} bytes): {}", content.len(), e);
            Vec::new()
        }
    }
}

/// Returns the text from `CONTEXT_RADIUS` characters before `start` to
/// `CONTEXT_RADIUS` characters after `end`, clipped to the content
fn context_window(content: &str, start: usize, end: usize) -> String {
    let from = content[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map_or(0, |(i, _)| i);

    let to = content[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map_or(content.len(), |(i, _)| end + i);

    content[from..to].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails(found: &[EmailContext]) -> Vec<&str> {
        found.iter().map(|e| e.email.as_str()).collect()
    }

    #[test]
    fn test_standard_email() {
        let found = extract_emails("Contact us at user@example.com for info.");
        assert_eq!(emails(&found), vec!["user@example.com"]);
        assert!(found[0].context.contains("user@example.com"));
    }

    #[test]
    fn test_obfuscated_email() {
        let found = extract_emails("email admin [at] example.com now");
        assert_eq!(emails(&found), vec!["admin@example.com"]);
        assert_eq!(found[0].context, "email admin [at] example.com now");
    }

    #[test]
    fn test_obfuscation_whitespace_variants() {
        let found = extract_emails("a[at]b.org and c  [ at ]  d.net");
        assert_eq!(emails(&found), vec!["a@b.org", "c@d.net"]);
    }

    #[test]
    fn test_no_email() {
        assert!(extract_emails("no contact info").is_empty());
        assert!(extract_emails("").is_empty());
    }

    #[test]
    fn test_context_is_clipped_to_twenty_chars() {
        let prefix = "#".repeat(30);
        let suffix = "!".repeat(30);
        let content = format!("{prefix}jane@site.com{suffix}");

        let found = extract_emails(&content);
        assert_eq!(emails(&found), vec!["jane@site.com"]);
        assert_eq!(
            found[0].context,
            format!("{}jane@site.com{}", "#".repeat(20), "!".repeat(20))
        );
    }

    #[test]
    fn test_context_at_content_edges() {
        let found = extract_emails("user@example.com is our contact at the beginning.");
        assert_eq!(found[0].context, "user@example.com is our contact at t");

        let found = extract_emails("Our contact is at the end: user@example.com");
        assert_eq!(found[0].context, "tact is at the end: user@example.com");
    }

    #[test]
    fn test_context_counts_characters_not_bytes() {
        let content = format!("{}ana@example.com{}", "é".repeat(25), "ü".repeat(25));
        let found = extract_emails(&content);
        assert_eq!(
            found[0].context,
            format!("{}ana@example.com{}", "é".repeat(20), "ü".repeat(20))
        );
    }

    #[test]
    fn test_plain_matches_precede_obfuscated() {
        let content = "first admin [at] example.net then first.user@example.com and \
                       second.user [at] example.org";
        let found = extract_emails(content);
        assert_eq!(
            emails(&found),
            vec![
                "first.user@example.com",
                "admin@example.net",
                "second.user@example.org",
            ]
        );
    }

    #[test]
    fn test_repeated_address_is_not_deduplicated() {
        let found = extract_emails("info@shop.io, again info@shop.io");
        assert_eq!(emails(&found), vec!["info@shop.io", "info@shop.io"]);
    }

    #[test]
    fn test_email_in_html_markup() {
        let html = r#"<p>Write to <a href="mailto:team@acme.dev">team@acme.dev</a></p>"#;
        let found = extract_emails(html);
        assert_eq!(emails(&found), vec!["team@acme.dev", "team@acme.dev"]);
    }

    #[test]
    fn test_bytes_valid_utf8() {
        let found = extract_emails_from_bytes(b"reach me: bob@mail.example.org");
        assert_eq!(emails(&found), vec!["bob@mail.example.org"]);
    }

    #[test]
    fn test_bytes_invalid_utf8() {
        let bytes = [b'a', b'@', 0xff, 0xfe, b'.', b'c', b'o', b'm'];
        assert!(extract_emails_from_bytes(&bytes).is_empty());
    }

    #[test]
    fn test_serialize_shape() {
        let entry = EmailContext {
            email: "a@b.co".to_string(),
            context: "x a@b.co y".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["email"], "a@b.co");
        assert_eq!(json["context"], "x a@b.co y");
    }
}
