//! Page state fingerprinting.

use sha2::{Digest, Sha256};

/// Computes an opaque identity for a page state.
///
/// Equal inputs must give equal fingerprints; the engine never processes a
/// fingerprint twice in one run.
pub trait StateFingerprinter: Send + Sync {
    fn fingerprint(&self, url: &str, structural_summary: &str) -> String;
}

/// SHA-256 over the exact URL and the normalized structural summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralFingerprinter;

impl StateFingerprinter for StructuralFingerprinter {
    fn fingerprint(&self, url: &str, structural_summary: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(b"\n");
        hasher.update(normalize_summary(structural_summary).as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Trim every line and drop blank ones.
pub fn normalize_summary(summary: &str) -> String {
    summary
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_fingerprint() {
        let f = StructuralFingerprinter;
        let a = f.fingerprint("https://app.test/", "div#root\nbutton.primary");
        let b = f.fingerprint("https://app.test/", "div#root\nbutton.primary");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_whitespace_insensitive() {
        let f = StructuralFingerprinter;
        let a = f.fingerprint("https://app.test/", "div#root\nbutton.primary");
        let b = f.fingerprint("https://app.test/", "  div#root  \n\n\tbutton.primary\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_url_and_structure_both_matter() {
        let f = StructuralFingerprinter;
        let base = f.fingerprint("https://app.test/", "div#root");
        assert_ne!(base, f.fingerprint("https://app.test/other", "div#root"));
        assert_ne!(base, f.fingerprint("https://app.test/", "div#root\nform"));
    }

    #[test]
    fn test_line_boundaries_not_ambiguous() {
        let f = StructuralFingerprinter;
        assert_ne!(
            f.fingerprint("https://a.test/x", "y"),
            f.fingerprint("https://a.test/", "x\ny")
        );
    }
}
