//! Which discovered elements the explorer may click.

use wayfinder_protocols::CandidateElement;

const DEFAULT_DENY: &[&str] = &[
    "logout",
    "log out",
    "log-out",
    "sign out",
    "signout",
    "sign-out",
    "search",
    "text field",
    "text input",
    "input field",
    "textarea",
    "delete account",
];

/// Case-insensitive keyword denylist over element purpose and text.
#[derive(Debug, Clone)]
pub struct ClickPolicy {
    deny: Vec<String>,
}

impl Default for ClickPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DENY.iter().copied())
    }
}

impl ClickPolicy {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let deny = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { deny }
    }

    pub fn keywords(&self) -> &[String] {
        &self.deny
    }

    /// The first keyword matching the element, if any.
    pub fn denied_by(&self, element: &CandidateElement) -> Option<&str> {
        let purpose = element.purpose.to_lowercase();
        let text = element.text.as_deref().map(str::to_lowercase);

        self.deny
            .iter()
            .find(|k| {
                purpose.contains(k.as_str())
                    || text.as_deref().is_some_and(|t| t.contains(k.as_str()))
            })
            .map(String::as_str)
    }

    pub fn allows(&self, element: &CandidateElement) -> bool {
        self.denied_by(element).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_protocols::Bounds;

    fn element(purpose: &str, text: Option<&str>) -> CandidateElement {
        let e = CandidateElement::new(purpose, Bounds::new(0.0, 0.0, 10.0, 10.0));
        match text {
            Some(t) => e.with_text(t),
            None => e,
        }
    }

    #[test]
    fn test_default_denies_logout_any_case() {
        let policy = ClickPolicy::default();
        assert!(!policy.allows(&element("LOGOUT", None)));
        assert!(!policy.allows(&element("account menu item", Some("Sign Out"))));
        assert!(!policy.allows(&element("site Search box", None)));
        assert!(!policy.allows(&element("comment textarea", None)));
    }

    #[test]
    fn test_default_allows_navigation() {
        let policy = ClickPolicy::default();
        assert!(policy.allows(&element("open settings", Some("Settings"))));
        assert!(policy.allows(&element("navigate to billing", None)));
    }

    #[test]
    fn test_custom_keywords_normalized() {
        let policy = ClickPolicy::new(["  Delete ", ""]);
        assert_eq!(policy.keywords(), ["delete"]);
        assert_eq!(policy.denied_by(&element("delete project", None)), Some("delete"));
        assert!(policy.allows(&element("logout", None)));
    }
}
