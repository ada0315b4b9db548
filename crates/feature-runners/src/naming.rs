//! Runner name derivation.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use convert_case::{Case, Casing};

use crate::error::GenerationError;

/// Default token combined with every derived name.
pub const DEFAULT_TEST_PATTERN: &str = "IT";

/// Turns feature file base names into runner identifiers.
///
/// The base name is lower-cased and converted from `lower_underscore` to
/// `UpperCamel` form. The test pattern is then appended or prepended, so
/// `login_flow` becomes `LoginFlowIT` or `ITLoginFlow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameDeriver {
    pattern: String,
    append: bool,
}

impl Default for NameDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_PATTERN, true)
    }
}

impl NameDeriver {
    /// Create a deriver that appends (`append == true`) or prepends
    /// `pattern`.
    #[must_use]
    pub fn new(pattern: impl Into<String>, append: bool) -> Self {
        Self {
            pattern: pattern.into(),
            append,
        }
    }

    /// Derive the runner name for `base_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_runners::NameDeriver;
    ///
    /// assert_eq!(NameDeriver::new("IT", true).derive("login_flow"), "LoginFlowIT");
    /// assert_eq!(NameDeriver::new("IT", false).derive("login_flow"), "ITLoginFlow");
    /// ```
    #[must_use]
    pub fn derive(&self, base_name: &str) -> String {
        let camel = base_name
            .to_lowercase()
            .from_case(Case::Snake)
            .to_case(Case::Pascal);
        if self.append {
            format!("{camel}{}", self.pattern)
        } else {
            format!("{}{camel}", self.pattern)
        }
    }
}

/// Tracks derived names within one run and rejects duplicates.
#[derive(Debug, Default)]
pub(crate) struct NameRegistry {
    claimed: HashMap<String, Utf8PathBuf>,
}

impl NameRegistry {
    pub(crate) fn claim(&mut self, name: &str, feature: &Utf8Path) -> Result<(), GenerationError> {
        if let Some(first) = self.claimed.get(name) {
            return Err(GenerationError::NamingCollision {
                name: name.to_owned(),
                first: first.clone(),
                second: feature.to_owned(),
            });
        }
        self.claimed.insert(name.to_owned(), feature.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("login_flow", true, "LoginFlowIT")]
    #[case("login_flow", false, "ITLoginFlow")]
    #[case("checkout", true, "CheckoutIT")]
    #[case("Checkout", true, "CheckoutIT")]
    #[case("USER_ACCOUNT_settings", true, "UserAccountSettingsIT")]
    #[case("step2_login", true, "Step2LoginIT")]
    fn derives_names(#[case] base: &str, #[case] append: bool, #[case] expected: &str) {
        assert_eq!(NameDeriver::new("IT", append).derive(base), expected);
    }

    #[test]
    fn custom_pattern_is_applied() {
        assert_eq!(NameDeriver::new("Test", true).derive("search"), "SearchTest");
        assert_eq!(NameDeriver::new("Run", false).derive("search"), "RunSearch");
    }

    #[test]
    fn default_appends_it() {
        assert_eq!(NameDeriver::default().derive("login"), "LoginIT");
    }

    #[test]
    fn registry_rejects_duplicate_names() {
        let mut registry = NameRegistry::default();
        assert!(registry.claim("LoginIT", Utf8Path::new("login.feature")).is_ok());
        let err = registry.claim("LoginIT", Utf8Path::new("LOGIN.feature"));
        assert!(matches!(
            err,
            Err(GenerationError::NamingCollision { ref name, .. }) if name == "LoginIT"
        ));
    }
}
