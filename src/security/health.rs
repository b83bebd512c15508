//! Vault health report: weak, reused and breached passwords.

use std::collections::HashMap;

use uuid::Uuid;

use crate::vault::Credential;

use super::breach::BreachCheck;
use super::strength::strength_score;

/// Passwords scoring below this are reported as weak.
pub const WEAK_SCORE_THRESHOLD: u8 = 40;

/// One problem found with a credential's password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthIssue {
    Weak { score: u8 },
    Reused { times: usize },
    Breached,
}

/// Findings for a single credential.  Contains no secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthFinding {
    pub id: Uuid,
    pub title: String,
    pub issues: Vec<HealthIssue>,
}

/// Inspect every credential and return those with at least one issue.
pub fn health_report(credentials: &[Credential], breach: &dyn BreachCheck) -> Vec<HealthFinding> {
    let mut usage: HashMap<&str, usize> = HashMap::new();
    for c in credentials {
        *usage.entry(c.password.as_str()).or_default() += 1;
    }

    credentials
        .iter()
        .filter_map(|c| {
            let mut issues = Vec::new();

            let score = strength_score(&c.password);
            if score < WEAK_SCORE_THRESHOLD {
                issues.push(HealthIssue::Weak { score });
            }

            let times = usage.get(c.password.as_str()).copied().unwrap_or(1);
            if times > 1 {
                issues.push(HealthIssue::Reused { times });
            }

            if breach.is_breached(&c.password) {
                issues.push(HealthIssue::Breached);
            }

            (!issues.is_empty()).then(|| HealthFinding {
                id: c.id,
                title: c.title.clone(),
                issues,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::OfflineBreachCheck;
    use crate::vault::CredentialDraft;
    use chrono::Utc;

    struct ListBreachCheck(Vec<&'static str>);

    impl BreachCheck for ListBreachCheck {
        fn is_breached(&self, password: &str) -> bool {
            self.0.contains(&password)
        }
    }

    fn cred(title: &str, password: &str) -> Credential {
        Credential::from_draft(&CredentialDraft::new(title, password), Utc::now()).unwrap()
    }

    #[test]
    fn strong_unique_passwords_are_clean() {
        let creds = vec![cred("A", "T7#qLm!2vR$x"), cred("B", "Zp9&wE4@kN8^")];
        assert!(health_report(&creds, &OfflineBreachCheck).is_empty());
    }

    #[test]
    fn flags_weak_and_reused() {
        let creds = vec![cred("A", "aaaa"), cred("B", "aaaa"), cred("C", "T7#qLm!2vR$x")];
        let report = health_report(&creds, &OfflineBreachCheck);

        assert_eq!(report.len(), 2);
        for finding in &report {
            assert!(finding
                .issues
                .iter()
                .any(|i| matches!(i, HealthIssue::Weak { .. })));
            assert!(finding.issues.contains(&HealthIssue::Reused { times: 2 }));
        }
    }

    #[test]
    fn uses_supplied_breach_checker() {
        let creds = vec![cred("A", "T7#qLm!2vR$x")];
        let checker = ListBreachCheck(vec!["T7#qLm!2vR$x"]);
        let report = health_report(&creds, &checker);
        assert_eq!(report[0].issues, vec![HealthIssue::Breached]);
        assert_eq!(report[0].title, "A");
    }
}
