//! Breach-check capability.
//!
//! PassVault is local-only, so the bundled checker never reports a
//! breach.  Embedders can supply their own implementation.

/// Something that can tell whether a password appears in known breaches.
pub trait BreachCheck {
    fn is_breached(&self, password: &str) -> bool;
}

/// Offline checker: no data source, never reports a breach.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBreachCheck;

impl BreachCheck for OfflineBreachCheck {
    fn is_breached(&self, _password: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_check_never_flags() {
        assert!(!OfflineBreachCheck.is_breached("password"));
        assert!(!OfflineBreachCheck.is_breached(""));
    }
}
