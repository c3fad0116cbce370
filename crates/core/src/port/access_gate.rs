// Access Gate Port
//
// Opaque credential predicate evaluated before any protected request handler.

/// Credential check for protected operations
pub trait AccessGate: Send + Sync {
    /// Returns true if `credential` grants access. `None` means nothing was presented.
    fn admits(&self, credential: Option<&str>) -> bool;
}

