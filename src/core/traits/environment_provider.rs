use crate::core::errors::Result;
use crate::core::models::environment::Environment;

/// Port for looking up environments by name.
///
/// Returned environments have their includes already applied and their
/// invariants verified.
pub trait EnvironmentProvider: Send + Sync {
    /// Look up an environment.
    ///
    /// # Errors
    ///
    /// `EnvironmentNotFound` if no environment has that name.
    fn get(&self, name: &str) -> Result<Environment>;

    /// Names of all known environments, sorted.
    fn names(&self) -> Vec<String>;
}
