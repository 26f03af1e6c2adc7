//! Evolutionary training harness for the Pong core
//!
//! Fitness evaluation, a trainable feed-forward policy, a generational
//! optimizer, and persistence of the best policy.

pub mod artifact;
pub mod evaluate;
pub mod evolve;
pub mod policy;

pub use artifact::{load_best, save_best, ArtifactLoadError, ArtifactSaveError, POLICY_KIND};
pub use evaluate::*;
pub use evolve::*;
pub use policy::PolicyNet;
