//! The feature protocol: pluggable behavior for gobs.
//!
//! A feature is a stateless template created once and attached to many
//! gobs. Attaching registers event steps and deposits whatever
//! per-entity state the feature needs into the gob's state bag; the
//! feature object itself never holds per-entity state. Detaching undoes
//! exactly what attach did, so a detach/attach round trip restores the
//! registered steps identically.

use warren_foundation::Result;

use crate::gob::Gob;

/// A behavior unit attachable to a [`Gob`].
///
/// `Config` is the feature's attach-time configuration. Required options
/// are validated eagerly: a malformed config fails the attach with a
/// descriptive error rather than poisoning later ticks.
pub trait Feature {
    /// Attach-time configuration for this feature.
    type Config;

    /// The feature's name, used for attach bookkeeping. Attaching two
    /// features with the same name to one gob is treated as a double
    /// attach of the same feature.
    fn name(&self) -> &'static str;

    /// Installs this feature's state and event steps on a gob.
    ///
    /// # Errors
    /// Returns a config error when a required option is missing or
    /// unusable.
    fn attach(&self, gob: &mut Gob, config: &Self::Config) -> Result<()>;

    /// Removes this feature's state and event steps from a gob.
    fn detach(&self, gob: &mut Gob);
}
