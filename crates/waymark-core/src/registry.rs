#![forbid(unsafe_code)]

//! Anchor registry: step name to live host handle.
//!
//! The host registers a handle when it mounts the element for a step and
//! unregisters it on unmount. What happens when a second handle arrives under
//! a name that is already registered is an explicit [`RegistrationPolicy`].

use ahash::AHashMap;

use crate::step::StepName;

/// How a registration under an existing name is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// Keep the existing handle and ignore the newcomer.
    #[default]
    FirstWins,
    /// Replace the existing handle.
    LastWins,
}

/// Result of [`AnchorRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name was free.
    Inserted,
    /// The name was taken and the handle was replaced (`LastWins`).
    Replaced,
    /// The name was taken and the handle was dropped (`FirstWins`).
    Ignored,
}

impl Registration {
    /// Whether the registry now holds the handle that was passed in.
    #[inline]
    pub fn is_stored(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Mapping from step name to host handle.
#[derive(Debug, Clone)]
pub struct AnchorRegistry<H> {
    entries: AHashMap<StepName, H>,
    policy: RegistrationPolicy,
}

impl<H> Default for AnchorRegistry<H> {
    fn default() -> Self {
        Self::new(RegistrationPolicy::default())
    }
}

impl<H> AnchorRegistry<H> {
    /// Create an empty registry with the given policy.
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self {
            entries: AHashMap::new(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Register `handle` under `name`, honoring the registry's policy.
    pub fn register(&mut self, name: StepName, handle: H) -> Registration {
        if !self.entries.contains_key(&name) {
            tracing::trace!(step = %name, "anchor registered");
            self.entries.insert(name, handle);
            return Registration::Inserted;
        }
        match self.policy {
            RegistrationPolicy::FirstWins => {
                tracing::debug!(step = %name, "duplicate anchor registration ignored");
                Registration::Ignored
            }
            RegistrationPolicy::LastWins => {
                tracing::debug!(step = %name, "anchor registration replaced");
                self.entries.insert(name, handle);
                Registration::Replaced
            }
        }
    }

    /// Remove the handle for `name`, returning it if present.
    pub fn unregister(&mut self, name: &StepName) -> Option<H> {
        let removed = self.entries.remove(name);
        if removed.is_some() {
            tracing::trace!(step = %name, "anchor unregistered");
        }
        removed
    }

    #[inline]
    pub fn get(&self, name: &StepName) -> Option<&H> {
        self.entries.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &StepName) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &StepName> {
        self.entries.keys()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
