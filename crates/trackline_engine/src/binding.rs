// SPDX-License-Identifier: MIT OR Apache-2.0
//! Controlled/uncontrolled state binding.
//!
//! A piece of engine state that the caller may either own (controlled) or
//! leave to the engine (uncontrolled). The mode is fixed at construction.
//! In both modes every change request is reported back to the caller as a
//! signal; only the uncontrolled mode applies it immediately.

use serde::{Deserialize, Serialize};

/// Ownership mode of a bound value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Binding<T> {
    /// The caller owns the value and feeds changes back through [`Binding::sync`]
    Controlled {
        /// Last value supplied by the caller
        value: T,
    },
    /// The engine owns the value
    Uncontrolled {
        /// Current value
        value: T,
    },
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::Uncontrolled { value: T::default() }
    }
}

impl<T: Clone + PartialEq> Binding<T> {
    /// Caller-owned binding
    pub fn controlled(value: T) -> Self {
        Self::Controlled { value }
    }

    /// Engine-owned binding with an initial value
    pub fn uncontrolled(initial: T) -> Self {
        Self::Uncontrolled { value: initial }
    }

    /// Current value
    pub fn get(&self) -> &T {
        match self {
            Self::Controlled { value } | Self::Uncontrolled { value } => value,
        }
    }

    /// Whether the caller owns the value
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled { .. })
    }

    /// Ask for a new value.
    ///
    /// Returns the value to report to the caller, or `None` when it equals
    /// the current one. Uncontrolled bindings store it right away.
    pub fn request(&mut self, next: T) -> Option<T> {
        if *self.get() == next {
            return None;
        }
        if let Self::Uncontrolled { value } = self {
            *value = next.clone();
        }
        Some(next)
    }

    /// Accept the caller's authoritative value (controlled mode).
    ///
    /// Ignored for uncontrolled bindings, which never mix modes.
    pub fn sync(&mut self, next: T) {
        match self {
            Self::Controlled { value } => *value = next,
            Self::Uncontrolled { .. } => {
                tracing::debug!("sync on an uncontrolled binding ignored");
            }
        }
    }
}
