//! Einmalige Geräte-Registrierung
//!
//! Das "ist registriert"-Flag liegt in einem persistenten [`FlagStore`].
//! Zusätzlich wird pro Prozess höchstens einmal gesendet, auch wenn der
//! Speicher ausfällt.

use crate::traits::{FlagStore, StorageError};

pub struct RegistrationGate<S: FlagStore> {
    store: S,
    sent_this_boot: bool,
}

impl<S: FlagStore> RegistrationGate<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            sent_this_boot: false,
        }
    }

    /// Muss die Registrierung (noch) gesendet werden?
    ///
    /// Ein Lesefehler gilt als "nicht registriert", doppelte
    /// Registrierungen ignoriert der Hub.
    pub fn is_pending(&mut self) -> bool {
        if self.sent_this_boot {
            return false;
        }
        !self.store.get().unwrap_or(false)
    }

    /// Markiert die Registrierung als gesendet und persistiert das Flag
    pub fn mark_registered(&mut self) -> Result<(), StorageError> {
        self.sent_this_boot = true;
        self.store.set(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
