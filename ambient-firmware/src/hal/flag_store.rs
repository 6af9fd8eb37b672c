// Flash Flag Store - persistentes "ist registriert"-Flag
//
// Speichert ein 4-Byte Magic-Word an einem festen Flash-Offset.
// Gelöschter Flash (0xFF..) bedeutet "nicht gesetzt".

use ambient_core::{FlagStore, StorageError};
use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;

use crate::config::{REGISTRATION_FLAG_MAGIC, REGISTRATION_FLAG_OFFSET};

pub struct FlashFlagStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> FlashFlagStore<'d> {
    /// Erstellt den Store für das Registrierungs-Flag
    ///
    /// # Parameter
    /// - `flash`: FLASH Peripheral
    pub fn new(flash: esp_hal::peripherals::FLASH<'d>) -> Self {
        Self {
            flash: FlashStorage::new(flash),
            offset: REGISTRATION_FLAG_OFFSET,
        }
    }
}

impl FlagStore for FlashFlagStore<'_> {
    fn get(&mut self) -> Result<bool, StorageError> {
        let mut word = [0u8; 4];
        self.flash
            .read(self.offset, &mut word)
            .map_err(|_| StorageError::ReadFailed)?;
        Ok(u32::from_le_bytes(word) == REGISTRATION_FLAG_MAGIC)
    }

    fn set(&mut self, value: bool) -> Result<(), StorageError> {
        let word = if value {
            REGISTRATION_FLAG_MAGIC.to_le_bytes()
        } else {
            [0xFF; 4]
        };
        // Storage::write übernimmt Read-Modify-Erase-Write des Sektors
        self.flash
            .write(self.offset, &word)
            .map_err(|_| StorageError::WriteFailed)
    }
}
