//! Optional add-ons layered over an exercise
//!
//! Each layer owns exactly one inner [`Exercise`], passes the read interface
//! through, multiplies the inner calorie value by its own factor and appends
//! a suffix to the inner description. Layers stack in any order.

use crate::exercise::{Exercise, ExerciseCategory};

/// Calorie factor for exercising with equipment
pub const EQUIPMENT_CALORIE_FACTOR: f64 = 1.05;

/// Calorie factor for exercising to music
pub const MUSIC_CALORIE_FACTOR: f64 = 1.03;

/// Tempo assumed when a playlist is given without one
pub const DEFAULT_BPM: u32 = 120;

/// Equipment used during an exercise, with an optional load in kg
#[derive(Debug)]
pub struct EquipmentEnhancement {
    inner: Box<dyn Exercise>,
    equipment: String,
    weight_kg: f64,
}

impl EquipmentEnhancement {
    pub fn new(inner: impl Exercise + 'static, equipment: impl Into<String>) -> Self {
        Self::with_weight(inner, equipment, 0.0)
    }

    pub fn with_weight(
        inner: impl Exercise + 'static,
        equipment: impl Into<String>,
        weight_kg: f64,
    ) -> Self {
        Self {
            inner: Box::new(inner),
            equipment: equipment.into(),
            weight_kg,
        }
    }

    pub fn equipment(&self) -> &str {
        &self.equipment
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }
}

impl Exercise for EquipmentEnhancement {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn duration(&self) -> u32 {
        self.inner.duration()
    }

    fn intensity(&self) -> u8 {
        self.inner.intensity()
    }

    fn category(&self) -> ExerciseCategory {
        self.inner.category()
    }

    fn calories(&self) -> f64 {
        self.inner.calories() * EQUIPMENT_CALORIE_FACTOR
    }

    fn description(&self) -> String {
        if self.weight_kg > 0.0 {
            format!(
                "{} | Equipment: {} ({:.1} kg)",
                self.inner.description(),
                self.equipment,
                self.weight_kg
            )
        } else {
            format!("{} | Equipment: {}", self.inner.description(), self.equipment)
        }
    }
}

/// Music played during an exercise
#[derive(Debug)]
pub struct MusicEnhancement {
    inner: Box<dyn Exercise>,
    playlist: String,
    bpm: u32,
}

impl MusicEnhancement {
    pub fn new(inner: impl Exercise + 'static, playlist: impl Into<String>) -> Self {
        Self::with_bpm(inner, playlist, DEFAULT_BPM)
    }

    pub fn with_bpm(inner: impl Exercise + 'static, playlist: impl Into<String>, bpm: u32) -> Self {
        Self {
            inner: Box::new(inner),
            playlist: playlist.into(),
            bpm,
        }
    }

    pub fn playlist(&self) -> &str {
        &self.playlist
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }
}

impl Exercise for MusicEnhancement {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn duration(&self) -> u32 {
        self.inner.duration()
    }

    fn intensity(&self) -> u8 {
        self.inner.intensity()
    }

    fn category(&self) -> ExerciseCategory {
        self.inner.category()
    }

    fn calories(&self) -> f64 {
        self.inner.calories() * MUSIC_CALORIE_FACTOR
    }

    fn description(&self) -> String {
        format!(
            "{} | Music: {} ({} BPM)",
            self.inner.description(),
            self.playlist,
            self.bpm
        )
    }
}

/// Builder-style wrapping for any exercise
pub trait Enhance: Exercise + Sized + 'static {
    fn with_equipment(self, equipment: impl Into<String>) -> EquipmentEnhancement {
        EquipmentEnhancement::new(self, equipment)
    }

    fn with_weighted_equipment(self, equipment: impl Into<String>, weight_kg: f64) -> EquipmentEnhancement {
        EquipmentEnhancement::with_weight(self, equipment, weight_kg)
    }

    fn with_music(self, playlist: impl Into<String>) -> MusicEnhancement {
        MusicEnhancement::new(self, playlist)
    }
}

impl<E: Exercise + Sized + 'static> Enhance for E {}
