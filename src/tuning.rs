//! Data-driven game balance
//!
//! Every knob a designer iterates on lives here: movement feel, vehicle
//! handling and the weapon table. Defaults are the shipped balance; a host
//! may load overrides from a JSON file.
//!
//! Speeds are world units per frame unit (1.0 = one nominal 60 Hz frame);
//! cooldowns and durations are frame units.

use serde::{Deserialize, Serialize};

/// Weapon identifiers, in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Fist,
    Pistol,
    MachineGun,
    Grenade,
}

impl WeaponKind {
    /// Weapon for a 1-based HUD slot number
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(WeaponKind::Fist),
            2 => Some(WeaponKind::Pistol),
            3 => Some(WeaponKind::MachineGun),
            4 => Some(WeaponKind::Grenade),
            _ => None,
        }
    }

    /// Whether firing spawns a projectile (everything but fists)
    #[inline]
    pub fn is_ranged(self) -> bool {
        self != WeaponKind::Fist
    }
}

/// Balance numbers for one weapon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Melee reach or projectile max travel distance
    pub range: f32,
    /// Damage per hit
    pub damage: f32,
    /// Minimum frame units between shots
    pub cooldown: f32,
    /// Area-damage flag carried on the projectile (extension point)
    pub explosive: bool,
}

/// Per-weapon balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub fist: WeaponSpec,
    pub pistol: WeaponSpec,
    pub machine_gun: WeaponSpec,
    pub grenade: WeaponSpec,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            fist: WeaponSpec {
                range: 60.0,
                damage: 15.0,
                cooldown: 12.0,
                explosive: false,
            },
            pistol: WeaponSpec {
                range: 500.0,
                damage: 25.0,
                cooldown: 20.0,
                explosive: false,
            },
            machine_gun: WeaponSpec {
                range: 700.0,
                damage: 15.0,
                cooldown: 5.0,
                explosive: false,
            },
            grenade: WeaponSpec {
                range: 400.0,
                damage: 100.0,
                cooldown: 60.0,
                explosive: true,
            },
        }
    }
}

impl WeaponTable {
    pub fn get(&self, kind: WeaponKind) -> &WeaponSpec {
        match kind {
            WeaponKind::Fist => &self.fist,
            WeaponKind::Pistol => &self.pistol,
            WeaponKind::MachineGun => &self.machine_gun,
            WeaponKind::Grenade => &self.grenade,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Pedestrian velocity decay base (applied as friction^dt)
    pub friction: f32,
    /// Vehicle speed decay base (applied as drag^dt)
    pub drag: f32,
    /// Vehicle forward acceleration per frame unit
    pub vehicle_accel: f32,
    /// Reverse acceleration as a fraction of forward
    pub reverse_accel_factor: f32,
    /// Vehicle turn rate at full authority (radians per frame unit)
    pub vehicle_turn_speed: f32,
    /// On-foot run speed
    pub run_speed: f32,
    /// On-foot walk speed
    pub walk_speed: f32,
    /// Stamina regenerated per frame unit
    pub stamina_regen: f32,
    /// Stamina cost to start a roll
    pub roll_stamina_cost: f32,
    /// Roll travel speed
    pub roll_speed_boost: f32,
    /// Roll duration in frame units
    pub roll_duration: f32,
    /// Weapon balance table
    pub weapons: WeaponTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            friction: 0.92,
            drag: 0.97,
            vehicle_accel: 0.25,
            reverse_accel_factor: 0.5,
            vehicle_turn_speed: 0.06,
            run_speed: 3.5,
            walk_speed: 1.4,
            stamina_regen: 0.4,
            roll_stamina_cost: 30.0,
            roll_speed_boost: 6.5,
            roll_duration: 22.0,
            weapons: WeaponTable::default(),
        }
    }
}

impl Tuning {
    /// Spec for a weapon kind
    #[inline]
    pub fn weapon(&self, kind: WeaponKind) -> &WeaponSpec {
        self.weapons.get(kind)
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("bad tuning file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("cannot read tuning file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
