use nearorbit_core::env::{EnvError, parse_f32_with, scoped_keys};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Force model constants. Defaults are the stock racer values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceTuning {
    pub max_speed: f32,
    pub base_accel: f32,
    pub boost_speed: f32,
    pub boost_accel: f32,
    pub base_drag: f32,
    /// Fraction of the speed cap where speed-dependent drag starts.
    pub drag_thresh: f32,
    pub lateral_drag: f32,
    pub boost_lateral_drag: f32,
}

impl Default for ForceTuning {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            base_accel: 6.25,
            boost_speed: 8.75,
            boost_accel: 20.0,
            base_drag: 4.0,
            drag_thresh: 0.94,
            lateral_drag: 1.5,
            boost_lateral_drag: 5.0,
        }
    }
}

/// Control-surface limits. Rates are degrees per second, thrust values are
/// units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlTuning {
    pub max_thrust: f32,
    /// Change of the main thrust accumulator per second of held/released input.
    pub thrust_rate: f32,
    pub max_v_thrust: f32,
    pub max_yaw: f32,
    pub max_roll: f32,
    pub max_pitch: f32,
    /// Largest bank/pitch lean (degrees) the assisted scheme derives.
    pub max_assisted_theta: f32,
    /// Height of the shoulders below the tracked head point (metres).
    pub shoulder_offset: f32,
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            max_thrust: 5.0,
            thrust_rate: 2.5,
            max_v_thrust: 2.0,
            max_yaw: 60.0,
            max_roll: 90.0,
            max_pitch: 60.0,
            max_assisted_theta: 45.0,
            shoulder_offset: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightTuning {
    pub forces: ForceTuning,
    pub control: ControlTuning,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("drag_thresh must lie in [0, 1), got {0}")]
    DragThreshold(f32),
    #[error(transparent)]
    Env(#[from] EnvError),
}

const POSITIVE_FIELDS: &[&str] = &[
    "max_speed",
    "base_accel",
    "boost_speed",
    "boost_accel",
    "max_thrust",
    "thrust_rate",
    "max_v_thrust",
    "max_yaw",
    "max_roll",
    "max_pitch",
    "max_assisted_theta",
];

const NON_NEGATIVE_FIELDS: &[&str] = &["base_drag", "lateral_drag", "boost_lateral_drag"];

impl FlightTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
            if POSITIVE_FIELDS.contains(&field) && value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
            if NON_NEGATIVE_FIELDS.contains(&field) && value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }
        let thresh = self.forces.drag_thresh;
        if !(0.0..1.0).contains(&thresh) {
            return Err(TuningError::DragThreshold(thresh));
        }
        Ok(())
    }

    /// Defaults overridden by `NEARORBIT_<VEHICLE>_<FIELD>` or `NEARORBIT_<FIELD>`.
    pub fn from_env(vehicle_key: &str) -> Result<Self, TuningError> {
        Self::from_lookup(vehicle_key, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        vehicle_key: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TuningError> {
        let mut tuning = Self::default();
        for (field, slot) in tuning.fields_mut() {
            if let Some(value) = parse_f32_with(&scoped_keys(vehicle_key, field), &lookup)? {
                *slot = value;
            }
        }
        tuning.validate()?;
        Ok(tuning)
    }

    fn fields(&self) -> [(&'static str, f32); 16] {
        let f = &self.forces;
        let c = &self.control;
        [
            ("max_speed", f.max_speed),
            ("base_accel", f.base_accel),
            ("boost_speed", f.boost_speed),
            ("boost_accel", f.boost_accel),
            ("base_drag", f.base_drag),
            ("drag_thresh", f.drag_thresh),
            ("lateral_drag", f.lateral_drag),
            ("boost_lateral_drag", f.boost_lateral_drag),
            ("max_thrust", c.max_thrust),
            ("thrust_rate", c.thrust_rate),
            ("max_v_thrust", c.max_v_thrust),
            ("max_yaw", c.max_yaw),
            ("max_roll", c.max_roll),
            ("max_pitch", c.max_pitch),
            ("max_assisted_theta", c.max_assisted_theta),
            ("shoulder_offset", c.shoulder_offset),
        ]
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut f32); 16] {
        let f = &mut self.forces;
        let c = &mut self.control;
        [
            ("max_speed", &mut f.max_speed),
            ("base_accel", &mut f.base_accel),
            ("boost_speed", &mut f.boost_speed),
            ("boost_accel", &mut f.boost_accel),
            ("base_drag", &mut f.base_drag),
            ("drag_thresh", &mut f.drag_thresh),
            ("lateral_drag", &mut f.lateral_drag),
            ("boost_lateral_drag", &mut f.boost_lateral_drag),
            ("max_thrust", &mut c.max_thrust),
            ("thrust_rate", &mut c.thrust_rate),
            ("max_v_thrust", &mut c.max_v_thrust),
            ("max_yaw", &mut c.max_yaw),
            ("max_roll", &mut c.max_roll),
            ("max_pitch", &mut c.max_pitch),
            ("max_assisted_theta", &mut c.max_assisted_theta),
            ("shoulder_offset", &mut c.shoulder_offset),
        ]
    }
}
