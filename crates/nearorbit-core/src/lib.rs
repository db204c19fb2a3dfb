use serde::{Deserialize, Serialize};

pub mod env;

pub const SIM_TICK_HZ: u16 = 30;

/// Fixed simulation step in seconds derived from [`SIM_TICK_HZ`].
pub fn sim_tick_dt_s() -> f32 {
    1.0 / f32::from(SIM_TICK_HZ)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub uuid::Uuid);

impl EntityId {
    pub fn new_v4() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn is_nil(self) -> bool {
        self.0.is_nil()
    }
}
