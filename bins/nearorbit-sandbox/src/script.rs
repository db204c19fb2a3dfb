//! Canned pilot input for headless runs. The script repeats every
//! [`SCRIPT_PERIOD`] ticks.

use nearorbit_input_map::{KeyboardState, RawInputState};

pub const SCRIPT_PERIOD: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedHit {
    pub damage: f32,
    pub stun_s: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScriptStep {
    pub raw: RawInputState,
    pub hit: Option<ScriptedHit>,
}

/// Phases, in ticks within a period:
/// climb, boosted roll with a short trigger hold, scheme toggle then
/// vertical drift, hit, coast.
pub fn step_at(tick: u32) -> ScriptStep {
    let t = tick % SCRIPT_PERIOD;
    let mut keys = KeyboardState::default();
    let mut hit = None;
    match t {
        0..60 => keys.thrust = true,
        60..120 => {
            keys.thrust = true;
            keys.boost = true;
            keys.horizontal = 0.6;
            keys.fire = (90..96).contains(&t);
        }
        120..180 => {
            keys.toggle_scheme = t == 120;
            keys.thrust = true;
            keys.vertical_alt = 0.5;
            keys.horizontal_alt = -0.4;
        }
        180..240 => {
            if t == 180 {
                hit = Some(ScriptedHit {
                    damage: 40.0,
                    stun_s: 0.75,
                });
            }
            keys.thrust = true;
        }
        _ => {}
    }
    ScriptStep {
        raw: RawInputState {
            keyboard: keys,
            controllers: None,
        },
        hit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_and_hit_happen_once_per_period() {
        let toggles = (0..SCRIPT_PERIOD)
            .filter(|&t| step_at(t).raw.keyboard.toggle_scheme)
            .count();
        let hits = (0..SCRIPT_PERIOD).filter(|&t| step_at(t).hit.is_some()).count();
        let fire_edges = (1..SCRIPT_PERIOD)
            .filter(|&t| step_at(t).raw.keyboard.fire && !step_at(t - 1).raw.keyboard.fire)
            .count();
        assert_eq!(toggles, 1);
        assert_eq!(fire_edges, 1);
        assert_eq!(hits, 1);
        assert_eq!(step_at(SCRIPT_PERIOD + 180), step_at(180));
    }

    #[test]
    fn tail_of_period_coasts() {
        let step = step_at(SCRIPT_PERIOD - 1);
        assert_eq!(step.raw.keyboard, KeyboardState::default());
        assert!(step.hit.is_none());
    }
}
