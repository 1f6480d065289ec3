//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  IDLE ──[temp OR gas]──▶ ACTIVE_UNDISPLAYED ──[banner shown]──▶ ACTIVE_DISPLAYED
//!    ▲                             │                                   │
//!    └──────────[code match]───────┴───────────[code match]────────────┘
//! ```
//!
//! Only `Idle → ActiveUndisplayed` is decided by an `on_update` handler.
//! The banner and code-match edges are driven from outside the table via
//! [`Fsm::force_transition`](super::Fsm::force_transition) because they
//! originate in the display and keypad layers.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use crate::conditions::strobe_period_ms;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: ActiveUndisplayed
        StateDescriptor {
            id: StateId::ActiveUndisplayed,
            name: "ActiveUndisplayed",
            on_enter: Some(active_enter),
            on_exit: None,
            on_update: active_update,
        },
        // Index 2: ActiveDisplayed
        StateDescriptor {
            id: StateId::ActiveDisplayed,
            name: "ActiveDisplayed",
            on_enter: None,
            on_exit: None,
            on_update: active_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    info!("Entering IDLE: siren, strobe and alarm LED off");
    ctx.commands.siren = false;
    ctx.commands.strobe_half_period_ms = 0;
    ctx.commands.alarm_led = false;
    ctx.latched_strobe_ms = 0;
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.conditions.any() {
        return Some(StateId::ActiveUndisplayed);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE states
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut FsmContext) {
    warn!(
        "ALARM ACTIVATED: over_temperature={} gas={} ({:.1}°C, {:.0} ppm)",
        ctx.conditions.over_temperature,
        ctx.conditions.gas_detected,
        ctx.sensors.temperature_c,
        ctx.sensors.gas_ppm,
    );
    ctx.commands.siren = true;
    ctx.commands.alarm_led = true;
    refresh_strobe(ctx);
}

/// The alarm is latched: nothing in the sensor data can end it.
fn active_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.commands.siren = true;
    ctx.commands.alarm_led = true;
    refresh_strobe(ctx);
    None
}

/// Follow the live conditions; once they clear keep flashing at the last
/// period seen this episode.
fn refresh_strobe(ctx: &mut FsmContext) {
    let period = strobe_period_ms(&ctx.conditions, &ctx.config);
    if period > 0 {
        ctx.latched_strobe_ms = period;
    }
    ctx.commands.strobe_half_period_ms = ctx.latched_strobe_ms;
}
