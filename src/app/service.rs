//! Control loop service — the hexagonal core.
//!
//! [`ControlLoop`] owns the validated configuration and the diagnostics
//! counters.  All I/O flows through port traits passed in at call sites,
//! so the whole pipeline runs on the host against mock adapters.
//!
//! ```text
//!   AdcPort ───┐    ┌──────────────────────────┐ ──▶ IndicatorPort
//!              ├──▶ │       ControlLoop        │ ──▶ TransportPort
//! SwitchPort ──┘    │ sample · classify · flag │ ──▶ EventSink
//!                   │ map · panic · encode     │
//!                   └──────────────────────────┘
//! ```
//!
//! One cycle runs the stages strictly in order on a fresh
//! [`CycleContext`]: sample, classify, switches, mapping, Panic override,
//! commanded-throttle flags, indicators, frame, send.

use log::{debug, info};

use crate::config::BoardConfig;
use crate::control::drive_mode;
use crate::control::panic::{CommandedThrottle, apply_panic};
use crate::control::throttle;
use crate::error::ConfigError;
use crate::events::CycleTrigger;
use crate::indicator;
use crate::message;
use crate::safety;
use crate::sensors;

use super::context::CycleContext;
use super::events::{AppEvent, FaultKind};
use super::ports::{AdcPort, EventSink, IndicatorPort, SwitchPort, TransportPort};

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

/// Periodic throttle control pipeline.
pub struct ControlLoop {
    config: BoardConfig,
    cycle_count: u64,
    panic_cycles: u64,
    coalesced_ticks: u32,
    /// Finished context of the previous cycle, for change detection only.
    last: Option<CycleContext>,
}

impl ControlLoop {
    /// Construct the loop from a configuration.  Refuses invalid configs.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cycle_count: 0,
            panic_cycles: 0,
            coalesced_ticks: 0,
            last: None,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            tolerance_pct: self.config.plausibility_tolerance_pct,
        });
        info!(
            "ControlLoop started: period={}ms tolerance={}pp can_id=0x{:03X}",
            self.config.control_loop_interval_ms,
            self.config.plausibility_tolerance_pct,
            self.config.can_id
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one cycle if the trigger holds a pending signal.
    pub fn poll<H>(
        &mut self,
        trigger: &CycleTrigger,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> Option<CycleContext>
    where
        H: AdcPort + SwitchPort + IndicatorPort + TransportPort,
    {
        if !trigger.take() {
            return None;
        }
        self.coalesced_ticks = trigger.coalesced_ticks();
        Some(self.run_cycle(hw, sink))
    }

    /// Run one full control cycle and report transitions to `sink`.
    ///
    /// `hw` satisfies every hardware port, which avoids juggling several
    /// mutable borrows of the same adapter.
    pub fn run_cycle<H>(&mut self, hw: &mut H, sink: &mut impl EventSink) -> CycleContext
    where
        H: AdcPort + SwitchPort + IndicatorPort + TransportPort,
    {
        self.cycle_count += 1;
        let ctx = execute(&self.config, hw);
        if ctx.in_panic() {
            self.panic_cycles += 1;
        }
        debug!(
            "cycle {}: mode={} flags={} t1={} t2={}",
            self.cycle_count,
            ctx.mode,
            ctx.flags,
            ctx.commanded.throttle1,
            ctx.commanded.throttle2
        );

        emit_transitions(self.last.as_ref(), &ctx, sink);
        self.last = Some(ctx);
        ctx
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Total cycles run since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Cycles that ended with Panic asserted.
    pub fn panic_cycles(&self) -> u64 {
        self.panic_cycles
    }

    /// Coalesced timer ticks, as last read from the trigger.
    pub fn coalesced_ticks(&self) -> u32 {
        self.coalesced_ticks
    }

    pub fn last_cycle(&self) -> Option<&CycleContext> {
        self.last.as_ref()
    }
}

// ───────────────────────────────────────────────────────────────
// Pipeline
// ───────────────────────────────────────────────────────────────

/// The stage sequence.  Depends only on `config` and what the ports
/// return this cycle.
fn execute<H>(config: &BoardConfig, hw: &mut H) -> CycleContext
where
    H: AdcPort + SwitchPort + IndicatorPort + TransportPort,
{
    // 1. Acquire all three channels
    let mut ctx = CycleContext::new(sensors::sample_all(hw));

    // 2. Drive mode
    let (mode, code) = drive_mode::classify(ctx.raw.drive_mode, &config.drive_mode_bounds);
    ctx.mode = mode;
    ctx.error_code = code;

    // 3. Switches → fresh flag register
    ctx.switches = safety::read_switches(hw, &config.switch_levels);
    ctx.flags = safety::aggregate(&ctx.switches);

    // 4. Pedal mapping + plausibility
    ctx.mapping = throttle::map(
        ctx.raw.throttle1,
        ctx.raw.throttle2,
        &config.throttle1,
        &config.throttle2,
        config.plausibility_tolerance_pct,
    );
    ctx.flags
        .apply_mapping(&ctx.mapping, config.brake_conflict_threshold_pct);

    // 5. Panic override
    let outcome = apply_panic(
        &ctx.flags,
        CommandedThrottle::new(ctx.mapping.out1, ctx.mapping.out2),
    );
    ctx.commanded = outcome.throttle;

    // 6. Flags that depend on what is actually commanded
    ctx.flags
        .apply_commanded(&ctx.commanded, config.throttle_active_pct);

    // 7. Indicators (consumes the error code)
    ctx.indicated_code = ctx.error_code;
    ctx.indicators = indicator::encode(hw, &mut ctx.error_code, outcome.force_indicators);

    // 8. Frame
    ctx.payload = message::build(&ctx.flags, ctx.mode, &ctx.commanded);

    // 9. Send; delivery is the transport's concern
    let _ = hw.send(&ctx.payload);

    ctx
}

// ───────────────────────────────────────────────────────────────
// Change detection
// ───────────────────────────────────────────────────────────────

fn fault_active(ctx: &CycleContext, kind: FaultKind) -> bool {
    match kind {
        FaultKind::SelectorRange => ctx.selector_fault(),
        FaultKind::ShutdownSwitch => ctx.flags.shutdown_tripped(),
        FaultKind::ThrottleBrakeConflict => ctx.flags.throttle_brake_conflict,
    }
}

const FAULT_KINDS: [FaultKind; 3] = [
    FaultKind::SelectorRange,
    FaultKind::ShutdownSwitch,
    FaultKind::ThrottleBrakeConflict,
];

/// Compare against the previous cycle and emit what changed.  The first
/// cycle is compared against an all-clear baseline.
fn emit_transitions(prev: Option<&CycleContext>, cur: &CycleContext, sink: &mut impl EventSink) {
    for kind in FAULT_KINDS {
        let was = prev.is_some_and(|p| fault_active(p, kind));
        let is = fault_active(cur, kind);
        match (was, is) {
            (false, true) => sink.emit(&AppEvent::FaultDetected(kind, cur.flags)),
            (true, false) => sink.emit(&AppEvent::FaultCleared(kind)),
            _ => {}
        }
    }

    let was_panic = prev.is_some_and(CycleContext::in_panic);
    match (was_panic, cur.in_panic()) {
        (false, true) => sink.emit(&AppEvent::PanicEntered {
            deviation_pct: cur.mapping.deviation(),
        }),
        (true, false) => sink.emit(&AppEvent::PanicCleared),
        _ => {}
    }

    if let Some(p) = prev
        && p.mode != cur.mode
    {
        sink.emit(&AppEvent::DriveModeChanged {
            from: p.mode,
            to: cur.mode,
        });
    }
}
