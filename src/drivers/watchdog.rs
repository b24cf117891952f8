//! Task watchdog (TWDT) for the control loop.
//!
//! The loop blocks for the full post-disconnect pause, so the timeout is
//! never allowed below that pause plus [`PAUSE_MARGIN_MS`]. A timeout
//! panics, which reboots the board into a fresh WiFi and socket join.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset, ESP_OK};
#[cfg(not(target_os = "espidf"))]
use core::cell::Cell;

use log::{info, warn};

use crate::config::SystemConfig;

/// Headroom above the disconnect pause.
pub const PAUSE_MARGIN_MS: u32 = 5_000;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: Cell<u64>,
}

/// Effective timeout for `config`.
pub fn effective_timeout_ms(config: &SystemConfig) -> u32 {
    let floor = config.disconnect_pause_ms.saturating_add(PAUSE_MARGIN_MS);
    config.watchdog_timeout_ms.max(floor)
}

impl Watchdog {
    /// Arm the watchdog for the calling task.
    pub fn for_config(config: &SystemConfig) -> Self {
        let timeout_ms = effective_timeout_ms(config);
        if timeout_ms != config.watchdog_timeout_ms {
            warn!(
                "Watchdog: {}ms is shorter than the disconnect pause, using {}ms",
                config.watchdog_timeout_ms, timeout_ms
            );
        }
        Self::arm(timeout_ms)
    }

    #[cfg(target_os = "espidf")]
    fn arm(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain FFI calls on the boot task before the loop starts.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK {
            warn!("Watchdog: reconfigure returned {}", ret);
        }
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK;
        if subscribed {
            info!("Watchdog: armed ({}ms)", timeout_ms);
        } else {
            warn!("Watchdog: subscribe failed ({}), running unguarded", ret);
        }
        Self { timeout_ms, subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    fn arm(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): armed ({}ms)", timeout_ms);
        Self { timeout_ms, feeds: Cell::new(0) }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    #[cfg(target_os = "espidf")]
    pub fn feed(&self) {
        if self.subscribed {
            // SAFETY: resets the TWDT entry of the subscribed task.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn feed(&self) {
        self.feeds.set(self.feeds.get() + 1);
    }

    /// Simulation: number of feeds so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_feeds(&self) -> u64 {
        self.feeds.get()
    }
}
