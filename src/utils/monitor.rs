#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub memory_mb: u64,
    pub cpu_usage: f32,
    pub since_last: Duration,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: System,
    pid: Pid,
    last_checkpoint: Instant,
    peak_memory_mb: u64,
}

/// 各階段的記憶體與耗時紀錄，關閉時所有呼叫都是 no-op
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    state: Option<Mutex<MonitorState>>,
    start_time: Instant,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let start_time = Instant::now();
        if !enabled {
            return Self {
                state: None,
                start_time,
            };
        }

        let state = match sysinfo::get_current_pid() {
            Ok(pid) => {
                let mut system = System::new_with_specifics(RefreshKind::everything());
                system.refresh_all();
                Some(Mutex::new(MonitorState {
                    system,
                    pid,
                    last_checkpoint: start_time,
                    peak_memory_mb: 0,
                }))
            }
            Err(e) => {
                tracing::warn!("⚠️ Resource monitoring unavailable: {}", e);
                None
            }
        };

        Self { state, start_time }
    }

    pub fn checkpoint(&self, phase: &str) -> Option<PhaseStats> {
        let mut state = self.state.as_ref()?.lock().ok()?;
        state.system.refresh_all();

        let pid = state.pid;
        let (memory_mb, cpu_usage) = {
            let process = state.system.process(pid)?;
            (process.memory() / 1024 / 1024, process.cpu_usage())
        };
        state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

        let now = Instant::now();
        let since_last = now.duration_since(state.last_checkpoint);
        state.last_checkpoint = now;

        Some(PhaseStats {
            phase: phase.to_string(),
            memory_mb,
            cpu_usage,
            since_last,
            elapsed: now.duration_since(self.start_time),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.checkpoint(phase) {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Phase: {:?}, Total: {:?}",
                stats.phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.since_last,
                stats.elapsed
            );
        }
    }

    pub fn log_final_stats(&self) {
        let peak = self
            .state
            .as_ref()
            .and_then(|state| state.lock().ok().map(|s| s.peak_memory_mb));
        if let Some(peak) = peak {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.start_time.elapsed(),
                peak
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }
}

// 非 CLI 建置沒有 sysinfo
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.checkpoint("extract").is_none());
    }

    #[test]
    fn test_enabled_monitor_tracks_phases() {
        let monitor = SystemMonitor::new(true);
        if let Some(stats) = monitor.checkpoint("extract") {
            assert_eq!(stats.phase, "extract");
            assert!(stats.elapsed >= stats.since_last);
        }
    }
}
