//! Trial Timestamps
//!
//! Wall-clock timestamps paired with a raw CPU cycle reading. Uses RDTSCP on
//! x86_64 and CNTVCT_EL0 on AArch64; other platforms report zero cycles and
//! rely on `std::time::Instant` alone.

use std::io;
use std::time::Duration;

// ─── Inline cycle counter helpers ────────────────────────────────────────────

/// Read the CPU cycle/tick counter (platform-specific).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on all x86_64 CPUs since ~2006 and waits
    // for prior instructions to retire before reading the counter.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

/// Read the virtual counter timer on AArch64 (comparable to x86 TSC).
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides real cycle counters.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

// ─── Timestamp ───────────────────────────────────────────────────────────────

/// A point in time captured at a trial boundary.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: std::time::Instant,
    tsc: u64,
}

impl Timestamp {
    /// Capture the current instant and cycle counter
    #[inline(always)]
    pub fn now() -> Self {
        let tsc = read_cycles();
        Self {
            instant: std::time::Instant::now(),
            tsc,
        }
    }

    /// Wall-clock time elapsed between `earlier` and `self`.
    ///
    /// Saturates to zero if `earlier` is actually later.
    #[inline]
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        self.instant.saturating_duration_since(earlier.instant)
    }

    /// Cycles elapsed between `earlier` and `self` (0 without a cycle counter)
    #[inline]
    pub fn cycles_since(&self, earlier: Timestamp) -> u64 {
        self.tsc.saturating_sub(earlier.tsc)
    }
}

// ─── Pre-timing hooks ────────────────────────────────────────────────────────

/// Best-effort pause before the clock starts.
///
/// There is no collector to run and no deferred cleanup to force, so this only
/// yields the current thread to let pending scheduler work drain. Nothing about
/// the measurement depends on it having any effect.
pub fn settle() {
    std::thread::yield_now();
}

// ─── CPU affinity ────────────────────────────────────────────────────────────

/// Number of CPUs an affinity mask can name; higher indices cannot be pinned.
#[cfg(target_os = "linux")]
pub const PINNABLE_CPUS: usize = libc::CPU_SETSIZE as usize;

/// Pinning is a no-op off Linux, so every index is accepted.
#[cfg(not(target_os = "linux"))]
pub const PINNABLE_CPUS: usize = usize::MAX;

/// Reject CPU indices that do not fit in an affinity mask.
pub fn check_pinnable(cpu: usize) -> io::Result<()> {
    if cpu < PINNABLE_CPUS {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cpu {cpu} is outside the affinity mask (0..{PINNABLE_CPUS})"),
        ))
    }
}

/// Restrict the current thread to `cpu`.
///
/// Keeps a trial from migrating between cores mid-run, so both the wall clock
/// and the cycle counter come from one core. Fails with `InvalidInput` for an
/// index outside [`PINNABLE_CPUS`], and with the OS error if the CPU is offline
/// or outside this process's allowed set.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> io::Result<()> {
    check_pinnable(cpu)?;

    // SAFETY: an all-zero cpu_set_t is the empty mask, and `cpu` was checked
    // against CPU_SETSIZE so CPU_SET stays in bounds.
    let rc = unsafe {
        let mut mask: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(cpu, &mut mask);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mask)
    };

    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// CPU pinning is not supported on this platform; only the index is checked.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(cpu: usize) -> io::Result<()> {
    check_pinnable(cpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_since() {
        let start = Timestamp::now();
        std::thread::sleep(Duration::from_millis(10));
        let end = Timestamp::now();

        let elapsed = end.duration_since(start);
        assert!(elapsed >= Duration::from_millis(5));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[test]
    fn test_duration_since_saturates() {
        let start = Timestamp::now();
        let end = Timestamp::now();

        assert_eq!(start.duration_since(end), Duration::ZERO);
        assert_eq!(start.cycles_since(end), 0);
    }

    #[test]
    fn test_cycle_counter() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a, "cycle counter should be monotonic");
        }
    }

    #[test]
    fn test_out_of_range_cpu_rejected() {
        if PINNABLE_CPUS == usize::MAX {
            return;
        }
        let err = pin_to_cpu(PINNABLE_CPUS).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(check_pinnable(PINNABLE_CPUS + 3000).is_err());
        assert!(check_pinnable(0).is_ok());
    }
}
