//! TEAM_431: Kernel configuration.
//!
//! Compile-time defaults come from Cargo features; callers that embed the
//! kernel (or tests) can start from `KernelConfig::new()` and override fields.

use log::LevelFilter;

/// Address-translation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslateConfig {
    /// Reject physical results at or beyond installed memory.
    pub check_installed_memory: bool,
}

impl TranslateConfig {
    pub const fn new() -> Self {
        Self {
            check_installed_memory: cfg!(feature = "strict-translate"),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Strings reported by `uname`. Each must fit a 9-byte field with its NUL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UtsInfo {
    pub sysname: &'static str,
    pub nodename: &'static str,
    pub release: &'static str,
    pub version: &'static str,
    pub machine: &'static str,
}

impl UtsInfo {
    pub const fn new() -> Self {
        Self {
            sysname: "pallas",
            nodename: "(none)",
            release: "0.1",
            version: "0.1.0",
            machine: "i386",
        }
    }
}

impl Default for UtsInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelConfig {
    pub translate: TranslateConfig,
    /// Gap kept free between the break and the stack.
    pub stack_guard: u32,
    /// Timer ticks per second.
    pub hz: u64,
    pub uts: UtsInfo,
    /// Process table capacity.
    pub max_processes: usize,
    /// Level the logger is installed with.
    pub log_level: LevelFilter,
}

impl KernelConfig {
    pub const DEFAULT_STACK_GUARD: u32 = 16384;
    pub const DEFAULT_HZ: u64 = 100;
    pub const DEFAULT_MAX_PROCESSES: usize = 64;

    pub const fn new() -> Self {
        Self {
            translate: TranslateConfig::new(),
            stack_guard: Self::DEFAULT_STACK_GUARD,
            hz: Self::DEFAULT_HZ,
            uts: UtsInfo::new(),
            max_processes: Self::DEFAULT_MAX_PROCESSES,
            log_level: default_log_level(),
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new()
    }
}

const fn default_log_level() -> LevelFilter {
    if cfg!(feature = "verbose-syscalls") {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = KernelConfig::default();
        assert_eq!(cfg.stack_guard, 16384);
        assert_eq!(cfg.hz, 100);
        assert_eq!(cfg.max_processes, 64);
        assert_eq!(
            cfg.translate.check_installed_memory,
            cfg!(feature = "strict-translate")
        );
    }

    #[test]
    fn test_log_level_follows_verbose_feature() {
        let expected = if cfg!(feature = "verbose-syscalls") {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        };
        assert_eq!(KernelConfig::new().log_level, expected);
    }

    #[test]
    fn test_uts_strings_fit_fields() {
        let uts = UtsInfo::default();
        for s in [uts.sysname, uts.nodename, uts.release, uts.version, uts.machine] {
            assert!(s.len() < 9, "{s} does not fit a uname field");
        }
    }
}
