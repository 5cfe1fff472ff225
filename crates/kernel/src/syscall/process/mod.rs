//! Process syscalls.
//!
//! TEAM_417: Split by concern.
//! - `identity` - uid/gid getters and setters, pid, uname, umask
//! - `groups` - process groups and sessions

pub mod groups;
pub mod identity;

pub use groups::{sys_getpgrp, sys_setpgid, sys_setsid};
pub use identity::{
    sys_getegid, sys_geteuid, sys_getgid, sys_getpid, sys_getuid, sys_setgid, sys_setregid,
    sys_setreuid, sys_setuid, sys_umask, sys_uname,
};
