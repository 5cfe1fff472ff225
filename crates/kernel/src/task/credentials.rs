//! TEAM_431: Real/effective/saved identity and the rules for changing it.
//!
//! The two setter families are deliberately not symmetric: the group path
//! keeps a committed real gid when the effective half is refused, the user
//! path restores the real uid first. Callers observe that difference, so it
//! stays.

use super::{Gid, ProcError, ROOT_UID, Uid};

/// Identity snapshot of a process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub uid: Uid,
    pub euid: Uid,
    pub suid: Uid,
    pub gid: Gid,
    pub egid: Gid,
    pub sgid: Gid,
}

impl Credentials {
    pub const fn root() -> Self {
        Self::user(ROOT_UID, 0)
    }

    /// Real, effective and saved ids all set to `uid`/`gid`.
    pub const fn user(uid: Uid, gid: Gid) -> Self {
        Self {
            uid,
            euid: uid,
            suid: uid,
            gid,
            egid: gid,
            sgid: gid,
        }
    }

    pub fn is_superuser(&self) -> bool {
        self.euid == ROOT_UID
    }

    /// Change the real and/or effective group id. `None` leaves a half alone.
    ///
    /// The real gid may only be set to itself unless privileged; the effective
    /// gid may take any of the real, effective or saved gids. A refused
    /// effective half does not undo an accepted real half.
    pub fn set_real_and_effective_gid(
        &mut self,
        real: Option<Gid>,
        effective: Option<Gid>,
    ) -> Result<(), ProcError> {
        if let Some(rgid) = real {
            if self.gid == rgid || self.is_superuser() {
                self.gid = rgid;
            } else {
                return Err(ProcError::PermissionDenied);
            }
        }
        if let Some(egid) = effective {
            if self.gid == egid || self.egid == egid || self.sgid == egid || self.is_superuser() {
                self.egid = egid;
            } else {
                return Err(ProcError::PermissionDenied);
            }
        }
        Ok(())
    }

    pub fn set_group_id(&mut self, gid: Option<Gid>) -> Result<(), ProcError> {
        self.set_real_and_effective_gid(gid, gid)
    }

    /// Change the real and/or effective user id. `None` leaves a half alone.
    ///
    /// If the effective half is refused, the real uid is restored to its value
    /// on entry before the error is returned.
    pub fn set_real_and_effective_uid(
        &mut self,
        real: Option<Uid>,
        effective: Option<Uid>,
    ) -> Result<(), ProcError> {
        let old_ruid = self.uid;

        if let Some(ruid) = real {
            if self.euid == ruid || old_ruid == ruid || self.is_superuser() {
                self.uid = ruid;
            } else {
                return Err(ProcError::PermissionDenied);
            }
        }
        if let Some(euid) = effective {
            if old_ruid == euid || self.euid == euid || self.is_superuser() {
                self.euid = euid;
            } else {
                self.uid = old_ruid;
                return Err(ProcError::PermissionDenied);
            }
        }
        Ok(())
    }

    pub fn set_user_id(&mut self, uid: Option<Uid>) -> Result<(), ProcError> {
        self.set_real_and_effective_uid(uid, uid)
    }
}
