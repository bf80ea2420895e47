//! Registration rules per role, kept in one table so the self-service and
//! admin paths cannot drift apart.

use crate::identity::models::Role;
use crate::identity::models::VerificationStatus;

/// Verification posture an account starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialPosture {
    pub is_verified: bool,
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct RolePolicy {
    pub role: Role,
    pub self_registrable: bool,
    pub admin_creatable: bool,
    /// Posture after self-registration; `None` when the role cannot self-register.
    pub self_registration_posture: Option<InitialPosture>,
}

const AWAITING_EMAIL: InitialPosture = InitialPosture {
    is_verified: false,
    verification_status: VerificationStatus::Approved,
};

const AWAITING_REVIEW: InitialPosture = InitialPosture {
    is_verified: false,
    verification_status: VerificationStatus::Pending,
};

/// Posture of every account created by a system admin.
pub const ADMIN_CREATED: InitialPosture = InitialPosture {
    is_verified: true,
    verification_status: VerificationStatus::Approved,
};

pub static REGISTRATION_POLICY: [RolePolicy; 6] = [
    RolePolicy {
        role: Role::Patient,
        self_registrable: true,
        admin_creatable: false,
        self_registration_posture: Some(AWAITING_EMAIL),
    },
    RolePolicy {
        role: Role::Doctor,
        self_registrable: true,
        admin_creatable: true,
        self_registration_posture: Some(AWAITING_REVIEW),
    },
    RolePolicy {
        role: Role::Pharmacist,
        self_registrable: true,
        admin_creatable: true,
        self_registration_posture: Some(AWAITING_REVIEW),
    },
    RolePolicy {
        role: Role::ClinicAdmin,
        self_registrable: true,
        admin_creatable: true,
        self_registration_posture: Some(AWAITING_REVIEW),
    },
    RolePolicy {
        role: Role::SysAdmin,
        self_registrable: false,
        admin_creatable: true,
        self_registration_posture: None,
    },
    RolePolicy {
        role: Role::Service,
        self_registrable: false,
        admin_creatable: false,
        self_registration_posture: None,
    },
];

pub fn policy_for(role: Role) -> &'static RolePolicy {
    let row = match role {
        Role::Patient => 0,
        Role::Doctor => 1,
        Role::Pharmacist => 2,
        Role::ClinicAdmin => 3,
        Role::SysAdmin => 4,
        Role::Service => 5,
    };
    &REGISTRATION_POLICY[row]
}

/// Posture for a self-registering account, or `None` if `role` may not self-register.
pub fn self_registration_posture(role: Role) -> Option<InitialPosture> {
    let policy = policy_for(role);
    if policy.self_registrable {
        policy.self_registration_posture
    } else {
        None
    }
}

pub fn is_admin_creatable(role: Role) -> bool {
    policy_for(role).admin_creatable
}

/// Roles whose accounts go through administrator review.
pub fn requires_review(role: Role) -> bool {
    self_registration_posture(role)
        .map(|posture| posture.verification_status == VerificationStatus::Pending)
        .unwrap_or(false)
}

pub fn can_provision_accounts(role: Role) -> bool {
    role == Role::SysAdmin
}

pub fn can_announce_clinic_updates(role: Role) -> bool {
    matches!(role, Role::ClinicAdmin | Role::SysAdmin)
}
