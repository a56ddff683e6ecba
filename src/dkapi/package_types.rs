//! Reference data for classifying parts by how they mount.
//!
//! Search results describe packaging through two parametric attributes:
//! "Mounting Type" ([`PARAM_MOUNTING_TYPE`]) and "Package / Case"
//! ([`PARAM_PACKAGE_CASE`]). The tables below map the vendor's value IDs for
//! those attributes onto through-hole vs. surface-mount.

use std::fmt;

/// Parametric attribute ID of "Mounting Type".
pub const PARAM_MOUNTING_TYPE: u32 = 69;
/// Parametric attribute ID of "Package / Case".
pub const PARAM_PACKAGE_CASE: u32 = 16;

/// Package name fragments that only occur on surface-mount parts.
pub const SMT_KEYWORDS: &[&str] = &[
    "SOT", "SOIC", "1206", "TQFP", "DO-214AA", "SC-76", "SOD-323", "0805",
];

/// "Mounting Type" values: 453 is surface mount (MLCC), 3 is surface mount.
pub const SMT_MOUNTING_TYPES: &[i64] = &[453, 3];
pub const TH_MOUNTING_TYPES: &[i64] = &[80, 367, 123];

pub const PKG_TH_HC_49: i64 = 319;
pub const PKG_TH_RADIAL_CAN: i64 = 11811;
pub const PKG_TH_RADIAL: i64 = 2;
pub const PKG_TH_TO_220: i64 = 10828;
pub const PKG_TH_AXIAL: i64 = 1;
pub const PKG_TH_DIP_8: i64 = 6547;
pub const PKG_TH_TO_251: i64 = 8459;
pub const PKG_TH_TO_92: i64 = 13139;
pub const PKG_TH_TO_220_3: i64 = 8250;
pub const PKG_TH_SIP_3: i64 = 7272;

pub const TH_PACKAGE_TYPES: &[i64] = &[
    PKG_TH_HC_49,
    PKG_TH_RADIAL_CAN,
    PKG_TH_RADIAL,
    PKG_TH_TO_220,
    PKG_TH_AXIAL,
    PKG_TH_DIP_8,
    PKG_TH_TO_251,
    PKG_TH_TO_92,
    PKG_TH_TO_220_3,
    PKG_TH_SIP_3,
];

/// Surface-mount "Package / Case" values and their short names.
///
/// 12624 is listed by the vendor as both TO-236 and SOT-23; the first name
/// is the one reported.
pub const SMT_PACKAGES: &[(i64, &str)] = &[
    (7, "1206"),
    (6, "0805"),
    (5120, "2512"),
    (12624, "TO_236"),
    (333, "DO_214"),
    (10180, "SC_76"),
    (6548, "SOIC_8"),
    (6511, "SOIC_14"),
    (6514, "SOIC_16"),
    (6534, "SOIC_28"),
    (11427, "TQFP_44"),
    (10109, "SOD_123F"),
    (10504, "TO_277"),
    (13421, "SSOP_16"),
    (986, "SOT_23_6"),
    (160, "SOT_23_5"),
    (13125, "MSOP_10"),
    (8582, "TSSOP_14"),
    (15647, "1206_WIDE"),
];

/// Package names that describe the same physical case.
pub const CASE_EQUIVALENT: &[&[&str]] = &[
    &["SOT_23", "TO_236", "TO_236AB"],
    &["SOT-23-6", "SC-74"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MountType {
    #[default]
    Unknown,
    /// Evidence for both mount styles.
    Ambiguous,
    ThroughHole,
    SurfaceMount,
}

impl MountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MountType::Unknown => "UNKNOWN",
            MountType::Ambiguous => "AMBIG",
            MountType::ThroughHole => "TH",
            MountType::SurfaceMount => "SMT",
        }
    }

    /// Merge two independent classifications of the same part.
    pub fn combine(self, other: MountType) -> MountType {
        match (self, other) {
            (MountType::Unknown, x) | (x, MountType::Unknown) => x,
            (a, b) if a == b => a,
            _ => MountType::Ambiguous,
        }
    }
}

impl fmt::Display for MountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn mount_type_for_mounting_id(id: i64) -> MountType {
    if SMT_MOUNTING_TYPES.contains(&id) {
        MountType::SurfaceMount
    } else if TH_MOUNTING_TYPES.contains(&id) {
        MountType::ThroughHole
    } else {
        MountType::Unknown
    }
}

pub fn mount_type_for_package_id(id: i64) -> MountType {
    if smt_package_name(id).is_some() {
        MountType::SurfaceMount
    } else if TH_PACKAGE_TYPES.contains(&id) {
        MountType::ThroughHole
    } else {
        MountType::Unknown
    }
}

/// Classify a free-text package description by [`SMT_KEYWORDS`].
pub fn mount_type_for_package_text(text: &str) -> MountType {
    let upper = text.to_ascii_uppercase();
    if SMT_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        MountType::SurfaceMount
    } else {
        MountType::Unknown
    }
}

pub fn smt_package_name(id: i64) -> Option<&'static str> {
    SMT_PACKAGES
        .iter()
        .find(|(pkg, _)| *pkg == id)
        .map(|(_, name)| *name)
}

pub fn cases_equivalent(a: &str, b: &str) -> bool {
    a == b
        || CASE_EQUIVALENT
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
}
