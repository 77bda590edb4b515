//! Name-based functional relationship detection (spec.md §4.4, redesign
//! note in §9): the substring-to-role mapping is data, not code, so it can
//! grow without touching the model builder or scorer.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionalRole {
    Sofa,
    Chair,
    CoffeeTable,
    Desk,
    Tv,
}

/// `{substring -> role}`, checked in order against a lowercased item name.
/// First match wins, mirroring the teacher's `floor_slot`-style clamped
/// const-table lookups in `mapgen/progression.rs`.
const NAME_ROLE_TABLE: &[(&str, FunctionalRole)] = &[
    ("coffee", FunctionalRole::CoffeeTable),
    ("sofa", FunctionalRole::Sofa),
    ("chair", FunctionalRole::Chair),
    ("desk", FunctionalRole::Desk),
    ("tv", FunctionalRole::Tv),
];

pub fn role_for_name(name: &str) -> Option<FunctionalRole> {
    let lower = name.to_lowercase();
    NAME_ROLE_TABLE.iter().find(|(substring, _)| lower.contains(substring)).map(|(_, role)| *role)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PairTargetKind {
    /// Forward-offset band from the first item's facing edge, e.g.
    /// sofa -> coffee table.
    ForwardOffsetBand { offset_cm: i64, band_cm: i64 },
    /// Manhattan distance range, e.g. desk -> chair or tv -> sofa.
    ManhattanRange { min_cm: i64, max_cm: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FunctionalPairRule {
    pub a: FunctionalRole,
    pub b: FunctionalRole,
    pub target: PairTargetKind,
}

/// The three functional soft-pair rules of spec.md §4.4.
pub const PAIR_RULES: &[FunctionalPairRule] = &[
    FunctionalPairRule {
        a: FunctionalRole::Sofa,
        b: FunctionalRole::CoffeeTable,
        target: PairTargetKind::ForwardOffsetBand { offset_cm: 50, band_cm: 20 },
    },
    FunctionalPairRule {
        a: FunctionalRole::Desk,
        b: FunctionalRole::Chair,
        target: PairTargetKind::ManhattanRange { min_cm: 60, max_cm: 80 },
    },
    FunctionalPairRule {
        a: FunctionalRole::Tv,
        b: FunctionalRole::Sofa,
        target: PairTargetKind::ManhattanRange { min_cm: 200, max_cm: 400 },
    },
];

/// Finds every rule whose roles match `(role_a, role_b)` in either order.
pub fn rules_for(role_a: FunctionalRole, role_b: FunctionalRole) -> Vec<&'static FunctionalPairRule> {
    PAIR_RULES
        .iter()
        .filter(|rule| {
            (rule.a == role_a && rule.b == role_b) || (rule.a == role_b && rule.b == role_a)
        })
        .collect()
}
