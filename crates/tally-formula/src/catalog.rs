//! Business variables the metrics layer knows how to populate.
//!
//! The engine itself accepts any identifier; this catalogue only lets
//! callers flag formulas whose variables will always read as `0`.

use crate::extract::extract_variables;

/// A variable the data layer can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Known business variables, in display order.
pub const KNOWN_VARIABLES: &[VariableInfo] = &[
    VariableInfo {
        name: "revenue",
        description: "Total value of deals won in the period",
    },
    VariableInfo {
        name: "deals_won",
        description: "Number of deals won in the period",
    },
    VariableInfo {
        name: "pipeline_value",
        description: "Total value of open deals created in the period",
    },
    VariableInfo {
        name: "active_deals",
        description: "Number of open deals created in the period",
    },
    VariableInfo {
        name: "engagement",
        description: "Likes + comments + shares",
    },
    VariableInfo {
        name: "impressions",
        description: "Social post impressions",
    },
    VariableInfo {
        name: "likes",
        description: "Social post likes",
    },
    VariableInfo {
        name: "comments",
        description: "Social post comments",
    },
    VariableInfo {
        name: "shares",
        description: "Social post shares",
    },
    VariableInfo {
        name: "content_count",
        description: "Content items created in the period",
    },
    VariableInfo {
        name: "audit_score",
        description: "Score of the most recent completed SEO audit",
    },
];

/// Look up a catalogue entry by name.
pub fn lookup(name: &str) -> Option<&'static VariableInfo> {
    KNOWN_VARIABLES.iter().find(|v| v.name == name)
}

pub fn is_known_variable(name: &str) -> bool {
    lookup(name).is_some()
}

/// Variables referenced by `formula` that are not in the catalogue, sorted.
pub fn unknown_variables(formula: &str) -> Vec<String> {
    extract_variables(formula)
        .into_iter()
        .filter(|name| !is_known_variable(name))
        .collect()
}
