//! Summary vector classification
//!
//! Every column of a spec file is described by a raw keyword, a well/group
//! name, an integer and (for LGR-scoped vectors) a local grid reference.
//! The keyword's first character drives both its [Category] and the shape
//! of the user-facing key string built in [key](crate::key).

// standard library
use std::sync::OnceLock;

// external crates
use regex::Regex;

/// Category of a summary vector, inferred from its keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Aquifer scoped, `A...`
    Aquifer,
    /// Single cell scoped, `B...`
    Block,
    /// Well completion scoped, e.g. `WOPRL` or `COPRL`
    Completion,
    /// Well connection scoped, `C...`
    Connection,
    /// Field wide, `F...`
    Field,
    /// Group scoped, `G...`
    Group,
    /// Cell in a local grid refinement, `LB...`
    LocalBlock,
    /// Completion in a local grid refinement, `LC...`
    LocalCompletion,
    /// Well in a local grid refinement, `LW...`
    LocalWell,
    /// Anything without a dedicated scope
    Misc,
    /// Network scoped, `N...`
    Network,
    /// Node scoped vectors in extended network models
    Node,
    /// Region scoped, `R...`
    Region,
    /// Well segment scoped, `S...`
    Segment,
    /// Well scoped, `W...`
    Well,
}

/// Local grid refinement context of a summary vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LgrInfo {
    /// Name of the local grid
    pub name: String,
    /// Cell coordinates within the local grid, 1-based
    pub ijk: [i32; 3],
}

/// One resolved summary vector definition
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryNode {
    /// Normalised keyword, e.g. `WOPRL` for the raw `WOPRL__1`
    pub keyword: String,
    /// Inferred category
    pub category: Category,
    /// Well or group name, the `:+:+:+:+` sentinel when not applicable
    pub wgname: String,
    /// The NUMS entry: cell number, region number, segment number...
    pub number: i32,
    /// Physical unit of the vector
    pub unit: String,
    /// Local grid context for `L...` keywords
    pub lgr: Option<LgrInfo>,
}

/// Well completion keywords like `WOPRL`, `WOPRL__8` or `WOPRL123`, but not
/// `WOPRL___` or `WKITL`
pub fn is_well_completion(keyword: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    PATTERN
        .get_or_init(|| {
            // Safe to unwrap, the pattern is a literal
            Regex::new(r"^W[OGWLV][PIGOLCF][RT]L([0-9_]{2}[0-9])?$").unwrap()
        })
        .is_match(keyword)
}

/// Connection completion keywords like `COPRL`
pub fn is_connection_completion(keyword: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    PATTERN
        .get_or_init(|| {
            // Safe to unwrap, the pattern is a literal
            Regex::new(r"^C[OGW][IP][RT]L$").unwrap()
        })
        .is_match(keyword)
}

/// Segment-lettered keywords that are really miscellaneous vectors
pub fn miscellaneous_exception(keyword: &str) -> bool {
    matches!(keyword, "SEPARATE" | "STEPTYPE" | "SUMTHIN")
}

/// Infer the vector category from the keyword alone
pub fn category_from_keyword(keyword: &str) -> Category {
    let mut chars = keyword.chars();

    match chars.next() {
        Some('A') => Category::Aquifer,
        Some('B') => Category::Block,
        Some('C') => {
            if is_connection_completion(keyword) {
                Category::Completion
            } else {
                Category::Connection
            }
        }
        Some('F') => Category::Field,
        Some('G') => Category::Group,
        Some('N') => Category::Network,
        Some('R') => Category::Region,
        Some('S') => Category::Segment,
        Some('W') => Category::Well,
        Some('L') => match chars.next() {
            Some('B') => Category::LocalBlock,
            Some('C') => Category::LocalCompletion,
            Some('W') => Category::LocalWell,
            _ => Category::Misc,
        },
        _ => Category::Misc,
    }
}

/// Strip the completion-number suffix simulators append to padded keywords,
/// so `WOPRL__1` becomes `WOPRL` (the number itself arrives through NUMS)
pub fn normalise_keyword(keyword: &str) -> String {
    if keyword.len() > 5 && is_well_completion(keyword) {
        keyword[..5].to_string()
    } else {
        keyword.to_string()
    }
}
