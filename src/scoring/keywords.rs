/// Score used when no pattern matches a label.
pub const DEFAULT_SCORE: u8 = 5;

/// Processor patterns, checked in order. First substring match wins.
pub const PROCESSOR_TABLE: &[(&str, u8)] = &[
    ("i3", 4),
    ("i5", 6),
    ("i7", 8),
    ("i9", 10),
    ("ryzen 3", 4),
    ("ryzen 5", 6),
    ("ryzen 7", 8),
    ("ryzen 9", 10),
];

/// Graphics patterns, checked in order. First substring match wins.
pub const GRAPHICS_TABLE: &[(&str, u8)] = &[
    ("intel uhd", 3),
    ("iris xe", 4),
    ("amd radeon", 5),
    ("mx", 6),
    ("gtx", 7),
    ("rtx 2050", 8),
    ("rtx 3050", 9),
    ("rtx 3060", 10),
];

/// Look up a free-text label in an ordered keyword table.
///
/// Matching is case-insensitive substring containment, so a label can match
/// more than one pattern; the earliest entry in `table` wins.
pub fn score_label(label: &str, table: &[(&str, u8)]) -> u8 {
    let label = label.to_lowercase();
    table
        .iter()
        .find(|(pattern, _)| label.contains(pattern))
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_SCORE)
}

pub fn processor_score(label: &str) -> u8 {
    score_label(label, PROCESSOR_TABLE)
}

pub fn graphics_score(label: &str) -> u8 {
    score_label(label, GRAPHICS_TABLE)
}
