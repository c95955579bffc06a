use crate::scoring::keywords;
use crate::scoring::Criterion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CATALOG_VERSION: u32 = 1;

/// A criterion value as it was entered.
///
/// Stored verbatim so that a malformed entry survives until ranking, where
/// it is coerced (or the candidate is excluded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Keep numbers as numbers, everything else as text
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => RawValue::Number(v),
            _ => RawValue::Text(input.to_string()),
        }
    }

    /// Numeric coercion. `None` for blank, non-numeric or non-finite input.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::parse(s)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{}", v),
            RawValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// One laptop owned by one user.
///
/// Processor and graphics scores are not stored; they are derived from the
/// labels on every read, so they can never drift from the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub price: RawValue,
    pub memory: RawValue,
    pub storage: RawValue,
    processor: String,
    graphics: String,
    pub screen_size: RawValue,
    pub rating: RawValue,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(id: u64, owner: &str, input: CandidateInput) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            name: input.name,
            price: input.price,
            memory: input.memory,
            storage: input.storage,
            processor: input.processor,
            graphics: input.graphics,
            screen_size: input.screen_size,
            rating: input.rating,
            created_at: Utc::now(),
        }
    }

    pub fn processor(&self) -> &str {
        &self.processor
    }

    pub fn graphics(&self) -> &str {
        &self.graphics
    }

    pub fn set_processor(&mut self, label: String) {
        self.processor = label;
    }

    pub fn set_graphics(&mut self, label: String) {
        self.graphics = label;
    }

    pub fn processor_score(&self) -> u8 {
        keywords::processor_score(&self.processor)
    }

    pub fn graphics_score(&self) -> u8 {
        keywords::graphics_score(&self.graphics)
    }

    /// Raw value for a criterion; derived scores are always numeric
    pub fn raw(&self, criterion: Criterion) -> RawValue {
        match criterion {
            Criterion::Price => self.price.clone(),
            Criterion::Memory => self.memory.clone(),
            Criterion::Storage => self.storage.clone(),
            Criterion::ProcessorScore => RawValue::Number(f64::from(self.processor_score())),
            Criterion::GraphicsScore => RawValue::Number(f64::from(self.graphics_score())),
            Criterion::ScreenSize => self.screen_size.clone(),
            Criterion::Rating => self.rating.clone(),
        }
    }

    /// Coerced numeric value for a criterion
    pub fn value(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::Price => self.price.as_number(),
            Criterion::Memory => self.memory.as_number(),
            Criterion::Storage => self.storage.as_number(),
            Criterion::ProcessorScore => Some(f64::from(self.processor_score())),
            Criterion::GraphicsScore => Some(f64::from(self.graphics_score())),
            Criterion::ScreenSize => self.screen_size.as_number(),
            Criterion::Rating => self.rating.as_number(),
        }
    }

    /// Apply a partial update. Label changes re-derive their scores.
    pub fn apply(&mut self, patch: CandidatePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(memory) = patch.memory {
            self.memory = memory;
        }
        if let Some(storage) = patch.storage {
            self.storage = storage;
        }
        if let Some(processor) = patch.processor {
            self.set_processor(processor);
        }
        if let Some(graphics) = patch.graphics {
            self.set_graphics(graphics);
        }
        if let Some(screen_size) = patch.screen_size {
            self.screen_size = screen_size;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }

    fn is_duplicate_of(&self, owner: &str, input: &CandidateInput) -> bool {
        self.owner == owner
            && self.name == input.name
            && self.processor == input.processor
            && self.memory == input.memory
    }
}

/// Fields supplied when adding a laptop
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateInput {
    pub name: String,
    pub price: RawValue,
    pub memory: RawValue,
    pub storage: RawValue,
    pub processor: String,
    pub graphics: String,
    pub screen_size: RawValue,
    pub rating: RawValue,
}

/// Fields to change on an existing laptop; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePatch {
    pub name: Option<String>,
    pub price: Option<RawValue>,
    pub memory: Option<RawValue>,
    pub storage: Option<RawValue>,
    pub processor: Option<String>,
    pub graphics: Option<String>,
    pub screen_size: Option<RawValue>,
    pub rating: Option<RawValue>,
}

impl CandidatePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// All laptops of all owners, as persisted in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create a new empty catalog with the current version
    pub fn new() -> Self {
        Self {
            version: CATALOG_VERSION,
            next_id: 1,
            candidates: Vec::new(),
        }
    }

    /// Add a laptop for `owner`, returning its id
    pub fn add(&mut self, owner: &str, input: CandidateInput) -> u64 {
        let id = self.allocate_id();
        self.candidates.push(Candidate::new(id, owner, input));
        id
    }

    /// Add unless the owner already has a laptop with the same name,
    /// processor label and memory. Returns the new id if inserted.
    pub fn add_if_absent(&mut self, owner: &str, input: CandidateInput) -> Option<u64> {
        if self
            .candidates
            .iter()
            .any(|c| c.is_duplicate_of(owner, &input))
        {
            return None;
        }
        Some(self.add(owner, input))
    }

    /// Snapshot of one owner's laptops, in insertion order
    pub fn list(&self, owner: &str) -> Vec<Candidate> {
        self.candidates
            .iter()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect()
    }

    pub fn get(&self, owner: &str, id: u64) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|c| c.owner == owner && c.id == id)
    }

    /// Update one of the owner's laptops.
    /// Returns true if the laptop exists and belongs to `owner`.
    pub fn update(&mut self, owner: &str, id: u64, patch: CandidatePatch) -> bool {
        match self
            .candidates
            .iter_mut()
            .find(|c| c.owner == owner && c.id == id)
        {
            Some(candidate) => {
                candidate.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove one of the owner's laptops.
    /// Returns true if something was removed.
    pub fn remove(&mut self, owner: &str, id: u64) -> bool {
        let before = self.candidates.len();
        self.candidates
            .retain(|c| !(c.owner == owner && c.id == id));
        self.candidates.len() != before
    }

    /// Remove all of the owner's laptops, returning how many were removed
    pub fn clear(&mut self, owner: &str) -> usize {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.owner != owner);
        before - self.candidates.len()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn allocate_id(&mut self) -> u64 {
        // Files written without next_id start from the highest existing id
        let floor = self.candidates.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(floor);
        self.next_id = id + 1;
        id
    }
}

#[cfg(test)]
pub(crate) fn sample_input(name: &str, price: f64) -> CandidateInput {
    CandidateInput {
        name: name.to_string(),
        price: RawValue::Number(price),
        memory: RawValue::Number(16.0),
        storage: RawValue::Number(512.0),
        processor: "Intel Core i7".to_string(),
        graphics: "RTX 3050".to_string(),
        screen_size: RawValue::Number(15.6),
        rating: RawValue::Number(4.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_parse() {
        assert_eq!(RawValue::parse("1000"), RawValue::Number(1000.0));
        assert_eq!(RawValue::parse(" 15.6 "), RawValue::Number(15.6));
        assert_eq!(RawValue::parse("n/a"), RawValue::Text("n/a".to_string()));
        assert_eq!(RawValue::parse("inf"), RawValue::Text("inf".to_string()));
    }

    #[test]
    fn test_raw_value_coercion() {
        assert_eq!(RawValue::Text(" 8 ".to_string()).as_number(), Some(8.0));
        assert_eq!(RawValue::Text(String::new()).as_number(), None);
        assert_eq!(RawValue::Text("16GB".to_string()).as_number(), None);
        assert_eq!(RawValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(RawValue::Number(4.5).as_number(), Some(4.5));
    }

    #[test]
    fn test_raw_value_untagged_serde() {
        let parsed: Vec<RawValue> = serde_json::from_str(r#"[1500, "abc", 15.6]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                RawValue::Number(1500.0),
                RawValue::Text("abc".to_string()),
                RawValue::Number(15.6)
            ]
        );
    }

    #[test]
    fn test_derived_scores_follow_label() {
        let mut catalog = Catalog::new();
        let id = catalog.add("alice", sample_input("Laptop", 1000.0));
        assert_eq!(catalog.get("alice", id).unwrap().processor_score(), 8);

        let patch = CandidatePatch {
            processor: Some("Ryzen 5 7535HS".to_string()),
            graphics: Some("Intel UHD".to_string()),
            ..Default::default()
        };
        assert!(catalog.update("alice", id, patch));

        let candidate = catalog.get("alice", id).unwrap();
        assert_eq!(candidate.processor_score(), 6);
        assert_eq!(candidate.graphics_score(), 3);
        assert_eq!(candidate.value(Criterion::ProcessorScore), Some(6.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut catalog = Catalog::new();
        let a = catalog.add("alice", sample_input("A", 1.0));
        let b = catalog.add("bob", sample_input("B", 1.0));
        catalog.remove("bob", b);
        let c = catalog.add("alice", sample_input("C", 1.0));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_list_is_owner_scoped() {
        let mut catalog = Catalog::new();
        catalog.add("alice", sample_input("A", 1.0));
        catalog.add("bob", sample_input("B", 1.0));
        catalog.add("alice", sample_input("C", 1.0));

        let names: Vec<_> = catalog.list("alice").into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_update_and_remove_respect_owner() {
        let mut catalog = Catalog::new();
        let id = catalog.add("alice", sample_input("A", 1.0));

        let patch = CandidatePatch {
            name: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(!catalog.update("bob", id, patch));
        assert!(!catalog.remove("bob", id));
        assert_eq!(catalog.get("alice", id).unwrap().name, "A");
        assert!(catalog.remove("alice", id));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_if_absent_skips_duplicates() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_if_absent("alice", sample_input("A", 1000.0)).is_some());
        // Same name, processor and memory: duplicate even with a different price
        assert!(catalog.add_if_absent("alice", sample_input("A", 900.0)).is_none());
        // Other owners are independent
        assert!(catalog.add_if_absent("bob", sample_input("A", 1000.0)).is_some());

        let mut different_memory = sample_input("A", 1000.0);
        different_memory.memory = RawValue::Number(32.0);
        assert!(catalog.add_if_absent("alice", different_memory).is_some());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_clear_only_touches_owner() {
        let mut catalog = Catalog::new();
        catalog.add("alice", sample_input("A", 1.0));
        catalog.add("alice", sample_input("B", 1.0));
        catalog.add("bob", sample_input("C", 1.0));

        assert_eq!(catalog.clear("alice"), 2);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.list("alice").is_empty());
    }

    #[test]
    fn test_allocate_id_after_load_without_counter() {
        let json = r#"{
            "version": 1,
            "candidates": [{
                "id": 7, "owner": "alice", "name": "Old",
                "price": 1000, "memory": 8, "storage": 256,
                "processor": "i5", "graphics": "mx",
                "screen_size": 14.0, "rating": 4.0,
                "created_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let mut catalog: Catalog = serde_json::from_str(json).unwrap();
        let id = catalog.add("alice", sample_input("New", 1.0));
        assert_eq!(id, 8);
    }

    #[test]
    fn test_empty_patch() {
        assert!(CandidatePatch::default().is_empty());
        let patch = CandidatePatch {
            rating: Some(RawValue::Number(5.0)),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
