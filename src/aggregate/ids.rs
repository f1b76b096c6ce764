/// Source of fresh segment ids.
pub trait SegmentIdGen {
    /// Return an id never returned before by this generator.
    fn next_id(&mut self) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
/// Time-ordered UUIDv7 ids, the production default.
pub struct UuidIds;

impl SegmentIdGen for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::now_v7().simple().to_string()
    }
}

#[derive(Clone, Debug)]
/// Deterministic `<prefix><n>` ids.
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Counter starting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl SegmentIdGen for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
