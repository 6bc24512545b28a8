pub mod quiz;
pub mod stats;
pub mod verify;

/// Score window applied before anything else looks at the items.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    pub from: Option<i64>,
    pub to: Option<i64>,
}
