// Adapters layer: concrete roster stores and CSV import/export.

pub mod csv_roster;
pub mod storage;
