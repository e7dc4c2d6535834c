pub mod allocator;
pub mod roster;
pub mod scoring;

pub use crate::domain::model::{
    AllocationMode, AllocationPolicy, AllocationRequest, Participant, Team, Tier,
};
pub use crate::domain::ports::RosterStore;
pub use crate::utils::error::Result;
