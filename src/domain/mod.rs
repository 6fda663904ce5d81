pub mod opportunity;
pub mod region;

pub use opportunity::Opportunity;
pub use region::Region;
