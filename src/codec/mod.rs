pub mod mapper;
pub mod timestamp;

pub use mapper::EntityMapper;
