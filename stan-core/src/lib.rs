//! stan-core: statement model, booking classification and cross-statement checks

pub mod booking_type;
pub mod category;
pub mod sequence;
pub mod statement;

pub use booking_type::BookingType;
pub use category::{CategoryError, CategoryMatcher, CategoryRule};
pub use sequence::{SequenceError, validate_sequence};
pub use statement::{BookingItem, Statement, TOLERANCE, within_tolerance};
