pub mod bean;
pub mod date;
pub mod error;

pub use bean::{CoffeeBean, DailySelection};
pub use date::SelectionDate;
pub use error::{CoreError, ErrorCategory, Result};
