pub mod monthly;
pub mod station_file;

pub use monthly::{read_monthly_rows, RawMonthlyRow, DAYS_PER_ROW};
pub use station_file::StationFile;
