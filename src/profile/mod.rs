//! Profile records and loaders

mod data;
pub mod loader;

pub use data::{Profile, ProfileAssumptions, ProfileInfo, MAX_AGE_YEARS};
pub(crate) use data::check_age;
pub use loader::{load_profiles, load_profiles_csv, load_profiles_csv_from_reader, load_profiles_from_reader};
