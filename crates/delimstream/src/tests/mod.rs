mod property_partition;
pub(crate) mod utils;
