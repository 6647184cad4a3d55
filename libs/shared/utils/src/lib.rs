pub mod clock;
pub mod test_utils;
