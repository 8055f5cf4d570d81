pub mod math_utils;
pub mod test_util;
