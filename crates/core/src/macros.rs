#[doc(hidden)]
pub use regex as __regex;

/// Declares a function returning a lazily compiled, process-wide regex.
#[macro_export]
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static $crate::macros::__regex::Regex {
            static R: std::sync::OnceLock<$crate::macros::__regex::Regex> =
                std::sync::OnceLock::new();
            R.get_or_init(|| $crate::macros::__regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}
