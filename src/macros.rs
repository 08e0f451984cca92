//! Crate-internal logging macros.
//!
//! Each macro forwards to `log` (feature `log`) or `defmt` (feature `defmt-0-3`).
//! With neither enabled the arguments are only borrowed, so they stay used and the
//! macro compiles to nothing.
//!
//! Only `{}` and `{:x}` placeholders are used, which both backends understand.

macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::trace!($fmt $(, $arg)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::trace!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::debug!($fmt $(, $arg)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::warn!($fmt $(, $arg)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}
