#![macro_use]
#![allow(unused_macros)]

// Format strings must stay compatible with both `log` and `defmt`:
// plain `{}` placeholders, no precision or width specifiers.
macro_rules! probe_log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::$level!($s $(, $x)*);

            #[cfg(all(feature = "defmt", not(feature = "log")))]
            ::defmt::$level!($s $(, $x)*);

            #[cfg(not(any(feature = "log", feature = "defmt")))]
            {
                $( let _ = &$x; )*
            }
        }
    };
}

macro_rules! log_trace {
    ($($arg:tt)*) => {
        probe_log!(trace, $($arg)*)
    };
}

macro_rules! log_debug {
    ($($arg:tt)*) => {
        probe_log!(debug, $($arg)*)
    };
}

macro_rules! log_info {
    ($($arg:tt)*) => {
        probe_log!(info, $($arg)*)
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        probe_log!(warn, $($arg)*)
    };
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        probe_log!(error, $($arg)*)
    };
}
