//! Logging front end.
//!
//! `info!`, `warn!`, `error!` and `debug!` forward to defmt on the target and
//! to tracing in the desktop simulator. With neither backend enabled the
//! arguments are still type-checked but nothing is emitted.
//!
//! Format strings use only `{}` placeholders so the same call site is valid
//! for both backends; every logged type implements `Display` and, under the
//! `defmt` feature, `defmt::Format`.

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(all(feature = "emulator", not(feature = "defmt")))]
macro_rules! info {
    ($($arg:tt)*) => { ::tracing::info!($($arg)*) };
}

#[cfg(all(feature = "emulator", not(feature = "defmt")))]
macro_rules! warn {
    ($($arg:tt)*) => { ::tracing::warn!($($arg)*) };
}

#[cfg(all(feature = "emulator", not(feature = "defmt")))]
macro_rules! error {
    ($($arg:tt)*) => { ::tracing::error!($($arg)*) };
}

#[cfg(all(feature = "emulator", not(feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! info {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! error {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
