/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Logging macros
//!
//! With the `log` feature the macros are the ones from the [`log`] crate,
//! otherwise they type check their arguments and expand to nothing, so
//! codecs build without a logging facade and without unused variable
//! warnings.
#[cfg(feature = "log")]
pub use log::{debug, error, info, trace, warn};

// #[macro_export] always puts a macro at the crate root,
// re-export under `log` so callers write `kino_core::log::warn`.
#[cfg(not(feature = "log"))]
pub use crate::{
    __kino_debug as debug, __kino_error as error, __kino_info as info, __kino_trace as trace,
    __kino_warn as warn
};

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __kino_error {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __kino_warn {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __kino_info {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __kino_debug {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __kino_trace {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}
