//! Contract violations.
//!
//! Misusing an iterator or the serializer (stepping past the end, consuming more than
//! was handed out, driving a finished message) is a bug in the caller. These are never
//! reported through an error value, the process panics instead.

/// Panics with a `precondition violated` message when `$cond` does not hold.
///
/// `precondition!("...")` always panics.
macro_rules! precondition {
    ($msg:literal) => {
        $crate::precondition::violated(format_args!($msg))
    };
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            $crate::precondition::violated(format_args!($($msg)+))
        }
    };
}

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn violated(msg: std::fmt::Arguments<'_>) -> ! {
    panic!("precondition violated: {msg}")
}

pub(crate) use precondition;
