#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const KESTREL_ASSERT_LEVEL_DEFINITION: u8 = KESTREL_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const KESTREL_ASSERT_LEVEL_DEFINITION: u8 = KESTREL_ASSERT_EXTREME;

pub const KESTREL_ASSERT_SIMPLE: u8 = 1;
pub const KESTREL_ASSERT_MODERATE: u8 = 2;
pub const KESTREL_ASSERT_ADVANCED: u8 = 3;
pub const KESTREL_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! print_kestrel_assert_warning_message {
    () => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::KESTREL_ASSERT_MODERATE {
            log::warn!("Potential performance degradation: the Kestrel assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.", $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION);
        };
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::KESTREL_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::KESTREL_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::KESTREL_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::KESTREL_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::KESTREL_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
