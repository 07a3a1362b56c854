//! Call-site entry points that capture `file!()` and `line!()`.
//!
//! ```ignore
//! terminate!("bad state");
//! terminate!("assertion failed", "expected" => 5, "actual" => 7);
//! terminate_with_info!("a == b", "a, b", a, b);
//! ```
//!
//! `terminate!` takes at most three pairs:
//!
//! ```no_run
//! use terminus_core::terminate;
//!
//! fn check(expected: i32, actual: i32) {
//!     if expected != actual {
//!         terminate!("mismatch", "expected" => expected, "actual" => actual, "retries" => 3u8);
//!     }
//! }
//! # check(1, 1);
//! ```
//!
//! A fourth pair matches no rule and fails to compile:
//!
//! ```compile_fail
//! use terminus_core::terminate;
//!
//! fn _overflow() -> ! {
//!     terminate!("too many", "a" => 1, "b" => 2, "c" => 3, "d" => 4)
//! }
//! ```

#[macro_export]
macro_rules! terminate {
    ($msg:expr $(,)?) => {
        $crate::terminate($msg, file!(), line!())
    };
    ($msg:expr, $n1:expr => $v1:expr $(,)?) => {
        $crate::terminate_with_pairs($msg, file!(), line!(), [$crate::Pair::new($n1, $v1)])
    };
    ($msg:expr, $n1:expr => $v1:expr, $n2:expr => $v2:expr $(,)?) => {
        $crate::terminate_with_pairs(
            $msg,
            file!(),
            line!(),
            [$crate::Pair::new($n1, $v1), $crate::Pair::new($n2, $v2)],
        )
    };
    ($msg:expr, $n1:expr => $v1:expr, $n2:expr => $v2:expr, $n3:expr => $v3:expr $(,)?) => {
        $crate::terminate_with_pairs(
            $msg,
            file!(),
            line!(),
            [
                $crate::Pair::new($n1, $v1),
                $crate::Pair::new($n2, $v2),
                $crate::Pair::new($n3, $v3),
            ],
        )
    };
}

#[macro_export]
macro_rules! terminate_with_info {
    ($msg:expr, $names:expr $(, $value:expr)* $(,)?) => {
        $crate::terminate_with_info(
            $msg,
            file!(),
            line!(),
            $names,
            $crate::__values([$($crate::IntoValue::into_value($value)),*]),
        )
    };
}
