//! Internal testing utilities for the pbf-cursor crates.

use std::fmt::Debug;
use std::panic::RefUnwindSafe;

pub mod encode;

/// Utility for creating parametrized (aka. table-driven) tests.
///
/// Create a collection of `Case` structs that implement `Debug`, then pass a
/// test function to `test_each`. Every case is run, even if earlier ones
/// fail, and the failing cases are reported together.
///
/// ```
/// use pbf_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     key: u8,
///     tag: u8,
/// }
///
/// let cases = [Case { key: 0x08, tag: 1 }, Case { key: 0x12, tag: 2 }];
///
/// cases.test_each(|case| {
///     assert_eq!(case.key >> 3, case.tag);
/// });
/// ```
///
/// Test cases and the test function must be
/// [unwind safe](https://doc.rust-lang.org/std/panic/fn.catch_unwind.html),
/// since panics from each case are caught. Cases holding byte buffers and
/// integers satisfy this automatically.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with each case in `self`, catching any panics.
    ///
    /// Panics after all cases have run if any of them failed.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures: Vec<_> = self
            .into_iter()
            .filter(|case| std::panic::catch_unwind(|| test(case)).is_err())
            .collect();
        assert!(
            failures.is_empty(),
            "{} test cases failed: {:?}",
            failures.len(),
            failures
        );
    }
}
