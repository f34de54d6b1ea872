//! Helpers for scheduling tests.
//!
//! With the `postgres` feature, [`TestDatabase`] hands out a throwaway
//! migrated PostgreSQL. [`TestDataBuilder`] and [`assertions`] need nothing.
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn follow_public_schedule() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("follow_public_schedule");
//!
//!     let email = builder.email("owner");
//!     let schedule_name = builder.name("schedule", "main");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded generator for emails, passwords and resource names.
///
/// The same seed always yields the same values.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Builder with an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the hash of `name`.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_follow_schedule");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A unique, valid email address for `label` within this test
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.email("owner"), "owner-7@example.com");
    /// ```
    pub fn email(&self, label: &str) -> String {
        format!("{}-{}@example.com", label, self.seed)
    }

    /// A password that satisfies registration rules
    pub fn password(&self) -> String {
        format!("password-{}", self.seed)
    }

    /// `test-{prefix}-{seed}-{suffix}`, e.g. `builder.name("schedule", "gym")`.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

pub mod assertions {
    /// Unwraps `value`, naming `context` in the panic.
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that two id sets match regardless of order
    pub fn assert_same_ids(actual: impl IntoIterator<Item = i32>, expected: &[i32], context: &str) {
        let mut actual: Vec<i32> = actual.into_iter().collect();
        let mut expected = expected.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();

        assert_eq!(
            actual, expected,
            "{}: expected ids {:?}, got {:?}",
            context, expected, actual
        );
    }
}
