//! Shared test utilities
//!
//! - `TestDatabase`: Postgres container with the workspace migrations applied
//!   (feature: "postgres")
//! - `TestDataBuilder`: deterministic product ids and names
//! - `assertions`: small assertion helpers
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!     let id = builder.product_id(1);
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded generator for reproducible test data
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name so each test gets stable, distinct data
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Zero-padded so lexical order equals numeric order
    pub fn product_id(&self, n: usize) -> String {
        format!("p{:04}-{:06}", n, self.seed % 1_000_000)
    }

    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

pub mod assertions {
    /// Assert `ids` are in ascending order
    pub fn assert_sorted(ids: &[String], context: &str) {
        assert!(
            ids.windows(2).all(|w| w[0] <= w[1]),
            "{}: ids not sorted: {:?}",
            context,
            ids
        );
    }
}
