//! Testing utilities for ghlogin
//!
//! - [`fixtures`] - Pre-built profiles and exchange results
//! - [`mock`] - Recording fakes for the resolver, hook, sink and profile exchange
//!
//! ## Usage
//!
//! ```rust
//! use ghlogin::testing::fixtures::TestFixtures;
//!
//! let exchange = TestFixtures::exchange(
//!     "tok1",
//!     TestFixtures::profile_with_emails(&["a@x.com"]),
//! );
//! assert_eq!(exchange.profile.first_email(), Some("a@x.com"));
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "octocat@example.com";

    /// Default GitHub login
    pub const TEST_GITHUB_LOGIN: &str = "octocat";

    /// Default GitHub numeric user id
    pub const TEST_GITHUB_ID: &str = "583231";

    /// Default authorization code accepted by `StaticExchange` in tests
    pub const TEST_CODE: &str = "test-code";
}
