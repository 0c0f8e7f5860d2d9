//! Field limits and tunables shared across handlers and the seeder.

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_PERSON_NAME_LEN: usize = 150;
pub const MAX_INGREDIENT_NAME_LEN: usize = 128;
pub const MAX_MEASUREMENT_UNIT_LEN: usize = 64;
pub const MAX_TAG_NAME_LEN: usize = 32;
pub const MAX_TAG_SLUG_LEN: usize = 32;
pub const MAX_RECIPE_NAME_LEN: usize = 256;

pub const COOKING_TIME_MIN: i32 = 1;
pub const INGREDIENT_AMOUNT_MIN: i32 = 1;

/// Default page size for list endpoints; also the hard cap on the
/// per-author recipe preview in the subscriptions listing.
pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const SUBSCRIPTION_RECIPES_PREVIEW: i64 = DEFAULT_PAGE_SIZE;

/// Generated short-link token length. The column holds up to 15 characters
/// so this can be raised without a migration.
pub const SHORT_LINK_TOKEN_LEN: usize = 8;
pub const SHORT_LINK_URL_MAX: usize = 256;

pub const SESSION_TTL_DAYS: i64 = 30;
