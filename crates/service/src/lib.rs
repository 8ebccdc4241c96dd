//! Service layer for the quote store.
//! - `quote` holds the repository contract and the business rules on top of it.
//! - `storage` holds the in-memory repository.
//! - `external` and `seed` import quotes from a third-party API.
//! - `mail` is the outbound mail capability.

pub mod errors;
pub mod storage;
pub mod quote;
pub mod external;
pub mod seed;
pub mod mail;
