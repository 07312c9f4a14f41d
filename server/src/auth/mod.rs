mod crypto;
mod extractor;
mod token;

pub use crypto::{hash_password, verify_password, verify_password_or_dummy};
pub use extractor::{AuthUser, MaybeAuthUser};
pub use token::TokenKeys;
