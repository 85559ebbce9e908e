pub mod guard;
pub mod password;
pub mod token;

pub use guard::{permit, require_identity, require_post_access, require_post_visibility};
pub use password::{CredentialHasher, HashError};
pub use token::{Claims, TokenError, TokenIssuer};
