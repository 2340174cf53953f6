//! Token signing and password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtError, JwtService, RsaKeyPair, TokenType};
pub use password::{PasswordError, hash_password, verify_password};
