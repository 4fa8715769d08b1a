/// Record identifiers assigned by the remote API.
pub type DbId = i64;
