pub mod load_account;
pub mod search_account;
pub mod validate_identifier;

#[cfg(test)]
pub(crate) mod fake_github;
