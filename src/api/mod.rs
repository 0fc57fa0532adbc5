pub mod health;
pub mod leave_request;
pub mod user;

#[cfg(test)]
pub mod test_support;
