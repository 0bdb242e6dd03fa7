pub mod db;
pub mod entities;
pub mod error;
pub mod services;

#[cfg(test)]
mod test_support;
