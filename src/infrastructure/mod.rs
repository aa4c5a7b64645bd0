//! Infrastructure layer - ledger node access

pub mod ledger;
