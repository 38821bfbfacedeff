pub mod ticket_queries;
pub mod wallet_queries;
pub mod withdrawal_queries;
