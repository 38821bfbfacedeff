pub mod checkin_handlers;
pub mod ops_handlers;
pub mod ticket_handlers;
pub mod wallet_handlers;
pub mod webhook_handlers;

pub use checkin_handlers::*;
pub use ops_handlers::*;
pub use ticket_handlers::*;
pub use wallet_handlers::*;
pub use webhook_handlers::*;
