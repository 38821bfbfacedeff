// Domain entities
pub mod check_in;
pub mod model;
pub mod payment;
pub mod payment_event;
pub mod ticket;
pub mod ticket_type;
pub mod wallet;
pub mod withdrawal;

pub use check_in::*;
pub use model::*;
pub use payment::*;
pub use payment_event::*;
pub use ticket::*;
pub use ticket_type::*;
pub use wallet::*;
pub use withdrawal::*;
