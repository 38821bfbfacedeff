// Domain value objects
pub mod check_in_method;
pub mod payment_status;
pub mod withdrawal_status;

pub use check_in_method::*;
pub use payment_status::*;
pub use withdrawal_status::*;
