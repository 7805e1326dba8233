pub mod airline;
pub mod balance;
pub mod flight;
pub mod genesis;
pub mod insurance;
pub mod operational;
pub mod payout;
pub mod policy;
