pub mod payment_flow;
pub mod router;
