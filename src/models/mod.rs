pub mod order;
pub mod product;
pub mod user;

pub use order::{DailyRevenue, Order, RevenueSummary};
pub use product::Product;
pub use user::User;
