mod amount;
mod auth;
mod concert;
mod envelope;
mod order;
mod ticket;

pub use amount::Amount;
pub use auth::BearerToken;
pub use concert::{Concert, ConcertStatus, OverviewStats, TicketType, recent_concerts};
pub use envelope::ApiResponse;
pub use order::{Order, OrderBuyer, OrderConcert, OrderFilter, OrderItem, OrderItemType, OrderStatus, PaymentInfo};
pub use ticket::{Holder, Ticket, TicketConcert, TicketStatus, TicketTypeSummary};
