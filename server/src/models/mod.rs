pub mod event;
pub mod page;
pub mod requests;
pub mod ticket;
pub mod user;

pub use event::{Event, EventStatus, TicketType, TicketTypeChanges};
pub use page::{Page, PageRequest};
pub use ticket::{PurchaseOutcome, Ticket, TicketStatus};
pub use user::User;
