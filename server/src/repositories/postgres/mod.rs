mod event;
mod ticket;
mod user;

pub use event::PgEventRepository;
pub use ticket::PgTicketRepository;
pub use user::PgUserRepository;
