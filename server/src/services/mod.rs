pub mod event_service;
pub mod reconcile;
pub mod ticket_service;
pub mod ticket_type_service;

pub use event_service::EventService;
pub use ticket_service::TicketService;
pub use ticket_type_service::TicketTypeService;
