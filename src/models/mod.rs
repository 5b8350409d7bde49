pub mod movie;
pub mod reservation;
pub mod room;
pub mod seat;
pub mod session;
pub mod ticket;
pub mod user;

pub use movie::Movie;
pub use reservation::{RequestedSeat, ReservationRequest};
pub use room::{Room, RoomLayout};
pub use seat::{Seat, SeatKey, SeatMap};
pub use session::{Session, SessionRow};
pub use ticket::{NewTicket, Ticket, TicketConfirmation};
pub use user::{Role, User};
